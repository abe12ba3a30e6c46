//! REPL core tests: state persisting across lines

mod common;

use common::*;
#[allow(unused_imports)]
use common::{assert_eq, assert_ne};
use monkey_config::InterpreterConfig;
use monkey_runtime::{Object, ReplCore, RuntimeError};

#[test]
fn test_bindings_persist_between_lines() {
    let mut repl = ReplCore::new();

    let first = repl.eval_line("let x = 5;");
    assert!(first.diagnostics.is_empty());
    assert_eq!(first.value, Some(Object::Null));

    let second = repl.eval_line("x * 2");
    assert_eq!(second.value, Some(Object::Integer(10)));
}

#[test]
fn test_functions_persist_between_lines() {
    let mut repl = ReplCore::new();
    repl.eval_line("let fib = fn(x) { if (x < 2) { x } else { fib(x - 1) + fib(x - 2) } };");
    assert_eq!(repl.eval_line("fib(15)").value, Some(Object::Integer(610)));
}

#[test]
fn test_error_does_not_reset_state() {
    let mut repl = ReplCore::new();
    repl.eval_line("let keep = 1;");

    let failed = repl.eval_line("keep + true");
    assert_eq!(
        failed.value.map(|v| v.inspect()),
        Some("ERROR: type mismatch: INTEGER + BOOLEAN".to_string())
    );

    assert_eq!(repl.eval_line("keep").value, Some(Object::Integer(1)));
}

#[test]
fn test_parse_error_reports_location() {
    let mut repl = ReplCore::new();
    let result = repl.eval_line("let a = 1 +;");

    assert!(result.value.is_none());
    assert_eq!(result.diagnostics.len(), 1);
    insta::assert_snapshot!(result.diagnostics[0].to_human_string(), @r"
    error[MK1001]: no prefix parse function for ';' found
      --> <input>:1:12
       |
     1 | let a = 1 +;
       |            ^ expected an expression
    ");
}

#[test]
fn test_bindings_listing() {
    let mut repl = ReplCore::new();
    repl.eval_line("let b = \"two\"; let a = 1;");

    let listed: Vec<(String, String)> = repl
        .bindings()
        .into_iter()
        .map(|(name, value)| (name, value.inspect()))
        .collect();

    assert_eq!(
        listed,
        vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "two".to_string()),
        ]
    );
}

#[test]
fn test_reset_then_lookup_fails() {
    let mut repl = ReplCore::new();
    repl.eval_line("let gone = 1;");
    repl.reset();

    assert_eq!(
        repl.eval_line("gone").value,
        Some(Object::Error(RuntimeError::UnknownIdentifier {
            name: "gone".to_string()
        }))
    );
}

#[test]
fn test_configured_call_depth() {
    let mut repl = ReplCore::with_config(&InterpreterConfig { max_call_depth: 3 });
    repl.eval_line("let down = fn(n) { if (n == 0) { 0 } else { down(n - 1) } };");

    assert_eq!(repl.eval_line("down(2)").value, Some(Object::Integer(0)));
    assert_eq!(
        repl.eval_line("down(3)").value,
        Some(Object::Error(RuntimeError::CallDepthExceeded { limit: 3 }))
    );
}
