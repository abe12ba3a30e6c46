//! Function and closure semantics
//!
//! Functions capture the environment they are created in, not the one they
//! are called from. A `let`-bound function can call itself because the
//! binding lands in the very scope the function captured.

mod common;

use common::*;
#[allow(unused_imports)]
use common::{assert_eq, assert_ne};
use monkey_runtime::{Environment, Interpreter, Object};

#[test]
fn test_function_object() {
    match eval("fn(x) { x + 2; };") {
        Object::Function(func) => {
            assert_eq!(func.params.len(), 1);
            assert_eq!(func.params[0].name, "x");
            assert_eq!(func.body.to_string(), "{ (x + 2) }");
        }
        other => panic!("expected function, got {:?}", other),
    }
}

#[test]
fn test_function_inspect() {
    assert_eq!(eval("fn(x, y) { x + y }").inspect(), "fn(x, y) { (x + y) }");
}

#[test]
fn test_function_application() {
    assert_eval_integer("let identity = fn(x) { x; }; identity(5);", 5);
    assert_eval_integer("let identity = fn(x) { return x; }; identity(5);", 5);
    assert_eval_integer("let double = fn(x) { x * 2; }; double(5);", 10);
    assert_eval_integer("let add = fn(x, y) { x + y; }; add(5, 5);", 10);
    assert_eval_integer("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20);
    assert_eval_integer("fn(x) { x; }(5)", 5);
}

#[test]
fn test_closure_captures_defining_scope() {
    assert_eval_integer(
        "let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2); addTwo(3);",
        5,
    );
}

#[test]
fn test_closures_from_same_factory_are_independent() {
    assert_eval_integer(
        "let newAdder = fn(x) { fn(y) { x + y } };
         let addTwo = newAdder(2);
         let addTen = newAdder(10);
         addTwo(1) + addTen(1)",
        14,
    );
}

#[test]
fn test_recursive_fibonacci() {
    assert_eval_integer(
        "let fib = fn(x) { if (x < 2) { x } else { fib(x - 1) + fib(x - 2) } }; fib(10);",
        55,
    );
}

#[test]
fn test_call_site_scope_is_not_visible() {
    assert_eval_error(
        "let peek = fn() { secret }; let wrapper = fn() { let secret = 1; peek() }; wrapper()",
        "identifier not found: secret",
    );
}

#[test]
fn test_parameters_shadow_outer_bindings() {
    assert_eval_integer("let x = 10; let f = fn(x) { x * 2 }; f(3) + x", 16);
}

#[test]
fn test_later_outer_binding_is_visible() {
    // Captured by reference: bindings added after creation are seen
    assert_eval_integer("let f = fn() { later }; let later = 9; f()", 9);
}

#[test]
fn test_higher_order_functions() {
    assert_eval_integer(
        "let twice = fn(f, x) { f(f(x)) }; let inc = fn(n) { n + 1 }; twice(inc, 5)",
        7,
    );
}

#[test]
fn test_function_equality_is_identity() {
    assert_eval_bool("let f = fn() { 1 }; f == f", true);
    assert_eval_bool("fn() { 1 } == fn() { 1 }", false);
}

#[test]
fn test_closure_survives_across_evaluations() {
    let env = Environment::new();
    let mut interpreter = Interpreter::new();

    interpreter.eval(&parse_ok("let counterBase = 100;"), &env);
    interpreter.eval(&parse_ok("let addBase = fn(n) { n + counterBase };"), &env);
    let result = interpreter.eval(&parse_ok("addBase(1)"), &env);

    assert_eq!(result, Object::Integer(101));
}

#[test]
fn test_closure_from_nested_call_keeps_both_scopes() {
    assert_eval_integer(
        "let outer = fn(x) { let mk = fn(y) { fn() { x + y } }; mk(1) }; outer(2)()",
        3,
    );
}

#[test]
fn test_returning_an_outside_function() {
    assert_eval_integer(
        "let pass = fn(f) { let unused = fn() { 0 }; f }; let one = fn() { 1 }; pass(one)()",
        1,
    );
}

#[test]
fn test_call_scopes_do_not_accumulate() {
    let env = Environment::new();
    let mut interpreter = Interpreter::new();
    interpreter.eval(
        &parse_ok("let g = fn() { let h = fn() { 1 }; h() };"),
        &env,
    );
    let before = env.handle_count();

    let calls = parse_ok("g()");
    for _ in 0..1000 {
        assert_eq!(interpreter.eval(&calls, &env), Object::Integer(1));
    }

    assert_eq!(env.handle_count(), before);
}

#[test]
fn test_failed_call_frees_its_scope() {
    let env = Environment::new();
    let mut interpreter = Interpreter::new();
    interpreter.eval(
        &parse_ok("let bad = fn() { let h = fn() { 1 }; h() + true };"),
        &env,
    );
    let before = env.handle_count();

    let result = interpreter.eval(&parse_ok("bad()"), &env);
    assert!(result.is_error());
    assert_eq!(env.handle_count(), before);
}

#[test]
fn test_escaping_closure_scope_stays_alive() {
    let env = Environment::new();
    let mut interpreter = Interpreter::new();
    interpreter.eval(
        &parse_ok("let make = fn(n) { fn() { n } }; let keep = make(5);"),
        &env,
    );

    let Some(Object::Function(keep)) = env.get("keep") else {
        panic!("expected function binding");
    };
    let scope = keep.env.downgrade();
    assert!(scope.upgrade().is_some());
    assert_eq!(interpreter.eval(&parse_ok("keep()"), &env), Object::Integer(5));
}
