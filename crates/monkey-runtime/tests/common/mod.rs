//! Shared test utilities
//!
//! Helpers for Monkey integration tests to cut boilerplate around the
//! source -> value pipeline.

#![allow(dead_code)]

use monkey_runtime::{parse_source, Diagnostic, Monkey, Object, Program};

// Re-export testing utilities
pub use pretty_assertions::{assert_eq, assert_ne};

/// Evaluate source in a fresh environment, panicking on parse errors
pub fn eval(source: &str) -> Object {
    match Monkey::new().eval(source) {
        Ok(value) => value,
        Err(diags) => panic!("Expected {:?} to parse, got {:?}", source, diags),
    }
}

/// Assert that source code evaluates to an integer
///
/// # Example
/// ```
/// assert_eval_integer("1 + 2", 3);
/// ```
pub fn assert_eval_integer(source: &str, expected: i64) {
    match eval(source) {
        Object::Integer(n) => assert_eq!(n, expected, "source: {}", source),
        other => panic!("Expected Integer({}), got {:?}", expected, other),
    }
}

/// Assert that source code evaluates to a boolean
pub fn assert_eval_bool(source: &str, expected: bool) {
    match eval(source) {
        Object::Bool(b) => assert_eq!(b, expected, "source: {}", source),
        other => panic!("Expected Bool({}), got {:?}", expected, other),
    }
}

/// Assert that source code evaluates to a string
pub fn assert_eval_string(source: &str, expected: &str) {
    match eval(source) {
        Object::String(s) => assert_eq!(s.as_ref(), expected, "source: {}", source),
        other => panic!("Expected String({:?}), got {:?}", expected, other),
    }
}

/// Assert that source code evaluates to null
pub fn assert_eval_null(source: &str) {
    match eval(source) {
        Object::Null => {}
        other => panic!("Expected Null, got {:?}", other),
    }
}

/// Assert that evaluation ends in an error with the given message
///
/// # Example
/// ```
/// assert_eval_error("5 + true", "type mismatch: INTEGER + BOOLEAN");
/// ```
pub fn assert_eval_error(source: &str, expected: &str) {
    match eval(source) {
        Object::Error(err) => assert_eq!(err.to_string(), expected, "source: {}", source),
        other => panic!("Expected error {:?}, got {:?}", expected, other),
    }
}

/// Parse source that must be valid
pub fn parse_ok(source: &str) -> Program {
    let (program, diagnostics) = parse_source(source);
    assert!(
        diagnostics.is_empty(),
        "Expected {:?} to parse, got {:?}",
        source,
        diagnostics
    );
    program
}

/// Parse source and return diagnostics (for testing parser)
pub fn parse_and_get_diagnostics(source: &str) -> Vec<Diagnostic> {
    parse_source(source).1
}
