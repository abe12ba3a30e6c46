//! Runtime values
//!
//! `Object` is what evaluation produces. Two variants exist only for control
//! flow: `ReturnValue` carries an early `return` out of a block and `Error`
//! carries a failure. The evaluator unwraps both before a program's result is
//! handed back, except that a top-level error stays visible as the result.

use crate::ast::{Block, Identifier, InfixOp, PrefixOp};
use crate::environment::Environment;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// The canonical `true`
pub const TRUE: Object = Object::Bool(true);
/// The canonical `false`
pub const FALSE: Object = Object::Bool(false);
/// The canonical `null`
pub const NULL: Object = Object::Null;

/// Runtime value
#[derive(Clone)]
pub enum Object {
    Integer(i64),
    Bool(bool),
    /// Immutable text, shared between copies
    String(Rc<str>),
    Null,
    Function(Rc<Function>),
    /// Early exit from a function body
    ReturnValue(Box<Object>),
    /// Evaluation failure
    Error(RuntimeError),
}

/// A function value: code plus the environment it was created in
pub struct Function {
    pub params: Rc<[Identifier]>,
    pub body: Rc<Block>,
    /// Captured at creation time, not at call time
    pub env: Environment,
}

/// Evaluation failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Name is not bound in any enclosing scope
    #[error("identifier not found: {name}")]
    UnknownIdentifier { name: String },
    /// Operands of different types
    #[error("type mismatch: {left} {op} {right}")]
    TypeMismatch {
        left: &'static str,
        op: InfixOp,
        right: &'static str,
    },
    /// Operator not defined for these operand types
    #[error("unknown operator: {left} {op} {right}")]
    UnknownInfixOperator {
        left: &'static str,
        op: InfixOp,
        right: &'static str,
    },
    /// Operator not defined for this operand type
    #[error("unknown operator: {op}{operand}")]
    UnknownPrefixOperator { op: PrefixOp, operand: &'static str },
    /// Callee is not a function
    #[error("not a function: {type_name}")]
    NotAFunction { type_name: &'static str },
    /// Argument count differs from parameter count
    #[error("wrong number of arguments: expected {expected}, got {got}")]
    ArityMismatch { expected: usize, got: usize },
    /// Integer division by zero
    #[error("division by zero")]
    DivisionByZero,
    /// Too many nested calls
    #[error("maximum call depth of {limit} exceeded")]
    CallDepthExceeded { limit: usize },
}

impl Object {
    /// Type name as used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Bool(_) => "BOOLEAN",
            Object::String(_) => "STRING",
            Object::Null => "NULL",
            Object::Function(_) => "FUNCTION",
            Object::ReturnValue(_) => "RETURN_VALUE",
            Object::Error(_) => "ERROR",
        }
    }

    /// Check if value is truthy
    ///
    /// Only `null` and `false` are falsy; `0` and `""` are truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Bool(false))
    }

    /// Textual rendering shown to users
    pub fn inspect(&self) -> String {
        self.to_string()
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    /// Whether this value keeps `env` reachable, i.e. it is a function
    /// created in `env` or in a scope nested inside it
    pub fn captures(&self, env: &Environment) -> bool {
        matches!(self, Object::Function(func) if func.env.is_within(env))
    }

    /// Build a string object
    pub fn string(text: impl AsRef<str>) -> Self {
        Object::String(Rc::from(text.as_ref()))
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        if value {
            TRUE
        } else {
            FALSE
        }
    }
}

impl From<i64> for Object {
    fn from(value: i64) -> Self {
        Object::Integer(value)
    }
}

impl From<RuntimeError> for Object {
    fn from(error: RuntimeError) -> Self {
        Object::Error(error)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Bool(a), Object::Bool(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Null, Object::Null) => true,
            // Functions are equal only to themselves
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::ReturnValue(a), Object::ReturnValue(b)) => a == b,
            (Object::Error(a), Object::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(n) => write!(f, "{}", n),
            Object::Bool(b) => write!(f, "{}", b),
            Object::String(s) => f.write_str(s),
            Object::Null => f.write_str("null"),
            Object::Function(func) => write!(f, "{}", func),
            Object::ReturnValue(inner) => write!(f, "{}", inner),
            Object::Error(err) => write!(f, "ERROR: {}", err),
        }
    }
}

// Hand-written so a function never prints its environment, which may hold
// the function itself.
impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(n) => f.debug_tuple("Integer").field(n).finish(),
            Object::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Object::String(s) => f.debug_tuple("String").field(s).finish(),
            Object::Null => f.write_str("Null"),
            Object::Function(func) => write!(f, "Function({})", func),
            Object::ReturnValue(inner) => f.debug_tuple("ReturnValue").field(inner).finish(),
            Object::Error(err) => f.debug_tuple("Error").field(err).finish(),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.params.iter().map(|p| p.name.as_str()).collect();
        write!(f, "fn({}) {}", params.join(", "), self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_booleans() {
        assert_eq!(Object::from(true), TRUE);
        assert_eq!(Object::from(false), FALSE);
        assert_ne!(TRUE, FALSE);
    }

    #[test]
    fn test_truthiness() {
        assert!(Object::Integer(0).is_truthy());
        assert!(Object::string("").is_truthy());
        assert!(TRUE.is_truthy());
        assert!(!FALSE.is_truthy());
        assert!(!NULL.is_truthy());
    }

    #[test]
    fn test_inspect() {
        assert_eq!(Object::Integer(-42).inspect(), "-42");
        assert_eq!(TRUE.inspect(), "true");
        assert_eq!(Object::string("hello world").inspect(), "hello world");
        assert_eq!(NULL.inspect(), "null");
        assert_eq!(
            Object::Error(RuntimeError::DivisionByZero).inspect(),
            "ERROR: division by zero"
        );
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Object::Integer(1).type_name(), "INTEGER");
        assert_eq!(FALSE.type_name(), "BOOLEAN");
        assert_eq!(Object::string("x").type_name(), "STRING");
        assert_eq!(NULL.type_name(), "NULL");
        assert_eq!(
            Object::ReturnValue(Box::new(NULL)).type_name(),
            "RETURN_VALUE"
        );
    }

    #[test]
    fn test_error_messages() {
        let mismatch = RuntimeError::TypeMismatch {
            left: "INTEGER",
            op: InfixOp::Add,
            right: "BOOLEAN",
        };
        assert_eq!(mismatch.to_string(), "type mismatch: INTEGER + BOOLEAN");

        let prefix = RuntimeError::UnknownPrefixOperator {
            op: PrefixOp::Negate,
            operand: "BOOLEAN",
        };
        assert_eq!(prefix.to_string(), "unknown operator: -BOOLEAN");

        let arity = RuntimeError::ArityMismatch {
            expected: 2,
            got: 1,
        };
        assert_eq!(
            arity.to_string(),
            "wrong number of arguments: expected 2, got 1"
        );
    }
}
