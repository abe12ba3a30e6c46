//! Monkey Runtime - Core language implementation
//!
//! This library provides the complete Monkey language runtime including:
//! - Lexical analysis and Pratt parsing
//! - A tree-walking evaluator with lexical closures
//! - A UI-agnostic REPL core and an embedding facade

/// Monkey runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod ast;
pub mod diagnostic;
pub mod environment;
pub mod interpreter;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod repl;
pub mod runtime;
pub mod span;
mod stack;
pub mod token;

// Re-export commonly used types
pub use ast::{Program, VersionedProgram, AST_VERSION};
pub use diagnostic::{error_codes, Diagnostic, DIAG_VERSION};
pub use environment::{Environment, WeakEnvironment};
pub use interpreter::{eval, Interpreter, Node};
pub use lexer::Lexer;
pub use object::{Function, Object, RuntimeError, FALSE, NULL, TRUE};
pub use parser::{parse_program, parse_source, Parser};
pub use repl::{ReplCore, ReplResult};
pub use runtime::{Monkey, RuntimeResult};
pub use span::Span;
pub use token::{Token, TokenKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke() {
        assert_eq!(VERSION, "0.1.0");
    }
}
