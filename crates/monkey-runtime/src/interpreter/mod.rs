//! AST interpreter (tree-walking)
//!
//! Direct AST evaluation against a chain of [`Environment`] scopes.
//! Supports:
//! - Expression evaluation (literals, prefix/infix ops, conditionals, calls)
//! - Statement execution (`let`, `return`, expression statements)
//! - First-class functions with lexical closures
//!
//! Internally every step returns `Result<Object, Unwind>` so that `?` carries
//! an early `return` or an error up to the nearest function call or program.
//! The public entry points fold that back into a plain [`Object`].

mod expr;
mod stmt;

use crate::ast::{Block, Expr, Program, Stmt};
use crate::environment::Environment;
use crate::object::{Object, RuntimeError};
use monkey_config::InterpreterConfig;
use tracing::debug;

/// Non-local exit from an evaluation step
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Unwind {
    /// `return` seen; unwinds to the enclosing call or program
    Return(Object),
    /// Failure; unwinds all the way out
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

pub(super) type EvalResult = Result<Object, Unwind>;

/// Any AST node the evaluator accepts
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Statement(&'a Stmt),
    Block(&'a Block),
    Expression(&'a Expr),
}

impl<'a> From<&'a Program> for Node<'a> {
    fn from(program: &'a Program) -> Self {
        Node::Program(program)
    }
}

impl<'a> From<&'a Stmt> for Node<'a> {
    fn from(stmt: &'a Stmt) -> Self {
        Node::Statement(stmt)
    }
}

impl<'a> From<&'a Block> for Node<'a> {
    fn from(block: &'a Block) -> Self {
        Node::Block(block)
    }
}

impl<'a> From<&'a Expr> for Node<'a> {
    fn from(expr: &'a Expr) -> Self {
        Node::Expression(expr)
    }
}

/// Interpreter state
pub struct Interpreter {
    /// Maximum nested calls; 0 means unlimited
    pub(super) max_call_depth: usize,
    /// Calls currently in progress
    pub(super) depth: usize,
}

impl Interpreter {
    /// Create a new interpreter with default settings
    pub fn new() -> Self {
        Self::with_config(&InterpreterConfig::default())
    }

    /// Create an interpreter from loaded configuration
    pub fn with_config(config: &InterpreterConfig) -> Self {
        Self {
            max_call_depth: config.max_call_depth,
            depth: 0,
        }
    }

    /// Evaluate a program
    ///
    /// A top-level `return` yields its value. An error is returned as
    /// `Object::Error` and stops the program at that statement.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
    pub fn eval(&mut self, program: &Program, env: &Environment) -> Object {
        match self.eval_statements(&program.statements, env) {
            Ok(value) | Err(Unwind::Return(value)) => value,
            Err(Unwind::Error(error)) => {
                debug!(%error, "program stopped with error");
                Object::Error(error)
            }
        }
    }

    /// Evaluate any node
    ///
    /// Unlike [`eval`](Self::eval), a `return` reaching a non-program node is
    /// handed back wrapped in `Object::ReturnValue`.
    pub fn eval_node(&mut self, node: Node<'_>, env: &Environment) -> Object {
        let result = match node {
            Node::Program(program) => return self.eval(program, env),
            Node::Statement(stmt) => self.eval_statement(stmt, env),
            Node::Block(block) => self.eval_block(block, env),
            Node::Expression(expr) => self.eval_expr(expr, env),
        };

        match result {
            Ok(value) => value,
            Err(Unwind::Return(value)) => Object::ReturnValue(Box::new(value)),
            Err(Unwind::Error(error)) => Object::Error(error),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate a node with a default interpreter
pub fn eval<'a>(node: impl Into<Node<'a>>, env: &Environment) -> Object {
    Interpreter::new().eval_node(node.into(), env)
}
