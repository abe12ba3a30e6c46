//! REPL core logic (UI-agnostic)

use crate::diagnostic::Diagnostic;
use crate::environment::Environment;
use crate::interpreter::Interpreter;
use crate::object::Object;
use crate::parser::parse_source;
use monkey_config::InterpreterConfig;

/// REPL result type
#[derive(Debug)]
pub struct ReplResult {
    /// The value produced by evaluation (None if the line did not run)
    pub value: Option<Object>,
    /// Parse diagnostics; when present the line was not evaluated
    pub diagnostics: Vec<Diagnostic>,
}

/// REPL core state
///
/// Maintains persistent state across multiple eval calls:
/// - `let` bindings persist, including functions and their closures
/// - Errors do not reset state
pub struct ReplCore {
    interpreter: Interpreter,
    env: Environment,
}

impl ReplCore {
    /// Create a new REPL core
    pub fn new() -> Self {
        Self::with_config(&InterpreterConfig::default())
    }

    pub fn with_config(config: &InterpreterConfig) -> Self {
        Self {
            interpreter: Interpreter::with_config(config),
            env: Environment::new(),
        }
    }

    /// Evaluate a line of input
    ///
    /// Runs lex -> parse -> eval against the session environment. A line
    /// with parse errors is not evaluated at all.
    pub fn eval_line(&mut self, input: &str) -> ReplResult {
        let (program, diagnostics) = parse_source(input);

        if !diagnostics.is_empty() || program.statements.is_empty() {
            return ReplResult {
                value: None,
                diagnostics,
            };
        }

        ReplResult {
            value: Some(self.interpreter.eval(&program, &self.env)),
            diagnostics,
        }
    }

    /// Reset REPL state
    ///
    /// Drops every binding, freeing the old session scope even when it
    /// holds functions that captured it
    pub fn reset(&mut self) {
        self.env.clear();
        self.env = Environment::new();
    }

    /// Top-level bindings with their current values, sorted by name
    pub fn bindings(&self) -> Vec<(String, Object)> {
        self.env
            .names()
            .into_iter()
            .filter_map(|name| self.env.get(&name).map(|value| (name, value)))
            .collect()
    }
}

impl Default for ReplCore {
    fn default() -> Self {
        Self::new()
    }
}
