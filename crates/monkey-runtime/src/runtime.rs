//! Monkey runtime API for embedding

use crate::diagnostic::{error_codes, Diagnostic};
use crate::environment::Environment;
use crate::interpreter::Interpreter;
use crate::object::Object;
use crate::parser::parse_source;
use crate::span::Span;
use monkey_config::InterpreterConfig;
use std::cell::RefCell;
use std::path::Path;

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, Vec<Diagnostic>>;

/// Monkey runtime instance
///
/// Provides a high-level API for embedding Monkey in host applications.
/// Each call to [`eval`](Self::eval) runs in a fresh environment, the way a
/// source file is run; use [`ReplCore`](crate::ReplCore) for bindings that
/// persist between inputs.
///
/// # Examples
///
/// ```
/// use monkey_runtime::{Monkey, Object};
///
/// let runtime = Monkey::new();
/// match runtime.eval("let add = fn(a, b) { a + b }; add(1, 2)") {
///     Ok(Object::Integer(n)) => assert_eq!(n, 3),
///     Ok(other) => panic!("Unexpected value: {}", other),
///     Err(diagnostics) => panic!("Error: {:?}", diagnostics),
/// }
/// ```
pub struct Monkey {
    /// Interpreter for executing code (using interior mutability)
    interpreter: RefCell<Interpreter>,
}

impl Monkey {
    /// Create a new Monkey runtime instance
    pub fn new() -> Self {
        Self::with_config(&InterpreterConfig::default())
    }

    /// Create a runtime from loaded configuration
    pub fn with_config(config: &InterpreterConfig) -> Self {
        Self {
            interpreter: RefCell::new(Interpreter::with_config(config)),
        }
    }

    /// Evaluate Monkey source code
    ///
    /// Returns diagnostics if the source does not parse. A program that
    /// fails at runtime still returns `Ok`, holding `Object::Error`.
    pub fn eval(&self, source: &str) -> RuntimeResult<Object> {
        self.eval_named(source, None)
    }

    /// Evaluate a Monkey source file
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use monkey_runtime::Monkey;
    ///
    /// let runtime = Monkey::new();
    /// let result = runtime.eval_file("program.mk");
    /// ```
    pub fn eval_file(&self, path: impl AsRef<Path>) -> RuntimeResult<Object> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            vec![Diagnostic::error_with_code(
                error_codes::IO_ERROR,
                format!("failed to read file: {}", e),
                Span::dummy(),
            )
            .with_file(path.display().to_string())]
        })?;

        self.eval_named(&source, Some(&path.display().to_string()))
    }

    fn eval_named(&self, source: &str, file: Option<&str>) -> RuntimeResult<Object> {
        let (program, diagnostics) = parse_source(source);

        if !diagnostics.is_empty() {
            return Err(match file {
                Some(file) => diagnostics.into_iter().map(|d| d.with_file(file)).collect(),
                None => diagnostics,
            });
        }

        let env = Environment::new();
        let value = self.interpreter.borrow_mut().eval(&program, &env);
        if !value.captures(&env) {
            env.clear();
        }
        Ok(value)
    }
}

impl Default for Monkey {
    fn default() -> Self {
        Self::new()
    }
}
