//! Statement execution

use crate::ast::{Block, Stmt};
use crate::environment::Environment;
use crate::interpreter::{EvalResult, Interpreter, Unwind};
use crate::object::NULL;

impl Interpreter {
    /// Evaluate statements in order; the value is that of the last one
    pub(super) fn eval_statements(&mut self, statements: &[Stmt], env: &Environment) -> EvalResult {
        let mut last = NULL;
        for stmt in statements {
            last = self.eval_statement(stmt, env)?;
        }
        Ok(last)
    }

    /// Evaluate a block in the current scope
    ///
    /// Blocks do not open a scope of their own; only function calls do.
    pub(super) fn eval_block(&mut self, block: &Block, env: &Environment) -> EvalResult {
        self.eval_statements(&block.statements, env)
    }

    /// Evaluate a single statement
    pub(super) fn eval_statement(&mut self, stmt: &Stmt, env: &Environment) -> EvalResult {
        match stmt {
            Stmt::Let(decl) => {
                let value = self.eval_expr(&decl.value, env)?;
                env.set(decl.name.name.clone(), value);
                Ok(NULL)
            }
            Stmt::Return(ret) => {
                let value = self.eval_expr(&ret.value, env)?;
                Err(Unwind::Return(value))
            }
            Stmt::Expr(expr_stmt) => self.eval_expr(&expr_stmt.expr, env),
        }
    }
}
