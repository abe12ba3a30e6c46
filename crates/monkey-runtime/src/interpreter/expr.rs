//! Expression evaluation

use crate::ast::{CallExpr, Expr, IfExpr, InfixOp, Literal, PrefixOp};
use crate::environment::Environment;
use crate::interpreter::{EvalResult, Interpreter, Unwind};
use crate::object::{Function, Object, RuntimeError, NULL};
use crate::stack::ensure_sufficient_stack;
use std::rc::Rc;
use tracing::trace;

impl Interpreter {
    /// Evaluate an expression
    ///
    /// Every recursive path of the evaluator passes through here, so this is
    /// where the stack is grown.
    pub(super) fn eval_expr(&mut self, expr: &Expr, env: &Environment) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr, env))
    }

    fn eval_expr_inner(&mut self, expr: &Expr, env: &Environment) -> EvalResult {
        match expr {
            Expr::Literal(lit, _) => Ok(match lit {
                Literal::Integer(n) => Object::Integer(*n),
                Literal::Bool(b) => Object::from(*b),
                Literal::String(s) => Object::string(s),
            }),
            Expr::Identifier(id) => env.get(&id.name).ok_or_else(|| {
                Unwind::from(RuntimeError::UnknownIdentifier {
                    name: id.name.clone(),
                })
            }),
            Expr::Prefix(prefix) => {
                let operand = self.eval_expr(&prefix.operand, env)?;
                Ok(eval_prefix(prefix.op, operand)?)
            }
            Expr::Infix(infix) => {
                let left = self.eval_expr(&infix.left, env)?;
                let right = self.eval_expr(&infix.right, env)?;
                Ok(eval_infix(infix.op, left, right)?)
            }
            Expr::If(if_expr) => self.eval_if(if_expr, env),
            Expr::Function(func) => Ok(Object::Function(Rc::new(Function {
                params: Rc::clone(&func.params),
                body: Rc::clone(&func.body),
                env: env.clone(),
            }))),
            Expr::Call(call) => self.eval_call(call, env),
        }
    }

    fn eval_if(&mut self, if_expr: &IfExpr, env: &Environment) -> EvalResult {
        let condition = self.eval_expr(&if_expr.condition, env)?;

        if condition.is_truthy() {
            self.eval_block(&if_expr.consequence, env)
        } else if let Some(alternative) = &if_expr.alternative {
            self.eval_block(alternative, env)
        } else {
            Ok(NULL)
        }
    }

    fn eval_call(&mut self, call: &CallExpr, env: &Environment) -> EvalResult {
        let callee = self.eval_expr(&call.callee, env)?;

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval_expr(arg, env)?);
        }

        self.apply_function(callee, args)
    }

    /// Call a function value with already-evaluated arguments
    ///
    /// The body runs in a fresh scope enclosed by the function's captured
    /// environment. A `return` inside the body stops here.
    pub(super) fn apply_function(&mut self, callee: Object, args: Vec<Object>) -> EvalResult {
        let func = match callee {
            Object::Function(func) => func,
            other => {
                return Err(RuntimeError::NotAFunction {
                    type_name: other.type_name(),
                }
                .into())
            }
        };

        if func.params.len() != args.len() {
            return Err(RuntimeError::ArityMismatch {
                expected: func.params.len(),
                got: args.len(),
            }
            .into());
        }

        if self.max_call_depth > 0 && self.depth >= self.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                limit: self.max_call_depth,
            }
            .into());
        }

        let scope = func.env.enclosed();
        for (param, arg) in func.params.iter().zip(args) {
            scope.set(param.name.clone(), arg);
        }

        trace!(depth = self.depth, function = %func, "call");
        self.depth += 1;
        let result = self.eval_block(&func.body, &scope);
        self.depth -= 1;

        let result = match result {
            Ok(value) | Err(Unwind::Return(value)) => Ok(value),
            Err(error) => Err(error),
        };
        // Only a returned function can still reach the call scope; `let`
        // never binds outside it
        if !matches!(&result, Ok(value) if value.captures(&scope)) {
            scope.clear();
        }
        result
    }
}

/// Apply a prefix operator
fn eval_prefix(op: PrefixOp, operand: Object) -> Result<Object, RuntimeError> {
    match (op, operand) {
        (PrefixOp::Not, operand) => Ok(Object::from(!operand.is_truthy())),
        (PrefixOp::Negate, Object::Integer(n)) => Ok(Object::Integer(n.wrapping_neg())),
        (PrefixOp::Negate, other) => Err(RuntimeError::UnknownPrefixOperator {
            op,
            operand: other.type_name(),
        }),
    }
}

/// Apply an infix operator
fn eval_infix(op: InfixOp, left: Object, right: Object) -> Result<Object, RuntimeError> {
    match (&left, &right) {
        (Object::Integer(a), Object::Integer(b)) => eval_integer_infix(op, *a, *b),
        (Object::String(a), Object::String(b)) => match op {
            InfixOp::Add => {
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(a);
                joined.push_str(b);
                Ok(Object::string(joined))
            }
            InfixOp::Eq => Ok(Object::from(a == b)),
            InfixOp::Ne => Ok(Object::from(a != b)),
            _ => Err(unknown_infix(op, &left, &right)),
        },
        _ if left.type_name() != right.type_name() => Err(RuntimeError::TypeMismatch {
            left: left.type_name(),
            op,
            right: right.type_name(),
        }),
        // Same type, not integer or string: only equality is defined
        _ => match op {
            InfixOp::Eq => Ok(Object::from(left == right)),
            InfixOp::Ne => Ok(Object::from(left != right)),
            _ => Err(unknown_infix(op, &left, &right)),
        },
    }
}

/// Integer arithmetic wraps on overflow
fn eval_integer_infix(op: InfixOp, a: i64, b: i64) -> Result<Object, RuntimeError> {
    Ok(match op {
        InfixOp::Add => Object::Integer(a.wrapping_add(b)),
        InfixOp::Sub => Object::Integer(a.wrapping_sub(b)),
        InfixOp::Mul => Object::Integer(a.wrapping_mul(b)),
        InfixOp::Div => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Object::Integer(a.wrapping_div(b))
        }
        InfixOp::Lt => Object::from(a < b),
        InfixOp::Gt => Object::from(a > b),
        InfixOp::Eq => Object::from(a == b),
        InfixOp::Ne => Object::from(a != b),
    })
}

fn unknown_infix(op: InfixOp, left: &Object, right: &Object) -> RuntimeError {
    RuntimeError::UnknownInfixOperator {
        left: left.type_name(),
        op,
        right: right.type_name(),
    }
}
