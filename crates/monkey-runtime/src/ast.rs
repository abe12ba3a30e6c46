//! Abstract Syntax Tree (AST) definitions
//!
//! The tree is immutable once the parser returns it. Function literals share
//! their parameter list and body through `Rc` so that every closure created
//! from the same literal points at one copy of the code.
//!
//! Every node renders back to source text through `Display`. Infix and
//! prefix expressions are always fully parenthesized, which makes the
//! rendering a convenient way to inspect precedence and associativity:
//! `1 + 2 * 3` renders as `(1 + (2 * 3))`.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// AST schema version
///
/// Included in JSON dumps; bump on breaking changes to the node layout.
pub const AST_VERSION: u32 = 1;

/// Root of a parsed source text
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// Versioned AST wrapper for JSON serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedProgram {
    /// AST schema version
    pub ast_version: u32,
    #[serde(flatten)]
    pub program: Program,
}

impl VersionedProgram {
    pub fn new(program: Program) -> Self {
        Self {
            ast_version: AST_VERSION,
            program,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<Program> for VersionedProgram {
    fn from(program: Program) -> Self {
        Self::new(program)
    }
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// `let name = value;`
    Let(LetStmt),
    /// `return value;`
    Return(ReturnStmt),
    /// An expression used as a statement
    Expr(ExprStmt),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetStmt {
    pub name: Identifier,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStmt {
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// Brace-delimited statement sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// Identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal, Span),
    Identifier(Identifier),
    Prefix(PrefixExpr),
    Infix(InfixExpr),
    If(IfExpr),
    Function(FunctionLiteral),
    Call(CallExpr),
}

/// Literal value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Literal {
    Integer(i64),
    Bool(bool),
    String(String),
}

/// Prefix expression: `-x`, `!x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixExpr {
    pub op: PrefixOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

/// Infix expression: `a + b`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfixExpr {
    pub op: InfixOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// `if (condition) { ... } else { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfExpr {
    pub condition: Box<Expr>,
    pub consequence: Block,
    pub alternative: Option<Block>,
    pub span: Span,
}

/// `fn(a, b) { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionLiteral {
    pub params: Rc<[Identifier]>,
    pub body: Rc<Block>,
    pub span: Span,
}

/// `callee(arg, ...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// Prefix operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrefixOp {
    Negate, // -
    Not,    // !
}

/// Infix operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfixOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Comparison
    Lt,
    Gt,
    Eq,
    Ne,
}

impl PrefixOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrefixOp::Negate => "-",
            PrefixOp::Not => "!",
        }
    }
}

impl InfixOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Lt => "<",
            InfixOp::Gt => ">",
            InfixOp::Eq => "==",
            InfixOp::Ne => "!=",
        }
    }
}

impl Expr {
    /// Get the span of this expression
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(_, span) => *span,
            Expr::Identifier(id) => id.span,
            Expr::Prefix(p) => p.span,
            Expr::Infix(i) => i.span,
            Expr::If(i) => i.span,
            Expr::Function(f) => f.span,
            Expr::Call(c) => c.span,
        }
    }
}

impl Stmt {
    /// Get the span of this statement
    pub fn span(&self) -> Span {
        match self {
            Stmt::Let(l) => l.span,
            Stmt::Return(r) => r.span,
            Stmt::Expr(e) => e.span,
        }
    }
}

// === Source rendering ===

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let(l) => write!(f, "let {} = {};", l.name, l.value),
            Stmt::Return(r) => write!(f, "return {};", r.value),
            Stmt::Expr(e) => write!(f, "{}", e.expr),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for stmt in &self.statements {
            write!(f, " {}", stmt)?;
        }
        f.write_str(" }")
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        write_comma_separated(f, self.params.iter())?;
        write!(f, ") {}", self.body)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit, _) => write!(f, "{}", lit),
            Expr::Identifier(id) => write!(f, "{}", id),
            Expr::Prefix(p) => write!(f, "({}{})", p.op, p.operand),
            Expr::Infix(i) => write!(f, "({} {} {})", i.left, i.op, i.right),
            Expr::If(i) => {
                // Operator expressions already carry their own parentheses
                match i.condition.as_ref() {
                    Expr::Infix(_) | Expr::Prefix(_) => write!(f, "if {}", i.condition)?,
                    _ => write!(f, "if ({})", i.condition)?,
                }
                write!(f, " {}", i.consequence)?;
                if let Some(alt) = &i.alternative {
                    write!(f, " else {}", alt)?;
                }
                Ok(())
            }
            Expr::Function(func) => write!(f, "{}", func),
            Expr::Call(c) => {
                write!(f, "{}(", c.callee)?;
                write_comma_separated(f, c.args.iter())?;
                f.write_str(")")
            }
        }
    }
}

fn write_comma_separated<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = T>,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Identifier {
        Identifier {
            name: name.to_string(),
            span: Span::dummy(),
        }
    }

    fn int(n: i64) -> Expr {
        Expr::Literal(Literal::Integer(n), Span::dummy())
    }

    #[test]
    fn test_let_statement_display() {
        let stmt = Stmt::Let(LetStmt {
            name: ident("myVar"),
            value: Expr::Identifier(ident("anotherVar")),
            span: Span::dummy(),
        });
        assert_eq!(stmt.to_string(), "let myVar = anotherVar;");
    }

    #[test]
    fn test_infix_is_parenthesized() {
        let expr = Expr::Infix(InfixExpr {
            op: InfixOp::Add,
            left: Box::new(int(1)),
            right: Box::new(Expr::Infix(InfixExpr {
                op: InfixOp::Mul,
                left: Box::new(int(2)),
                right: Box::new(int(3)),
                span: Span::dummy(),
            })),
            span: Span::dummy(),
        });
        assert_eq!(expr.to_string(), "(1 + (2 * 3))");
    }

    #[test]
    fn test_function_literal_display() {
        let func = FunctionLiteral {
            params: vec![ident("x"), ident("y")].into(),
            body: Rc::new(Block {
                statements: vec![Stmt::Expr(ExprStmt {
                    expr: Expr::Identifier(ident("x")),
                    span: Span::dummy(),
                })],
                span: Span::dummy(),
            }),
            span: Span::dummy(),
        };
        assert_eq!(func.to_string(), "fn(x, y) { x }");
    }

    #[test]
    fn test_string_literal_is_quoted() {
        let lit = Literal::String("hi".to_string());
        assert_eq!(lit.to_string(), "\"hi\"");
    }

    #[test]
    fn test_empty_block_display() {
        let block = Block {
            statements: vec![],
            span: Span::dummy(),
        };
        assert_eq!(block.to_string(), "{ }");
    }
}
