//! Expression parsing (Pratt parsing)

use crate::ast::*;
use crate::diagnostic::{error_codes, Diagnostic};
use crate::parser::{Parser, Precedence};
use crate::stack::ensure_sufficient_stack;
use crate::token::TokenKind;
use std::rc::Rc;

impl Parser {
    /// Parse an expression
    pub(super) fn parse_expression(&mut self) -> Result<Expr, ()> {
        self.parse_precedence(Precedence::Lowest)
    }

    /// Parse expression with given precedence
    ///
    /// Keeps folding infix operators while the upcoming one binds tighter
    /// than `precedence`; equal precedence stops, so operators associate
    /// to the left.
    pub(super) fn parse_precedence(&mut self, precedence: Precedence) -> Result<Expr, ()> {
        ensure_sufficient_stack(|| self.parse_precedence_inner(precedence))
    }

    fn parse_precedence_inner(&mut self, precedence: Precedence) -> Result<Expr, ()> {
        let mut left = self.parse_prefix()?;

        while !self.check(TokenKind::Semicolon) && precedence < self.current_precedence() {
            left = self.parse_infix(left)?;
        }

        Ok(left)
    }

    /// Parse prefix expression
    fn parse_prefix(&mut self) -> Result<Expr, ()> {
        match self.peek().kind {
            TokenKind::Identifier => self.parse_identifier(),
            TokenKind::Int => self.parse_integer(),
            TokenKind::String => self.parse_string(),
            TokenKind::True | TokenKind::False => self.parse_bool(),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_op(),
            TokenKind::LeftParen => self.parse_group(),
            TokenKind::If => self.parse_if(),
            TokenKind::Fn => self.parse_function_literal(),
            TokenKind::Illegal => {
                let message = format!("illegal token '{}'", self.peek().lexeme);
                self.error(error_codes::ILLEGAL_TOKEN, &message, "not valid here");
                Err(())
            }
            _ => {
                let message = format!(
                    "no prefix parse function for '{}' found",
                    super::describe(self.peek())
                );
                self.error(error_codes::UNEXPECTED_TOKEN, &message, "expected an expression");
                Err(())
            }
        }
    }

    /// Parse infix expression
    fn parse_infix(&mut self, left: Expr) -> Result<Expr, ()> {
        match self.peek().kind {
            TokenKind::LeftParen => self.parse_call(left),
            _ => self.parse_infix_op(left),
        }
    }

    /// Get current token precedence
    pub(super) fn current_precedence(&self) -> Precedence {
        match self.peek().kind {
            TokenKind::EqualEqual | TokenKind::BangEqual => Precedence::Equals,
            TokenKind::Less | TokenKind::Greater => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Star | TokenKind::Slash => Precedence::Product,
            TokenKind::LeftParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }

    /// Parse identifier
    fn parse_identifier(&mut self) -> Result<Expr, ()> {
        let token = self.advance();
        Ok(Expr::Identifier(Identifier {
            name: token.lexeme.clone(),
            span: token.span,
        }))
    }

    /// Parse integer literal
    fn parse_integer(&mut self) -> Result<Expr, ()> {
        let token = self.peek();
        let span = token.span;
        match token.lexeme.parse::<i64>() {
            Ok(value) => {
                self.advance();
                Ok(Expr::Literal(Literal::Integer(value), span))
            }
            Err(_) => {
                let message = format!("could not parse \"{}\" as integer", token.lexeme);
                self.diagnostics.push(
                    Diagnostic::error_with_code(error_codes::INVALID_INTEGER, message, span)
                        .with_label("out of range")
                        .with_help(format!("integer literals must not exceed {}", i64::MAX)),
                );
                Err(())
            }
        }
    }

    /// Parse string literal
    fn parse_string(&mut self) -> Result<Expr, ()> {
        let token = self.advance();
        let span = token.span;
        Ok(Expr::Literal(Literal::String(token.lexeme.clone()), span))
    }

    /// Parse boolean literal
    fn parse_bool(&mut self) -> Result<Expr, ()> {
        let token = self.advance();
        let span = token.span;
        let value = token.kind == TokenKind::True;
        Ok(Expr::Literal(Literal::Bool(value), span))
    }

    /// Parse `-x` or `!x`
    fn parse_prefix_op(&mut self) -> Result<Expr, ()> {
        let token = self.advance();
        let op_span = token.span;
        let op = match token.kind {
            TokenKind::Minus => PrefixOp::Negate,
            _ => PrefixOp::Not,
        };

        let operand = self.parse_precedence(Precedence::Prefix)?;
        let span = op_span.merge(operand.span());

        Ok(Expr::Prefix(PrefixExpr {
            op,
            operand: Box::new(operand),
            span,
        }))
    }

    /// Parse grouped expression
    ///
    /// Produces the inner expression itself; grouping only affects shape.
    fn parse_group(&mut self) -> Result<Expr, ()> {
        self.consume(TokenKind::LeftParen)?;
        let expr = self.parse_expression()?;
        self.consume(TokenKind::RightParen)?;
        Ok(expr)
    }

    /// Parse `if (cond) { ... } else { ... }`
    fn parse_if(&mut self) -> Result<Expr, ()> {
        let start = self.consume(TokenKind::If)?.span;
        self.consume(TokenKind::LeftParen)?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RightParen)?;

        let consequence = self.parse_block()?;
        let alternative = if self.match_token(TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };

        let end = alternative.as_ref().unwrap_or(&consequence).span;
        Ok(Expr::If(IfExpr {
            condition: Box::new(condition),
            consequence,
            alternative,
            span: start.merge(end),
        }))
    }

    /// Parse `fn(a, b) { ... }`
    fn parse_function_literal(&mut self) -> Result<Expr, ()> {
        let start = self.consume(TokenKind::Fn)?.span;
        self.consume(TokenKind::LeftParen)?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.consume_identifier()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen)?;

        let body = self.parse_block()?;
        let span = start.merge(body.span);

        Ok(Expr::Function(FunctionLiteral {
            params: params.into(),
            body: Rc::new(body),
            span,
        }))
    }

    /// Parse a binary operator application
    fn parse_infix_op(&mut self, left: Expr) -> Result<Expr, ()> {
        let precedence = self.current_precedence();
        let op = match self.advance().kind {
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Sub,
            TokenKind::Star => InfixOp::Mul,
            TokenKind::Slash => InfixOp::Div,
            TokenKind::Less => InfixOp::Lt,
            TokenKind::Greater => InfixOp::Gt,
            TokenKind::EqualEqual => InfixOp::Eq,
            _ => InfixOp::Ne,
        };

        let right = self.parse_precedence(precedence)?;
        let span = left.span().merge(right.span());

        Ok(Expr::Infix(InfixExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }))
    }

    /// Parse call arguments after the callee
    fn parse_call(&mut self, callee: Expr) -> Result<Expr, ()> {
        self.consume(TokenKind::LeftParen)?;

        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        let end = self.consume(TokenKind::RightParen)?.span;
        let span = callee.span().merge(end);

        Ok(Expr::Call(CallExpr {
            callee: Box::new(callee),
            args,
            span,
        }))
    }
}
