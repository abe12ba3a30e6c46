//! Statement parsing

use crate::ast::*;
use crate::parser::Parser;
use crate::token::TokenKind;

impl Parser {
    /// Parse a statement
    pub(super) fn parse_statement(&mut self) -> Result<Stmt, ()> {
        match self.peek().kind {
            TokenKind::Let => self.parse_let_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            _ => self.parse_expr_stmt(),
        }
    }

    /// Parse `let name = value;`
    fn parse_let_stmt(&mut self) -> Result<Stmt, ()> {
        let start = self.consume(TokenKind::Let)?.span;
        let name = self.consume_identifier()?;
        self.consume(TokenKind::Assign)?;
        let value = self.parse_expression()?;

        let mut span = start.merge(value.span());
        if self.check(TokenKind::Semicolon) {
            span = span.merge(self.advance().span);
        }

        Ok(Stmt::Let(LetStmt { name, value, span }))
    }

    /// Parse `return value;`
    fn parse_return_stmt(&mut self) -> Result<Stmt, ()> {
        let start = self.consume(TokenKind::Return)?.span;
        let value = self.parse_expression()?;

        let mut span = start.merge(value.span());
        if self.check(TokenKind::Semicolon) {
            span = span.merge(self.advance().span);
        }

        Ok(Stmt::Return(ReturnStmt { value, span }))
    }

    /// Parse an expression statement; the trailing `;` is optional
    fn parse_expr_stmt(&mut self) -> Result<Stmt, ()> {
        let expr = self.parse_expression()?;

        let mut span = expr.span();
        if self.check(TokenKind::Semicolon) {
            span = span.merge(self.advance().span);
        }

        Ok(Stmt::Expr(ExprStmt { expr, span }))
    }

    /// Parse a `{ ... }` block
    pub(super) fn parse_block(&mut self) -> Result<Block, ()> {
        let start = self.consume(TokenKind::LeftBrace)?.span;

        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        let end = self.consume(TokenKind::RightBrace)?.span;

        Ok(Block {
            statements,
            span: start.merge(end),
        })
    }
}
