//! Parsing (tokens to AST)
//!
//! The parser converts a stream of tokens into an Abstract Syntax Tree (AST).
//! Uses Pratt parsing for expressions and recursive descent for statements.
//!
//! Malformed input never aborts the parse. Each problem is recorded as a
//! [`Diagnostic`], the offending statement is left out of the program and
//! parsing resumes at the next statement boundary.

mod expr;
mod stmt;

use crate::ast::*;
use crate::diagnostic::{error_codes, Diagnostic};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use tracing::debug;

/// Parser state for building AST from tokens
pub struct Parser {
    pub(super) tokens: Vec<Token>,
    pub(super) current: usize,
    /// First token of the top-level statement being parsed
    pub(super) statement_start: usize,
    pub(super) diagnostics: Vec<Diagnostic>,
}

/// Operator precedence levels for Pratt parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum Precedence {
    Lowest,
    Equals,      // == !=
    LessGreater, // < >
    Sum,         // + -
    Product,     // * /
    Prefix,      // -x !x
    Call,        // f(x)
}

/// Parse a token stream into a program plus any diagnostics
pub fn parse_program(tokens: Vec<Token>) -> (Program, Vec<Diagnostic>) {
    Parser::new(tokens).parse()
}

/// Scan and parse source text
///
/// Diagnostics come back with line, column and snippet resolved against
/// `source`.
pub fn parse_source(source: &str) -> (Program, Vec<Diagnostic>) {
    let tokens = Lexer::new(source).tokenize();
    let (program, diagnostics) = parse_program(tokens);
    let diagnostics = diagnostics
        .into_iter()
        .map(|d| d.with_source(source))
        .collect();
    (program, diagnostics)
}

impl Parser {
    /// Create a new parser for the given tokens
    ///
    /// A missing trailing `Eof` is supplied.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let at = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token::eof(at));
        }

        Self {
            tokens,
            current: 0,
            statement_start: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Parse tokens into an AST
    #[tracing::instrument(level = "debug", skip_all, fields(tokens = self.tokens.len()))]
    pub fn parse(&mut self) -> (Program, Vec<Diagnostic>) {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            self.statement_start = self.current;
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(_) => self.synchronize(),
            }
        }

        debug!(
            statements = statements.len(),
            errors = self.diagnostics.len(),
            "parse finished"
        );
        (Program { statements }, std::mem::take(&mut self.diagnostics))
    }

    // === Token navigation ===

    /// Advance to next token
    pub(super) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Peek at current token
    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Check if current token matches kind
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// Match and consume token if it matches
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume token of given kind or report it missing
    pub(super) fn consume(&mut self, kind: TokenKind) -> Result<&Token, ()> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let message = format!(
                "expected next token to be '{}', got '{}' instead",
                kind,
                describe(self.peek())
            );
            self.error(error_codes::MISSING_TOKEN, &message, &format!("expected '{}'", kind));
            Err(())
        }
    }

    /// Consume an identifier, e.g. a binding name or parameter
    pub(super) fn consume_identifier(&mut self) -> Result<Identifier, ()> {
        let token = self.consume(TokenKind::Identifier)?;
        Ok(Identifier {
            name: token.lexeme.clone(),
            span: token.span,
        })
    }

    /// Check if at end of token stream
    pub(super) fn is_at_end(&self) -> bool {
        self.tokens[self.current].kind == TokenKind::Eof
    }

    /// Record an error at the current token
    pub(super) fn error(&mut self, code: &str, message: &str, label: &str) {
        let span = self.peek().span;
        self.diagnostics
            .push(Diagnostic::error_with_code(code, message, span).with_label(label));
    }

    /// Synchronize after error
    ///
    /// Skips past the next `;`, or up to the next `let`/`return`, that is
    /// not nested inside a brace left open by the failed statement.
    pub(super) fn synchronize(&mut self) {
        let mut depth = self.tokens[self.statement_start..self.current]
            .iter()
            .fold(0usize, |depth, token| match token.kind {
                TokenKind::LeftBrace => depth + 1,
                TokenKind::RightBrace => depth.saturating_sub(1),
                _ => depth,
            });
        self.advance();

        while !self.is_at_end() {
            match self.tokens[self.current - 1].kind {
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace => depth = depth.saturating_sub(1),
                TokenKind::Semicolon if depth == 0 => return,
                _ => {}
            }

            match self.peek().kind {
                TokenKind::Let | TokenKind::Return if depth == 0 => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}

/// How a token is named in "got ..." messages
fn describe(token: &Token) -> &str {
    match token.kind {
        TokenKind::Eof => "EOF",
        _ => token.lexeme.as_str(),
    }
}
