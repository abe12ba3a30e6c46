//! Token types for lexical analysis
//!
//! Defines every token the Monkey scanner can produce. A token is an
//! immutable `(kind, lexeme)` pair plus the span it was read from.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The literal source text of this token
    pub lexeme: String,
    /// Source location
    pub span: Span,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// End-of-input marker at the given offset
    pub fn eof(at: usize) -> Self {
        Self::new(TokenKind::Eof, "", Span::new(at, at))
    }
}

/// Classification of token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Identifier (`x`, `add`, `new_adder`)
    Identifier,
    /// Integer literal (`42`)
    Int,
    /// String literal (`"hello"`), lexeme excludes the quotes
    String,
    /// `true` keyword
    True,
    /// `false` keyword
    False,

    // Keywords
    /// `let`
    Let,
    /// `return`
    Return,
    /// `if`
    If,
    /// `else`
    Else,
    /// `fn`
    Fn,

    // Operators
    /// `=`
    Assign,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `!`
    Bang,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,

    // Punctuation
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,

    // Special
    /// End of input
    Eof,
    /// Character sequence the scanner could not classify
    Illegal,
}

impl TokenKind {
    /// Check if a string is a keyword and return its token kind
    pub fn is_keyword(s: &str) -> Option<TokenKind> {
        match s {
            "let" => Some(TokenKind::Let),
            "return" => Some(TokenKind::Return),
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "fn" => Some(TokenKind::Fn),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            _ => None,
        }
    }

    /// Get the string representation of this token kind
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Int => "integer",
            TokenKind::String => "string",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Let => "let",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Fn => "fn",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Bang => "!",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::EqualEqual => "==",
            TokenKind::BangEqual => "!=",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Eof => "EOF",
            TokenKind::Illegal => "illegal",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new(TokenKind::Int, "42", Span::new(0, 2));
        assert_eq!(token.kind, TokenKind::Int);
        assert_eq!(token.lexeme, "42");
        assert_eq!(token.span, Span::new(0, 2));
    }

    #[test]
    fn test_keyword_detection() {
        assert_eq!(TokenKind::is_keyword("let"), Some(TokenKind::Let));
        assert_eq!(TokenKind::is_keyword("return"), Some(TokenKind::Return));
        assert_eq!(TokenKind::is_keyword("fn"), Some(TokenKind::Fn));
        assert_eq!(TokenKind::is_keyword("if"), Some(TokenKind::If));
        assert_eq!(TokenKind::is_keyword("else"), Some(TokenKind::Else));
        assert_eq!(TokenKind::is_keyword("true"), Some(TokenKind::True));
        assert_eq!(TokenKind::is_keyword("false"), Some(TokenKind::False));
    }

    #[test]
    fn test_non_keyword() {
        assert_eq!(TokenKind::is_keyword("foo"), None);
        assert_eq!(TokenKind::is_keyword("null"), None);
        assert_eq!(TokenKind::is_keyword("Let"), None); // Case-sensitive
    }

    #[test]
    fn test_token_kind_display() {
        assert_eq!(TokenKind::Plus.to_string(), "+");
        assert_eq!(TokenKind::EqualEqual.to_string(), "==");
        assert_eq!(TokenKind::RightParen.to_string(), ")");
    }
}
