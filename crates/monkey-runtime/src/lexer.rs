//! Lexical analysis (tokenization)
//!
//! Converts Monkey source text into tokens. The scanner never fails: a
//! character it cannot classify becomes an [`TokenKind::Illegal`] token and
//! the parser reports it.

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer state for tokenizing source code
pub struct Lexer {
    /// Characters of source code
    chars: Vec<char>,
    /// Current position in chars
    current: usize,
    /// Start position of current token
    start_pos: usize,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: impl AsRef<str>) -> Self {
        Self {
            chars: source.as_ref().chars().collect(),
            current: 0,
            start_pos: 0,
        }
    }

    /// Tokenize the whole input, including the trailing `Eof`
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        tokens
    }

    /// Scan the next token
    ///
    /// Keeps returning `Eof` once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.start_pos = self.current;

        if self.is_at_end() {
            return Token::eof(self.current);
        }

        let c = self.advance();

        match c {
            '(' => self.make_token(TokenKind::LeftParen, "("),
            ')' => self.make_token(TokenKind::RightParen, ")"),
            '{' => self.make_token(TokenKind::LeftBrace, "{"),
            '}' => self.make_token(TokenKind::RightBrace, "}"),
            ',' => self.make_token(TokenKind::Comma, ","),
            ';' => self.make_token(TokenKind::Semicolon, ";"),
            '+' => self.make_token(TokenKind::Plus, "+"),
            '-' => self.make_token(TokenKind::Minus, "-"),
            '*' => self.make_token(TokenKind::Star, "*"),
            '/' => self.make_token(TokenKind::Slash, "/"),
            '<' => self.make_token(TokenKind::Less, "<"),
            '>' => self.make_token(TokenKind::Greater, ">"),

            '=' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::EqualEqual, "==")
                } else {
                    self.make_token(TokenKind::Assign, "=")
                }
            }
            '!' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::BangEqual, "!=")
                } else {
                    self.make_token(TokenKind::Bang, "!")
                }
            }

            '"' => self.string(),
            c if c.is_ascii_digit() => self.integer(),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),

            other => self.make_token(TokenKind::Illegal, &other.to_string()),
        }
    }

    /// Skip whitespace and `//` line comments
    fn skip_whitespace_and_comments(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '/' if self.peek_next() == Some('/') => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    /// Scan a string literal; the opening quote is already consumed
    fn string(&mut self) -> Token {
        while !self.is_at_end() && self.peek() != '"' {
            self.advance();
        }

        if self.is_at_end() {
            let text = self.text_from(self.start_pos);
            return self.make_token(TokenKind::Illegal, &text);
        }

        let value = self.text_from(self.start_pos + 1);
        self.advance(); // closing quote
        self.make_token(TokenKind::String, &value)
    }

    /// Scan an integer literal
    ///
    /// Range checking happens in the parser so that an oversized literal is
    /// reported as a parse diagnostic.
    fn integer(&mut self) -> Token {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        let text = self.text_from(self.start_pos);
        self.make_token(TokenKind::Int, &text)
    }

    /// Scan an identifier or keyword
    fn identifier(&mut self) -> Token {
        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            self.advance();
        }
        let text = self.text_from(self.start_pos);
        let kind = TokenKind::is_keyword(&text).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, &text)
    }

    // === Character navigation ===

    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.current]
        }
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.current + 1).copied()
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.current] != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    fn text_from(&self, start: usize) -> String {
        self.chars[start..self.current].iter().collect()
    }

    fn make_token(&self, kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme, Span::new(self.start_pos, self.current))
    }
}

impl Iterator for Lexer {
    type Item = Token;

    /// Yields tokens up to, but not including, `Eof`
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}
