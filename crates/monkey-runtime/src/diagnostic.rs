//! Diagnostics for malformed source
//!
//! Every parse problem is reported as a [`Diagnostic`]: a stable code, a
//! message and the span it points at. Once the source text is attached the
//! diagnostic also knows its line, column and snippet, and can render itself
//! for humans or as JSON for tools.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Diagnostic schema version
pub const DIAG_VERSION: u32 = 1;

/// Error code registry
pub mod error_codes {
    // MK0xxx - Host errors
    pub const IO_ERROR: &str = "MK0001";

    // MK1xxx - Syntax errors
    pub const UNEXPECTED_TOKEN: &str = "MK1001";
    pub const MISSING_TOKEN: &str = "MK1002";
    pub const INVALID_INTEGER: &str = "MK1003";
    pub const ILLEGAL_TOKEN: &str = "MK1004";
}

/// A syntax error (or host failure) tied to a location in the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Diagnostic schema version
    pub diag_version: u32,
    /// Error code (e.g., "MK1002")
    pub code: String,
    /// Main diagnostic message
    pub message: String,
    /// Character range in the source
    pub span: Span,
    /// File path
    pub file: String,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Length of error span on its line
    pub length: usize,
    /// Source line string
    pub snippet: String,
    /// Short label for caret range
    pub label: String,
    /// Suggested fix (optional)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic with code
    ///
    /// Line and column assume single-line input until
    /// [`with_source`](Self::with_source) is called.
    pub fn error_with_code(
        code: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            diag_version: DIAG_VERSION,
            code: code.into(),
            message: message.into(),
            span,
            file: "<input>".to_string(),
            line: 1,
            column: span.start + 1,
            length: span.len(),
            snippet: String::new(),
            label: String::new(),
            help: None,
        }
    }

    /// Set the file path
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Resolve line, column and snippet against the text the span points into
    pub fn with_source(mut self, source: &str) -> Self {
        let mut line_start = 0;
        let mut line = 1;
        for (offset, c) in source.chars().enumerate() {
            if offset >= self.span.start {
                break;
            }
            if c == '\n' {
                line += 1;
                line_start = offset + 1;
            }
        }

        let snippet: String = source
            .chars()
            .skip(line_start)
            .take_while(|&c| c != '\n')
            .collect();
        let column = self.span.start - line_start + 1;
        let room = snippet.chars().count().saturating_sub(column - 1);

        self.line = line;
        self.column = column;
        // Carets never run past the snippet, but an Eof span still gets one.
        self.length = self.span.len().min(room).max(1);
        self.snippet = snippet;
        self
    }

    /// Set the label (caret description)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Add a help message
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Format as human-readable string
    pub fn to_human_string(&self) -> String {
        let mut output = String::new();

        // Header: error[MK1002]: expected next token to be ')' ...
        output.push_str(&format!("error[{}]: {}\n", self.code, self.message));

        // Location: --> path/to/file.mk:12:9
        output.push_str(&format!(
            "  --> {}:{}:{}\n",
            self.file, self.line, self.column
        ));

        if !self.snippet.is_empty() {
            output.push_str("   |\n");
            output.push_str(&format!("{:>2} | {}\n", self.line, self.snippet));

            if self.length > 0 {
                let padding = " ".repeat(self.column - 1);
                let carets = "^".repeat(self.length);
                output.push_str(&format!("   | {}{}", padding, carets));

                if !self.label.is_empty() {
                    output.push_str(&format!(" {}", self.label));
                }
                output.push('\n');
            }
        }

        if let Some(help) = &self.help {
            output.push_str(&format!("   = help: {}\n", help));
        }

        output
    }

    /// Format as JSON string
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format as compact JSON string
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_with_source_resolves_second_line() {
        let source = "let a = 1;\nlet b = @;";
        let diag = Diagnostic::error_with_code(
            error_codes::ILLEGAL_TOKEN,
            "illegal token '@'",
            Span::new(19, 20),
        )
        .with_source(source);

        assert_eq!(diag.line, 2);
        assert_eq!(diag.column, 9);
        assert_eq!(diag.length, 1);
        assert_eq!(diag.snippet, "let b = @;");
    }

    #[test]
    fn test_human_format() {
        let diag = Diagnostic::error_with_code(
            error_codes::MISSING_TOKEN,
            "expected next token to be ')', got '}' instead",
            Span::new(6, 7),
        )
        .with_file("demo.mk")
        .with_source("add(1 }")
        .with_label("expected ')'");

        insta::assert_snapshot!(diag.to_human_string(), @r"
        error[MK1002]: expected next token to be ')', got '}' instead
          --> demo.mk:1:7
           |
         1 | add(1 }
           |       ^ expected ')'
        ");
    }

    #[test]
    fn test_eof_span_gets_one_caret() {
        let diag = Diagnostic::error_with_code(
            error_codes::MISSING_TOKEN,
            "expected next token to be '}', got 'EOF' instead",
            Span::new(5, 5),
        )
        .with_source("fn() {");

        assert_eq!(diag.column, 6);
        assert_eq!(diag.length, 1);
    }

    #[test]
    fn test_json_output() {
        let diag = Diagnostic::error_with_code(
            error_codes::INVALID_INTEGER,
            "could not parse \"99999999999999999999\" as integer",
            Span::new(0, 20),
        )
        .with_help("integer literals must fit in 64 bits");

        let json = diag.to_json_string().unwrap();
        assert!(json.contains("\"code\": \"MK1003\""));
        assert!(json.contains("\"help\""));

        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, diag);
    }
}
