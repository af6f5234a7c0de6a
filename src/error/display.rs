use std::fmt;

use crate::language::{ErrorKind, ParsingError};

/// A parsing failure located in its file, ready to show to a person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceError<'i> {
    pub problem: String,
    pub filename: String,
    pub line: usize,
    pub column: usize,
    pub code: &'i str,
    pub cause: ParsingError,
}

impl<'i> SequenceError<'i> {
    pub fn new(cause: ParsingError, filename: &str, code: &'i str) -> SequenceError<'i> {
        let position = cause.position();
        SequenceError {
            problem: cause.message(),
            filename: filename.to_string(),
            line: position.line,
            column: position.column,
            code,
            cause,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.cause
            .kind()
    }

    // Verbose detailed explanation
    pub fn full_details(&self) -> String {
        let width = self
            .line
            .to_string()
            .len();
        let width = 3.max(width);
        let column = self.column;

        format!(
            r#"
{} error: {}
{}:{}:{}

{:width$} |
{:>width$} | {}
{:width$} | {:>column$}
            "#,
            heading(self.kind()),
            self.problem,
            self.filename,
            self.line,
            self.column,
            ' ',
            self.line,
            self.code,
            ' ',
            '^',
        )
        .trim_ascii()
        .to_string()
    }
}

fn heading(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Lexical => "lexical",
        ErrorKind::Syntax => "syntax",
        ErrorKind::Structural => "structural",
    }
}

// Concise version for internal use
impl<'i> fmt::Display for SequenceError<'i> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error: {}:{}:{} {}",
            self.filename,
            self.line,
            self.column,
            self.problem
        )
    }
}

impl<'i> std::error::Error for SequenceError<'i> {}
