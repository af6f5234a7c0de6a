use std::{fmt, path::Path};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingError<'i> {
    pub problem: String,
    pub details: String,
    pub filename: &'i Path,
}

impl<'i> fmt::Display for LoadingError<'i> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.problem, self.details)
    }
}

/// A time was moved past the largest representable offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overflow;

/// A location in the source, both numbers 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Position {
        Position { line, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Structural,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    UnexpectedCharacter(Position, char),
    UnterminatedString(Position),
    InvalidInstruction(Position),
    IndentedHeader(Position),
    OutsideSequence(Position),
    InvalidIndentation {
        position: Position,
        level: usize,
        deepest: usize,
    },
    UndeclaredSequence(Position, String),
    CircularInclusion(Position, Vec<String>),
    TimeOverflow(Position),
    ExpansionLimit {
        position: Position,
        name: String,
        limit: usize,
    },
}

impl ParsingError {
    pub fn position(&self) -> Position {
        match self {
            ParsingError::UnexpectedCharacter(position, _) => *position,
            ParsingError::UnterminatedString(position) => *position,
            ParsingError::InvalidInstruction(position) => *position,
            ParsingError::IndentedHeader(position) => *position,
            ParsingError::OutsideSequence(position) => *position,
            ParsingError::InvalidIndentation { position, .. } => *position,
            ParsingError::UndeclaredSequence(position, _) => *position,
            ParsingError::CircularInclusion(position, _) => *position,
            ParsingError::TimeOverflow(position) => *position,
            ParsingError::ExpansionLimit { position, .. } => *position,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParsingError::UnexpectedCharacter(..) | ParsingError::UnterminatedString(_) => {
                ErrorKind::Lexical
            }
            ParsingError::InvalidInstruction(_) => ErrorKind::Syntax,
            ParsingError::IndentedHeader(_)
            | ParsingError::OutsideSequence(_)
            | ParsingError::InvalidIndentation { .. }
            | ParsingError::UndeclaredSequence(..)
            | ParsingError::CircularInclusion(..)
            | ParsingError::TimeOverflow(_)
            | ParsingError::ExpansionLimit { .. } => ErrorKind::Structural,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParsingError::UnexpectedCharacter(_, c) => format!("unexpected character '{}'", c),
            ParsingError::UnterminatedString(_) => "expected closing '\"'".to_string(),
            ParsingError::InvalidInstruction(_) => "invalid instruction".to_string(),
            ParsingError::IndentedHeader(_) => {
                "sequence header must not be indented".to_string()
            }
            ParsingError::OutsideSequence(_) => {
                "instruction outside of any sequence".to_string()
            }
            ParsingError::InvalidIndentation { level, deepest, .. } => format!(
                "indentation level {} not allowed here, expected 1 to {}",
                level, deepest
            ),
            ParsingError::UndeclaredSequence(_, name) => {
                format!("reference to undeclared sequence '{}'", name)
            }
            ParsingError::CircularInclusion(_, chain) => {
                format!("circular sequence inclusion {}", chain.join(" -> "))
            }
            ParsingError::TimeOverflow(_) => {
                format!("time beyond {} ms from the sequence start", u64::MAX)
            }
            ParsingError::ExpansionLimit { name, limit, .. } => format!(
                "including '{}' takes the sequence past {} instructions",
                name, limit
            ),
        }
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let position = self.position();
        write!(
            f,
            "{}:{} {}",
            position.line,
            position.column,
            self.message()
        )
    }
}

impl std::error::Error for ParsingError {}
