//! parser for the fpseq test sequence language

use std::path::Path;
use tracing::debug;

use crate::error::SequenceError;
use crate::language::{LoadingError, Sequences};

pub mod flatten;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod reader;
mod scope;

pub use parser::Parser;

/// Read a file and return an owned String. We pass that ownership back to
/// the caller so that diagnostics produced by parse() below can borrow from
/// it.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// Parse text into fully resolved sequences, or describe the first problem
/// encountered.
pub fn parse<'i>(filename: &Path, content: &'i str) -> Result<Sequences, SequenceError<'i>> {
    let name = filename
        .to_string_lossy()
        .to_string();
    let mut parser = Parser::new(&name, content);

    match parser.parse() {
        Ok(sequences) => {
            debug!(
                "Tests: {}",
                sequences
                    .tests()
                    .count()
            );
            Ok(sequences)
        }
        Err(error) => {
            debug!(?error);
            let reader = parser.reader();
            let code = reader
                .line_text(
                    error
                        .position()
                        .line,
                )
                .unwrap_or("");
            Err(SequenceError::new(error, reader.source_name(), code))
        }
    }
}
