//! Grouping tokens into lines and placing each instruction in time

use std::collections::HashMap;

use tracing::{debug, trace};

use super::flatten;
use super::grammar;
use super::lexer::{Lexeme, Lexer, Token};
use super::reader::Reader;
use super::scope::Scope;
use crate::language::*;

/// One logical line: its indentation and the tokens between line breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub indentation: usize,
    pub position: Position,
    pub tokens: Vec<Token>,
}

/// A RUNSEQ held back for flattening, with its absolute offset already
/// resolved within the sequence that contains it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub reference: RunSeq,
    pub position: Position,
}

/// Sequences as written, before inclusion. Each holds only its own
/// instructions; the references it makes are kept aside by sequence name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub sequences: Sequences,
    pub directives: HashMap<String, Vec<Directive>>,
}

impl Draft {
    pub fn directives(&self, name: &str) -> &[Directive] {
        match self
            .directives
            .get(name)
        {
            Some(directives) => directives,
            None => &[],
        }
    }
}

#[derive(Debug)]
pub struct Parser<'i> {
    lexer: Lexer<'i>,
}

impl<'i> Parser<'i> {
    pub fn new(filename: &str, content: &'i str) -> Parser<'i> {
        Parser {
            lexer: Lexer::new(Reader::new(filename, content)),
        }
    }

    pub fn reader(&self) -> &Reader<'i> {
        self.lexer
            .reader()
    }

    /// Parse everything, include referenced sequences, and close open
    /// expectation windows.
    pub fn parse(&mut self) -> Result<Sequences, ParsingError> {
        let draft = self.read_sequences()?;
        let sequences = flatten::resolve(&draft)?;

        debug!(
            "Found {} sequence{}",
            sequences.len(),
            if sequences.len() == 1 { "" } else { "s" }
        );
        Ok(sequences)
    }

    /// The tokens of the next logical line, or None at the end of input. A
    /// last line without a trailing newline is still returned.
    pub fn next_line(&mut self) -> Result<Option<Line>, ParsingError> {
        let mut indentation = 0;
        let mut start: Option<Position> = None;
        let mut first: Option<Position> = None;
        let mut tokens = Vec::new();

        loop {
            match self
                .lexer
                .next_token()?
            {
                None => {
                    if tokens.is_empty() {
                        return Ok(None);
                    }
                    break;
                }
                Some(Lexeme {
                    token: Token::Indentation(level),
                    position,
                }) => {
                    indentation = level;
                    start.get_or_insert(position);
                }
                Some(Lexeme {
                    token: Token::NewLine,
                    position,
                }) => {
                    start.get_or_insert(position);
                    break;
                }
                Some(Lexeme { token, position }) => {
                    first.get_or_insert(position);
                    tokens.push(token);
                }
            }
        }

        let position = first
            .or(start)
            .unwrap_or_default();

        Ok(Some(Line {
            indentation,
            position,
            tokens,
        }))
    }

    /// The next line along with the instruction it spells out. A line no
    /// instruction matches is a syntax error.
    pub fn read_instruction(&mut self) -> Result<Option<(Line, Instruction)>, ParsingError> {
        let line = match self.next_line()? {
            Some(line) => line,
            None => return Ok(None),
        };

        match grammar::recognize(&line.tokens) {
            Some(instruction) => {
                trace!(
                    line = line.position.line,
                    indentation = line.indentation,
                    %instruction
                );
                Ok(Some((line, instruction)))
            }
            None => Err(ParsingError::InvalidInstruction(line.position)),
        }
    }

    /// Collect sequences, converting each instruction's offset from relative
    /// to its parent line into absolute from the sequence start.
    pub fn read_sequences(&mut self) -> Result<Draft, ParsingError> {
        let mut draft = Draft::default();
        let mut current: Option<Sequence> = None;
        let mut scope = Scope::new();

        while let Some((line, instruction)) = self.read_instruction()? {
            match instruction {
                Instruction::Empty => {}
                Instruction::Header(header) => {
                    if line.indentation != 0 {
                        return Err(ParsingError::IndentedHeader(line.position));
                    }
                    if let Some(sequence) = current.take() {
                        draft
                            .sequences
                            .insert(sequence);
                    }
                    draft
                        .directives
                        .insert(header.name.clone(), Vec::new());
                    current = Some(Sequence::new(&header.name, header.is_test));
                    scope.reset();
                }
                Instruction::Command(mut command) => {
                    let sequence = descend(&mut current, &mut scope, &line)?;
                    place(&mut command, &mut scope, &line)?;
                    sequence
                        .commands
                        .push(command);
                }
                Instruction::ExpectEvent(mut event) => {
                    let sequence = descend(&mut current, &mut scope, &line)?;
                    place(&mut event, &mut scope, &line)?;
                    sequence
                        .events
                        .push(event);
                }
                Instruction::ExpectTelemetry(mut telemetry) => {
                    let sequence = descend(&mut current, &mut scope, &line)?;
                    place(&mut telemetry, &mut scope, &line)?;
                    sequence
                        .telemetry
                        .push(telemetry);
                }
                Instruction::Uplink(mut uplink) => {
                    let sequence = descend(&mut current, &mut scope, &line)?;
                    place(&mut uplink, &mut scope, &line)?;
                    sequence
                        .uplinks
                        .push(uplink);
                }
                Instruction::RunSeq(mut runseq) => {
                    let sequence = descend(&mut current, &mut scope, &line)?;
                    place(&mut runseq, &mut scope, &line)?;
                    draft
                        .directives
                        .entry(
                            sequence
                                .name
                                .clone(),
                        )
                        .or_default()
                        .push(Directive {
                            reference: runseq,
                            position: line.position,
                        });
                }
            }
        }

        if let Some(sequence) = current.take() {
            draft
                .sequences
                .insert(sequence);
        }

        Ok(draft)
    }
}

/// Check a timed instruction may appear here and close any scopes deeper
/// than its indentation. Indentation may go back to any open level but only
/// one deeper than the innermost.
fn descend<'s>(
    current: &'s mut Option<Sequence>,
    scope: &mut Scope,
    line: &Line,
) -> Result<&'s mut Sequence, ParsingError> {
    let sequence = match current {
        Some(sequence) => sequence,
        None => return Err(ParsingError::OutsideSequence(line.position)),
    };

    if line.indentation < 1 || line.indentation > scope.depth() {
        return Err(ParsingError::InvalidIndentation {
            position: line.position,
            level: line.indentation,
            deepest: scope.depth(),
        });
    }

    scope.truncate(line.indentation);
    Ok(sequence)
}

/// Make an instruction's times absolute by moving them past the innermost
/// open scope, then open a scope at its own time.
fn place<T: Timed>(item: &mut T, scope: &mut Scope, line: &Line) -> Result<(), ParsingError> {
    item.shift(scope.current())
        .map_err(|_| ParsingError::TimeOverflow(line.position))?;
    scope.push(item.offset());
    Ok(())
}
