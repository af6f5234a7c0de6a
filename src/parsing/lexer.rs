//! Tokenizer for fpseq source

use tracing::trace;

use super::reader::Reader;
use crate::language::{ParsingError, Position};

/// Width of one level of indentation, in spaces.
pub const INDENTATION_SIZE: usize = 2;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    TEST,
    SEQ,
    EXPECT,
    NO,
    COMMAND,
    EVENT,
    TELEMETRY,
    RUNSEQ,
    UPLINK,
}

impl Keyword {
    /// Exact, case sensitive, lookup of a word in the keyword vocabulary.
    pub fn from_word(word: &str) -> Option<Keyword> {
        match word {
            "TEST" => Some(Keyword::TEST),
            "SEQ" => Some(Keyword::SEQ),
            "EXPECT" => Some(Keyword::EXPECT),
            "NO" => Some(Keyword::NO),
            "COMMAND" => Some(Keyword::COMMAND),
            "EVENT" => Some(Keyword::EVENT),
            "TELEMETRY" => Some(Keyword::TELEMETRY),
            "RUNSEQ" => Some(Keyword::RUNSEQ),
            "UPLINK" => Some(Keyword::UPLINK),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Indentation(usize),
    NewLine,
    Keyword(Keyword),
    Identifier(String),
    Literal { value: String, is_regex: bool },
    Syntax(char),
}

#[cfg(test)]
impl Token {
    pub(crate) fn literal(value: &str) -> Token {
        Token::Literal {
            value: value.to_string(),
            is_regex: false,
        }
    }

    pub(crate) fn identifier(name: &str) -> Token {
        Token::Identifier(name.to_string())
    }
}

/// A token along with where it started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Token,
    pub position: Position,
}

#[derive(Debug)]
pub struct Lexer<'i> {
    reader: Reader<'i>,
}

impl<'i> Lexer<'i> {
    pub fn new(reader: Reader<'i>) -> Lexer<'i> {
        Lexer { reader }
    }

    pub fn reader(&self) -> &Reader<'i> {
        &self.reader
    }

    /// The next token, or None once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Lexeme>, ParsingError> {
        let lexeme = if self
            .reader
            .current_offset()
            == 1
        {
            self.process_line_start()?
        } else {
            self.process_default()?
        };

        if let Some(lexeme) = &lexeme {
            trace!(token = ?lexeme.token);
        }
        Ok(lexeme)
    }

    fn process_line_start(&mut self) -> Result<Option<Lexeme>, ParsingError> {
        let position = self
            .reader
            .position();
        let unit = " ".repeat(INDENTATION_SIZE);

        let mut level = 0;
        while self
            .reader
            .peek(INDENTATION_SIZE)
            == unit
        {
            self.reader
                .read(INDENTATION_SIZE);
            level += 1;
        }

        if level == 0 {
            self.process_default()
        } else {
            Ok(Some(Lexeme {
                token: Token::Indentation(level),
                position,
            }))
        }
    }

    fn process_default(&mut self) -> Result<Option<Lexeme>, ParsingError> {
        while let Some(c) = self
            .reader
            .peek_char()
        {
            let position = self
                .reader
                .position();

            let token = match c {
                ' ' | '\r' => {
                    self.reader
                        .read_char();
                    continue;
                }
                '\n' => {
                    self.reader
                        .read_char();
                    Token::NewLine
                }
                '#' => return Ok(self.process_comment(position)),
                '"' => self.process_string(position, false)?,
                '0'..='9' | '.' | '-' => self.process_number(),
                '[' | ':' | ']' => {
                    self.reader
                        .read_char();
                    Token::Syntax(c)
                }
                _ if c.is_alphabetic() || c == '_' => self.process_identifier(position)?,
                _ => return Err(ParsingError::UnexpectedCharacter(position, c)),
            };

            return Ok(Some(Lexeme { token, position }));
        }

        Ok(None)
    }

    fn process_comment(&mut self, position: Position) -> Option<Lexeme> {
        while let Some(c) = self
            .reader
            .read_char()
        {
            if c == '\n' {
                return Some(Lexeme {
                    token: Token::NewLine,
                    position,
                });
            }
        }
        None
    }

    fn process_string(&mut self, position: Position, is_regex: bool) -> Result<Token, ParsingError> {
        // opening quote
        self.reader
            .read_char();

        let mut value = String::new();
        while let Some(c) = self
            .reader
            .peek_char()
        {
            match c {
                '"' => {
                    self.reader
                        .read_char();
                    // a doubled quote is an escaped quote, not the end
                    if self
                        .reader
                        .peek_char()
                        == Some('"')
                    {
                        self.reader
                            .read_char();
                        value.push('"');
                    } else {
                        return Ok(Token::Literal { value, is_regex });
                    }
                }
                '\n' => break,
                _ => {
                    self.reader
                        .read_char();
                    value.push(c);
                }
            }
        }

        Err(ParsingError::UnterminatedString(position))
    }

    fn process_number(&mut self) -> Token {
        let mut value = String::new();
        if let Some(c) = self
            .reader
            .read_char()
        {
            value.push(c);
        }

        while let Some(c) = self
            .reader
            .peek_char()
        {
            if c.is_ascii_digit() || c == '.' {
                self.reader
                    .read_char();
                value.push(c);
            } else {
                break;
            }
        }

        Token::Literal {
            value,
            is_regex: false,
        }
    }

    fn process_identifier(&mut self, position: Position) -> Result<Token, ParsingError> {
        let mut name = String::new();
        if let Some(c) = self
            .reader
            .read_char()
        {
            name.push(c);
        }

        while let Some(c) = self
            .reader
            .peek_char()
        {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                self.reader
                    .read_char();
                name.push(c);
            } else if c == '"' && name == "re" {
                return self.process_string(position, true);
            } else {
                break;
            }
        }

        match Keyword::from_word(&name) {
            Some(keyword) => Ok(Token::Keyword(keyword)),
            None => Ok(Token::Identifier(name)),
        }
    }
}
