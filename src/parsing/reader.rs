//! Character access over line-structured source text

use crate::language::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    line: usize,
    column: usize, // byte index into the line
}

/// Bounded look-ahead over the source. The cursor steps from the end of one
/// line to the start of the next and stops at the end of the last line;
/// reading beyond that yields nothing rather than failing.
#[derive(Debug)]
pub struct Reader<'i> {
    name: String,
    lines: Vec<&'i str>,
    cursor: Cursor,
}

impl<'i> Reader<'i> {
    pub fn new(name: &str, content: &'i str) -> Reader<'i> {
        Reader {
            name: name.to_string(),
            lines: content
                .split_inclusive('\n')
                .collect(),
            cursor: Cursor { line: 0, column: 0 },
        }
    }

    fn is_end(&self, cursor: Cursor) -> bool {
        match self
            .lines
            .last()
        {
            Some(last) => {
                cursor.line + 1 >= self.lines.len() && cursor.column >= last.len()
            }
            None => true,
        }
    }

    fn char_at(&self, cursor: Cursor) -> Option<char> {
        if self.is_end(cursor) {
            return None;
        }
        self.lines[cursor.line][cursor.column..]
            .chars()
            .next()
    }

    fn step(&self, cursor: Cursor, c: char) -> Cursor {
        let column = cursor.column + c.len_utf8();
        if column < self.lines[cursor.line].len() {
            Cursor {
                line: cursor.line,
                column,
            }
        } else if cursor.line + 1 < self.lines.len() {
            Cursor {
                line: cursor.line + 1,
                column: 0,
            }
        } else {
            // clamp at the end of input
            Cursor {
                line: cursor.line,
                column: self.lines[cursor.line].len(),
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.is_end(self.cursor)
    }

    /// Up to `k` characters from the cursor, without consuming them.
    pub fn peek(&self, k: usize) -> String {
        let mut cursor = self.cursor;
        let mut result = String::new();
        for _ in 0..k {
            match self.char_at(cursor) {
                Some(c) => {
                    result.push(c);
                    cursor = self.step(cursor, c);
                }
                None => break,
            }
        }
        result
    }

    /// Up to `k` characters from the cursor, consuming them.
    pub fn read(&mut self, k: usize) -> String {
        let mut result = String::new();
        for _ in 0..k {
            match self.read_char() {
                Some(c) => result.push(c),
                None => break,
            }
        }
        result
    }

    pub fn peek_char(&self) -> Option<char> {
        self.char_at(self.cursor)
    }

    pub fn read_char(&mut self) -> Option<char> {
        let c = self.char_at(self.cursor)?;
        self.cursor = self.step(self.cursor, c);
        Some(c)
    }

    pub fn source_name(&self) -> &str {
        &self.name
    }

    /// The text of the line under the cursor, without its line ending.
    pub fn current_line(&self) -> &'i str {
        match self
            .lines
            .get(self.cursor.line)
        {
            Some(line) => trim_ending(line),
            None => "",
        }
    }

    pub fn current_line_no(&self) -> usize {
        self.cursor
            .line
            + 1
    }

    /// Column of the cursor, counted in characters from 1.
    pub fn current_offset(&self) -> usize {
        match self
            .lines
            .get(self.cursor.line)
        {
            Some(line) => {
                line[..self.cursor.column]
                    .chars()
                    .count()
                    + 1
            }
            None => 1,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.current_line_no(), self.current_offset())
    }

    /// Text of any line by its 1-based number.
    pub fn line_text(&self, number: usize) -> Option<&'i str> {
        if number == 0 {
            return None;
        }
        self.lines
            .get(number - 1)
            .map(|line| trim_ending(line))
    }
}

fn trim_ending(line: &str) -> &str {
    let line = line
        .strip_suffix('\n')
        .unwrap_or(line);
    line.strip_suffix('\r')
        .unwrap_or(line)
}
