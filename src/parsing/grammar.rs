//! Recognizing which instruction a line of tokens spells out.
//!
//! Each instruction is described by an ordered list of slots. A slot names
//! the shape of token it accepts and, optionally, a field under which the
//! matched token is kept. Optional slots may be passed over when the next
//! token doesn't fit; repeatable slots collect as many fitting tokens as
//! there are, possibly none. A line is tried against every variant in
//! declaration order and the first one whose slots account for every token
//! (and whose constructor accepts the fields) wins.

use std::collections::HashMap;

use super::lexer::{Keyword, Token};
use crate::language::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Keyword(Keyword),
    Syntax(char),
    Identifier,
    /// Any literal, quoted, regex or numeric.
    Literal,
    /// A literal that isn't a regex.
    Text,
    /// A literal made only of digits, fitting in a u64.
    Number,
}

impl Shape {
    fn accepts(&self, token: &Token) -> bool {
        match (self, token) {
            (Shape::Keyword(expected), Token::Keyword(keyword)) => expected == keyword,
            (Shape::Syntax(expected), Token::Syntax(c)) => expected == c,
            (Shape::Identifier, Token::Identifier(_)) => true,
            (Shape::Literal, Token::Literal { .. }) => true,
            (Shape::Text, Token::Literal { is_regex, .. }) => !is_regex,
            (Shape::Number, Token::Literal { value, is_regex }) => {
                !is_regex && is_number(value)
            }
            _ => false,
        }
    }
}

fn is_number(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_digit())
        && value
            .parse::<u64>()
            .is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub shape: Shape,
    pub name: Option<&'static str>,
    pub optional: bool,
    pub repeatable: bool,
}

impl Slot {
    pub const fn new(shape: Shape) -> Slot {
        Slot {
            shape,
            name: None,
            optional: false,
            repeatable: false,
        }
    }

    pub const fn keyword(keyword: Keyword) -> Slot {
        Slot::new(Shape::Keyword(keyword))
    }

    pub const fn syntax(c: char) -> Slot {
        Slot::new(Shape::Syntax(c))
    }

    pub const fn named(self, name: &'static str) -> Slot {
        Slot {
            name: Some(name),
            ..self
        }
    }

    pub const fn optional(self) -> Slot {
        Slot {
            optional: true,
            ..self
        }
    }

    pub const fn repeatable(self) -> Slot {
        Slot {
            repeatable: true,
            ..self
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Binding<'t> {
    Single(Option<&'t Token>),
    Many(Vec<&'t Token>),
}

/// The values extracted from one successful match, by slot name.
#[derive(Debug, Default)]
pub struct Fields<'t> {
    bindings: HashMap<&'static str, Binding<'t>>,
}

impl<'t> Fields<'t> {
    fn bind(&mut self, slot: &Slot, token: &'t Token) {
        let name = match slot.name {
            Some(name) => name,
            None => return,
        };

        if slot.repeatable {
            match self
                .bindings
                .entry(name)
                .or_insert_with(|| Binding::Many(Vec::new()))
            {
                Binding::Many(tokens) => tokens.push(token),
                single => *single = Binding::Many(vec![token]),
            }
        } else {
            self.bindings
                .insert(name, Binding::Single(Some(token)));
        }
    }

    fn skip(&mut self, slot: &Slot) {
        let name = match slot.name {
            Some(name) => name,
            None => return,
        };

        if slot.repeatable {
            self.bindings
                .entry(name)
                .or_insert_with(|| Binding::Many(Vec::new()));
        } else {
            self.bindings
                .insert(name, Binding::Single(None));
        }
    }

    fn token(&self, name: &str) -> Option<&'t Token> {
        match self
            .bindings
            .get(name)
        {
            Some(Binding::Single(token)) => *token,
            _ => None,
        }
    }

    fn tokens(&self, name: &str) -> Vec<&'t Token> {
        match self
            .bindings
            .get(name)
        {
            Some(Binding::Many(tokens)) => tokens.clone(),
            Some(Binding::Single(Some(token))) => vec![*token],
            _ => Vec::new(),
        }
    }

    pub fn present(&self, name: &str) -> bool {
        self.token(name)
            .is_some()
    }

    pub fn identifier(&self, name: &str) -> Option<String> {
        match self.token(name)? {
            Token::Identifier(identifier) => Some(identifier.clone()),
            _ => None,
        }
    }

    pub fn number(&self, name: &str) -> Option<u64> {
        match self.token(name)? {
            Token::Literal { value, .. } => value
                .parse()
                .ok(),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<String> {
        match self.token(name)? {
            Token::Literal { value, .. } => Some(value.clone()),
            _ => None,
        }
    }

    pub fn texts(&self, name: &str) -> Vec<String> {
        self.tokens(name)
            .into_iter()
            .filter_map(|token| match token {
                Token::Literal { value, .. } => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn expected(&self, name: &str) -> Option<ExpectedValue> {
        match self.token(name)? {
            Token::Literal { value, is_regex } => Some(ExpectedValue {
                text: value.clone(),
                is_regex: *is_regex,
            }),
            _ => None,
        }
    }
}

/// Walk slots and tokens together. Returns None if a mandatory slot is left
/// unfilled or tokens remain once the slots run out.
pub fn match_slots<'t>(slots: &[Slot], tokens: &'t [Token]) -> Option<Fields<'t>> {
    let mut fields = Fields::default();
    let mut i = 0;
    let mut j = 0;

    loop {
        let token = tokens.get(i);
        let slot = match slots.get(j) {
            Some(slot) => slot,
            None if token.is_none() => return Some(fields),
            None => return None,
        };

        match token {
            Some(token) if slot
                .shape
                .accepts(token) =>
            {
                fields.bind(slot, token);
                i += 1;
                if !slot.repeatable {
                    j += 1;
                }
            }
            _ if slot.repeatable || slot.optional => {
                fields.skip(slot);
                j += 1;
            }
            _ => return None,
        }
    }
}

/// An instruction shape and how to build the instruction from its fields.
/// The constructor may still refuse a line the slots accepted.
pub struct Variant {
    pub name: &'static str,
    pub slots: &'static [Slot],
    pub build: fn(&Fields) -> Option<Instruction>,
}

// the optional "[ms]" prefix shared by timed instructions
const OPEN: Slot = Slot::syntax('[')
    .named("open")
    .optional();
const OFFSET: Slot = Slot::new(Shape::Number)
    .named("offset")
    .optional();
const CLOSE: Slot = Slot::syntax(']')
    .named("close")
    .optional();

// the optional "[start:end]" prefix of expectations
const START: Slot = Slot::new(Shape::Number)
    .named("start")
    .optional();
const COLON: Slot = Slot::syntax(':')
    .named("colon")
    .optional();
const END: Slot = Slot::new(Shape::Number)
    .named("end")
    .optional();

pub static VARIANTS: &[Variant] = &[
    Variant {
        name: "sequence header",
        slots: &[
            Slot::keyword(Keyword::TEST)
                .named("test")
                .optional(),
            Slot::keyword(Keyword::SEQ),
            Slot::new(Shape::Identifier).named("name"),
        ],
        build: build_header,
    },
    Variant {
        name: "command",
        slots: &[
            OPEN,
            OFFSET,
            CLOSE,
            Slot::keyword(Keyword::COMMAND),
            Slot::new(Shape::Identifier).named("name"),
            Slot::new(Shape::Literal)
                .named("args")
                .repeatable(),
        ],
        build: build_command,
    },
    Variant {
        name: "event expectation",
        slots: &[
            OPEN,
            START,
            COLON,
            END,
            CLOSE,
            Slot::keyword(Keyword::EXPECT),
            Slot::keyword(Keyword::NO)
                .named("negated")
                .optional(),
            Slot::keyword(Keyword::EVENT),
            Slot::new(Shape::Identifier).named("name"),
            Slot::new(Shape::Literal)
                .named("expected")
                .optional(),
        ],
        build: build_event,
    },
    Variant {
        name: "telemetry expectation",
        slots: &[
            OPEN,
            START,
            COLON,
            END,
            CLOSE,
            Slot::keyword(Keyword::EXPECT),
            Slot::keyword(Keyword::NO)
                .named("negated")
                .optional(),
            Slot::keyword(Keyword::TELEMETRY),
            Slot::new(Shape::Identifier).named("name"),
            Slot::new(Shape::Literal)
                .named("expected")
                .optional(),
        ],
        build: build_telemetry,
    },
    Variant {
        name: "uplink",
        slots: &[
            OPEN,
            OFFSET,
            CLOSE,
            Slot::keyword(Keyword::UPLINK),
            Slot::new(Shape::Text).named("source"),
            Slot::new(Shape::Text).named("destination"),
        ],
        build: build_uplink,
    },
    Variant {
        name: "sequence reference",
        slots: &[
            OPEN,
            OFFSET,
            CLOSE,
            Slot::keyword(Keyword::RUNSEQ),
            Slot::new(Shape::Identifier).named("name"),
        ],
        build: build_runseq,
    },
    Variant {
        name: "empty",
        slots: &[],
        build: build_empty,
    },
];

/// The instruction a line of tokens represents, if any.
pub fn recognize(tokens: &[Token]) -> Option<Instruction> {
    VARIANTS
        .iter()
        .find_map(|variant| {
            let fields = match_slots(variant.slots, tokens)?;
            (variant.build)(&fields)
        })
}

// "[ms]" is optional as a whole; a number needs its brackets.
fn offset(fields: &Fields) -> Option<u64> {
    match (fields.present("open"), fields.present("close")) {
        (true, true) => Some(
            fields
                .number("offset")
                .unwrap_or(0),
        ),
        (false, false) if !fields.present("offset") => Some(0),
        _ => None,
    }
}

fn window(fields: &Fields) -> Option<Window> {
    let open = fields.present("open");
    let colon = fields.present("colon");
    let close = fields.present("close");

    if open && colon && close {
        Some(Window {
            start: fields
                .number("start")
                .unwrap_or(0),
            end: match fields.number("end") {
                Some(end) => Bound::Bounded(end),
                None => Bound::OpenEnded,
            },
        })
    } else if !open && !colon && !close && !fields.present("start") && !fields.present("end") {
        Some(Window::default())
    } else {
        None
    }
}

fn build_header(fields: &Fields) -> Option<Instruction> {
    Some(Instruction::Header(SeqHeader {
        name: fields.identifier("name")?,
        is_test: fields.present("test"),
    }))
}

fn build_command(fields: &Fields) -> Option<Instruction> {
    Some(Instruction::Command(Command {
        name: fields.identifier("name")?,
        offset: offset(fields)?,
        args: fields.texts("args"),
    }))
}

fn build_event(fields: &Fields) -> Option<Instruction> {
    Some(Instruction::ExpectEvent(ExpectEvent {
        name: fields.identifier("name")?,
        window: window(fields)?,
        expected: fields.expected("expected"),
        negated: fields.present("negated"),
    }))
}

fn build_telemetry(fields: &Fields) -> Option<Instruction> {
    Some(Instruction::ExpectTelemetry(ExpectTelemetry {
        channel: fields.identifier("name")?,
        window: window(fields)?,
        expected: fields.expected("expected"),
        negated: fields.present("negated"),
    }))
}

fn build_uplink(fields: &Fields) -> Option<Instruction> {
    Some(Instruction::Uplink(Uplink {
        source: fields.text("source")?,
        destination: fields.text("destination")?,
        offset: offset(fields)?,
    }))
}

fn build_runseq(fields: &Fields) -> Option<Instruction> {
    Some(Instruction::RunSeq(RunSeq {
        name: fields.identifier("name")?,
        offset: offset(fields)?,
    }))
}

fn build_empty(_: &Fields) -> Option<Instruction> {
    Some(Instruction::Empty)
}
