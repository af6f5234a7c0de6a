//! Types representing parsed and resolved test sequences

use std::fmt;

use regex::Regex;

use super::Overflow;

// time windows for expectations

/// The end of an expectation window. Windows written without an end are
/// open until the bounding pass closes them at the owning sequence's
/// duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Bounded(u64),
    OpenEnded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub start: u64,
    pub end: Bound,
}

impl Default for Window {
    fn default() -> Self {
        Window {
            start: 0,
            end: Bound::OpenEnded,
        }
    }
}

impl Window {
    pub fn end_ms(&self) -> Option<u64> {
        match self.end {
            Bound::Bounded(end) => Some(end),
            Bound::OpenEnded => None,
        }
    }

    /// Whether a time (in milliseconds from the sequence start) falls inside
    /// the window, bounds inclusive. An open window accepts anything after
    /// its start.
    pub fn contains(&self, ms: u64) -> bool {
        match self.end {
            Bound::Bounded(end) => self.start <= ms && ms <= end,
            Bound::OpenEnded => self.start <= ms,
        }
    }

    fn shifted(self, by: u64) -> Result<Window, Overflow> {
        Ok(Window {
            start: later(self.start, by)?,
            end: match self.end {
                Bound::Bounded(end) => Bound::Bounded(later(end, by)?),
                Bound::OpenEnded => Bound::OpenEnded,
            },
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpectedValue {
    pub text: String,
    pub is_regex: bool,
}

impl ExpectedValue {
    pub fn plain(text: &str) -> ExpectedValue {
        ExpectedValue {
            text: text.to_string(),
            is_regex: false,
        }
    }

    pub fn regex(pattern: &str) -> ExpectedValue {
        ExpectedValue {
            text: pattern.to_string(),
            is_regex: true,
        }
    }

    /// Compare against the display text of a received event or channel
    /// value. Plain values must be equal; regex values need only match
    /// somewhere in the text.
    pub fn matches(&self, text: &str) -> Result<bool, regex::Error> {
        if self.is_regex {
            let re = Regex::new(&self.text)?;
            Ok(re.is_match(text))
        } else {
            Ok(self.text == text)
        }
    }
}

// the instructions, one per logical line

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeqHeader {
    pub name: String,
    pub is_test: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub offset: u64,
    pub args: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpectEvent {
    pub name: String,
    pub window: Window,
    pub expected: Option<ExpectedValue>,
    pub negated: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpectTelemetry {
    pub channel: String,
    pub window: Window,
    pub expected: Option<ExpectedValue>,
    pub negated: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Uplink {
    pub source: String,
    pub destination: String,
    pub offset: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSeq {
    pub name: String,
    pub offset: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    Header(SeqHeader),
    Command(Command),
    ExpectEvent(ExpectEvent),
    ExpectTelemetry(ExpectTelemetry),
    Uplink(Uplink),
    RunSeq(RunSeq),
    Empty,
}

fn later(time: u64, by: u64) -> Result<u64, Overflow> {
    time.checked_add(by)
        .ok_or(Overflow)
}

/// Anything carrying a point in time that nested lines are measured from.
pub trait Timed {
    /// The instruction's own time: send time, window start, uplink time.
    fn offset(&self) -> u64;

    /// Move every time carried by the instruction later by `by`
    /// milliseconds. Open window ends stay open. On overflow the
    /// instruction is left as it was.
    fn shift(&mut self, by: u64) -> Result<(), Overflow>;
}

impl Timed for Command {
    fn offset(&self) -> u64 {
        self.offset
    }

    fn shift(&mut self, by: u64) -> Result<(), Overflow> {
        self.offset = later(self.offset, by)?;
        Ok(())
    }
}

impl Timed for ExpectEvent {
    fn offset(&self) -> u64 {
        self.window
            .start
    }

    fn shift(&mut self, by: u64) -> Result<(), Overflow> {
        self.window = self
            .window
            .shifted(by)?;
        Ok(())
    }
}

impl Timed for ExpectTelemetry {
    fn offset(&self) -> u64 {
        self.window
            .start
    }

    fn shift(&mut self, by: u64) -> Result<(), Overflow> {
        self.window = self
            .window
            .shifted(by)?;
        Ok(())
    }
}

impl Timed for Uplink {
    fn offset(&self) -> u64 {
        self.offset
    }

    fn shift(&mut self, by: u64) -> Result<(), Overflow> {
        self.offset = later(self.offset, by)?;
        Ok(())
    }
}

impl Timed for RunSeq {
    fn offset(&self) -> u64 {
        self.offset
    }

    fn shift(&mut self, by: u64) -> Result<(), Overflow> {
        self.offset = later(self.offset, by)?;
        Ok(())
    }
}

// rendering instructions back into source form

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write!(f, "\"{}\"", text.replace('"', "\"\""))
}

fn write_window(f: &mut fmt::Formatter<'_>, window: &Window) -> fmt::Result {
    match window.end {
        Bound::Bounded(end) => write!(f, "[{}:{}]", window.start, end),
        Bound::OpenEnded => write!(f, "[{}:]", window.start),
    }
}

fn write_expectation(
    f: &mut fmt::Formatter<'_>,
    window: &Window,
    negated: bool,
    kind: &str,
    name: &str,
    expected: &Option<ExpectedValue>,
) -> fmt::Result {
    write_window(f, window)?;
    write!(f, " EXPECT ")?;
    if negated {
        write!(f, "NO ")?;
    }
    write!(f, "{} {}", kind, name)?;
    if let Some(value) = expected {
        write!(f, " {}", value)?;
    }
    Ok(())
}

impl fmt::Display for ExpectedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_regex {
            write!(f, "re")?;
        }
        write_quoted(f, &self.text)
    }
}

impl fmt::Display for SeqHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_test {
            write!(f, "TEST ")?;
        }
        write!(f, "SEQ {}", self.name)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] COMMAND {}", self.offset, self.name)?;
        for arg in &self.args {
            write!(f, " ")?;
            write_quoted(f, arg)?;
        }
        Ok(())
    }
}

impl fmt::Display for ExpectEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expectation(
            f,
            &self.window,
            self.negated,
            "EVENT",
            &self.name,
            &self.expected,
        )
    }
}

impl fmt::Display for ExpectTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expectation(
            f,
            &self.window,
            self.negated,
            "TELEMETRY",
            &self.channel,
            &self.expected,
        )
    }
}

impl fmt::Display for Uplink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] UPLINK ", self.offset)?;
        write_quoted(f, &self.source)?;
        write!(f, " ")?;
        write_quoted(f, &self.destination)
    }
}

impl fmt::Display for RunSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] RUNSEQ {}", self.offset, self.name)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Header(header) => header.fmt(f),
            Instruction::Command(command) => command.fmt(f),
            Instruction::ExpectEvent(event) => event.fmt(f),
            Instruction::ExpectTelemetry(telemetry) => telemetry.fmt(f),
            Instruction::Uplink(uplink) => uplink.fmt(f),
            Instruction::RunSeq(runseq) => runseq.fmt(f),
            Instruction::Empty => Ok(()),
        }
    }
}

// sequences

/// A named sequence. While parsing it holds only the instructions written
/// directly beneath its header; once returned from parsing it has been
/// flattened and bounded and every offset is measured from its start.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sequence {
    pub name: String,
    pub is_test: bool,
    pub commands: Vec<Command>,
    pub events: Vec<ExpectEvent>,
    pub telemetry: Vec<ExpectTelemetry>,
    pub uplinks: Vec<Uplink>,
}

impl Sequence {
    pub fn new(name: &str, is_test: bool) -> Sequence {
        Sequence {
            name: name.to_string(),
            is_test,
            ..Default::default()
        }
    }

    /// Number of instructions held, of every kind.
    pub fn len(&self) -> usize {
        self.commands
            .len()
            + self
                .events
                .len()
            + self
                .telemetry
                .len()
            + self
                .uplinks
                .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The latest time mentioned by any instruction: command send times,
    /// window ends and uplink times. Open window ends do not count.
    pub fn duration(&self) -> u64 {
        let commands = self
            .commands
            .iter()
            .map(|command| command.offset);
        let events = self
            .events
            .iter()
            .filter_map(|event| {
                event
                    .window
                    .end_ms()
            });
        let telemetry = self
            .telemetry
            .iter()
            .filter_map(|telemetry| {
                telemetry
                    .window
                    .end_ms()
            });
        let uplinks = self
            .uplinks
            .iter()
            .map(|uplink| uplink.offset);

        commands
            .chain(events)
            .chain(telemetry)
            .chain(uplinks)
            .max()
            .unwrap_or(0)
    }

    pub fn ordered_commands(&self) -> Vec<&Command> {
        let mut commands: Vec<&Command> = self
            .commands
            .iter()
            .collect();
        commands.sort_by_key(|command| command.offset);
        commands
    }

    pub fn ordered_uplinks(&self) -> Vec<&Uplink> {
        let mut uplinks: Vec<&Uplink> = self
            .uplinks
            .iter()
            .collect();
        uplinks.sort_by_key(|uplink| uplink.offset);
        uplinks
    }

    /// Append every instruction of another sequence, moved later by `by`.
    /// Nothing is appended if any of the moved times would overflow.
    pub fn merge(&mut self, other: &Sequence, by: u64) -> Result<(), Overflow> {
        fn shifted<T: Timed + Clone>(items: &[T], by: u64) -> Result<Vec<T>, Overflow> {
            items
                .iter()
                .cloned()
                .map(|mut item| {
                    item.shift(by)?;
                    Ok(item)
                })
                .collect()
        }

        let commands = shifted(&other.commands, by)?;
        let events = shifted(&other.events, by)?;
        let telemetry = shifted(&other.telemetry, by)?;
        let uplinks = shifted(&other.uplinks, by)?;

        self.commands
            .extend(commands);
        self.events
            .extend(events);
        self.telemetry
            .extend(telemetry);
        self.uplinks
            .extend(uplinks);
        Ok(())
    }

    /// Close every open expectation window at the sequence's duration.
    pub fn bound(&mut self) {
        let duration = self.duration();

        for event in &mut self.events {
            if event.window.end == Bound::OpenEnded {
                event.window.end = Bound::Bounded(duration);
            }
        }
        for telemetry in &mut self.telemetry {
            if telemetry.window.end == Bound::OpenEnded {
                telemetry.window.end = Bound::Bounded(duration);
            }
        }
    }
}

/// Resolved sequences keyed by name, kept in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sequences(Vec<Sequence>);

impl Sequences {
    pub fn new() -> Sequences {
        Sequences(Vec::new())
    }

    /// Add a sequence. Redeclaring a name replaces the earlier sequence but
    /// keeps its place in the order.
    pub fn insert(&mut self, sequence: Sequence) {
        match self
            .0
            .iter_mut()
            .find(|existing| existing.name == sequence.name)
        {
            Some(existing) => *existing = sequence,
            None => self
                .0
                .push(sequence),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Sequence> {
        self.0
            .iter()
            .find(|sequence| sequence.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.0
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.0
            .is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .map(|sequence| sequence.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sequence> {
        self.0
            .iter()
    }

    /// Only the sequences declared with TEST.
    pub fn tests(&self) -> impl Iterator<Item = &Sequence> {
        self.0
            .iter()
            .filter(|sequence| sequence.is_test)
    }
}

impl IntoIterator for Sequences {
    type Item = Sequence;
    type IntoIter = std::vec::IntoIter<Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.0
            .into_iter()
    }
}

impl<'a> IntoIterator for &'a Sequences {
    type Item = &'a Sequence;
    type IntoIter = std::slice::Iter<'a, Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.0
            .iter()
    }
}
