/// Absolute offsets of the currently open indentation scopes. The bottom
/// entry is the sequence start; entry `i` is the time of the instruction
/// that opened indentation level `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Scope {
    stack: Vec<u64>,
}

impl Scope {
    pub(crate) fn new() -> Scope {
        Scope { stack: vec![0] }
    }

    /// Offset of the innermost open scope.
    pub(crate) fn current(&self) -> u64 {
        match self
            .stack
            .last()
        {
            Some(offset) => *offset,
            None => 0,
        }
    }

    /// Number of open scopes, which is also the deepest indentation level
    /// an instruction may use next.
    pub(crate) fn depth(&self) -> usize {
        self.stack
            .len()
    }

    pub(crate) fn push(&mut self, offset: u64) {
        self.stack
            .push(offset);
    }

    /// Close every scope deeper than `level`. The sequence start is never
    /// closed.
    pub(crate) fn truncate(&mut self, level: usize) {
        self.stack
            .truncate(level.max(1));
    }

    pub(crate) fn reset(&mut self) {
        self.stack
            .clear();
        self.stack
            .push(0);
    }
}
