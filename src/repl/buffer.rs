pub const TERMINATOR: char = ';';
pub const PRIMARY_PROMPT: &str = ">>> ";
pub const CONTINUATION_PROMPT: &str = "... ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    Idle,
    Accumulating,
}

/// A statement assembled from one or more input lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedStatement {
    /// Joined input including the terminator, as it goes into history.
    pub raw: String,
    /// Joined input with the terminator removed.
    pub statement: String,
}

/// Collects input lines until one ends with `;`.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<String>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BufferState {
        if self.pending.is_empty() {
            BufferState::Idle
        } else {
            BufferState::Accumulating
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self.state() {
            BufferState::Idle => PRIMARY_PROMPT,
            BufferState::Accumulating => CONTINUATION_PROMPT,
        }
    }

    /// Feeds one line. Returns the finished statement once a line ends with
    /// the terminator; blank lines are ignored in every state.
    pub fn push(&mut self, line: &str) -> Option<CompletedStatement> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        self.pending.push(line.to_string());
        if !line.ends_with(TERMINATOR) {
            return None;
        }

        let raw = self.pending.join(" ");
        self.pending.clear();

        let statement = raw.trim_end_matches(TERMINATOR).trim_end().to_string();
        if statement.is_empty() {
            return None;
        }
        Some(CompletedStatement { raw, statement })
    }

    /// Drops any unterminated input, returning how many lines were pending.
    pub fn discard(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
}
