use serde::Serialize;

/// Outcome of moving backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum BackOutcome {
    Moved(usize),
    /// Back was pressed on the first question; the caller leaves the session.
    Exit,
}

/// Current position within a question set of fixed length.
///
/// The index is always in `[0, len - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    index: usize,
    len: usize,
}

impl Navigation {
    /// `len` must be non-zero; a `QuestionSet` guarantees that.
    pub fn new(len: usize) -> Self {
        debug_assert!(len > 0, "navigation over an empty question set");
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.len
    }

    /// Advance one question. `current_answered` reports whether the question
    /// at the current index has an answer. Returns `None` without moving when
    /// it is unanswered or already the last one.
    pub fn go_next(&mut self, current_answered: bool) -> Option<usize> {
        if self.is_last() || !current_answered {
            return None;
        }
        self.index += 1;
        Some(self.index)
    }

    pub fn go_back(&mut self) -> BackOutcome {
        if self.index == 0 {
            BackOutcome::Exit
        } else {
            self.index -= 1;
            BackOutcome::Moved(self.index)
        }
    }

    /// Share of the set reached so far, counting the current question.
    pub fn progress_percent(&self) -> u32 {
        ((self.index + 1) * 100 / self.len.max(1)) as u32
    }
}
