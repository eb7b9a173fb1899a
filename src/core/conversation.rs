//! Bounded conversation history.
//!
//! The history holds only `user` and `assistant` turns and never grows past
//! its limit: every append and every limit change trims from the front.

use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;

use crate::core::error::SessionError;
use crate::core::message::Turn;

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Maximum number of turns kept in the history window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimit(NonZeroUsize);

impl HistoryLimit {
    pub fn new(limit: usize) -> Option<Self> {
        NonZeroUsize::new(limit).map(Self)
    }

    /// Parse a user-supplied limit; anything but a positive integer is rejected.
    pub fn parse(input: &str) -> Result<Self, SessionError> {
        input
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| SessionError::InvalidHistorySize(input.to_string()))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for HistoryLimit {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_HISTORY_LIMIT).unwrap_or(NonZeroUsize::MIN))
    }
}

impl fmt::Display for HistoryLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bookkeeping for the user turn whose reply has not arrived yet.
#[derive(Debug)]
struct PendingUserTurn {
    evicted: Vec<Turn>,
}

#[derive(Debug, Default)]
pub struct Conversation {
    history: VecDeque<Turn>,
    limit: HistoryLimit,
    pending: Option<PendingUserTurn>,
}

impl Conversation {
    pub fn new(limit: HistoryLimit) -> Self {
        Self {
            history: VecDeque::new(),
            limit,
            pending: None,
        }
    }

    pub fn limit(&self) -> HistoryLimit {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.history.iter()
    }

    /// The window sent to a backend, oldest first.
    pub fn context(&self) -> Vec<Turn> {
        self.history.iter().cloned().collect()
    }

    /// Append a user turn awaiting a reply and return a copy of it.
    pub fn append_user_turn(&mut self, text: impl Into<String>) -> Turn {
        let turn = Turn::user(text);
        self.history.push_back(turn.clone());
        let evicted = self.trim();
        self.pending = Some(PendingUserTurn { evicted });
        turn
    }

    pub fn append_assistant_turn(&mut self, text: impl Into<String>) -> Turn {
        let turn = Turn::assistant(text);
        self.history.push_back(turn.clone());
        self.pending = None;
        self.trim();
        turn
    }

    /// Undo the unanswered user turn of a failed call.
    ///
    /// Only acts when the newest turn is the user turn appended for the call
    /// in flight; turns it pushed out of the window are put back so the
    /// history is exactly as it was before the attempt. Returns whether a
    /// turn was removed.
    pub fn rollback_last_user_turn(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        if !self.history.back().is_some_and(Turn::is_user) {
            return false;
        }

        self.history.pop_back();
        for turn in pending.evicted.into_iter().rev() {
            self.history.push_front(turn);
        }
        true
    }

    /// Change the limit and immediately trim to it.
    pub fn set_history_limit(&mut self, limit: HistoryLimit) {
        self.limit = limit;
        self.pending = None;
        self.trim();
    }

    fn trim(&mut self) -> Vec<Turn> {
        let excess = self.history.len().saturating_sub(self.limit.get());
        self.history.drain(..excess).collect()
    }
}
