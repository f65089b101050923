//! Bounded in-memory speech history with a review cursor.
//!
//! Entries are kept newest-first. Index 0 is the most recent utterance and
//! the cursor snaps back to it whenever something new is recorded.

use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, HistoryError};
use crate::utterance::Utterance;

/// Whitespace stripping applied when text leaves the history (copying).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrimPolicy {
    #[default]
    None,
    Left,
    Right,
    Both,
}

impl TrimPolicy {
    pub fn apply<'a>(&self, text: &'a str) -> &'a str {
        match self {
            Self::None => text,
            Self::Left => text.trim_start(),
            Self::Right => text.trim_end(),
            Self::Both => text.trim(),
        }
    }

    /// Build a policy from the legacy start/end boolean pair.
    pub fn from_flags(start: bool, end: bool) -> Self {
        match (start, end) {
            (false, false) => Self::None,
            (true, false) => Self::Left,
            (false, true) => Self::Right,
            (true, true) => Self::Both,
        }
    }
}

impl fmt::Display for TrimPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// Review direction. Older moves away from the newest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Older,
    Newer,
}

impl Direction {
    fn delta(self) -> isize {
        match self {
            Self::Older => 1,
            Self::Newer => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    /// Cursor position after the attempt.
    pub index: usize,
    /// The move would have left the history; the cursor did not change.
    pub at_boundary: bool,
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: VecDeque<Utterance>,
    capacity: NonZeroUsize,
    cursor: usize,
}

impl HistoryStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.get().min(1024)),
            capacity,
            cursor: 0,
        }
    }

    /// Like [`HistoryStore::new`], rejecting a zero capacity.
    pub fn with_capacity(capacity: usize) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(ConfigError::InvalidCapacity {
            value: capacity,
            min: 1,
            max: usize::MAX,
        })?;
        Ok(Self::new(capacity))
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Record an utterance as the newest entry and re-anchor the cursor on it.
    pub fn push(&mut self, utterance: Utterance) {
        self.entries.push_front(utterance);
        if self.entries.len() > self.capacity.get() {
            self.entries.pop_back();
        }
        self.cursor = 0;
        debug!("History: {} of {} entries", self.entries.len(), self.capacity);
    }

    pub fn move_cursor(&mut self, direction: Direction) -> Result<MoveResult, HistoryError> {
        if self.entries.is_empty() {
            return Err(HistoryError::Empty);
        }

        let target = self
            .cursor
            .checked_add_signed(direction.delta())
            .filter(|&index| index < self.entries.len());

        match target {
            Some(index) => {
                self.cursor = index;
                Ok(MoveResult {
                    index,
                    at_boundary: false,
                })
            }
            None => Ok(MoveResult {
                index: self.cursor,
                at_boundary: true,
            }),
        }
    }

    pub fn current(&self) -> Result<&Utterance, HistoryError> {
        self.entries.get(self.cursor).ok_or(HistoryError::Empty)
    }

    pub fn current_text(&self, trim: TrimPolicy) -> Result<String, HistoryError> {
        let text = self.current()?.display_text();
        Ok(trim.apply(&text).to_string())
    }

    pub fn get(&self, index: usize) -> Option<&Utterance> {
        self.entries.get(index)
    }

    /// Entries newest-first.
    pub fn iter(&self) -> impl Iterator<Item = &Utterance> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(capacity: usize) -> HistoryStore {
        HistoryStore::with_capacity(capacity).unwrap()
    }

    fn texts(store: &HistoryStore) -> Vec<String> {
        store.iter().map(Utterance::display_text).collect()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            HistoryStore::with_capacity(0),
            Err(ConfigError::InvalidCapacity { value: 0, .. })
        ));
    }

    #[test]
    fn test_len_never_exceeds_capacity() {
        let mut history = store(4);
        for i in 0..20 {
            history.push(Utterance::text(format!("item {i}")));
            assert!(history.len() <= history.capacity());
        }
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn test_eviction_keeps_newest_first() {
        let mut history = store(3);
        for text in ["a", "b", "c", "d"] {
            history.push(Utterance::text(text));
        }
        assert_eq!(texts(&history), ["d", "c", "b"]);
    }

    #[test]
    fn test_overflow_keeps_last_capacity_pushes() {
        let mut history = store(5);
        for i in 0..12 {
            history.push(Utterance::text(i.to_string()));
        }
        assert_eq!(texts(&history), ["11", "10", "9", "8", "7"]);
    }

    #[test]
    fn test_push_resets_cursor() {
        let mut history = store(10);
        for text in ["a", "b", "c"] {
            history.push(Utterance::text(text));
        }
        history.move_cursor(Direction::Older).unwrap();
        history.move_cursor(Direction::Older).unwrap();
        assert_eq!(history.cursor(), 2);

        history.push(Utterance::text("d"));
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_move_past_oldest_is_boundary() {
        let mut history = store(10);
        history.push(Utterance::text("a"));
        history.push(Utterance::text("b"));

        assert_eq!(
            history.move_cursor(Direction::Older),
            Ok(MoveResult {
                index: 1,
                at_boundary: false
            })
        );
        assert_eq!(
            history.move_cursor(Direction::Older),
            Ok(MoveResult {
                index: 1,
                at_boundary: true
            })
        );
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn test_move_past_newest_is_boundary() {
        let mut history = store(10);
        history.push(Utterance::text("a"));

        let result = history.move_cursor(Direction::Newer).unwrap();
        assert!(result.at_boundary);
        assert_eq!(result.index, 0);
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_navigation_on_empty_fails() {
        let mut history = store(10);
        assert_eq!(history.move_cursor(Direction::Older), Err(HistoryError::Empty));
        assert_eq!(history.current(), Err(HistoryError::Empty));
        assert_eq!(history.current_text(TrimPolicy::None), Err(HistoryError::Empty));
    }

    #[test]
    fn test_current_text_trim_policies() {
        let mut history = store(10);
        history.push(Utterance::text("  hello world  "));

        assert_eq!(history.current_text(TrimPolicy::Both).unwrap(), "hello world");
        assert_eq!(history.current_text(TrimPolicy::None).unwrap(), "  hello world  ");
        assert_eq!(history.current_text(TrimPolicy::Left).unwrap(), "hello world  ");
        assert_eq!(history.current_text(TrimPolicy::Right).unwrap(), "  hello world");
    }

    #[test]
    fn test_new_utterance_during_review_reanchors() {
        let mut history = store(10);
        for text in ["a", "b", "c", "d"] {
            history.push(Utterance::text(text));
        }
        history.move_cursor(Direction::Older).unwrap();
        history.move_cursor(Direction::Older).unwrap();
        assert_eq!(history.current().unwrap().display_text(), "b");

        history.push(Utterance::text("e"));
        history.move_cursor(Direction::Older).unwrap();
        assert_eq!(history.current().unwrap().display_text(), "d");
    }

    #[test]
    fn test_trim_policy_from_flags() {
        assert_eq!(TrimPolicy::from_flags(false, false), TrimPolicy::None);
        assert_eq!(TrimPolicy::from_flags(true, false), TrimPolicy::Left);
        assert_eq!(TrimPolicy::from_flags(false, true), TrimPolicy::Right);
        assert_eq!(TrimPolicy::from_flags(true, true), TrimPolicy::Both);
    }

    #[test]
    fn test_clear() {
        let mut history = store(2);
        history.push(Utterance::text("a"));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.cursor(), 0);
    }
}
