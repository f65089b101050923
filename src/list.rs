//! History list view: a read-only snapshot of the history with a selection.
//!
//! Rendering belongs to the host. This holds the rows, newest-first, and
//! decides what a key press does.

use crate::history::HistoryStore;
use crate::utterance::Utterance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKey {
    Up,
    Down,
    Enter,
    Escape,
}

/// What the owner should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    None,
    /// Copy this text, then close the list if the copy succeeded.
    Copy(String),
    Close,
}

#[derive(Debug, Clone)]
pub struct HistoryList {
    rows: Vec<String>,
    selected: usize,
}

impl HistoryList {
    pub fn from_store(store: &HistoryStore) -> Self {
        Self {
            rows: store.iter().map(Utterance::display_text).collect(),
            selected: 0,
        }
    }

    /// Re-read the store, keeping the selection in range.
    pub fn refresh(&mut self, store: &HistoryStore) {
        self.rows = store.iter().map(Utterance::display_text).collect();
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.rows.get(self.selected).map(String::as_str)
    }

    pub fn handle_key(&mut self, key: ListKey) -> ListAction {
        match key {
            ListKey::Up => {
                self.selected = self.selected.saturating_sub(1);
                ListAction::None
            }
            ListKey::Down => {
                if self.selected + 1 < self.rows.len() {
                    self.selected += 1;
                }
                ListAction::None
            }
            ListKey::Enter => match self.selected_text() {
                Some(text) => ListAction::Copy(text.to_string()),
                None => ListAction::None,
            },
            ListKey::Escape => ListAction::Close,
        }
    }
}
