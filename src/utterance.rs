//! Utterances as delivered to the speak entry point.
//!
//! An utterance mixes plain text with opaque speech commands. Only the text
//! is shown or copied; commands are kept for playback, except focus-loss
//! cancellable markers, which are transient and never stored.

use serde::{Deserialize, Serialize};

/// Separator used to join text fragments for display and copying.
pub const SPEECH_ITEM_SEPARATOR: &str = "  ";

/// Non-text markers that travel alongside spoken text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SpeechCommand {
    /// Drops the rest of the utterance when focus moves. Never persisted.
    FocusLossCancellable,
    Break { ms: u32 },
    Pitch { offset: i32 },
    Rate { offset: i32 },
    Volume { offset: i32 },
    CharacterMode { on: bool },
    Index { index: u32 },
    Other { name: String },
}

impl SpeechCommand {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::FocusLossCancellable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpeechItem {
    Text(String),
    Command(SpeechCommand),
}

impl From<&str> for SpeechItem {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for SpeechItem {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<SpeechCommand> for SpeechItem {
    fn from(command: SpeechCommand) -> Self {
        Self::Command(command)
    }
}

/// One complete spoken unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Utterance {
    items: Vec<SpeechItem>,
}

impl Utterance {
    pub fn new(items: Vec<SpeechItem>) -> Self {
        Self { items }
    }

    /// Single-fragment utterance.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![SpeechItem::Text(text.into())])
    }

    pub fn items(&self) -> &[SpeechItem] {
        &self.items
    }

    pub fn text_fragments(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            SpeechItem::Text(text) => Some(text.as_str()),
            SpeechItem::Command(_) => None,
        })
    }

    pub fn display_text_with(&self, separator: &str) -> String {
        self.text_fragments().collect::<Vec<_>>().join(separator)
    }

    pub fn display_text(&self) -> String {
        self.display_text_with(SPEECH_ITEM_SEPARATOR)
    }

    /// Copy of this utterance with transient markers removed.
    pub fn without_transient(&self) -> Self {
        let items = self
            .items
            .iter()
            .filter(|item| !matches!(item, SpeechItem::Command(c) if c.is_transient()))
            .cloned()
            .collect();
        Self { items }
    }

    /// True when there is nothing worth keeping: no text, or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.text_fragments().all(|t| t.trim().is_empty())
    }
}

impl<I: Into<SpeechItem>> FromIterator<I> for Utterance {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}
