//! speech-history: bounded history of what a screen reader has spoken.
//!
//! A [`tap::SpeechTap`] wraps the host's speak entry point and records each
//! utterance into a [`history::HistoryStore`] owned by the
//! [`service::HistoryService`], which also answers review and copy commands.

pub mod clipboard;
pub mod config;
pub mod error;
pub mod feedback;
pub mod history;
pub mod list;
pub mod service;
pub mod tap;
pub mod utterance;

pub use config::{Config, HistoryConfig};
pub use error::{ConfigError, HistoryError, TapError};
pub use history::{Direction, HistoryStore, MoveResult, TrimPolicy};
pub use service::{Command, Event, HistoryService, QueueScheduler, ReviewState};
pub use tap::{Scheduler, SpeakEntryPoint, Speaker, SpeechTap, TappedSpeaker, Task};
pub use utterance::{SpeechCommand, SpeechItem, Utterance, SPEECH_ITEM_SEPARATOR};
