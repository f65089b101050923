//! History service: the single consumer of the serialized event queue.
//!
//! Owns the history store, so deferred inserts, user commands and
//! reconfiguration all run one at a time in arrival order.
//!
//! IDLE → REVIEWING (previous/next) → IDLE (copy, or new speech recorded)

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::clipboard::Clipboard;
use crate::config::HistoryConfig;
use crate::error::ConfigError;
use crate::feedback::{Feedback, Tone};
use crate::history::{Direction, HistoryStore, TrimPolicy};
use crate::list::{HistoryList, ListAction, ListKey};
use crate::tap::{Scheduler, Speaker, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Idle,
    Reviewing,
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Reviewing => write!(f, "REVIEWING"),
        }
    }
}

/// User-facing commands, bound to gestures by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    CopyCurrent,
    Previous,
    Next,
    ShowList,
}

pub enum Event {
    Deferred(Task),
    /// `repeat` is 0 for a first press, >0 for a rapid repeat.
    Command { command: Command, repeat: u32 },
    ListKey(ListKey),
    Reconfigure(HistoryConfig),
    Shutdown,
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deferred(_) => write!(f, "Deferred(..)"),
            Self::Command { command, repeat } => f
                .debug_struct("Command")
                .field("command", command)
                .field("repeat", repeat)
                .finish(),
            Self::ListKey(key) => f.debug_tuple("ListKey").field(key).finish(),
            Self::Reconfigure(config) => f.debug_tuple("Reconfigure").field(config).finish(),
            Self::Shutdown => write!(f, "Shutdown"),
        }
    }
}

/// Scheduler backed by the service's event channel.
#[derive(Clone)]
pub struct QueueScheduler {
    tx: mpsc::UnboundedSender<Event>,
}

impl QueueScheduler {
    pub fn new(tx: mpsc::UnboundedSender<Event>) -> Self {
        Self { tx }
    }
}

impl Scheduler for QueueScheduler {
    fn defer(&self, task: Task) {
        if self.tx.send(Event::Deferred(task)).is_err() {
            debug!("History queue closed, dropping deferred task");
        }
    }
}

pub struct HistoryService {
    config: HistoryConfig,
    store: HistoryStore,
    state: ReviewState,
    list: Option<HistoryList>,
    speaker: Arc<dyn Speaker>,
    clipboard: Box<dyn Clipboard>,
    feedback: Box<dyn Feedback>,
}

impl HistoryService {
    /// `speaker` must be the unwrapped primitive so playback is not re-recorded.
    pub fn new(
        config: HistoryConfig,
        speaker: Arc<dyn Speaker>,
        clipboard: Box<dyn Clipboard>,
        feedback: Box<dyn Feedback>,
    ) -> Result<Self, ConfigError> {
        let store = HistoryStore::new(config.capacity()?);
        info!(
            "History ready (capacity: {}, trim: {})",
            store.capacity(),
            config.trim_policy()
        );

        Ok(Self {
            config,
            store,
            state: ReviewState::Idle,
            list: None,
            speaker,
            clipboard,
            feedback,
        })
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn state(&self) -> ReviewState {
        self.state
    }

    pub fn list(&self) -> Option<&HistoryList> {
        self.list.as_ref()
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Process events until shutdown or until every sender is gone.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Event>) -> Self {
        info!("History service running");

        while let Some(event) = rx.recv().await {
            if !self.handle(event) {
                break;
            }
        }

        info!("History service stopped ({} entries)", self.store.len());
        self
    }

    /// Handle one event. Returns false on shutdown.
    pub fn handle(&mut self, event: Event) -> bool {
        match event {
            Event::Deferred(task) => self.on_deferred(task),
            Event::Command { command, repeat } => self.on_command(command, repeat),
            Event::ListKey(key) => self.on_list_key(key),
            Event::Reconfigure(config) => {
                if let Err(e) = self.reconfigure(config) {
                    warn!("Rejected configuration: {e}");
                }
            }
            Event::Shutdown => return false,
        }
        true
    }

    fn on_deferred(&mut self, task: Task) {
        let before = self.store.len();
        task(&mut self.store);

        if self.state == ReviewState::Reviewing && self.store.cursor() == 0 {
            self.set_state(ReviewState::Idle);
        }
        if let Some(list) = self.list.as_mut() {
            list.refresh(&self.store);
        }
        debug!("Deferred task ran ({before} → {} entries)", self.store.len());
    }

    pub fn on_command(&mut self, command: Command, repeat: u32) {
        debug!("Command {command:?} (repeat {repeat})");
        match command {
            Command::Previous => self.navigate(Direction::Older),
            Command::Next => self.navigate(Direction::Newer),
            Command::CopyCurrent => self.copy_current(repeat),
            Command::ShowList => self.show_list(),
        }
    }

    fn navigate(&mut self, direction: Direction) {
        let moved = match self.store.move_cursor(direction) {
            Ok(moved) => moved,
            Err(e) => {
                debug!("Navigation ignored: {e}");
                self.feedback.beep(Tone::BOUNDARY);
                return;
            }
        };

        if moved.at_boundary {
            self.feedback.beep(Tone::BOUNDARY);
        }
        self.set_state(ReviewState::Reviewing);

        if let Ok(current) = self.store.current() {
            self.speaker.speak(current);
        }
    }

    fn copy_current(&mut self, repeat: u32) {
        let trim = if repeat > 0 {
            TrimPolicy::Both
        } else {
            self.config.trim_policy()
        };

        let text = match self.store.current_text(trim) {
            Ok(text) => text,
            Err(e) => {
                debug!("Copy ignored: {e}");
                return;
            }
        };

        if self.clipboard.copy(&text) {
            self.feedback.beep(Tone::COPIED);
        } else {
            warn!("Clipboard unavailable, history item not copied");
        }
        self.set_state(ReviewState::Idle);
    }

    fn show_list(&mut self) {
        if self.store.is_empty() {
            self.feedback.beep(Tone::BOUNDARY);
            return;
        }

        match self.list.as_mut() {
            Some(list) => list.refresh(&self.store),
            None => self.list = Some(HistoryList::from_store(&self.store)),
        }
        info!("History list open ({} entries)", self.store.len());
    }

    fn on_list_key(&mut self, key: ListKey) {
        let Some(list) = self.list.as_mut() else {
            debug!("List key {key:?} with no list open");
            return;
        };

        match list.handle_key(key) {
            ListAction::None => {}
            ListAction::Copy(text) => {
                if self.clipboard.copy(&text) {
                    self.feedback.beep(Tone::LIST_COPIED);
                    self.list = None;
                } else {
                    warn!("Clipboard unavailable, list item not copied");
                }
            }
            ListAction::Close => self.list = None,
        }
    }

    /// Apply new settings. A capacity change recreates the store.
    pub fn reconfigure(&mut self, config: HistoryConfig) -> Result<(), ConfigError> {
        let capacity = config.capacity()?;

        if capacity.get() != self.store.capacity() {
            info!(
                "History capacity {} → {}, recreating store",
                self.store.capacity(),
                capacity
            );
            self.store = HistoryStore::new(capacity);
            self.list = None;
            self.set_state(ReviewState::Idle);
        }

        self.config = config;
        Ok(())
    }

    fn set_state(&mut self, state: ReviewState) {
        if self.state != state {
            debug!("State: {} → {}", self.state, state);
            self.state = state;
        }
    }
}
