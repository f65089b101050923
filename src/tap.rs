//! Speech tap: records every utterance passing through the speak entry point.
//!
//! The tap forwards each call to the original primitive before doing anything
//! else, then hands the history insert to a [`Scheduler`] so the speech path
//! never waits on bookkeeping.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::error::TapError;
use crate::history::HistoryStore;
use crate::utterance::Utterance;

/// The host's speak primitive.
pub trait Speaker: Send + Sync {
    fn speak(&self, utterance: &Utterance);
}

/// Deferred unit of work against the history, run on the serialized queue.
pub type Task = Box<dyn FnOnce(&mut HistoryStore) + Send + 'static>;

/// The host's single-consumer FIFO queue.
pub trait Scheduler: Send + Sync {
    fn defer(&self, task: Task);
}

/// Decorator around a speak primitive that also records what was spoken.
pub struct TappedSpeaker {
    original: Arc<dyn Speaker>,
    scheduler: Arc<dyn Scheduler>,
}

impl TappedSpeaker {
    pub fn new(original: Arc<dyn Speaker>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            original,
            scheduler,
        }
    }

    pub fn original(&self) -> &Arc<dyn Speaker> {
        &self.original
    }
}

impl Speaker for TappedSpeaker {
    fn speak(&self, utterance: &Utterance) {
        self.original.speak(utterance);

        let filtered = utterance.without_transient();
        if filtered.is_blank() {
            return;
        }
        self.scheduler.defer(Box::new(move |store| store.push(filtered)));
    }
}

struct EntrySlot {
    current: Arc<dyn Speaker>,
    tapped: bool,
}

/// The host's replaceable speak entry point.
///
/// Speech producers call [`SpeakEntryPoint::speak`]; whatever primitive is
/// installed at the time handles it.
pub struct SpeakEntryPoint {
    slot: RwLock<EntrySlot>,
}

impl SpeakEntryPoint {
    pub fn new(primitive: Arc<dyn Speaker>) -> Arc<Self> {
        Arc::new(Self {
            slot: RwLock::new(EntrySlot {
                current: primitive,
                tapped: false,
            }),
        })
    }

    pub fn speak(&self, utterance: &Utterance) {
        // Clone out so the lock is not held across the speak call.
        let speaker = Arc::clone(&self.slot.read().expect("speak slot poisoned").current);
        speaker.speak(utterance);
    }

    pub fn is_tapped(&self) -> bool {
        self.slot.read().expect("speak slot poisoned").tapped
    }
}

/// An installed tap. Restores the original primitive on uninstall or drop.
pub struct SpeechTap {
    entry: Arc<SpeakEntryPoint>,
    original: Arc<dyn Speaker>,
    installed: bool,
}

impl SpeechTap {
    /// Wrap the live primitive. Fails if a tap is already in place.
    pub fn install(
        entry: &Arc<SpeakEntryPoint>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<Self, TapError> {
        let mut slot = entry.slot.write().expect("speak slot poisoned");
        if slot.tapped {
            return Err(TapError::AlreadyInstalled);
        }

        let original = Arc::clone(&slot.current);
        slot.current = Arc::new(TappedSpeaker::new(Arc::clone(&original), scheduler));
        slot.tapped = true;
        info!("Speech tap installed");

        Ok(Self {
            entry: Arc::clone(entry),
            original,
            installed: true,
        })
    }

    /// The unwrapped primitive, for playback that must not be recorded.
    pub fn original(&self) -> Arc<dyn Speaker> {
        Arc::clone(&self.original)
    }

    pub fn uninstall(mut self) {
        self.restore();
    }

    fn restore(&mut self) {
        if !self.installed {
            return;
        }
        // Runs from Drop, so recover a poisoned slot rather than panic.
        let mut slot = self
            .entry
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        slot.current = Arc::clone(&self.original);
        slot.tapped = false;
        self.installed = false;
        debug!("Speech tap removed, original speak restored");
    }
}

impl Drop for SpeechTap {
    fn drop(&mut self) {
        self.restore();
    }
}
