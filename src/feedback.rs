//! Audible feedback tones played through rodio.

use std::thread;
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{OutputStreamBuilder, Sink};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub hz: u32,
    pub ms: u64,
}

impl Tone {
    /// Navigation hit the oldest or newest entry.
    pub const BOUNDARY: Tone = Tone { hz: 200, ms: 100 };
    /// Current item copied.
    pub const COPIED: Tone = Tone { hz: 1500, ms: 120 };
    /// Item copied from the history list.
    pub const LIST_COPIED: Tone = Tone { hz: 1000, ms: 120 };
}

pub trait Feedback: Send {
    fn beep(&self, tone: Tone);
}

/// Plays tones on the default output device without blocking the caller.
pub struct ToneFeedback {
    enabled: bool,
}

impl ToneFeedback {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Feedback for ToneFeedback {
    fn beep(&self, tone: Tone) {
        if !self.enabled {
            return;
        }

        debug!("Beep {}Hz {}ms", tone.hz, tone.ms);

        thread::spawn(move || {
            // rodio 0.21: OutputStream is the handle, keep it alive until playback ends
            let stream = match OutputStreamBuilder::open_default_stream() {
                Ok(s) => s,
                Err(e) => {
                    warn!("Failed to open audio output: {e}");
                    return;
                }
            };
            let sink = Sink::connect_new(stream.mixer());
            sink.append(
                SineWave::new(tone.hz as f32)
                    .take_duration(Duration::from_millis(tone.ms))
                    .amplify(0.2),
            );
            sink.sleep_until_end();
        });
    }
}

/// Logs tones instead of playing them.
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn beep(&self, tone: Tone) {
        debug!("Beep suppressed ({}Hz {}ms)", tone.hz, tone.ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tones_are_distinct() {
        assert_ne!(Tone::BOUNDARY, Tone::COPIED);
        assert_ne!(Tone::COPIED, Tone::LIST_COPIED);
        assert!(Tone::BOUNDARY.hz < Tone::LIST_COPIED.hz);
    }

    #[test]
    fn test_disabled_tone_feedback_is_noop() {
        // Must not touch the audio device.
        ToneFeedback::new(false).beep(Tone::BOUNDARY);
        SilentFeedback.beep(Tone::COPIED);
    }
}
