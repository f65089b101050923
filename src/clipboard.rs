//! System clipboard access via arboard.

use tracing::{debug, warn};

pub trait Clipboard: Send {
    /// Place `text` on the clipboard. Returns false if the clipboard is unavailable.
    fn copy(&mut self, text: &str) -> bool;
}

/// Opens the system clipboard per copy, so an unavailable display server only
/// fails that copy.
#[derive(Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    fn set_text(text: &str) -> Result<(), String> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| format!("Failed to open clipboard: {e}"))?;
        clipboard
            .set_text(text)
            .map_err(|e| format!("Failed to set clipboard: {e}"))
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> bool {
        match Self::set_text(text) {
            Ok(()) => {
                debug!("Copied {} characters to clipboard", text.len());
                true
            }
            Err(e) => {
                warn!("{e}");
                false
            }
        }
    }
}
