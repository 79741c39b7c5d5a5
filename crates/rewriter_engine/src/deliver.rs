use std::io::Write;
use std::thread;
use std::time::Duration;

use rewriter_logging::{rw_error, rw_warn};
use thiserror::Error;

use crate::bridge::{PageBridge, PageInstruction};

#[derive(Debug, Error)]
pub enum DeliverError {
    #[error("no editable target has focus")]
    FocusLost,
    #[error("insertion failed: {0}")]
    Insert(String),
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

/// Platform capability used by the page delivery strategy.
pub trait TextSink {
    fn try_insert_at_focus(&mut self, text: &str) -> Result<(), DeliverError>;
    fn restore_focus(&mut self) -> Result<(), DeliverError>;
    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), DeliverError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub inserted: bool,
    pub copied: bool,
}

/// Insertion is best-effort with one focus-restore retry; the clipboard copy
/// always runs and is the reliable path. Failures are logged only and never
/// alter the published outcome.
pub fn deliver_text(sink: &mut dyn TextSink, text: &str, retry_delay: Duration) -> DeliveryReport {
    let inserted = match sink.try_insert_at_focus(text) {
        Ok(()) => true,
        Err(DeliverError::FocusLost) => retry_after_refocus(sink, text, retry_delay),
        Err(err) => {
            rw_warn!("Insertion failed: {}", err);
            false
        }
    };

    let copied = match sink.copy_to_clipboard(text) {
        Ok(()) => true,
        Err(err) => {
            rw_error!("Clipboard copy failed: {}", err);
            false
        }
    };

    DeliveryReport { inserted, copied }
}

fn retry_after_refocus(sink: &mut dyn TextSink, text: &str, retry_delay: Duration) -> bool {
    if let Err(err) = sink.restore_focus() {
        rw_warn!("Could not restore focus: {}", err);
        return false;
    }
    // Focus may need a moment to register before the retried insert.
    thread::sleep(retry_delay);
    match sink.try_insert_at_focus(text) {
        Ok(()) => true,
        Err(err) => {
            rw_warn!("Insertion retry failed: {}", err);
            false
        }
    }
}

/// Shipping sink: insertion goes through the page bridge, the clipboard is
/// the system clipboard.
pub struct DesktopSink<W: Write> {
    bridge: PageBridge<W>,
    clipboard: Option<arboard::Clipboard>,
}

impl<W: Write> DesktopSink<W> {
    pub fn new(out: W) -> Self {
        let clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                rw_warn!("System clipboard unavailable: {}", err);
                None
            }
        };
        Self {
            bridge: PageBridge::new(out),
            clipboard,
        }
    }
}

impl<W: Write> TextSink for DesktopSink<W> {
    fn try_insert_at_focus(&mut self, text: &str) -> Result<(), DeliverError> {
        self.bridge
            .send(&PageInstruction::ReplaceText {
                text: text.to_string(),
            })
            .map_err(|err| DeliverError::Insert(err.to_string()))
    }

    fn restore_focus(&mut self) -> Result<(), DeliverError> {
        // The page side owns focus tracking; nothing to restore here.
        Ok(())
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), DeliverError> {
        let clipboard = self
            .clipboard
            .as_mut()
            .ok_or_else(|| DeliverError::Clipboard("clipboard not initialized".to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|err| DeliverError::Clipboard(err.to_string()))
    }
}
