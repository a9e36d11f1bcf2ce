//! Clipboard image paste
//!
//! Reading an image from the system clipboard can block on the owning
//! process, so requests run on a worker thread and post a [`PasteEvent`] back
//! over a channel. Only the thread that owns the document drains the channel
//! and applies the result.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, warn};

/// Raw RGBA image taken from the clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardImage {
    pub width: usize,
    pub height: usize,
    /// Row-major RGBA8 pixels
    pub rgba: Vec<u8>,
}

/// Something that can be asked for an image
pub trait ImageSource: Send + Sync {
    /// The current image, or `None` when there is none.
    fn image(&self) -> Option<ClipboardImage>;
}

/// The platform clipboard
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ImageSource for SystemClipboard {
    fn image(&self) -> Option<ClipboardImage> {
        let mut clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => clipboard,
            Err(err) => {
                warn!(error = %err, "clipboard unavailable");
                return None;
            }
        };
        match clipboard.get_image() {
            Ok(image) => Some(ClipboardImage {
                width: image.width,
                height: image.height,
                rgba: image.bytes.into_owned(),
            }),
            Err(arboard::Error::ContentNotAvailable) => None,
            Err(err) => {
                warn!(error = %err, "could not read clipboard image");
                None
            }
        }
    }
}

/// Outcome of a paste request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteEvent {
    Image(ClipboardImage),
    /// The clipboard held no image
    Empty,
}

/// Channel carrying paste results back to the document thread
#[derive(Debug)]
pub struct PasteChannel {
    tx: Sender<PasteEvent>,
    rx: Receiver<PasteEvent>,
}

impl Default for PasteChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl PasteChannel {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// Ask `source` for an image on a worker thread.
    pub fn request(&self, source: Arc<dyn ImageSource>) -> JoinHandle<()> {
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let event = match source.image() {
                Some(image) => PasteEvent::Image(image),
                None => PasteEvent::Empty,
            };
            debug!(has_image = matches!(event, PasteEvent::Image(_)), "paste request resolved");
            // The receiver is gone once the session is dropped; nothing to deliver to.
            let _ = tx.send(event);
        })
    }

    /// Events that have arrived so far, without blocking
    pub fn drain(&self) -> Vec<PasteEvent> {
        self.rx.try_iter().collect()
    }
}
