//! Editing session
//!
//! Owns the document being edited and everything that acts on it: the
//! spellcheck highlighter, the file it came from, recent files and pasted
//! images. All document mutation goes through the session's `&mut self`,
//! which keeps a single writer even when clipboard requests run elsewhere.

use crate::clipboard::{ClipboardImage, ImageSource, PasteChannel, PasteEvent, SystemClipboard};
use crate::commands::{Action, Outcome};
use crate::config::EditorConfig;
use crate::dictionary::Dictionary;
use crate::document::Document;
use crate::error::Result;
use crate::format::Step;
use crate::spellcheck::Highlighter;
use crate::tags::{Family, ToggleTag};
use bukcore::RecentFiles;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

/// A pasted image laid over the text view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOverlay {
    pub x: i32,
    pub y: i32,
    pub image: ClipboardImage,
}

pub struct EditorSession {
    document: Document,
    highlighter: Highlighter,
    spellcheck: bool,
    indent_increment: u32,
    path: Option<PathBuf>,
    recent: RecentFiles,
    recent_path: Option<PathBuf>,
    paste: PasteChannel,
    image_source: Arc<dyn ImageSource>,
    overlays: Vec<ImageOverlay>,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("path", &self.path)
            .field("chars", &self.document.char_count())
            .field("spellcheck", &self.spellcheck)
            .field("overlays", &self.overlays.len())
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// New session with an empty document. `dictionary` is `None` when the
    /// dictionary failed to load; spellcheck then flags nothing.
    pub fn new(config: &EditorConfig, dictionary: Option<Arc<dyn Dictionary>>) -> Self {
        Self {
            document: Document::new().with_indent_increment(config.indent_increment),
            highlighter: Highlighter::new(dictionary),
            spellcheck: config.spellcheck,
            indent_increment: config.indent_increment,
            path: None,
            recent: RecentFiles::new(config.recent_files_max),
            recent_path: None,
            paste: PasteChannel::new(),
            image_source: Arc::new(SystemClipboard),
            overlays: Vec::new(),
        }
    }

    /// Read images from `source` instead of the system clipboard
    pub fn with_image_source(mut self, source: Arc<dyn ImageSource>) -> Self {
        self.image_source = source;
        self
    }

    /// Persist recent files at `path`, loading whatever is already there.
    pub fn with_recent_files(mut self, path: PathBuf) -> Self {
        let max = self.recent.max_entries;
        self.recent = RecentFiles::load(&path).unwrap_or_else(|_| RecentFiles::new(max));
        self.recent.max_entries = max;
        self.recent_path = Some(path);
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn recent_files(&self) -> &RecentFiles {
        &self.recent
    }

    pub fn overlays(&self) -> &[ImageOverlay] {
        &self.overlays
    }

    /// Title for display, with a trailing `*` when there are unsaved changes
    pub fn display_title(&self) -> String {
        let title = self
            .path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "untitled".to_string());

        if self.document.is_modified() {
            format!("{}*", title)
        } else {
            title
        }
    }

    /// Replace the whole text, dropping all formatting
    pub fn set_text(&mut self, text: &str) {
        self.document = Document::from_text(text).with_indent_increment(self.indent_increment);
        self.path = None;
        self.spellcheck_all();
    }

    pub fn insert_text(&mut self, pos: usize, text: &str) -> Range<usize> {
        let span = self.document.insert(pos, text);
        self.spellcheck_range(span.clone());
        span
    }

    pub fn delete_text(&mut self, start: usize, end: usize) {
        if let Some(removed) = self.document.remove(start, end) {
            self.spellcheck_range(removed.start..removed.start);
        }
    }

    fn spellcheck_all(&mut self) {
        if self.spellcheck {
            self.highlighter.rescan_all(&mut self.document);
        }
    }

    fn spellcheck_range(&mut self, range: Range<usize>) {
        if self.spellcheck {
            self.highlighter
                .rescan_range(&mut self.document, range.start, range.end);
        }
    }

    /// Words currently highlighted as misspelt
    pub fn misspelt_words(&self) -> Vec<(Range<usize>, String)> {
        self.document
            .toggle_ranges(ToggleTag::Misspelt)
            .into_iter()
            .map(|range| {
                let word = self.document.get_range(range.start, range.end);
                (range, word)
            })
            .collect()
    }

    /// Run a toolbar action against the selection `[start, end)`.
    pub fn execute(&mut self, action: Action, start: usize, end: usize) -> Result<Outcome> {
        match action {
            Action::Toggle(tag) => self.document.toggle_tag(tag, start, end),
            Action::Indent => self
                .document
                .step_ladder(Family::Indent, start, end, Step::Increase)?,
            Action::Unindent => self
                .document
                .step_ladder(Family::Indent, start, end, Step::Decrease)?,
            Action::Justify(value) => self.document.set_exclusive(value, start, end),
            Action::PasteImage => {
                self.request_paste();
            }
            Action::Quit => return Ok(Outcome::Quit),
        }
        debug!(action = action.id(), start, end, "executed action");
        Ok(Outcome::Continue)
    }

    /// Load `path`, replacing the current document. On failure the current
    /// document is left as it was.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let document = Document::open(path)?;
        self.document = document.with_indent_increment(self.indent_increment);
        self.path = Some(path.to_path_buf());
        self.spellcheck_all();
        self.remember(path);
        Ok(())
    }

    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        self.document.save(path)?;
        self.path = Some(path.to_path_buf());
        self.remember(path);
        Ok(())
    }

    fn remember(&mut self, path: &Path) {
        self.recent.add(path.to_path_buf());
        if let Some(recent_path) = &self.recent_path {
            if let Err(err) = self.recent.save(recent_path) {
                warn!(error = %err, "could not save recent files");
            }
        }
    }

    /// Ask the image source for an image; the result arrives through
    /// [`EditorSession::poll_pastes`].
    pub fn request_paste(&self) -> JoinHandle<()> {
        self.paste.request(Arc::clone(&self.image_source))
    }

    /// Apply paste results that have arrived. Returns how many images were added.
    pub fn poll_pastes(&mut self) -> usize {
        let mut added = 0;
        for event in self.paste.drain() {
            match event {
                PasteEvent::Image(image) => {
                    info!(width = image.width, height = image.height, "pasted image");
                    self.overlays.push(ImageOverlay { x: 0, y: 0, image });
                    added += 1;
                }
                PasteEvent::Empty => warn!("paste received no image"),
            }
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::WordList;
    use crate::error::Error;
    use crate::tags::Justification;

    struct OnePixel;

    impl ImageSource for OnePixel {
        fn image(&self) -> Option<ClipboardImage> {
            Some(ClipboardImage {
                width: 1,
                height: 1,
                rgba: vec![0, 0, 0, 255],
            })
        }
    }

    struct NoImage;

    impl ImageSource for NoImage {
        fn image(&self) -> Option<ClipboardImage> {
            None
        }
    }

    fn session(words: &[&str]) -> EditorSession {
        let dictionary: Arc<dyn Dictionary> = Arc::new(WordList::from_words(words.iter().copied()));
        EditorSession::new(&EditorConfig::default(), Some(dictionary))
    }

    #[test]
    fn test_typing_updates_highlight() {
        let mut session = session(&["hello", "world"]);
        session.insert_text(0, "hello wrld");
        assert_eq!(session.misspelt_words(), vec![(6..10, "wrld".to_string())]);

        session.insert_text(7, "o");
        assert!(session.misspelt_words().is_empty());

        session.delete_text(0, 1);
        assert_eq!(session.misspelt_words(), vec![(0..4, "ello".to_string())]);
    }

    #[test]
    fn test_execute_dispatches() {
        let mut session = session(&[]);
        session.set_text("format me");
        let bold = Action::from_id("bold").unwrap();
        assert_eq!(session.execute(bold, 0, 6).unwrap(), Outcome::Continue);
        assert!(session.document().has_toggle(ToggleTag::Bold, 0, 6));

        session.execute(Action::Indent, 0, 9).unwrap();
        session.execute(Action::Justify(Justification::Right), 0, 9).unwrap();
        assert_eq!(session.document().indent_at(3), 25);
        assert_eq!(session.document().justification_at(3), Some(Justification::Right));

        assert_eq!(session.execute(Action::Quit, 0, 0).unwrap(), Outcome::Quit);
    }

    #[test]
    fn test_open_failure_keeps_document() {
        let dir = tempfile::tempdir().unwrap();
        let corrupt = dir.path().join("corrupt.buk");
        std::fs::write(&corrupt, "{").unwrap();

        let mut session = session(&["keep"]);
        session.set_text("keep this");
        let err = session.open(&corrupt).unwrap_err();
        assert!(matches!(err, Error::Deserialize(_)));
        assert_eq!(session.document().text(), "keep this");
        assert_eq!(session.path(), None);
    }

    #[test]
    fn test_save_open_and_recent_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.buk");
        let recent = dir.path().join("recent.json");

        let mut session = session(&["good"]).with_recent_files(recent.clone());
        session.set_text("good bda");
        session.execute(Action::Toggle(ToggleTag::Italic), 0, 4).unwrap();
        assert_eq!(session.display_title(), "untitled*");

        session.save_as(&file).unwrap();
        assert_eq!(session.display_title(), "notes");

        let mut reopened = self::session(&["good"]).with_recent_files(recent);
        assert_eq!(reopened.recent_files().most_recent(), Some(file.as_path()));
        reopened.open(&file).unwrap();
        assert!(reopened.document().has_toggle(ToggleTag::Italic, 0, 4));
        assert_eq!(reopened.misspelt_words(), vec![(5..8, "bda".to_string())]);
    }

    #[test]
    fn test_paste_is_applied_on_poll() {
        let mut session = session(&[]).with_image_source(Arc::new(OnePixel));
        assert_eq!(session.execute(Action::PasteImage, 0, 0).unwrap(), Outcome::Continue);
        assert!(session.overlays().is_empty());

        session.request_paste().join().unwrap();
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        let mut added = 0;
        while added < 2 && std::time::Instant::now() < deadline {
            added += session.poll_pastes();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(added, 2);
        assert_eq!(session.overlays().len(), 2);
    }

    #[test]
    fn test_paste_without_image_changes_nothing() {
        let mut session = session(&[]).with_image_source(Arc::new(NoImage));
        session.request_paste().join().unwrap();
        assert_eq!(session.poll_pastes(), 0);
        assert!(session.overlays().is_empty());
    }

    #[test]
    fn test_spellcheck_disabled_by_config() {
        let config = EditorConfig {
            spellcheck: false,
            ..EditorConfig::default()
        };
        let dictionary: Arc<dyn Dictionary> = Arc::new(WordList::default());
        let mut session = EditorSession::new(&config, Some(dictionary));
        session.set_text("zzzz qqqq");
        assert!(session.misspelt_words().is_empty());
    }
}
