//! Spellcheck highlighting
//!
//! Words are found with the Unicode word-break rules (UAX #29), so
//! apostrophes between letters stay inside a word ("don't") while hyphens
//! and other punctuation split words. Tokens without a letter, such as
//! numbers, are never checked.
//!
//! A rescan clears the `misspelt` tag across its window and re-applies it to
//! each word the dictionary rejects, so the highlight is always a function of
//! the current text and dictionary.

use crate::dictionary::Dictionary;
use crate::document::Document;
use crate::tags::ToggleTag;
use std::ops::Range;
use std::sync::Arc;
use tracing::{trace, warn};
use unicode_segmentation::UnicodeSegmentation;

/// A word located in some text, by char offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

impl Word<'_> {
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Checkable words of `text`, in order.
pub fn words(text: &str) -> impl Iterator<Item = Word<'_>> {
    let mut chars_before = 0;
    let mut bytes_before = 0;
    text.unicode_word_indices().filter_map(move |(byte, word)| {
        chars_before += text[bytes_before..byte].chars().count();
        let start = chars_before;
        let len = word.chars().count();
        chars_before += len;
        bytes_before = byte + word.len();

        word.chars().any(char::is_alphabetic).then_some(Word {
            start,
            end: start + len,
            text: word,
        })
    })
}

/// Widen `[start, end)` outwards to the surrounding whitespace, so that every
/// word touching the range lies wholly inside the result.
pub fn word_window(doc: &Document, start: usize, end: usize) -> Range<usize> {
    let len = doc.char_count();
    let mut start = start.min(len);
    let mut end = end.clamp(start, len);

    let mut back = doc.content().chars_at(start);
    while let Some(c) = back.prev() {
        if c.is_whitespace() {
            break;
        }
        start -= 1;
    }
    for c in doc.content().chars_at(end) {
        if c.is_whitespace() {
            break;
        }
        end += 1;
    }
    start..end
}

/// Keeps the `misspelt` tag of a document in line with a dictionary.
///
/// Without a dictionary every word counts as valid and a single warning is
/// logged.
pub struct Highlighter {
    dictionary: Option<Arc<dyn Dictionary>>,
    warned: bool,
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("available", &self.is_available())
            .field("warned", &self.warned)
            .finish()
    }
}

impl Highlighter {
    pub fn new(dictionary: Option<Arc<dyn Dictionary>>) -> Self {
        Self {
            dictionary,
            warned: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.dictionary.is_some()
    }

    /// Recheck every word in the document. Returns the number of misspelt words.
    pub fn rescan_all(&mut self, doc: &mut Document) -> usize {
        let window = 0..doc.char_count();
        self.rescan_window(doc, window)
    }

    /// Recheck the words touching `[start, end)`, typically the span of an edit.
    pub fn rescan_range(&mut self, doc: &mut Document, start: usize, end: usize) -> usize {
        let window = word_window(doc, start, end);
        self.rescan_window(doc, window)
    }

    fn rescan_window(&mut self, doc: &mut Document, window: Range<usize>) -> usize {
        if window.is_empty() {
            return 0;
        }
        let text = doc.get_range(window.start, window.end);
        doc.remove_tag(ToggleTag::Misspelt, window.start, window.end);

        let mut flagged = 0;
        for word in words(&text) {
            if !self.check(word.text) {
                doc.apply_tag(
                    ToggleTag::Misspelt,
                    window.start + word.start,
                    window.start + word.end,
                );
                flagged += 1;
            }
        }
        trace!(start = window.start, end = window.end, flagged, "spellcheck pass");
        flagged
    }

    fn check(&mut self, word: &str) -> bool {
        match &self.dictionary {
            Some(dictionary) => dictionary.is_valid(word),
            None => {
                if !self.warned {
                    warn!("spellchecker was not initialised, no words will be flagged");
                    self.warned = true;
                }
                true
            }
        }
    }
}
