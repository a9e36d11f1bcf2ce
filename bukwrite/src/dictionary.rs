//! Dictionary service
//!
//! The spellchecker only needs a word-validity oracle. [`Hunspell`] loads a
//! Hunspell dictionary (`<lang>.aff` affix rules plus the `<lang>.dic` stem
//! list) through `spellbook`, so inflected forms like "tested" or "worlds"
//! are accepted from their stems. [`WordList`] is a fixed in-memory list for
//! small vocabularies.
//!
//! A [`DictionaryHandle`] is created once at startup and released at
//! shutdown; documents only ever see the shared [`Dictionary`] behind it.

use crate::error::Result;
use crate::spellcheck::words;
use std::collections::HashSet;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("dictionary file missing: {}", .0.display())]
    Missing(PathBuf),
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dictionary {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

/// Word-validity oracle
pub trait Dictionary: Send + Sync {
    /// Whether `word` is spelled correctly.
    fn is_valid(&self, word: &str) -> bool;

    /// Char ranges of the misspelt words in `text`.
    fn misspellings(&self, text: &str) -> Vec<Range<usize>> {
        words(text)
            .filter(|word| !self.is_valid(word.text))
            .map(|word| word.span())
            .collect()
    }
}

/// Curly apostrophes become straight ones and edge apostrophes are dropped,
/// so quoted words look up the same as bare ones.
fn normalise(word: &str) -> String {
    word.replace('\u{2019}', "'").trim_matches('\'').to_string()
}

/// A Hunspell affix + word list dictionary
pub struct Hunspell {
    inner: spellbook::Dictionary,
}

impl std::fmt::Debug for Hunspell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hunspell").finish_non_exhaustive()
    }
}

impl Hunspell {
    /// Build from the contents of an `.aff` and a `.dic` file.
    pub fn from_sources(aff: &str, dic: &str) -> std::result::Result<Self, String> {
        spellbook::Dictionary::new(aff, dic)
            .map(|inner| Self { inner })
            .map_err(|err| err.to_string())
    }

    /// Load an `.aff`/`.dic` pair from disk.
    pub fn load(aff: &Path, dic: &Path) -> std::result::Result<Self, DictionaryError> {
        let read = |path: &Path| {
            if !path.exists() {
                return Err(DictionaryError::Missing(path.to_path_buf()));
            }
            std::fs::read_to_string(path).map_err(|source| DictionaryError::Read {
                path: path.to_path_buf(),
                source,
            })
        };
        let aff_text = read(aff)?;
        let dic_text = read(dic)?;

        let dictionary =
            Self::from_sources(&aff_text, &dic_text).map_err(|message| DictionaryError::Parse {
                path: dic.to_path_buf(),
                message,
            })?;
        debug!(aff = %aff.display(), dic = %dic.display(), "loaded hunspell dictionary");
        Ok(dictionary)
    }
}

impl Dictionary for Hunspell {
    fn is_valid(&self, word: &str) -> bool {
        let word = normalise(word);
        word.is_empty() || self.inner.check(&word)
    }
}

/// A flat set of known words, matched without affix rules
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for WordList {
    /// Exact matches are valid. A capitalised or all-caps word is also valid
    /// when its lowercase form is listed ("The", "THE" for "the").
    fn is_valid(&self, word: &str) -> bool {
        let word = normalise(word);
        if word.is_empty() || self.words.contains(&word) {
            return true;
        }
        if !word.chars().any(char::is_uppercase) {
            return false;
        }
        let mut chars = word.chars();
        let capitalised =
            chars.next().map_or(false, char::is_uppercase) && chars.all(|c| !c.is_uppercase());
        let shouting = word.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase);
        if !(capitalised || shouting) {
            return false;
        }
        let lower = word.to_lowercase();
        if self.words.contains(&lower) {
            return true;
        }
        // "HELLO" for a listed "Hello"
        if shouting {
            let mut lower_chars = lower.chars();
            if let Some(first) = lower_chars.next() {
                let title: String = first.to_uppercase().chain(lower_chars).collect();
                return self.words.contains(&title);
            }
        }
        false
    }
}

/// Process-wide dictionary, alive between [`DictionaryHandle::init`] and
/// [`DictionaryHandle::deinit`].
#[derive(Clone)]
pub struct DictionaryHandle {
    language: String,
    dictionary: Arc<dyn Dictionary>,
}

impl std::fmt::Debug for DictionaryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DictionaryHandle")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl DictionaryHandle {
    /// Load the `language` Hunspell dictionary from `dir`.
    pub fn init(dir: &Path, language: &str) -> Result<Self> {
        info!(language, dir = %dir.display(), "initialising spellchecker");
        let aff = dir.join(format!("{language}.aff"));
        let dic = dir.join(format!("{language}.dic"));
        let dictionary = Hunspell::load(&aff, &dic)?;
        Ok(Self::from_dictionary(language, Arc::new(dictionary)))
    }

    /// Wrap an already-built dictionary
    pub fn from_dictionary(language: &str, dictionary: Arc<dyn Dictionary>) -> Self {
        Self {
            language: language.to_string(),
            dictionary,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_valid(&self, word: &str) -> bool {
        self.dictionary.is_valid(word)
    }

    /// Shared dictionary for highlighters
    pub fn shared(&self) -> Arc<dyn Dictionary> {
        Arc::clone(&self.dictionary)
    }

    pub fn deinit(self) {
        info!(language = %self.language, "deinitialising spellchecker");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const AFF: &str = "SET UTF-8\n\
        \n\
        SFX S Y 1\n\
        SFX S 0 s .\n\
        \n\
        SFX D Y 1\n\
        SFX D 0 ed .\n\
        \n\
        SFX G Y 1\n\
        SFX G 0 ing .\n";

    const DIC: &str = "4\nrun/S\nworld/S\ntest/DGS\nthe\n";

    fn write_pair(dir: &Path, language: &str) {
        std::fs::write(dir.join(format!("{language}.aff")), AFF).unwrap();
        std::fs::write(dir.join(format!("{language}.dic")), DIC).unwrap();
    }

    #[test]
    fn test_affix_forms_are_valid() {
        let dictionary = Hunspell::from_sources(AFF, DIC).unwrap();
        for word in ["run", "runs", "worlds", "test", "tests", "tested", "testing"] {
            assert!(dictionary.is_valid(word), "{word}");
        }
        for word in ["runned", "worlding", "tst"] {
            assert!(!dictionary.is_valid(word), "{word}");
        }
    }

    #[test]
    fn test_hunspell_normalises_apostrophes() {
        let dictionary = Hunspell::from_sources(AFF, DIC).unwrap();
        assert!(dictionary.is_valid("\u{2019}tests\u{2019}"));
        assert!(dictionary.is_valid("'"));
    }

    #[test]
    fn test_inflected_text_has_no_misspellings() {
        let dictionary = Hunspell::from_sources(AFF, DIC).unwrap();
        assert!(dictionary.misspellings("the worlds runs tested").is_empty());
        assert_eq!(dictionary.misspellings("the wrolds runs"), vec![4..10]);
    }

    #[test]
    fn test_word_list_case_rules() {
        let list = WordList::from_words(["the", "Paris", "don't"]);
        assert!(list.is_valid("The"));
        assert!(list.is_valid("THE"));
        assert!(!list.is_valid("tHe"));
        assert!(list.is_valid("Paris"));
        assert!(list.is_valid("PARIS"));
        assert!(!list.is_valid("paris"));
        assert!(list.is_valid("don\u{2019}t"));
    }

    #[test]
    fn test_misspellings_reports_char_ranges() {
        let list = WordList::from_words(["Hello", "world"]);
        assert_eq!(list.misspellings("Helo wrold, world"), vec![0..4, 5..10]);
    }

    #[test]
    fn test_init_requires_both_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en_US.dic"), DIC).unwrap();

        let err = DictionaryHandle::init(dir.path(), "en_US").unwrap_err();
        assert!(matches!(
            err,
            Error::DictionaryUnavailable(DictionaryError::Missing(path))
                if path.ends_with("en_US.aff")
        ));

        write_pair(dir.path(), "en_US");
        let handle = DictionaryHandle::init(dir.path(), "en_US").unwrap();
        assert!(handle.is_valid("testing"));
        assert!(!handle.is_valid("tsting"));
        assert_eq!(handle.language(), "en_US");
        handle.deinit();
    }

    #[test]
    fn test_init_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = DictionaryHandle::init(&dir.path().join("nowhere"), "xx").unwrap_err();
        assert!(matches!(err, Error::DictionaryUnavailable(DictionaryError::Missing(_))));
    }
}
