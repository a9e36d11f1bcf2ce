//! Editor settings
//!
//! Stored as JSON in the platform config directory. A missing file means
//! defaults; an unreadable one is logged and also falls back to defaults.

use bukcore::storage::{config_dir, load_or_default, write_json, StorageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "bukwrite";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Directory holding `<language>.aff` and `<language>.dic`
    pub dictionary_dir: PathBuf,
    pub language: String,
    /// Highlight misspelt words
    pub spellcheck: bool,
    /// Layout units per indent step
    pub indent_increment: u32,
    pub recent_files_max: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            dictionary_dir: PathBuf::from("res/hunspell-en_US"),
            language: "en_US".to_string(),
            spellcheck: true,
            indent_increment: crate::document::INDENT_INCREMENT,
            recent_files_max: 10,
        }
    }
}

impl EditorConfig {
    /// Default settings file location
    pub fn path() -> PathBuf {
        config_dir(APP_NAME).join("config.json")
    }

    /// Where the recent files list is kept
    pub fn recent_files_path() -> PathBuf {
        config_dir(APP_NAME).join("recent.json")
    }

    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Self {
        load_or_default(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), StorageError> {
        write_json(path, self)
    }
}
