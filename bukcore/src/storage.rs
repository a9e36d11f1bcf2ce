//! Storage utilities for Buk
//!
//! Handles config locations, JSON persistence and recent files.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("File not found: {0}")]
    NotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Read a JSON value from `path`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(StorageError::NotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write `value` as pretty JSON, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let contents = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}

/// Load a JSON value, falling back to `T::default()` when the file is
/// missing or unreadable. Corrupt files are logged, not fatal.
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match read_json(path) {
        Ok(value) => value,
        Err(StorageError::NotFound(_)) => T::default(),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "ignoring unreadable settings file"
            );
            T::default()
        }
    }
}

/// Recent files tracking
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecentFiles {
    pub files: Vec<PathBuf>,
    pub max_entries: usize,
}

impl RecentFiles {
    pub fn new(max_entries: usize) -> Self {
        Self {
            files: Vec::new(),
            max_entries,
        }
    }

    pub fn add(&mut self, path: PathBuf) {
        self.files.retain(|p| p != &path);
        self.files.insert(0, path);
        self.files.truncate(self.max_entries);
    }

    pub fn most_recent(&self) -> Option<&Path> {
        self.files.first().map(PathBuf::as_path)
    }

    pub fn load(config_path: &Path) -> Result<Self> {
        read_json(config_path)
    }

    pub fn save(&self, config_path: &Path) -> Result<()> {
        write_json(config_path, self)
    }
}

/// Get the config directory for a Buk application
pub fn config_dir(app_name: &str) -> PathBuf {
    directories::ProjectDirs::from("in", "buk", app_name)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
