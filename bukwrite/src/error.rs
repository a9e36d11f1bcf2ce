//! Error types for the editor core

use crate::dictionary::DictionaryError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A command named a tag family the registry does not know, or one the
    /// command cannot operate on.
    #[error("unknown tag family `{0}`")]
    UnknownTagFamily(String),
    #[error("dictionary unavailable: {0}")]
    DictionaryUnavailable(#[from] DictionaryError),
    #[error("could not access {}: {source}", .path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not serialise document: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("could not read document: {0}")]
    Deserialize(#[from] DeserializeError),
}

/// Reasons a transported document is rejected
#[derive(Error, Debug)]
pub enum DeserializeError {
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported document version {0}")]
    UnsupportedVersion(u32),
    #[error("range {start}..{end} of `{tag}` lies outside the text ({len} chars)")]
    RangeOutOfBounds {
        tag: String,
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("tag `{0}` cannot be stored")]
    InvalidTag(String),
    #[error("overlapping `{family}` ranges at {start}..{end}")]
    Overlap {
        family: &'static str,
        start: usize,
        end: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
