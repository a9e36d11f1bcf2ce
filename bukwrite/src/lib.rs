//! Rich text core of the Buk editor
//!
//! A [`Document`] is a rope of text plus tagged ranges. The attribute tag
//! engine ([`format`]) toggles, steps and sets tags over selections; the
//! [`spellcheck`] highlighter keeps the `misspelt` tag in line with a
//! [`Dictionary`]. An [`EditorSession`] ties a document to its file,
//! spellchecker and clipboard for a presentation shell to drive.

pub mod clipboard;
pub mod commands;
pub mod config;
pub mod dictionary;
pub mod document;
pub mod error;
pub mod format;
pub mod ranges;
pub mod rtf;
pub mod session;
pub mod spellcheck;
pub mod tags;
pub mod transport;

pub use commands::{Action, Outcome};
pub use config::EditorConfig;
pub use dictionary::{Dictionary, DictionaryError, DictionaryHandle, Hunspell, WordList};
pub use document::Document;
pub use error::{DeserializeError, Error, Result};
pub use format::{CharFormat, Step};
pub use session::EditorSession;
pub use spellcheck::Highlighter;
pub use tags::{Family, Justification, TagId, TagKey, ToggleTag};
