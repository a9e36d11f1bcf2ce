//! Shared plumbing for the Buk editor crates
//!
//! Storage locations, JSON persistence and logging setup live here so the
//! editor core stays free of platform concerns.

pub mod logging;
pub mod storage;

pub use storage::{RecentFiles, StorageError};
