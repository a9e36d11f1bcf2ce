//! Document transport format
//!
//! Documents are stored as a versioned JSON envelope holding the raw text and
//! every tag with its runs:
//!
//! ```json
//! { "version": 1, "text": "hi there", "tags": [{ "tag": { "toggle": "bold" }, "ranges": [[0, 2]] }] }
//! ```
//!
//! Loading validates everything before a [`Document`] is handed back, so a
//! failed open never leaves a half-built document behind.

use crate::document::Document;
use crate::error::{DeserializeError, Error, Result};
use crate::tags::{Family, TagKey};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    text: String,
    #[serde(default)]
    tags: Vec<TaggedRanges>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TaggedRanges {
    tag: TagKey,
    ranges: Vec<[usize; 2]>,
}

impl Document {
    /// Serialise text and tags
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let envelope = Envelope {
            version: FORMAT_VERSION,
            text: self.text(),
            tags: self
                .spans()
                .into_iter()
                .map(|(tag, ranges)| TaggedRanges {
                    tag,
                    ranges: ranges.into_iter().map(|r| [r.start, r.end]).collect(),
                })
                .collect(),
        };
        serde_json::to_vec_pretty(&envelope).map_err(Error::Serialize)
    }

    /// Rebuild a document from [`Document::to_bytes`] output.
    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, DeserializeError> {
        let envelope: Envelope = serde_json::from_slice(bytes)?;
        if envelope.version != FORMAT_VERSION {
            return Err(DeserializeError::UnsupportedVersion(envelope.version));
        }

        let mut doc = Document::from_text(&envelope.text);
        let len = doc.char_count();
        for entry in envelope.tags {
            if entry.tag == TagKey::Indent(0) {
                return Err(DeserializeError::InvalidTag(entry.tag.name()));
            }
            let id = doc.tags.get_or_create(entry.tag);
            let family = entry.tag.family();

            for [start, end] in entry.ranges {
                if start > end || end > len {
                    return Err(DeserializeError::RangeOutOfBounds {
                        tag: entry.tag.name(),
                        start,
                        end,
                        len,
                    });
                }
                if let Family::Toggle(_) = family {
                    doc.toggles.entry(id).or_default().insert(start..end);
                } else if let Some(map) = doc.exclusive_mut(family) {
                    if map.intersects(start..end) {
                        return Err(DeserializeError::Overlap {
                            family: family.name(),
                            start,
                            end,
                        });
                    }
                    map.assign(start..end, Some(id));
                }
            }
        }
        Ok(doc)
    }

    /// Write the document to `path` and clear its modified flag.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, &bytes).map_err(|source| Error::FileIo {
            path: path.to_path_buf(),
            source,
        })?;
        self.mark_saved();
        info!(path = %path.display(), bytes = bytes.len(), "saved document");
        Ok(())
    }

    /// Read a document saved with [`Document::save`].
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| Error::FileIo {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::from_bytes(&bytes)?;
        info!(path = %path.display(), chars = doc.char_count(), "opened document");
        Ok(doc)
    }
}
