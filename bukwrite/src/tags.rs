//! Style tags and the tag registry
//!
//! A [`TagKey`] names a formatting attribute by family and parameter. The
//! [`TagTable`] hands out stable [`TagId`]s for keys, creating indent levels
//! lazily as they are first needed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Paragraph justification values. Mutually exclusive at any position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Justification {
    Left,
    Right,
    Center,
    Fill,
}

impl Justification {
    pub const ALL: [Justification; 4] = [Self::Left, Self::Right, Self::Center, Self::Fill];

    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
            Self::Fill => "fill",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|j| j.name() == name)
    }
}

/// Binary attributes applied or removed over a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToggleTag {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    /// Spellcheck highlight; derived from text and dictionary
    Misspelt,
}

impl ToggleTag {
    pub const ALL: [ToggleTag; 5] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Strikethrough,
        Self::Misspelt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Strikethrough => "strikethrough",
            Self::Misspelt => "misspelt",
        }
    }
}

/// How a family's tags relate to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyKind {
    /// A single binary tag
    Toggle,
    /// Exclusive, stepped up and down by a fixed increment
    Ladder,
    /// Exclusive, set directly to one of a fixed set of values
    Exclusive,
}

/// Tag families known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Toggle(ToggleTag),
    Indent,
    Justification,
}

impl Family {
    pub fn name(self) -> &'static str {
        match self {
            Self::Toggle(tag) => tag.name(),
            Self::Indent => "indent",
            Self::Justification => "justification",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "indent" => Some(Self::Indent),
            "justification" => Some(Self::Justification),
            _ => ToggleTag::ALL
                .into_iter()
                .find(|t| t.name() == name)
                .map(Self::Toggle),
        }
    }

    pub fn kind(self) -> FamilyKind {
        match self {
            Self::Toggle(_) => FamilyKind::Toggle,
            Self::Indent => FamilyKind::Ladder,
            Self::Justification => FamilyKind::Exclusive,
        }
    }
}

/// Identity of a style tag: family plus parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagKey {
    Toggle(ToggleTag),
    /// Indent amount in layout units, always positive. Stepping adds or removes
    /// one increment, so loaded amounts off the increment grid stay off it.
    Indent(u32),
    Justify(Justification),
}

impl TagKey {
    pub fn family(self) -> Family {
        match self {
            Self::Toggle(tag) => Family::Toggle(tag),
            Self::Indent(_) => Family::Indent,
            Self::Justify(_) => Family::Justification,
        }
    }

    /// Stable name, e.g. `bold`, `indent50`, `justify-center`.
    pub fn name(self) -> String {
        match self {
            Self::Toggle(tag) => tag.name().to_string(),
            Self::Indent(level) => format!("indent{level}"),
            Self::Justify(j) => format!("justify-{}", j.name()),
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        if let Some(level) = name.strip_prefix("indent") {
            return level.parse().ok().filter(|l| *l > 0).map(Self::Indent);
        }
        if let Some(value) = name.strip_prefix("justify-") {
            return Justification::from_name(value).map(Self::Justify);
        }
        ToggleTag::ALL
            .into_iter()
            .find(|t| t.name() == name)
            .map(Self::Toggle)
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Index of a tag record in a [`TagTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(u32);

impl TagId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct TagRecord {
    key: TagKey,
    name: String,
}

/// Arena of tag records, indexed by [`TagId`] and by [`TagKey`].
///
/// Records are never removed, so ids stay valid for the table's lifetime.
#[derive(Debug, Clone)]
pub struct TagTable {
    records: Vec<TagRecord>,
    by_key: HashMap<TagKey, TagId>,
}

impl Default for TagTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TagTable {
    /// Table with every toggle tag and justification value registered.
    pub fn new() -> Self {
        let mut table = Self {
            records: Vec::new(),
            by_key: HashMap::new(),
        };
        for tag in ToggleTag::ALL {
            table.get_or_create(TagKey::Toggle(tag));
        }
        for j in Justification::ALL {
            table.get_or_create(TagKey::Justify(j));
        }
        table
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: TagKey) -> Option<TagId> {
        self.by_key.get(&key).copied()
    }

    /// Look a tag up by its stable name
    pub fn lookup(&self, name: &str) -> Option<TagId> {
        TagKey::parse(name).and_then(|key| self.get(key))
    }

    /// Return the id for `key`, registering it first if needed.
    ///
    /// Takes `&mut self`, so lookup and insertion cannot interleave with
    /// another mutation of the table.
    pub fn get_or_create(&mut self, key: TagKey) -> TagId {
        if let Some(id) = self.get(key) {
            return id;
        }
        let id = TagId(self.records.len() as u32);
        self.records.push(TagRecord {
            key,
            name: key.name(),
        });
        self.by_key.insert(key, id);
        tracing::trace!(tag = %key, id = id.0, "registered tag");
        id
    }

    /// Key of `id`, or `None` when `id` was not handed out by this table.
    pub fn key(&self, id: TagId) -> Option<TagKey> {
        self.records.get(id.index()).map(|record| record.key)
    }

    pub fn name(&self, id: TagId) -> Option<&str> {
        self.records.get(id.index()).map(|record| record.name.as_str())
    }

    /// All registered tags in registration order
    pub fn iter(&self) -> impl Iterator<Item = (TagId, TagKey)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| (TagId(i as u32), record.key))
    }
}
