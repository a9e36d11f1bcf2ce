//! Document model for Buk
//!
//! Text lives in a ropey rope; formatting lives beside it as tagged ranges.
//! All offsets are char indices. Edits shift every tagged range so tags stay
//! attached to the text they were applied to.

use crate::ranges::{ExclusiveMap, RangeSet};
use crate::tags::{Family, TagId, TagKey, TagTable, ToggleTag};
use ropey::Rope;
use std::collections::HashMap;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Default indent step in layout units
pub const INDENT_INCREMENT: u32 = 25;

/// A text buffer plus its tagged ranges
#[derive(Debug, Clone)]
pub struct Document {
    content: Rope,
    pub(crate) tags: TagTable,
    /// Runs for each toggle tag that has ever been applied
    pub(crate) toggles: HashMap<TagId, RangeSet>,
    pub(crate) indent: ExclusiveMap<TagId>,
    pub(crate) justification: ExclusiveMap<TagId>,
    pub(crate) indent_increment: u32,
    modified: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            content: Rope::new(),
            tags: TagTable::new(),
            toggles: HashMap::new(),
            indent: ExclusiveMap::new(),
            justification: ExclusiveMap::new(),
            indent_increment: INDENT_INCREMENT,
            modified: false,
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            content: Rope::from_str(text),
            ..Self::new()
        }
    }

    /// Use a different indent step. Zero is ignored.
    pub fn with_indent_increment(mut self, increment: u32) -> Self {
        if increment > 0 {
            self.indent_increment = increment;
        }
        self
    }

    pub fn indent_increment(&self) -> u32 {
        self.indent_increment
    }

    pub fn content(&self) -> &Rope {
        &self.content
    }

    pub fn text(&self) -> String {
        self.content.to_string()
    }

    /// Whether the document has unsaved changes
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub(crate) fn mark_modified(&mut self) {
        self.modified = true;
    }

    pub fn char_count(&self) -> usize {
        self.content.len_chars()
    }

    pub fn line_count(&self) -> usize {
        self.content.len_lines()
    }

    pub fn word_count(&self) -> usize {
        self.text().unicode_words().count()
    }

    /// Get text in range
    pub fn get_range(&self, start: usize, end: usize) -> String {
        let start = start.min(self.char_count());
        let end = end.clamp(start, self.char_count());
        self.content.slice(start..end).to_string()
    }

    /// Clamp a selection to the text. `None` means there is nothing to act on.
    pub fn clamp(&self, start: usize, end: usize) -> Option<Range<usize>> {
        let end = end.min(self.char_count());
        (start < end).then_some(start..end)
    }

    /// Insert text at position, returning the span it now occupies.
    pub fn insert(&mut self, pos: usize, text: &str) -> Range<usize> {
        let pos = pos.min(self.char_count());
        let len = text.chars().count();
        if len == 0 {
            return pos..pos;
        }
        self.content.insert(pos, text);
        for set in self.toggles.values_mut() {
            set.shift_for_insert(pos, len);
        }
        self.indent.shift_for_insert(pos, len);
        self.justification.shift_for_insert(pos, len);
        self.modified = true;
        pos..pos + len
    }

    /// Delete range. Returns the clamped range that was removed, if any.
    pub fn remove(&mut self, start: usize, end: usize) -> Option<Range<usize>> {
        let start = start.min(self.char_count());
        let end = end.min(self.char_count());
        if start >= end {
            return None;
        }
        self.content.remove(start..end);
        for set in self.toggles.values_mut() {
            set.shift_for_remove(start..end);
        }
        self.indent.shift_for_remove(start..end);
        self.justification.shift_for_remove(start..end);
        self.modified = true;
        Some(start..end)
    }

    pub fn replace(&mut self, start: usize, end: usize, replacement: &str) -> Range<usize> {
        let start = start.min(self.char_count());
        self.remove(start, end);
        self.insert(start, replacement)
    }

    pub fn tag_table(&self) -> &TagTable {
        &self.tags
    }

    pub(crate) fn exclusive(&self, family: Family) -> Option<&ExclusiveMap<TagId>> {
        match family {
            Family::Indent => Some(&self.indent),
            Family::Justification => Some(&self.justification),
            Family::Toggle(_) => None,
        }
    }

    pub(crate) fn exclusive_mut(&mut self, family: Family) -> Option<&mut ExclusiveMap<TagId>> {
        match family {
            Family::Indent => Some(&mut self.indent),
            Family::Justification => Some(&mut self.justification),
            Family::Toggle(_) => None,
        }
    }

    /// Runs currently carrying `id`
    pub fn ranges_of(&self, id: TagId) -> Vec<Range<usize>> {
        let Some(key) = self.tags.key(id) else {
            return Vec::new();
        };
        match key.family() {
            Family::Toggle(_) => self
                .toggles
                .get(&id)
                .map(|set| set.iter().collect())
                .unwrap_or_default(),
            family => self
                .exclusive(family)
                .map(|map| map.runs_of(id).collect())
                .unwrap_or_default(),
        }
    }

    /// Runs of a toggle tag
    pub fn toggle_ranges(&self, tag: ToggleTag) -> Vec<Range<usize>> {
        self.tags
            .get(TagKey::Toggle(tag))
            .map(|id| self.ranges_of(id))
            .unwrap_or_default()
    }

    /// Every tag with at least one run, paired with its runs
    pub fn spans(&self) -> Vec<(TagKey, Vec<Range<usize>>)> {
        self.tags
            .iter()
            .map(|(id, key)| (key, self.ranges_of(id)))
            .filter(|(_, ranges)| !ranges.is_empty())
            .collect()
    }

    /// Tags covering `pos`
    pub fn tags_at(&self, pos: usize) -> Vec<TagKey> {
        let mut keys: Vec<TagKey> = self
            .toggles
            .iter()
            .filter(|(_, set)| set.contains(pos))
            .filter_map(|(id, _)| self.tags.key(*id))
            .collect();
        keys.extend(self.indent.get(pos).and_then(|id| self.tags.key(id)));
        keys.extend(self.justification.get(pos).and_then(|id| self.tags.key(id)));
        keys.sort_by_key(|key| key.name());
        keys
    }
}
