//! Attribute tag engine
//!
//! Formatting commands over a [`Document`] selection:
//!
//! - toggle tags (bold, italic, underline, strikethrough) flip between fully
//!   applied and absent; a mixed selection becomes fully applied
//! - indent steps up and down a ladder of levels, one increment at a time
//! - justification is set directly, replacing whatever value was active
//!
//! Empty or out-of-range selections are no-ops. Ladder and justification
//! families never have two tags on the same position.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::tags::{Family, FamilyKind, Justification, TagId, TagKey, ToggleTag};

/// Direction of a ladder step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Increase,
    Decrease,
}

/// Resolved formatting at one position, for renderers and exporters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharFormat {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub misspelt: bool,
    /// Indent in layout units, zero when unindented
    pub indent: u32,
    pub justification: Option<Justification>,
}

impl Document {
    /// True iff every position in `[start, end)` carries `tag`.
    ///
    /// An empty range is vacuously covered. An id this document never
    /// registered covers nothing.
    pub fn is_fully_tagged(&self, tag: TagId, start: usize, end: usize) -> bool {
        let Some(key) = self.tags.key(tag) else {
            return false;
        };
        let Some(range) = self.clamp(start, end) else {
            return true;
        };
        match key.family() {
            Family::Toggle(_) => self
                .toggles
                .get(&tag)
                .map_or(false, |set| set.covers(range)),
            family => self
                .exclusive(family)
                .map_or(false, |map| map.covers(range, tag)),
        }
    }

    /// Same as [`Document::is_fully_tagged`] for a toggle tag.
    pub fn has_toggle(&self, tag: ToggleTag, start: usize, end: usize) -> bool {
        match self.tags.get(TagKey::Toggle(tag)) {
            Some(id) => self.is_fully_tagged(id, start, end),
            None => self.clamp(start, end).is_none(),
        }
    }

    /// Remove `tag` if the whole selection carries it, otherwise apply it to
    /// the whole selection.
    pub fn toggle_tag(&mut self, tag: ToggleTag, start: usize, end: usize) {
        let Some(range) = self.clamp(start, end) else {
            return;
        };
        if self.has_toggle(tag, range.start, range.end) {
            self.remove_tag(tag, range.start, range.end);
        } else {
            self.apply_tag(tag, range.start, range.end);
        }
    }

    /// Apply `tag` over the selection, unconditionally.
    pub fn apply_tag(&mut self, tag: ToggleTag, start: usize, end: usize) {
        let Some(range) = self.clamp(start, end) else {
            return;
        };
        let id = self.tags.get_or_create(TagKey::Toggle(tag));
        self.toggles.entry(id).or_default().insert(range);
        if tag != ToggleTag::Misspelt {
            self.mark_modified();
        }
    }

    /// Remove `tag` from the selection, unconditionally.
    pub fn remove_tag(&mut self, tag: ToggleTag, start: usize, end: usize) {
        let Some(range) = self.clamp(start, end) else {
            return;
        };
        let Some(id) = self.tags.get(TagKey::Toggle(tag)) else {
            return;
        };
        if let Some(set) = self.toggles.get_mut(&id) {
            set.remove(range);
        }
        if tag != ToggleTag::Misspelt {
            self.mark_modified();
        }
    }

    /// Tag of `family` active at `pos`
    pub fn active_tag(&self, family: Family, pos: usize) -> Option<TagId> {
        match family {
            Family::Toggle(tag) => {
                let id = self.tags.get(TagKey::Toggle(tag))?;
                self.toggles
                    .get(&id)
                    .filter(|set| set.contains(pos))
                    .map(|_| id)
            }
            family => self.exclusive(family).and_then(|map| map.get(pos)),
        }
    }

    /// Indent level at `pos`, zero when unindented
    pub fn indent_at(&self, pos: usize) -> u32 {
        match self.indent.get(pos).and_then(|id| self.tags.key(id)) {
            Some(TagKey::Indent(level)) => level,
            _ => 0,
        }
    }

    pub fn justification_at(&self, pos: usize) -> Option<Justification> {
        match self.justification.get(pos).and_then(|id| self.tags.key(id)) {
            Some(TagKey::Justify(j)) => Some(j),
            _ => None,
        }
    }

    /// Move the selection one rung up or down a ladder family.
    ///
    /// The level active at the selection's start decides the new level,
    /// which then replaces every ladder tag in the selection. Stepping down
    /// from the first rung removes the indent; stepping down with no indent
    /// does nothing.
    pub fn step_ladder(
        &mut self,
        family: Family,
        start: usize,
        end: usize,
        step: Step,
    ) -> Result<()> {
        if family.kind() != FamilyKind::Ladder {
            return Err(Error::UnknownTagFamily(family.name().to_string()));
        }
        let Some(range) = self.clamp(start, end) else {
            return Ok(());
        };

        let level = self.indent_at(range.start);
        let next = match step {
            Step::Increase => level.saturating_add(self.indent_increment),
            Step::Decrease if level == 0 => return Ok(()),
            Step::Decrease => level.saturating_sub(self.indent_increment),
        };

        let tag = (next > 0).then(|| self.tags.get_or_create(TagKey::Indent(next)));
        tracing::debug!(
            from = level,
            to = next,
            start = range.start,
            end = range.end,
            "indent step"
        );
        self.indent.assign(range, tag);
        self.mark_modified();
        Ok(())
    }

    /// Set justification over the selection, replacing any other value.
    /// Choosing the value already set leaves it set.
    pub fn set_exclusive(&mut self, value: Justification, start: usize, end: usize) {
        let Some(range) = self.clamp(start, end) else {
            return;
        };
        let tag = self.tags.get_or_create(TagKey::Justify(value));
        self.justification.assign(range, Some(tag));
        self.mark_modified();
    }

    /// [`Document::toggle_tag`] addressed by family name.
    pub fn toggle_named(&mut self, family: &str, start: usize, end: usize) -> Result<()> {
        match Family::from_name(family) {
            Some(Family::Toggle(tag)) => {
                self.toggle_tag(tag, start, end);
                Ok(())
            }
            _ => Err(Error::UnknownTagFamily(family.to_string())),
        }
    }

    /// [`Document::step_ladder`] addressed by family name.
    pub fn step_named(&mut self, family: &str, start: usize, end: usize, step: Step) -> Result<()> {
        let family = Family::from_name(family)
            .ok_or_else(|| Error::UnknownTagFamily(family.to_string()))?;
        self.step_ladder(family, start, end, step)
    }

    /// [`Document::set_exclusive`] addressed by family and value name.
    pub fn set_exclusive_named(
        &mut self,
        family: &str,
        value: &str,
        start: usize,
        end: usize,
    ) -> Result<()> {
        if Family::from_name(family) != Some(Family::Justification) {
            return Err(Error::UnknownTagFamily(family.to_string()));
        }
        let value = Justification::from_name(value)
            .ok_or_else(|| Error::UnknownTagFamily(format!("{family}/{value}")))?;
        self.set_exclusive(value, start, end);
        Ok(())
    }

    /// Resolved formatting at `pos`
    pub fn format_at(&self, pos: usize) -> CharFormat {
        let on = |tag| self.active_tag(Family::Toggle(tag), pos).is_some();
        CharFormat {
            bold: on(ToggleTag::Bold),
            italic: on(ToggleTag::Italic),
            underline: on(ToggleTag::Underline),
            strikethrough: on(ToggleTag::Strikethrough),
            misspelt: on(ToggleTag::Misspelt),
            indent: self.indent_at(pos),
            justification: self.justification_at(pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold(doc: &Document) -> Vec<std::ops::Range<usize>> {
        doc.toggle_ranges(ToggleTag::Bold)
    }

    #[test]
    fn test_toggle_uniform_round_trip() {
        let mut doc = Document::from_text("hello world");
        doc.toggle_tag(ToggleTag::Bold, 0, 5);
        assert!(doc.has_toggle(ToggleTag::Bold, 0, 5));
        assert!(!doc.has_toggle(ToggleTag::Bold, 0, 6));

        doc.toggle_tag(ToggleTag::Bold, 0, 5);
        assert!(bold(&doc).is_empty());
    }

    #[test]
    fn test_toggle_mixed_selection_applies() {
        let mut doc = Document::from_text("hello world");
        doc.toggle_tag(ToggleTag::Bold, 2, 4);
        doc.toggle_tag(ToggleTag::Bold, 6, 8);

        doc.toggle_tag(ToggleTag::Bold, 0, 11);
        assert_eq!(bold(&doc), vec![0..11]);
    }

    #[test]
    fn test_coverage_with_multiple_toggles_inside() {
        let mut doc = Document::from_text("abcdefghij");
        doc.apply_tag(ToggleTag::Italic, 0, 3);
        doc.apply_tag(ToggleTag::Italic, 4, 7);
        doc.apply_tag(ToggleTag::Italic, 8, 10);
        assert!(!doc.has_toggle(ToggleTag::Italic, 0, 10));
        assert!(doc.has_toggle(ToggleTag::Italic, 4, 7));
        assert!(doc.has_toggle(ToggleTag::Italic, 5, 5));
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let mut doc = Document::from_text("abc");
        doc.toggle_tag(ToggleTag::Underline, 2, 2);
        doc.toggle_tag(ToggleTag::Underline, 3, 1);
        doc.step_ladder(Family::Indent, 1, 1, Step::Increase).unwrap();
        doc.set_exclusive(Justification::Center, 5, 9);
        assert!(doc.spans().is_empty());
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_indent_ladder() {
        let mut doc = Document::from_text("a paragraph");
        doc.step_ladder(Family::Indent, 0, 11, Step::Increase).unwrap();
        assert_eq!(doc.indent_at(0), 25);
        doc.step_ladder(Family::Indent, 0, 11, Step::Increase).unwrap();
        assert_eq!(doc.indent_at(5), 50);

        let id = doc.tag_table().lookup("indent50").unwrap();
        assert!(doc.is_fully_tagged(id, 0, 11));
        assert!(doc.ranges_of(doc.tag_table().lookup("indent25").unwrap()).is_empty());

        doc.step_ladder(Family::Indent, 0, 11, Step::Decrease).unwrap();
        doc.step_ladder(Family::Indent, 0, 11, Step::Decrease).unwrap();
        assert_eq!(doc.indent_at(0), 0);
        assert_eq!(doc.active_tag(Family::Indent, 0), None);

        doc.step_ladder(Family::Indent, 0, 11, Step::Decrease).unwrap();
        assert_eq!(doc.indent_at(0), 0);
    }

    #[test]
    fn test_indent_uses_start_position_only() {
        let mut doc = Document::from_text("0123456789");
        doc.step_ladder(Family::Indent, 5, 10, Step::Increase).unwrap();
        doc.step_ladder(Family::Indent, 5, 10, Step::Increase).unwrap();

        // start is unindented, so the whole selection moves to the first rung
        doc.step_ladder(Family::Indent, 0, 10, Step::Increase).unwrap();
        assert_eq!(doc.indent_at(0), 25);
        assert_eq!(doc.indent_at(7), 25);
        assert_eq!(doc.indent.iter().count(), 1);
    }

    #[test]
    fn test_decrease_without_tag_at_start_is_noop() {
        let mut doc = Document::from_text("0123456789");
        doc.step_ladder(Family::Indent, 5, 10, Step::Increase).unwrap();
        doc.step_ladder(Family::Indent, 0, 10, Step::Decrease).unwrap();
        assert_eq!(doc.indent_at(7), 25);
    }

    #[test]
    fn test_custom_increment() {
        let mut doc = Document::from_text("text").with_indent_increment(40);
        doc.step_ladder(Family::Indent, 0, 4, Step::Increase).unwrap();
        assert_eq!(doc.indent_at(0), 40);
    }

    #[test]
    fn test_justification_is_exclusive() {
        let mut doc = Document::from_text("centre me");
        doc.set_exclusive(Justification::Right, 0, 9);
        doc.set_exclusive(Justification::Center, 0, 4);
        assert_eq!(doc.justification_at(0), Some(Justification::Center));
        assert_eq!(doc.justification_at(6), Some(Justification::Right));

        doc.set_exclusive(Justification::Center, 0, 4);
        assert_eq!(doc.justification_at(0), Some(Justification::Center));
        assert_eq!(doc.tags_at(2).len(), 1);
    }

    #[test]
    fn test_named_commands() {
        let mut doc = Document::from_text("named");
        doc.toggle_named("strikethrough", 0, 5).unwrap();
        assert!(doc.has_toggle(ToggleTag::Strikethrough, 0, 5));
        doc.step_named("indent", 0, 5, Step::Increase).unwrap();
        doc.set_exclusive_named("justification", "fill", 0, 5).unwrap();
        assert_eq!(doc.format_at(1).justification, Some(Justification::Fill));

        assert!(matches!(doc.toggle_named("sparkle", 0, 5), Err(Error::UnknownTagFamily(_))));
        assert!(matches!(doc.toggle_named("indent", 0, 5), Err(Error::UnknownTagFamily(_))));
        assert!(matches!(
            doc.step_named("justification", 0, 5, Step::Increase),
            Err(Error::UnknownTagFamily(_))
        ));
        assert!(matches!(
            doc.set_exclusive_named("justification", "diagonal", 0, 5),
            Err(Error::UnknownTagFamily(_))
        ));
    }

    #[test]
    fn test_format_at() {
        let mut doc = Document::from_text("styled");
        doc.apply_tag(ToggleTag::Bold, 0, 3);
        doc.apply_tag(ToggleTag::Underline, 2, 6);
        let format = doc.format_at(2);
        assert!(format.bold && format.underline);
        assert!(!format.italic);
        assert_eq!(doc.format_at(4), CharFormat { underline: true, ..CharFormat::default() });
    }
}
