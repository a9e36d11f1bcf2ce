//! Range bookkeeping for tagged text
//!
//! Two containers back every tag in a [`Document`](crate::document::Document):
//!
//! - [`RangeSet`]: sorted, disjoint, coalesced runs for binary (toggle) tags.
//! - [`ExclusiveMap`]: disjoint runs each carrying one value, for families where
//!   at most one tag may cover a position (indent levels, justification).
//!
//! All offsets are char indices into the document text.

use std::collections::BTreeMap;
use std::ops::Range;

/// Map a position through the removal of `removed`.
fn collapse(pos: usize, removed: &Range<usize>) -> usize {
    if pos <= removed.start {
        pos
    } else if pos >= removed.end {
        pos - removed.len()
    } else {
        removed.start
    }
}

/// Map a position through an insertion of `len` chars at `at`.
///
/// Positions strictly after `at` move; a position equal to `at` moves only
/// when `sticky` is set (the start of a run sits after inserted text).
fn shift(pos: usize, at: usize, len: usize, sticky: bool) -> usize {
    if pos > at || (sticky && pos == at) {
        pos + len
    } else {
        pos
    }
}

/// Set of char positions stored as sorted, non-touching runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    runs: Vec<Range<usize>>,
}

impl RangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Iterate the runs in ascending order
    pub fn iter(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.runs.iter().cloned()
    }

    pub fn contains(&self, pos: usize) -> bool {
        let idx = self.runs.partition_point(|r| r.start <= pos);
        idx > 0 && pos < self.runs[idx - 1].end
    }

    /// True when every position of `range` is in the set. Empty ranges are
    /// vacuously covered.
    pub fn covers(&self, range: Range<usize>) -> bool {
        if range.is_empty() {
            return true;
        }
        // Runs never touch, so a covering run has to be a single run.
        let idx = self.runs.partition_point(|r| r.start <= range.start);
        idx > 0 && self.runs[idx - 1].end >= range.end
    }

    /// True when at least one position of `range` is in the set.
    pub fn intersects(&self, range: Range<usize>) -> bool {
        if range.is_empty() {
            return false;
        }
        let idx = self.runs.partition_point(|r| r.end <= range.start);
        self.runs.get(idx).map_or(false, |r| r.start < range.end)
    }

    /// Add every position of `range`, merging with touching runs.
    pub fn insert(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let lo = self.runs.partition_point(|r| r.end < range.start);
        let hi = self.runs.partition_point(|r| r.start <= range.end);

        let mut merged = range;
        if lo < hi {
            merged.start = merged.start.min(self.runs[lo].start);
            merged.end = merged.end.max(self.runs[hi - 1].end);
        }
        self.runs.splice(lo..hi, [merged]);
    }

    /// Drop every position of `range`, splitting runs that straddle it.
    pub fn remove(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let lo = self.runs.partition_point(|r| r.end <= range.start);
        let hi = self.runs.partition_point(|r| r.start < range.end);
        if lo >= hi {
            return;
        }

        let first = self.runs[lo].clone();
        let last = self.runs[hi - 1].clone();
        let mut keep = Vec::with_capacity(2);
        if first.start < range.start {
            keep.push(first.start..range.start);
        }
        if last.end > range.end {
            keep.push(range.end..last.end);
        }
        self.runs.splice(lo..hi, keep);
    }

    /// Follow an insertion of `len` chars at `at`. Text inserted strictly
    /// inside a run joins it.
    pub fn shift_for_insert(&mut self, at: usize, len: usize) {
        if len == 0 {
            return;
        }
        for run in &mut self.runs {
            run.start = shift(run.start, at, len, true);
            run.end = shift(run.end, at, len, false);
        }
    }

    /// Follow the removal of `removed`. Runs inside it disappear and runs
    /// brought together by it merge.
    pub fn shift_for_remove(&mut self, removed: Range<usize>) {
        if removed.is_empty() {
            return;
        }
        let mut runs: Vec<Range<usize>> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            let mapped = collapse(run.start, &removed)..collapse(run.end, &removed);
            if mapped.is_empty() {
                continue;
            }
            match runs.last_mut() {
                Some(prev) if prev.end >= mapped.start => prev.end = prev.end.max(mapped.end),
                _ => runs.push(mapped),
            }
        }
        self.runs = runs;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run<T> {
    end: usize,
    value: T,
}

/// Disjoint runs keyed by start offset, each carrying one value.
///
/// Lookup of the value active at a position is a single ordered-map probe.
/// Neighbouring runs with equal values are always merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusiveMap<T> {
    runs: BTreeMap<usize, Run<T>>,
}

impl<T> Default for ExclusiveMap<T> {
    fn default() -> Self {
        Self {
            runs: BTreeMap::new(),
        }
    }
}

impl<T: Copy + Eq> ExclusiveMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Value covering `pos`, if any.
    pub fn get(&self, pos: usize) -> Option<T> {
        self.run_at(pos).map(|(_, run)| run.value)
    }

    fn run_at(&self, pos: usize) -> Option<(usize, Run<T>)> {
        self.runs
            .range(..=pos)
            .next_back()
            .filter(|(_, run)| pos < run.end)
            .map(|(&start, &run)| (start, run))
    }

    /// Iterate `(range, value)` pairs in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (Range<usize>, T)> + '_ {
        self.runs
            .iter()
            .map(|(&start, run)| (start..run.end, run.value))
    }

    /// Runs carrying `value`
    pub fn runs_of(&self, value: T) -> impl Iterator<Item = Range<usize>> + '_ {
        self.iter()
            .filter(move |(_, v)| *v == value)
            .map(|(range, _)| range)
    }

    /// True when every position of `range` carries `value`.
    pub fn covers(&self, range: Range<usize>, value: T) -> bool {
        let mut pos = range.start;
        while pos < range.end {
            match self.run_at(pos) {
                Some((_, run)) if run.value == value => pos = run.end,
                _ => return false,
            }
        }
        true
    }

    /// True when any position of `range` carries some value.
    pub fn intersects(&self, range: Range<usize>) -> bool {
        if range.is_empty() {
            return false;
        }
        self.get(range.start).is_some() || self.runs.range(range).next().is_some()
    }

    /// Make `value` the only value over `range`; `None` clears it.
    pub fn assign(&mut self, range: Range<usize>, value: Option<T>) {
        if range.is_empty() {
            return;
        }
        self.split_at(range.start);
        self.split_at(range.end);

        let inside: Vec<usize> = self.runs.range(range.clone()).map(|(&k, _)| k).collect();
        for start in inside {
            self.runs.remove(&start);
        }
        if let Some(value) = value {
            self.runs.insert(
                range.start,
                Run {
                    end: range.end,
                    value,
                },
            );
        }
        self.merge_at(range.end);
        self.merge_at(range.start);
    }

    /// Split the run straddling `pos` so that a run boundary exists there.
    fn split_at(&mut self, pos: usize) {
        if let Some((start, run)) = self.run_at(pos) {
            if start < pos {
                self.runs.insert(
                    start,
                    Run {
                        end: pos,
                        value: run.value,
                    },
                );
                self.runs.insert(pos, run);
            }
        }
    }

    /// Merge the run ending at `pos` with the run starting there when their
    /// values match.
    fn merge_at(&mut self, pos: usize) {
        let Some(next) = self.runs.get(&pos).copied() else {
            return;
        };
        let prev = self
            .runs
            .range(..pos)
            .next_back()
            .map(|(&start, &run)| (start, run));
        if let Some((start, run)) = prev {
            if run.end == pos && run.value == next.value {
                self.runs.remove(&pos);
                self.runs.insert(start, next);
            }
        }
    }

    /// Follow an insertion of `len` chars at `at`.
    pub fn shift_for_insert(&mut self, at: usize, len: usize) {
        if len == 0 {
            return;
        }
        let runs = std::mem::take(&mut self.runs);
        self.runs = runs
            .into_iter()
            .map(|(start, run)| {
                (
                    shift(start, at, len, true),
                    Run {
                        end: shift(run.end, at, len, false),
                        value: run.value,
                    },
                )
            })
            .collect();
    }

    /// Follow the removal of `removed`.
    pub fn shift_for_remove(&mut self, removed: Range<usize>) {
        if removed.is_empty() {
            return;
        }
        let runs = std::mem::take(&mut self.runs);
        let mut last: Option<usize> = None;
        for (start, run) in runs {
            let start = collapse(start, &removed);
            let end = collapse(run.end, &removed);
            if start >= end {
                continue;
            }
            if let Some(prev_start) = last {
                if let Some(prev) = self.runs.get_mut(&prev_start) {
                    if prev.end == start && prev.value == run.value {
                        prev.end = end;
                        continue;
                    }
                }
            }
            self.runs.insert(
                start,
                Run {
                    end,
                    value: run.value,
                },
            );
            last = Some(start);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs(set: &RangeSet) -> Vec<Range<usize>> {
        set.iter().collect()
    }

    #[test]
    fn test_insert_merges_touching_runs() {
        let mut set = RangeSet::new();
        set.insert(0..3);
        set.insert(5..8);
        assert_eq!(runs(&set), vec![0..3, 5..8]);

        set.insert(3..5);
        assert_eq!(runs(&set), vec![0..8]);
    }

    #[test]
    fn test_remove_splits_run() {
        let mut set = RangeSet::new();
        set.insert(0..10);
        set.remove(3..6);
        assert_eq!(runs(&set), vec![0..3, 6..10]);
        assert!(!set.contains(4));
        assert!(set.contains(6));
    }

    #[test]
    fn test_covers_detects_gaps() {
        let mut set = RangeSet::new();
        set.insert(0..4);
        set.insert(6..10);
        assert!(set.covers(1..4));
        assert!(!set.covers(2..8));
        assert!(set.covers(5..5));
        assert!(set.intersects(2..8));
        assert!(!set.intersects(4..6));
    }

    #[test]
    fn test_shift_for_insert_inside_and_at_edges() {
        let mut set = RangeSet::new();
        set.insert(2..5);
        set.shift_for_insert(3, 2);
        assert_eq!(runs(&set), vec![2..7]);

        set.shift_for_insert(7, 1);
        assert_eq!(runs(&set), vec![2..7]);

        set.shift_for_insert(2, 1);
        assert_eq!(runs(&set), vec![3..8]);
    }

    #[test]
    fn test_shift_for_remove_merges_neighbours() {
        let mut set = RangeSet::new();
        set.insert(0..4);
        set.insert(5..9);
        set.shift_for_remove(4..5);
        assert_eq!(runs(&set), vec![0..8]);

        set.shift_for_remove(2..20);
        assert_eq!(runs(&set), vec![0..2]);
    }

    #[test]
    fn test_exclusive_assign_overwrites() {
        let mut map = ExclusiveMap::new();
        map.assign(0..10, Some(1));
        map.assign(3..6, Some(2));
        assert_eq!(map.get(2), Some(1));
        assert_eq!(map.get(3), Some(2));
        assert_eq!(map.get(6), Some(1));
        assert_eq!(map.get(10), None);

        map.assign(3..6, Some(1));
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![(0..10, 1)]);
    }

    #[test]
    fn test_exclusive_clear_and_cover() {
        let mut map = ExclusiveMap::new();
        map.assign(0..10, Some(7));
        map.assign(4..6, None);
        assert!(map.covers(0..4, 7));
        assert!(!map.covers(0..6, 7));
        assert!(map.intersects(5..7));
        assert!(!map.intersects(4..6));
        assert_eq!(map.runs_of(7).collect::<Vec<_>>(), vec![0..4, 6..10]);
    }

    #[test]
    fn test_exclusive_shift_for_remove_merges_equal_values() {
        let mut map = ExclusiveMap::new();
        map.assign(0..3, Some('a'));
        map.assign(5..8, Some('a'));
        map.shift_for_remove(3..5);
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![(0..6, 'a')]);

        map.shift_for_insert(2, 3);
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![(0..9, 'a')]);
    }
}
