use itertools::Itertools;
use std::ops::{Add, Sub};

use crate::char_index_range::{CharIndexRange, Region};

/// The selections of a document, in the order they were made.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SelectionSet {
    pub(crate) primary: Selection,
    pub(crate) secondary: Vec<Selection>,
}

impl SelectionSet {
    pub fn new(primary: Selection, secondary: Vec<Selection>) -> Self {
        Self { primary, secondary }
    }

    /// Returns `None` if `ranges` is empty.
    pub fn from_ranges(ranges: impl IntoIterator<Item = CharIndexRange>) -> Option<Self> {
        let mut selections = ranges.into_iter().map(Selection::new);
        let primary = selections.next()?;
        Some(Self {
            primary,
            secondary: selections.collect_vec(),
        })
    }

    pub(crate) fn map<F, A>(&self, f: F) -> Vec<A>
    where
        F: Fn(&Selection) -> A,
    {
        vec![f(&self.primary)]
            .into_iter()
            .chain(self.secondary.iter().map(f))
            .collect()
    }

    pub fn ranges(&self) -> Vec<CharIndexRange> {
        self.map(|selection| selection.range())
    }

    pub fn len(&self) -> usize {
        self.secondary.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub(crate) fn clamp(&self, max_char_index: CharIndex) -> SelectionSet {
        SelectionSet {
            primary: self.primary.clamp(max_char_index),
            secondary: self
                .secondary
                .iter()
                .map(|selection| selection.clamp(max_char_index))
                .collect(),
        }
    }
}

#[derive(PartialEq, Clone, Debug, Eq, Hash, Default)]
pub struct Selection {
    range: CharIndexRange,
}

impl Selection {
    pub fn new(range: CharIndexRange) -> Self {
        Selection { range }
    }

    pub fn range(&self) -> CharIndexRange {
        self.range
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    fn clamp(&self, max_char_index: CharIndex) -> Self {
        let range =
            (self.range.start.min(max_char_index)..self.range.end.min(max_char_index)).into();
        Selection { range }
    }
}

/// Decide which regions a transform acts upon.
///
/// With no selection, or a lone empty selection (a bare cursor), the whole
/// document is the only region. Otherwise every selection is a region, in
/// the order given.
pub fn select_regions(document_len: usize, selections: &[CharIndexRange]) -> Vec<Region> {
    match selections {
        [] => vec![(0..document_len).into()],
        [only] if only.is_empty() => vec![(0..document_len).into()],
        _ => selections.to_vec(),
    }
}

/// Sort `ranges` by start and replace every group of overlapping ranges with
/// their union. Ranges that merely touch stay apart.
pub fn merge_overlapping(
    ranges: impl IntoIterator<Item = CharIndexRange>,
) -> Vec<CharIndexRange> {
    ranges
        .into_iter()
        .sorted_by_key(|range| (range.start, range.end))
        .coalesce(|left, right| {
            if right.start < left.end {
                Ok((left.start..left.end.max(right.end)).into())
            } else {
                Err((left, right))
            }
        })
        .collect()
}

impl Add<usize> for CharIndex {
    type Output = CharIndex;

    fn add(self, rhs: usize) -> Self::Output {
        Self(self.0.saturating_add(rhs))
    }
}

impl Sub<usize> for CharIndex {
    type Output = CharIndex;

    fn sub(self, rhs: usize) -> Self::Output {
        Self(self.0.saturating_sub(rhs))
    }
}

#[derive(PartialEq, Clone, Debug, Copy, PartialOrd, Eq, Ord, Hash, Default)]
pub struct CharIndex(pub usize);

impl CharIndex {
    pub(crate) fn apply_offset(&self, change: isize) -> CharIndex {
        if change.is_positive() {
            *self + (change as usize)
        } else {
            *self - change.unsigned_abs()
        }
    }
}

#[cfg(test)]
mod test_select_regions {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn no_selection_means_whole_document() {
        assert_eq!(select_regions(12, &[]), vec![CharIndexRange::from(0..12)]);
    }

    #[test]
    fn single_empty_selection_means_whole_document() {
        assert_eq!(
            select_regions(12, &[(4..4).into()]),
            vec![CharIndexRange::from(0..12)]
        );
    }

    #[test]
    fn selections_are_returned_unchanged() {
        let selections: Vec<CharIndexRange> = vec![(8..10).into(), (0..3).into(), (5..5).into()];
        assert_eq!(select_regions(12, &selections), selections);
    }

    #[test]
    fn single_non_empty_selection() {
        assert_eq!(
            select_regions(12, &[(2..6).into()]),
            vec![CharIndexRange::from(2..6)]
        );
    }

    #[test]
    fn empty_document() {
        assert_eq!(select_regions(0, &[]), vec![CharIndexRange::from(0..0)]);
    }
}


#[cfg(test)]
mod test_selection_set {
    use super::*;

    #[test]
    fn from_ranges_keeps_order() {
        let set = SelectionSet::from_ranges([CharIndexRange::from(5..6), (1..2).into()]).unwrap();
        assert_eq!(set.ranges(), vec![CharIndexRange::from(5..6), (1..2).into()]);
        assert_eq!(set.len(), 2);
        assert!(SelectionSet::from_ranges(Vec::new()).is_none());
    }

    #[test]
    fn clamp_to_document_end() {
        let set = SelectionSet::from_ranges([CharIndexRange::from(2..20)]).unwrap();
        assert_eq!(
            set.clamp(CharIndex(8)).ranges(),
            vec![CharIndexRange::from(2..8)]
        );
    }
}
