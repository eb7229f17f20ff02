use std::ops::Range;

use crate::selection::CharIndex;

/// A contiguous span of a document, measured in chars.
#[derive(PartialEq, Clone, Debug, Eq, Hash, Default, Copy)]
pub struct CharIndexRange {
    pub start: CharIndex,
    pub end: CharIndex,
}

/// The span a single swap acts upon.
pub type Region = CharIndexRange;

impl From<CharIndexRange> for Range<CharIndex> {
    fn from(val: CharIndexRange) -> Self {
        val.start..val.end
    }
}

impl From<Range<CharIndex>> for CharIndexRange {
    fn from(value: Range<CharIndex>) -> Self {
        Self {
            start: value.start,
            end: value.end,
        }
    }
}

impl From<Range<usize>> for CharIndexRange {
    fn from(value: Range<usize>) -> Self {
        (CharIndex(value.start)..CharIndex(value.end)).into()
    }
}

impl std::fmt::Display for CharIndexRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start.0, self.end.0)
    }
}

impl std::str::FromStr for CharIndexRange {
    type Err = anyhow::Error;

    /// Parses `START..END`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once("..")
            .ok_or_else(|| anyhow::anyhow!("Expected a range of the form START..END, got {s:?}"))?;
        let start: usize = start.trim().parse()?;
        let end: usize = end.trim().parse()?;
        if start > end {
            return Err(anyhow::anyhow!(
                "Range start ({start}) is greater than its end ({end})"
            ));
        }
        Ok((start..end).into())
    }
}

impl CharIndexRange {
    pub fn len(&self) -> usize {
        self.end.0.saturating_sub(self.start.0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_usize_range(&self) -> Range<usize> {
        self.start.0..self.end.0
    }

    /// The same span with `start <= end`.
    pub fn normalized(&self) -> CharIndexRange {
        (self.start.min(self.end)..self.start.max(self.end)).into()
    }

    pub(crate) fn contains_range(&self, other: &CharIndexRange) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}
