use itertools::Itertools;
use ropey::Rope;

use crate::{char_index_range::CharIndexRange, selection::CharIndex};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edit {
    pub start: CharIndex,
    pub old: Rope,
    pub new: Rope,
}

impl Edit {
    pub fn new(range: CharIndexRange, old: Rope, new: Rope) -> Self {
        debug_assert_eq!(range.len(), old.len_chars());
        Edit {
            start: range.start,
            old,
            new,
        }
    }

    pub fn end(&self) -> CharIndex {
        CharIndex(self.start.0 + self.old.len_chars())
    }

    pub fn range(&self) -> CharIndexRange {
        (self.start..self.end()).into()
    }

    fn offset(&self) -> isize {
        self.new.len_chars() as isize - self.old.len_chars() as isize
    }

    fn is_noop(&self) -> bool {
        self.old == self.new
    }

    fn subset_of(&self, other: &Edit) -> bool {
        other.range().contains_range(&self.range())
    }

    fn inverse(&self, offset: isize) -> Edit {
        Edit {
            start: self.start.apply_offset(offset),
            old: self.new.clone(),
            new: self.old.clone(),
        }
    }
}

/// A group of edits that is applied, and undone, as a single step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditTransaction {
    /// Sorted by start, free of duplicates and of edits nested in other edits.
    edits: Vec<Edit>,
}

impl EditTransaction {
    pub fn from_edits(edits: Vec<Edit>) -> Self {
        Self {
            edits: Self::normalize_edits(edits),
        }
    }

    fn normalize_edits(edits: Vec<Edit>) -> Vec<Edit> {
        edits
            .iter()
            // 1) remove edits that are subset of other edits
            .filter(|edit| {
                !edits
                    .iter()
                    .any(|other| *edit != other && edit.subset_of(other))
            })
            // 2) sort edits by start position
            .sorted_by_key(|edit| edit.start)
            // 3) Remove duplicates
            .unique()
            .cloned()
            .collect_vec()
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn is_noop(&self) -> bool {
        self.edits.iter().all(Edit::is_noop)
    }

    /// Check that every edit fits `rope` and still describes its content.
    pub fn validate(&self, rope: &Rope) -> anyhow::Result<()> {
        let len_chars = rope.len_chars();
        for edit in &self.edits {
            if edit.end().0 > len_chars {
                return Err(anyhow::anyhow!(
                    "Edit at {} is out of bounds for a document of {len_chars} chars",
                    edit.range()
                ));
            }
            if rope.slice(edit.range().as_usize_range()) != edit.old.slice(..) {
                return Err(anyhow::anyhow!(
                    "Edit at {} no longer matches the document",
                    edit.range()
                ));
            }
        }
        if let Some((left, right)) = self
            .edits
            .iter()
            .tuple_windows()
            .find(|(left, right)| left.end() > right.start)
        {
            return Err(anyhow::anyhow!(
                "Edits at {} and {} overlap",
                left.range(),
                right.range()
            ));
        }
        Ok(())
    }

    /// Apply every edit to `rope`. Nothing is modified unless all edits are
    /// valid. Returns the range each edit occupies afterwards.
    pub fn apply_to(&self, rope: &mut Rope) -> anyhow::Result<Vec<CharIndexRange>> {
        self.validate(rope)?;
        // Back to front, so that earlier edits keep their char indices.
        for edit in self.edits.iter().rev() {
            rope.try_remove(edit.range().as_usize_range())?;
            rope.try_insert(edit.start.0, &edit.new.to_string())?;
        }
        Ok(self.new_ranges())
    }

    fn new_ranges(&self) -> Vec<CharIndexRange> {
        let mut offset: isize = 0;
        self.edits
            .iter()
            .map(|edit| {
                let start = edit.start.apply_offset(offset);
                offset += edit.offset();
                (start..start + edit.new.len_chars()).into()
            })
            .collect()
    }

    /// The transaction that reverts this one once it has been applied.
    pub fn inverse(&self) -> EditTransaction {
        let mut offset: isize = 0;
        let edits = self
            .edits
            .iter()
            .map(|edit| {
                let inverse = edit.inverse(offset);
                offset += edit.offset();
                inverse
            })
            .collect();
        EditTransaction { edits }
    }
}

impl std::fmt::Display for EditTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Edit {}",
            self.edits.iter().map(|edit| edit.range()).join(", ")
        )
    }
}
