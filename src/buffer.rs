use std::path::{Path, PathBuf};

use anyhow::Context;
use itertools::Itertools;
use ropey::Rope;

use crate::{
    char_index_range::{CharIndexRange, Region},
    edit::{Edit, EditTransaction},
    selection::{merge_overlapping, select_regions, CharIndex, SelectionSet},
    swap::SwapMapping,
    undo_tree::{Applicable, OldNew, UndoTree},
};

/// An in-memory document with optional selections and undo history.
pub struct Buffer {
    rope: Rope,
    selection_set: Option<SelectionSet>,
    undo_tree: UndoTree<EditTransaction>,
    path: Option<PathBuf>,
}

impl Applicable for EditTransaction {
    type Target = Rope;
    type Output = Vec<CharIndexRange>;

    fn apply(&self, target: &mut Rope) -> anyhow::Result<Vec<CharIndexRange>> {
        self.apply_to(target)
    }
}

impl Buffer {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection_set: None,
            undo_tree: UndoTree::new(),
            path: None,
        }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            ..Self::new(&text)
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Buffer has no path to save to"))?;
        std::fs::write(path, self.content())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Saved {}", path.display());
        Ok(())
    }

    pub fn content(&self) -> String {
        self.rope.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn slice(&self, range: &CharIndexRange) -> anyhow::Result<Rope> {
        let slice = self
            .rope
            .get_slice(range.as_usize_range())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Range {range} is out of bounds for a document of {} chars",
                    self.len_chars()
                )
            })?;
        Ok(slice.into())
    }

    /// Replace the selections. An empty list clears them.
    ///
    /// Reversed ranges are flipped, and overlapping ranges are merged into
    /// their union, so the stored selections are sorted and disjoint.
    pub fn set_selections(&mut self, ranges: Vec<CharIndexRange>) -> anyhow::Result<()> {
        let ranges = merge_overlapping(ranges.iter().map(CharIndexRange::normalized));
        if let Some(range) = ranges
            .iter()
            .find(|range| range.end.0 > self.len_chars())
        {
            return Err(anyhow::anyhow!(
                "Selection {range} is out of bounds for a document of {} chars",
                self.len_chars()
            ));
        }
        self.selection_set = SelectionSet::from_ranges(ranges);
        Ok(())
    }

    pub fn selection_ranges(&self) -> Vec<CharIndexRange> {
        self.selection_set
            .as_ref()
            .map(|selection_set| selection_set.ranges())
            .unwrap_or_default()
    }

    /// The selections, or the whole document when nothing is selected.
    pub fn regions(&self) -> Vec<Region> {
        select_regions(self.len_chars(), &self.selection_ranges())
    }

    /// Rewrite every region with `mapping` as one undoable edit.
    ///
    /// Returns how many regions changed. Nothing is recorded when no region
    /// changes.
    pub fn swap_regions(&mut self, mapping: &SwapMapping) -> anyhow::Result<usize> {
        let selections = self.selection_ranges();
        let regions = select_regions(self.len_chars(), &selections);
        let follows_selections = regions == selections;
        let edits = regions
            .into_iter()
            .map(|region| {
                let old = self.slice(&region)?;
                let new = Rope::from_str(&mapping.swap(&old.to_string()));
                Ok(Edit::new(region, old, new))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        let changed = edits.iter().filter(|edit| edit.old != edit.new).count();
        let transaction = EditTransaction::from_edits(edits);
        if transaction.is_noop() {
            log::info!("Buffer::swap_regions: nothing to swap for {mapping}");
            return Ok(0);
        }
        let ranges = self.apply_edit_transaction(transaction)?;
        if follows_selections {
            self.selection_set = SelectionSet::from_ranges(ranges);
        }
        Ok(changed)
    }

    fn apply_edit_transaction(
        &mut self,
        transaction: EditTransaction,
    ) -> anyhow::Result<Vec<CharIndexRange>> {
        // Only valid transactions enter the history.
        transaction.validate(&self.rope)?;
        let edit = OldNew {
            new_to_old: transaction.inverse(),
            old_to_new: transaction,
        };
        let ranges = self.undo_tree.edit(&mut self.rope, edit)?;
        self.clamp_selections();
        Ok(ranges)
    }

    fn clamp_selections(&mut self) {
        let max = CharIndex(self.len_chars());
        self.selection_set = self
            .selection_set
            .take()
            .map(|selection_set| selection_set.clamp(max));
    }

    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> anyhow::Result<bool> {
        let undone = self.undo_tree.undo(&mut self.rope)?.is_some();
        self.clamp_selections();
        Ok(undone)
    }

    /// Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> anyhow::Result<bool> {
        let redone = self.undo_tree.redo(&mut self.rope)?.is_some();
        self.clamp_selections();
        Ok(redone)
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("path", &self.path)
            .field(
                "selections",
                &self.selection_ranges().iter().map(|range| range.to_string()).join(", "),
            )
            .field("len_chars", &self.len_chars())
            .finish()
    }
}
