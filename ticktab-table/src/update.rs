//! Decoded update messages.

use arrow::array::ArrayRef;
use ticktab_rowset::RowKeySet;

use crate::shift::ShiftSpec;

/// One decoded update message, in key space.
///
/// Batches are lists of Arrow arrays with one entry per table column. The
/// concatenation of all add batches holds one row per key of `added`, in
/// ascending key order; mod batches hold, per column `i`, one row per key of
/// `modified[i]`. A message carries add batches or mod batches, never both.
#[derive(Debug, Clone, Default)]
pub struct TableUpdate {
    pub removed: RowKeySet,
    pub shifts: ShiftSpec,
    pub added: RowKeySet,
    pub add_batches: Vec<Vec<ArrayRef>>,
    /// Per-column modified keys. Empty, or exactly one entry per column.
    pub modified: Vec<RowKeySet>,
    pub mod_batches: Vec<Vec<ArrayRef>>,
}

impl TableUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_removed(mut self, removed: RowKeySet) -> Self {
        self.removed = removed;
        self
    }

    pub fn with_shifts(mut self, shifts: ShiftSpec) -> Self {
        self.shifts = shifts;
        self
    }

    /// Keys added by this update, with their column values.
    pub fn with_added(mut self, added: RowKeySet, batches: Vec<Vec<ArrayRef>>) -> Self {
        self.added = added;
        self.add_batches = batches;
        self
    }

    /// Per-column modified keys, with their new values.
    pub fn with_modified(mut self, modified: Vec<RowKeySet>, batches: Vec<Vec<ArrayRef>>) -> Self {
        self.modified = modified;
        self.mod_batches = batches;
        self
    }

    /// True when applying the update cannot change the table.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
            && self.shifts.is_empty()
            && self.added.is_empty()
            && self.modified.iter().all(RowKeySet::is_empty)
    }
}
