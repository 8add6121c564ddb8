//! The result of applying one update.

use ticktab_rowset::RowKeySet;

use crate::table::Table;

/// Snapshots around one applied update plus the rows it touched.
///
/// Every row set is in the index space of the snapshot it describes:
///
/// | row set | snapshot |
/// |---|---|
/// | [`removed`](Self::removed) | [`before_removes`](Self::before_removes) |
/// | [`modified`](Self::modified) | [`before_modifies`](Self::before_modifies) and [`current`](Self::current) |
/// | [`added`](Self::added) | [`current`](Self::current) |
///
/// so the removed, old and new values can be read straight out of the
/// matching snapshot with [`Table::fill_column`].
#[derive(Debug, Clone)]
pub struct TickingUpdate {
    before_removes: Table,
    before_modifies: Table,
    current: Table,
    removed: RowKeySet,
    modified: Vec<RowKeySet>,
    added: RowKeySet,
}

impl TickingUpdate {
    pub(crate) fn new(
        before_removes: Table,
        before_modifies: Table,
        current: Table,
        removed: RowKeySet,
        modified: Vec<RowKeySet>,
        added: RowKeySet,
    ) -> Self {
        Self {
            before_removes,
            before_modifies,
            current,
            removed,
            modified,
            added,
        }
    }

    /// The table before anything in the update was applied.
    pub fn before_removes(&self) -> &Table {
        &self.before_removes
    }

    /// The table after removes and shifts, before adds and modifies.
    pub fn before_modifies(&self) -> &Table {
        &self.before_modifies
    }

    /// The table after the whole update.
    pub fn current(&self) -> &Table {
        &self.current
    }

    pub fn removed(&self) -> &RowKeySet {
        &self.removed
    }

    /// Modified rows of each column. Empty when the update modified nothing.
    pub fn modified(&self) -> &[RowKeySet] {
        &self.modified
    }

    pub fn added(&self) -> &RowKeySet {
        &self.added
    }
}
