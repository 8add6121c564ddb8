//! Incremental table state: applies one update at a time and emits the
//! before/after snapshots subscribers consume.
//!
//! # Update order
//!
//! Every update is applied in the fixed order removes, shifts, adds,
//! modifies. Removes and shifts are in the key space that existed before the
//! update; adds and modifies are in the key space after the shifts.
//!
//! # Failure handling
//!
//! An update is validated in full before the live state is touched: the
//! batches are converted to column chunks and every key-space operation is
//! rehearsed on a copy of the space mapper. Any error found that way leaves
//! the state exactly as it was. An error raised after mutation has started
//! marks the state poisoned and every later update fails with
//! [`Error::PoisonedError`].

use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::Schema;
use ticktab_column_map::{ColumnChunk, ColumnStore};
use ticktab_result::{Error, Result};
use ticktab_rowset::RowKeySet;

use crate::batch::{parse_add_batches, parse_mod_batches};
use crate::config::TableStateConfig;
use crate::schema::TableSchema;
use crate::shift::ShiftSpec;
use crate::space_mapper::SpaceMapper;
use crate::table::Table;
use crate::ticking::TickingUpdate;
use crate::update::TableUpdate;

/// Where an update application currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    ApplyingRemoves,
    ApplyingShifts,
    ApplyingAdds,
    ApplyingModifies,
}

/// Everything an update needs, checked and converted before mutation.
struct UpdatePlan {
    removed: RowKeySet,
    shifts: ShiftSpec,
    added: RowKeySet,
    add_chunks: Vec<ColumnChunk>,
    /// Per column, in index space. Empty when nothing is modified.
    modified_rows: Vec<RowKeySet>,
    mod_chunks: Vec<ColumnChunk>,
    removed_rows: RowKeySet,
    added_rows: RowKeySet,
    final_len: u64,
}

pub struct TickingTableState {
    schema: Arc<TableSchema>,
    config: TableStateConfig,
    mapper: SpaceMapper,
    columns: Vec<ColumnStore>,
    phase: Phase,
    poisoned: bool,
}

impl TickingTableState {
    /// An empty table with the given columns.
    pub fn new(schema: TableSchema, config: TableStateConfig) -> Self {
        let columns = schema
            .columns()
            .iter()
            .map(|c| ColumnStore::new(c.column_type().clone(), config.backing))
            .collect();
        Self {
            schema: Arc::new(schema),
            config,
            mapper: SpaceMapper::new(),
            columns,
            phase: Phase::Idle,
            poisoned: false,
        }
    }

    /// An empty table whose columns follow an Arrow schema.
    pub fn from_arrow_schema(schema: &Schema, config: TableStateConfig) -> Result<Self> {
        Ok(Self::new(TableSchema::from_arrow(schema)?, config))
    }

    /// A table pre-populated with `keys` and their values, applied as an
    /// add-only update.
    pub fn with_initial_data(
        schema: TableSchema,
        config: TableStateConfig,
        keys: RowKeySet,
        batches: Vec<Vec<ArrayRef>>,
    ) -> Result<Self> {
        let mut state = Self::new(schema, config);
        state.apply_update(TableUpdate::new().with_added(keys, batches))?;
        Ok(state)
    }

    pub fn schema(&self) -> &Arc<TableSchema> {
        &self.schema
    }

    pub fn config(&self) -> &TableStateConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    pub fn num_rows(&self) -> u64 {
        self.mapper.len()
    }

    /// The keys currently present, ascending. Row `i` belongs to the `i`-th key.
    pub fn row_keys(&self) -> Result<RowKeySet> {
        self.mapper.row_keys()
    }

    /// Independent snapshot of the current contents.
    pub fn snapshot(&self) -> Table {
        let columns = self.columns.iter().map(ColumnStore::snapshot).collect();
        Table::new(Arc::clone(&self.schema), columns, self.mapper.len())
    }

    /// Apply one update and describe what changed.
    ///
    /// Fails without changing anything when the update is malformed or refers
    /// to keys in a way the current state cannot satisfy.
    pub fn apply_update(&mut self, update: TableUpdate) -> Result<TickingUpdate> {
        if self.poisoned {
            return Err(Error::PoisonedError);
        }
        let plan = self.prepare(update)?;
        match self.execute(plan) {
            Ok(ticking) => Ok(ticking),
            Err(err) => {
                tracing::error!(phase = ?self.phase, error = %err, "update failed mid-apply; state poisoned");
                self.poisoned = true;
                self.phase = Phase::Idle;
                Err(err)
            }
        }
    }

    /// Validate `update` against the current state without mutating it.
    fn prepare(&self, update: TableUpdate) -> Result<UpdatePlan> {
        let TableUpdate {
            removed,
            shifts,
            added,
            add_batches,
            modified,
            mod_batches,
        } = update;

        if !add_batches.is_empty() && !mod_batches.is_empty() {
            return Err(Error::protocol("message has both add and mod batches"));
        }
        shifts.validate()?;
        let add_chunks = parse_add_batches(&self.schema, &added, &add_batches)?;
        let mod_chunks = parse_mod_batches(&self.schema, &modified, &mod_batches)?;

        let mut staging = self.mapper.clone();
        let removed_rows = staging.keys_to_index_space(&removed)?;
        removed.try_for_each_run(|first, last| staging.erase_range(first, last + 1).map(drop))?;
        shifts.for_each_shift(|begin, end, dest| staging.apply_shift(begin, end, dest))?;
        added.try_for_each_run(|first, last| staging.add_range(first, last + 1).map(drop))?;
        let added_rows = staging.keys_to_index_space(&added)?;
        let modified_rows = modified
            .iter()
            .map(|keys| staging.keys_to_index_space(keys))
            .collect::<Result<Vec<_>>>()?;

        Ok(UpdatePlan {
            removed,
            shifts,
            added,
            add_chunks,
            modified_rows,
            mod_chunks,
            removed_rows,
            added_rows,
            final_len: staging.len(),
        })
    }

    fn execute(&mut self, plan: UpdatePlan) -> Result<TickingUpdate> {
        let UpdatePlan {
            removed,
            shifts,
            added,
            mut add_chunks,
            modified_rows,
            mod_chunks,
            removed_rows,
            added_rows,
            final_len,
        } = plan;

        self.enter(Phase::ApplyingRemoves);
        let before_removes = self.snapshot();
        removed.try_for_each_run(|first, last| {
            let index = self.mapper.erase_range(first, last + 1)?;
            let width = last + 1 - first;
            for column in &mut self.columns {
                splice_out(column, to_usize(index)?, to_usize(width)?)?;
            }
            Ok::<(), Error>(())
        })?;

        self.enter(Phase::ApplyingShifts);
        shifts.for_each_shift(|begin, end, dest| self.mapper.apply_shift(begin, end, dest))?;

        self.enter(Phase::ApplyingAdds);
        let before_modifies = self.snapshot();
        added.try_for_each_run(|first, last| {
            let index = self.mapper.add_range(first, last + 1)?;
            let width = to_usize(last + 1 - first)?;
            for (column, chunk) in self.columns.iter_mut().zip(add_chunks.iter_mut()) {
                let piece = chunk.take(width)?;
                chunk.drop_in_place(width)?;
                splice_in(column, to_usize(index)?, piece)?;
            }
            Ok::<(), Error>(())
        })?;

        self.enter(Phase::ApplyingModifies);
        for ((column, rows), chunk) in self
            .columns
            .iter_mut()
            .zip(&modified_rows)
            .zip(&mod_chunks)
        {
            column.fill_from_chunk(chunk, rows)?;
        }

        self.enter(Phase::Idle);
        if self.mapper.len() != final_len {
            return Err(Error::Internal(format!(
                "applied update left {} keys, planned {final_len}",
                self.mapper.len()
            )));
        }
        if self.config.verify_invariants {
            self.verify_invariants()?;
        }
        let current = self.snapshot();

        tracing::debug!(
            removed = removed_rows.len(),
            added = added_rows.len(),
            modified = modified_rows.iter().map(RowKeySet::len).sum::<u64>(),
            shifts = shifts.len(),
            rows = current.num_rows(),
            "applied update"
        );

        Ok(TickingUpdate::new(
            before_removes,
            before_modifies,
            current,
            removed_rows,
            modified_rows,
            added_rows,
        ))
    }

    fn enter(&mut self, phase: Phase) {
        tracing::trace!(from = ?self.phase, to = ?phase, "phase transition");
        self.phase = phase;
    }

    /// Every column holds exactly one row per present key.
    fn verify_invariants(&self) -> Result<()> {
        let expected = self.mapper.len();
        for (index, column) in self.columns.iter().enumerate() {
            if column.len() as u64 != expected {
                return Err(Error::Internal(format!(
                    "column {index} has {} rows but {expected} keys are present",
                    column.len()
                )));
            }
        }
        Ok(())
    }
}

/// Remove `width` rows starting at `index`.
fn splice_out(column: &mut ColumnStore, index: usize, width: usize) -> Result<()> {
    let head = column.take(index)?;
    column.drop_in_place(index + width)?;
    let tail = std::mem::replace(column, head);
    column.append_in_place(tail)
}

/// Insert the rows of `piece` so that its first row lands at `index`.
fn splice_in(column: &mut ColumnStore, index: usize, piece: ColumnChunk) -> Result<()> {
    let head = column.take(index)?;
    column.drop_in_place(index)?;
    let tail = std::mem::replace(column, head);
    column.append_chunk_in_place(piece)?;
    column.append_in_place(tail)
}

fn to_usize(value: u64) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| Error::Internal(format!("row position {value} does not fit in usize")))
}
