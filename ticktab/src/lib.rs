//! ticktab: client-side ticking tables
//!
//! This crate is the entrypoint for the ticktab workspace. It re-exports the
//! table state machine, the subscription worker and the storage types from
//! the underlying `ticktab-*` crates.
//!
//! # Quick Start
//!
//! Build a table, apply one update and read the result:
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Int64Array};
//! use arrow::datatypes::{DataType, Field, Schema};
//! use ticktab::{RowKeySet, TableStateConfig, TableUpdate, TickingTableState};
//!
//! let schema = Schema::new(vec![Field::new("Val", DataType::Int64, true)]);
//! let mut state = TickingTableState::from_arrow_schema(&schema, TableStateConfig::default())?;
//!
//! let values: ArrayRef = Arc::new(Int64Array::from(vec![10, 20, 30]));
//! let update = TableUpdate::new().with_added(RowKeySet::from_range(100, 103), vec![vec![values]]);
//! let ticking = state.apply_update(update)?;
//!
//! assert_eq!(ticking.current().num_rows(), 3);
//! assert_eq!(ticking.added().to_string(), "[0..2]");
//! # Ok::<(), ticktab::Error>(())
//! ```
//!
//! # Architecture
//!
//! - **Row keys** (`ticktab-rowset`): immutable sets of 64-bit keys stored as runs.
//! - **Storage** (`ticktab-column-map`): typed columns backed by a `Vec` or a
//!   persistent vector, with Arrow ingest and export.
//! - **State** (`ticktab-table`): key/index mapping, update application,
//!   snapshots and the subscription worker.

pub use ticktab_table::{
    ColumnDefinition, Phase, ShiftSpec, SpaceMapper, Subscription, SubscriptionConfig,
    SubscriptionHandle, Table, TableSchema, TableStateConfig, TableUpdate, TickingCallback,
    TickingTableState, TickingUpdate, UpdateSender,
};

pub mod storage {
    //! Column storage types.
    //!
    //! Useful when filling subscriber-owned buffers from a snapshot with
    //! [`Table::fill_column`](crate::Table::fill_column).

    pub use ticktab_column_map::{ColumnChunk, ColumnStore, ColumnType, StorageBacking};
}

pub use storage::{ColumnChunk, ColumnStore, ColumnType, StorageBacking};
pub use ticktab_result::{Error, Result};
pub use ticktab_rowset::{RowKey, RowKeySet, RowKeySetBuilder};
