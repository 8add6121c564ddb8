//! Client-side ticking tables.
//!
//! A ticking table mirrors a server-side table that changes over time. The
//! server streams updates in *key space* (sparse, stable row keys); the client
//! stores column values densely in *index space* (row `i` belongs to the
//! `i`-th smallest present key). This crate holds the pieces that keep the two
//! in step:
//!
//! - [`SpaceMapper`]: translates key ranges to index positions.
//! - [`TickingTableState`]: applies a [`TableUpdate`] (removes, shifts, adds,
//!   modifies) to the mapper and the column stores and returns a
//!   [`TickingUpdate`] with before/after [`Table`] snapshots.
//! - [`Subscription`]: a worker thread that owns a state and delivers ticks
//!   to a [`TickingCallback`].

mod batch;
pub mod config;
pub mod schema;
pub mod shift;
pub mod space_mapper;
pub mod subscription;
pub mod table;
pub mod table_state;
pub mod ticking;
pub mod update;

pub use config::{SubscriptionConfig, TableStateConfig};
pub use schema::{ColumnDefinition, TableSchema};
pub use shift::ShiftSpec;
pub use space_mapper::SpaceMapper;
pub use subscription::{Subscription, SubscriptionHandle, TickingCallback, UpdateSender};
pub use table::Table;
pub use table_state::{Phase, TickingTableState};
pub use ticking::TickingUpdate;
pub use update::TableUpdate;

pub use ticktab_column_map::{ColumnChunk, ColumnStore, ColumnType, StorageBacking};
pub use ticktab_result::{Error, Result};
pub use ticktab_rowset::{RowKey, RowKeySet, RowKeySetBuilder};
