//! Typed, spliceable column storage for ticking tables.
//!
//! A [`ColumnStore`] holds the values of one table column in index-space
//! order. It supports the handful of bulk operations an incremental update
//! needs (take, drop, append, fill by row set) under two interchangeable
//! backings:
//!
//! - [`StorageBacking::Array`]: a plain `Vec`. Snapshots are full copies.
//! - [`StorageBacking::Persistent`]: an `im::Vector` RRB tree. Snapshots are
//!   O(1) structural shares and splits/concats are O(log n).
//!
//! Element types form a closed set ([`ColumnType`]); dispatch over them is a
//! `match` on a tagged union, never a visitor.

pub mod chunk;
pub mod store;
pub mod types;

pub use chunk::ColumnChunk;
pub use store::ColumnStore;
pub use ticktab_result::{Error, Result};
pub use types::{ColumnType, StorageBacking};

/// Invokes `$macro` once for every column type whose values are a single Arrow
/// primitive. Used to generate the per-type arms of Arrow ingest and export
/// without a trait object in the loop.
///
/// The callback receives, per invocation:
///
/// ```text
/// $macro!(
///     $variant,      // ColumnType / ColumnData variant (e.g. Int64)
///     $physical_ty,  // canonical Arrow physical type (e.g. arrow::datatypes::Int64Type)
///     $array_ty,     // canonical Arrow array type (e.g. arrow::array::Int64Array)
///     $native_ty     // Rust element type stored in the column (e.g. i64)
/// );
/// ```
#[macro_export]
macro_rules! ticktab_for_each_primitive_column {
    ($macro:ident) => {
        $macro!(
            Int8,
            arrow::datatypes::Int8Type,
            arrow::array::Int8Array,
            i8
        );
        $macro!(
            Int16,
            arrow::datatypes::Int16Type,
            arrow::array::Int16Array,
            i16
        );
        $macro!(
            Int32,
            arrow::datatypes::Int32Type,
            arrow::array::Int32Array,
            i32
        );
        $macro!(
            Int64,
            arrow::datatypes::Int64Type,
            arrow::array::Int64Array,
            i64
        );
        $macro!(
            Float32,
            arrow::datatypes::Float32Type,
            arrow::array::Float32Array,
            f32
        );
        $macro!(
            Float64,
            arrow::datatypes::Float64Type,
            arrow::array::Float64Array,
            f64
        );
        $macro!(
            Char16,
            arrow::datatypes::UInt16Type,
            arrow::array::UInt16Array,
            u16
        );
        $macro!(
            Timestamp,
            arrow::datatypes::TimestampNanosecondType,
            arrow::array::TimestampNanosecondArray,
            i64
        );
        $macro!(
            Date,
            arrow::datatypes::Date64Type,
            arrow::array::Date64Array,
            i64
        );
        $macro!(
            Time,
            arrow::datatypes::Time64NanosecondType,
            arrow::array::Time64NanosecondArray,
            i64
        );
    };
}
