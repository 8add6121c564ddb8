//! Column element types and storage backings.

use std::fmt;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, TimeUnit};
use ticktab_result::{Error, Result};

/// Name Arrow gives the child field of a list type.
pub const LIST_ITEM_FIELD_NAME: &str = "item";

/// Logical element type of a column.
///
/// Every element is nullable. Temporal values are stored as integers with a
/// fixed unit regardless of the unit they arrived in:
///
/// | variant | stored as | canonical Arrow type |
/// |---|---|---|
/// | `Timestamp` | `i64` ns since the epoch | `Timestamp(Nanosecond, None)` |
/// | `Date` | `i64` ms since the epoch | `Date64` |
/// | `Time` | `i64` ns since midnight | `Time64(Nanosecond)` |
/// | `Char16` | `u16` UTF-16 code unit | `UInt16` |
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Char16,
    Utf8,
    Timestamp,
    Date,
    Time,
    /// Nested list whose elements have the given type.
    List(Box<ColumnType>),
}

impl ColumnType {
    /// Map an Arrow type onto the column type that can hold it.
    ///
    /// Several Arrow encodings collapse onto one column type (`Utf8` and
    /// `LargeUtf8`, every timestamp unit, `Date32` and `Date64`, ...). Types
    /// with no column mapping fail with [`Error::NotYetImplementedError`].
    pub fn from_arrow(data_type: &DataType) -> Result<Self> {
        Ok(match data_type {
            DataType::Boolean => ColumnType::Bool,
            DataType::Int8 => ColumnType::Int8,
            DataType::Int16 => ColumnType::Int16,
            DataType::Int32 => ColumnType::Int32,
            DataType::Int64 => ColumnType::Int64,
            DataType::Float32 => ColumnType::Float32,
            DataType::Float64 => ColumnType::Float64,
            DataType::UInt16 => ColumnType::Char16,
            DataType::Utf8 | DataType::LargeUtf8 => ColumnType::Utf8,
            DataType::Timestamp(_, _) => ColumnType::Timestamp,
            DataType::Date32 | DataType::Date64 => ColumnType::Date,
            DataType::Time32(_) | DataType::Time64(_) => ColumnType::Time,
            DataType::List(field) | DataType::LargeList(field) => {
                ColumnType::List(Box::new(ColumnType::from_arrow(field.data_type())?))
            }
            other => {
                return Err(Error::NotYetImplementedError(format!(
                    "no column mapping for Arrow type {other}"
                )));
            }
        })
    }

    /// The canonical Arrow type used when exporting this column.
    pub fn to_arrow(&self) -> DataType {
        match self {
            ColumnType::Bool => DataType::Boolean,
            ColumnType::Int8 => DataType::Int8,
            ColumnType::Int16 => DataType::Int16,
            ColumnType::Int32 => DataType::Int32,
            ColumnType::Int64 => DataType::Int64,
            ColumnType::Float32 => DataType::Float32,
            ColumnType::Float64 => DataType::Float64,
            ColumnType::Char16 => DataType::UInt16,
            ColumnType::Utf8 => DataType::Utf8,
            ColumnType::Timestamp => DataType::Timestamp(TimeUnit::Nanosecond, None),
            ColumnType::Date => DataType::Date64,
            ColumnType::Time => DataType::Time64(TimeUnit::Nanosecond),
            ColumnType::List(element) => DataType::List(Arc::new(Field::new(
                LIST_ITEM_FIELD_NAME,
                element.to_arrow(),
                true,
            ))),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::List(element) => write!(f, "List<{element}>"),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

/// Which container holds a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageBacking {
    /// Growable `Vec`. Cheapest to mutate; snapshots copy every value.
    Array,
    /// Persistent RRB vector. Snapshots share structure with the live column.
    #[default]
    Persistent,
}
