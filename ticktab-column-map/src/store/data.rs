//! Closed tagged union over the column element types.

use std::sync::Arc;

use arrow::array::ArrayRef;
use ticktab_result::{Error, Result};

use super::backing::Backing;
use crate::types::{ColumnType, StorageBacking};

/// Values of one column, one variant per [`ColumnType`].
///
/// `List` elements are Arrow arrays of the canonical element type.
#[derive(Debug, Clone)]
pub(crate) enum ColumnData {
    Bool(Backing<bool>),
    Int8(Backing<i8>),
    Int16(Backing<i16>),
    Int32(Backing<i32>),
    Int64(Backing<i64>),
    Float32(Backing<f32>),
    Float64(Backing<f64>),
    Char16(Backing<u16>),
    Utf8(Backing<Arc<str>>),
    Timestamp(Backing<i64>),
    Date(Backing<i64>),
    Time(Backing<i64>),
    List(Backing<ArrayRef>),
}

/// Run `$body` with `$b` bound to the backing of whichever variant `$data` is.
///
/// `$body` is expanded once per variant, so it must type-check for every
/// element type.
macro_rules! with_column_data {
    ($data:expr, $b:ident => $body:expr) => {
        match $data {
            $crate::store::data::ColumnData::Bool($b) => $body,
            $crate::store::data::ColumnData::Int8($b) => $body,
            $crate::store::data::ColumnData::Int16($b) => $body,
            $crate::store::data::ColumnData::Int32($b) => $body,
            $crate::store::data::ColumnData::Int64($b) => $body,
            $crate::store::data::ColumnData::Float32($b) => $body,
            $crate::store::data::ColumnData::Float64($b) => $body,
            $crate::store::data::ColumnData::Char16($b) => $body,
            $crate::store::data::ColumnData::Utf8($b) => $body,
            $crate::store::data::ColumnData::Timestamp($b) => $body,
            $crate::store::data::ColumnData::Date($b) => $body,
            $crate::store::data::ColumnData::Time($b) => $body,
            $crate::store::data::ColumnData::List($b) => $body,
        }
    };
}

/// Like [`with_column_data!`] but `$body` yields a new backing that is wrapped
/// back into the same variant.
macro_rules! map_column_data {
    ($data:expr, $b:ident => $body:expr) => {
        match $data {
            $crate::store::data::ColumnData::Bool($b) => $crate::store::data::ColumnData::Bool($body),
            $crate::store::data::ColumnData::Int8($b) => $crate::store::data::ColumnData::Int8($body),
            $crate::store::data::ColumnData::Int16($b) => $crate::store::data::ColumnData::Int16($body),
            $crate::store::data::ColumnData::Int32($b) => $crate::store::data::ColumnData::Int32($body),
            $crate::store::data::ColumnData::Int64($b) => $crate::store::data::ColumnData::Int64($body),
            $crate::store::data::ColumnData::Float32($b) => {
                $crate::store::data::ColumnData::Float32($body)
            }
            $crate::store::data::ColumnData::Float64($b) => {
                $crate::store::data::ColumnData::Float64($body)
            }
            $crate::store::data::ColumnData::Char16($b) => $crate::store::data::ColumnData::Char16($body),
            $crate::store::data::ColumnData::Utf8($b) => $crate::store::data::ColumnData::Utf8($body),
            $crate::store::data::ColumnData::Timestamp($b) => {
                $crate::store::data::ColumnData::Timestamp($body)
            }
            $crate::store::data::ColumnData::Date($b) => $crate::store::data::ColumnData::Date($body),
            $crate::store::data::ColumnData::Time($b) => $crate::store::data::ColumnData::Time($body),
            $crate::store::data::ColumnData::List($b) => $crate::store::data::ColumnData::List($body),
        }
    };
}

/// Pairwise dispatch over two values of the same variant; `$mismatch` is
/// evaluated when the variants differ.
macro_rules! zip_column_data {
    ($lhs:expr, $rhs:expr, ($a:ident, $b:ident) => $body:expr, _ => $mismatch:expr) => {
        match ($lhs, $rhs) {
            (
                $crate::store::data::ColumnData::Bool($a),
                $crate::store::data::ColumnData::Bool($b),
            ) => $body,
            (
                $crate::store::data::ColumnData::Int8($a),
                $crate::store::data::ColumnData::Int8($b),
            ) => $body,
            (
                $crate::store::data::ColumnData::Int16($a),
                $crate::store::data::ColumnData::Int16($b),
            ) => $body,
            (
                $crate::store::data::ColumnData::Int32($a),
                $crate::store::data::ColumnData::Int32($b),
            ) => $body,
            (
                $crate::store::data::ColumnData::Int64($a),
                $crate::store::data::ColumnData::Int64($b),
            ) => $body,
            (
                $crate::store::data::ColumnData::Float32($a),
                $crate::store::data::ColumnData::Float32($b),
            ) => $body,
            (
                $crate::store::data::ColumnData::Float64($a),
                $crate::store::data::ColumnData::Float64($b),
            ) => $body,
            (
                $crate::store::data::ColumnData::Char16($a),
                $crate::store::data::ColumnData::Char16($b),
            ) => $body,
            (
                $crate::store::data::ColumnData::Utf8($a),
                $crate::store::data::ColumnData::Utf8($b),
            ) => $body,
            (
                $crate::store::data::ColumnData::Timestamp($a),
                $crate::store::data::ColumnData::Timestamp($b),
            ) => $body,
            (
                $crate::store::data::ColumnData::Date($a),
                $crate::store::data::ColumnData::Date($b),
            ) => $body,
            (
                $crate::store::data::ColumnData::Time($a),
                $crate::store::data::ColumnData::Time($b),
            ) => $body,
            (
                $crate::store::data::ColumnData::List($a),
                $crate::store::data::ColumnData::List($b),
            ) => $body,
            #[allow(unreachable_patterns)]
            _ => $mismatch,
        }
    };
}

impl ColumnData {
    /// `len` nulls of the given type.
    pub(crate) fn nulls(column_type: &ColumnType, kind: StorageBacking, len: usize) -> Self {
        match column_type {
            ColumnType::Bool => ColumnData::Bool(Backing::nulls(kind, len)),
            ColumnType::Int8 => ColumnData::Int8(Backing::nulls(kind, len)),
            ColumnType::Int16 => ColumnData::Int16(Backing::nulls(kind, len)),
            ColumnType::Int32 => ColumnData::Int32(Backing::nulls(kind, len)),
            ColumnType::Int64 => ColumnData::Int64(Backing::nulls(kind, len)),
            ColumnType::Float32 => ColumnData::Float32(Backing::nulls(kind, len)),
            ColumnType::Float64 => ColumnData::Float64(Backing::nulls(kind, len)),
            ColumnType::Char16 => ColumnData::Char16(Backing::nulls(kind, len)),
            ColumnType::Utf8 => ColumnData::Utf8(Backing::nulls(kind, len)),
            ColumnType::Timestamp => ColumnData::Timestamp(Backing::nulls(kind, len)),
            ColumnType::Date => ColumnData::Date(Backing::nulls(kind, len)),
            ColumnType::Time => ColumnData::Time(Backing::nulls(kind, len)),
            ColumnType::List(_) => ColumnData::List(Backing::nulls(kind, len)),
        }
    }

    pub(crate) fn empty(column_type: &ColumnType, kind: StorageBacking) -> Self {
        Self::nulls(column_type, kind, 0)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        with_column_data!(self, b => b.len())
    }

    pub(crate) fn kind(&self) -> StorageBacking {
        with_column_data!(self, b => b.kind())
    }

    pub(crate) fn take(&self, n: usize) -> Self {
        map_column_data!(self, b => b.take(n))
    }

    pub(crate) fn drop_front(&mut self, n: usize) {
        with_column_data!(self, b => b.drop_front(n))
    }

    pub(crate) fn grow_to(&mut self, len: usize) {
        with_column_data!(self, b => b.grow_to(len))
    }

    pub(crate) fn into_kind(self, kind: StorageBacking) -> Self {
        map_column_data!(self, b => b.into_kind(kind))
    }

    /// Concatenate `other` onto the end. The variants must agree.
    pub(crate) fn append(&mut self, other: ColumnData) -> Result<()> {
        let found = other.variant_name();
        let expected = self.variant_name();
        zip_column_data!(self, other, (lhs, rhs) => {
            lhs.append(rhs);
            Ok(())
        }, _ => Err(Error::type_mismatch(expected, found)))
    }

    /// Copy `src[src_begin..src_end]` into `self[dest_begin..]`.
    pub(crate) fn copy_run_from(
        &mut self,
        dest_begin: usize,
        src: &ColumnData,
        src_begin: usize,
        src_end: usize,
    ) -> Result<()> {
        let found = src.variant_name();
        let expected = self.variant_name();
        zip_column_data!(self, src, (dest, src) => {
            dest.copy_run_from(dest_begin, src, src_begin, src_end);
            Ok(())
        }, _ => Err(Error::type_mismatch(expected, found)))
    }

    /// Copy the single element `src[src_index]` into `self[dest_index]`.
    pub(crate) fn copy_one_from(
        &mut self,
        dest_index: usize,
        src: &ColumnData,
        src_index: usize,
    ) -> Result<()> {
        self.copy_run_from(dest_index, src, src_index, src_index + 1)
    }

    fn variant_name(&self) -> &'static str {
        match self {
            ColumnData::Bool(_) => "Bool",
            ColumnData::Int8(_) => "Int8",
            ColumnData::Int16(_) => "Int16",
            ColumnData::Int32(_) => "Int32",
            ColumnData::Int64(_) => "Int64",
            ColumnData::Float32(_) => "Float32",
            ColumnData::Float64(_) => "Float64",
            ColumnData::Char16(_) => "Char16",
            ColumnData::Utf8(_) => "Utf8",
            ColumnData::Timestamp(_) => "Timestamp",
            ColumnData::Date(_) => "Date",
            ColumnData::Time(_) => "Time",
            ColumnData::List(_) => "List",
        }
    }
}
