//! Fixed-size transfer buffers for fills.

use arrow::array::{Array, ArrayRef};
use ticktab_result::{Error, Result};

use crate::store::data::ColumnData;
use crate::store::{export_column_data, ingest_column_data};
use crate::types::{ColumnType, StorageBacking};

/// A plain array of column values used as the source or destination of a
/// fill. Always array-backed.
///
/// A fresh chunk from [`ColumnChunk::new`] holds `len` nulls, ready to be
/// written by [`crate::ColumnStore::fill_ordered`].
#[derive(Debug, Clone)]
pub struct ColumnChunk {
    column_type: ColumnType,
    data: ColumnData,
}

impl ColumnChunk {
    pub fn new(column_type: ColumnType, len: usize) -> Self {
        let data = ColumnData::nulls(&column_type, StorageBacking::Array, len);
        Self { column_type, data }
    }

    pub fn from_arrow(array: &dyn Array) -> Result<Self> {
        let column_type = ColumnType::from_arrow(array.data_type())?;
        let data = ingest_column_data(&column_type, array, StorageBacking::Array)?;
        Ok(Self { column_type, data })
    }

    /// Like [`ColumnChunk::from_arrow`] but fails unless the array maps onto
    /// `column_type`.
    pub fn from_arrow_as(column_type: &ColumnType, array: &dyn Array) -> Result<Self> {
        let data = ingest_column_data(column_type, array, StorageBacking::Array)?;
        Ok(Self {
            column_type: column_type.clone(),
            data,
        })
    }

    pub fn to_arrow(&self) -> Result<ArrayRef> {
        export_column_data(&self.column_type, &self.data)
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenate `other` onto this chunk.
    pub fn append(&mut self, other: ColumnChunk) -> Result<()> {
        if self.column_type != other.column_type {
            return Err(Error::type_mismatch(&self.column_type, &other.column_type));
        }
        self.data.append(other.data)
    }

    /// The first `n` values as a new chunk.
    pub fn take(&self, n: usize) -> Result<ColumnChunk> {
        if n > self.len() {
            return Err(Error::IndexOutOfRangeError {
                index: n as u64,
                len: self.len() as u64,
            });
        }
        Ok(Self {
            column_type: self.column_type.clone(),
            data: self.data.take(n),
        })
    }

    /// Remove the first `n` values.
    pub fn drop_in_place(&mut self, n: usize) -> Result<()> {
        if n > self.len() {
            return Err(Error::IndexOutOfRangeError {
                index: n as u64,
                len: self.len() as u64,
            });
        }
        self.data.drop_front(n);
        Ok(())
    }

    pub(crate) fn data(&self) -> &ColumnData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut ColumnData {
        &mut self.data
    }

    pub(crate) fn into_parts(self) -> (ColumnType, ColumnData) {
        (self.column_type, self.data)
    }
}
