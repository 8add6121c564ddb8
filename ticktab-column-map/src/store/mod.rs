//! The ColumnStore API.

pub(crate) mod backing;
pub(crate) mod data;
mod export;
mod fill;
mod ingest;
mod slicing;

use arrow::array::{Array, ArrayRef};
use ticktab_result::{Error, Result};
use ticktab_rowset::{RowKey, RowKeySet};

use crate::chunk::ColumnChunk;
use crate::types::{ColumnType, StorageBacking};
use data::ColumnData;

/// Mutable storage for one column, in index-space order.
///
/// Row `i` of the column is the value of the `i`-th present key. The store
/// knows nothing about keys; callers translate through their space mapper.
///
/// Cloning (or [`ColumnStore::snapshot`]) produces an independent copy. With
/// [`StorageBacking::Persistent`] the copy shares structure with `self` and
/// costs O(1); with [`StorageBacking::Array`] every value is copied.
#[derive(Debug, Clone)]
pub struct ColumnStore {
    column_type: ColumnType,
    data: ColumnData,
}

impl ColumnStore {
    /// An empty column.
    pub fn new(column_type: ColumnType, backing: StorageBacking) -> Self {
        let data = ColumnData::empty(&column_type, backing);
        Self { column_type, data }
    }

    /// A column holding the values of `array`. The column type is derived
    /// from the Arrow type.
    pub fn from_arrow(array: &dyn Array, backing: StorageBacking) -> Result<Self> {
        let column_type = ColumnType::from_arrow(array.data_type())?;
        let data = ingest::ingest(&column_type, array, backing)?;
        Ok(Self { column_type, data })
    }

    /// A column holding a copy of `chunk`.
    pub fn from_chunk(chunk: ColumnChunk, backing: StorageBacking) -> Self {
        let (column_type, data) = chunk.into_parts();
        Self {
            column_type,
            data: data.into_kind(backing),
        }
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    pub fn backing(&self) -> StorageBacking {
        self.data.kind()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Independent copy of the current contents.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// The first `n` rows as a new store; `self` is unchanged.
    pub fn take(&self, n: usize) -> Result<ColumnStore> {
        self.check_prefix(n)?;
        Ok(Self {
            column_type: self.column_type.clone(),
            data: self.data.take(n),
        })
    }

    /// Remove the first `n` rows.
    pub fn drop_in_place(&mut self, n: usize) -> Result<()> {
        self.check_prefix(n)?;
        self.data.drop_front(n);
        Ok(())
    }

    /// Append the rows of `other`, consuming it. The backing of `self` wins.
    pub fn append_in_place(&mut self, other: ColumnStore) -> Result<()> {
        self.check_type(&other.column_type)?;
        self.data.append(other.data)
    }

    /// Append the rows of `chunk`, consuming it.
    pub fn append_chunk_in_place(&mut self, chunk: ColumnChunk) -> Result<()> {
        self.check_type(chunk.column_type())?;
        let (_, data) = chunk.into_parts();
        self.data.append(data)
    }

    /// Convert `array` to this column's representation and append it.
    pub fn append_foreign_in_place(&mut self, array: &dyn Array) -> Result<()> {
        let data = ingest::ingest(&self.column_type, array, self.backing())?;
        self.data.append(data)
    }

    /// Copy the values at `rows` (ascending) into `dest[0..rows.len()]`.
    pub fn fill_ordered(&self, rows: &RowKeySet, dest: &mut ColumnChunk) -> Result<()> {
        self.check_type(dest.column_type())?;
        fill::fill_ordered(&self.data, rows, dest.data_mut())
    }

    /// Copy the values at `rows`, in list order, into `dest[0..rows.len()]`.
    pub fn fill_unordered(&self, rows: &[RowKey], dest: &mut ColumnChunk) -> Result<()> {
        self.check_type(dest.column_type())?;
        fill::fill_unordered(&self.data, rows, dest.data_mut())
    }

    /// Write `src[0..rows.len()]` at the positions in `rows` (ascending),
    /// padding with nulls when a position lies past the end.
    pub fn fill_from_chunk(&mut self, src: &ColumnChunk, rows: &RowKeySet) -> Result<()> {
        self.check_type(src.column_type())?;
        fill::fill_from(&mut self.data, src.data(), rows)
    }

    /// Unordered counterpart of [`ColumnStore::fill_from_chunk`].
    pub fn fill_from_chunk_unordered(&mut self, src: &ColumnChunk, rows: &[RowKey]) -> Result<()> {
        self.check_type(src.column_type())?;
        fill::fill_from_unordered(&mut self.data, src.data(), rows)
    }

    /// Export the column as an Arrow array of the canonical type.
    pub fn to_arrow(&self) -> Result<ArrayRef> {
        export::export(&self.column_type, &self.data)
    }

    fn check_prefix(&self, n: usize) -> Result<()> {
        if n > self.len() {
            return Err(Error::IndexOutOfRangeError {
                index: n as u64,
                len: self.len() as u64,
            });
        }
        Ok(())
    }

    fn check_type(&self, other: &ColumnType) -> Result<()> {
        if &self.column_type != other {
            return Err(Error::type_mismatch(&self.column_type, other));
        }
        Ok(())
    }
}

pub(crate) use export::export as export_column_data;
pub(crate) use ingest::ingest as ingest_column_data;
