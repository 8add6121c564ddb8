//! Read-only table snapshots.

use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use ticktab_column_map::{ColumnChunk, ColumnStore};
use ticktab_result::{Error, Result};
use ticktab_rowset::RowKeySet;

use crate::schema::TableSchema;

/// Immutable view of a table at one point in its history.
///
/// Rows are addressed by index `0..num_rows`. A snapshot never observes later
/// updates to the state it was taken from. Cloning shares the columns.
#[derive(Debug, Clone)]
pub struct Table {
    schema: Arc<TableSchema>,
    columns: Arc<[ColumnStore]>,
    num_rows: u64,
}

impl Table {
    pub(crate) fn new(schema: Arc<TableSchema>, columns: Vec<ColumnStore>, num_rows: u64) -> Self {
        debug_assert_eq!(schema.num_columns(), columns.len());
        debug_assert!(columns.iter().all(|c| c.len() as u64 == num_rows));
        Self {
            schema,
            columns: Arc::from(columns),
            num_rows,
        }
    }

    #[inline]
    pub fn num_rows(&self) -> u64 {
        self.num_rows
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn schema(&self) -> &Arc<TableSchema> {
        &self.schema
    }

    pub fn column(&self, index: usize) -> Result<&ColumnStore> {
        self.columns.get(index).ok_or_else(|| {
            Error::InvalidArgumentError(format!(
                "column index {index} out of range for {} columns",
                self.columns.len()
            ))
        })
    }

    pub fn column_by_name(&self, name: &str) -> Result<&ColumnStore> {
        let index = self
            .schema
            .index_of(name)
            .ok_or_else(|| Error::InvalidArgumentError(format!("no column named '{name}'")))?;
        self.column(index)
    }

    /// Index of the column called `name`, if any.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.schema.index_of(name)
    }

    /// Copy the values of column `index` at `rows` into `dest`.
    pub fn fill_column(&self, index: usize, rows: &RowKeySet, dest: &mut ColumnChunk) -> Result<()> {
        self.column(index)?.fill_ordered(rows, dest)
    }

    /// Export column `index` as an Arrow array.
    pub fn column_to_arrow(&self, index: usize) -> Result<ArrayRef> {
        self.column(index)?.to_arrow()
    }

    /// Export the whole snapshot as one Arrow record batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let arrays = self
            .columns
            .iter()
            .map(ColumnStore::to_arrow)
            .collect::<Result<Vec<_>>>()?;
        let options = RecordBatchOptions::new().with_row_count(Some(self.num_rows as usize));
        Ok(RecordBatch::try_new_with_options(
            self.schema.to_arrow(),
            arrays,
            &options,
        )?)
    }
}
