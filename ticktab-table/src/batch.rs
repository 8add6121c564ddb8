//! Validation and conversion of the Arrow batches attached to an update.

use arrow::array::{Array, ArrayRef};
use ticktab_column_map::ColumnChunk;
use ticktab_result::{Error, Result};
use ticktab_rowset::RowKeySet;

use crate::schema::TableSchema;

/// Convert the add batches into one chunk per column.
///
/// Every batch must carry one array per column, all of the same length, and
/// the batches together must hold exactly `added.len()` rows.
pub(crate) fn parse_add_batches(
    schema: &TableSchema,
    added: &RowKeySet,
    batches: &[Vec<ArrayRef>],
) -> Result<Vec<ColumnChunk>> {
    for (batch_index, batch) in batches.iter().enumerate() {
        check_column_count(schema, batch, "add", batch_index)?;
        if let Some(first) = batch.first() {
            let expected = first.len();
            if let Some((column, array)) = batch
                .iter()
                .enumerate()
                .find(|(_, array)| array.len() != expected)
            {
                return Err(Error::protocol(format!(
                    "add batch {batch_index}: column {column} has {} rows, expected {expected}",
                    array.len()
                )));
            }
        }
    }

    let chunks = concat_columns(schema, batches)?;
    for (column, chunk) in chunks.iter().enumerate() {
        if chunk.len() as u64 != added.len() {
            return Err(Error::protocol(format!(
                "add data for column {column} has {} rows but {} keys were added",
                chunk.len(),
                added.len()
            )));
        }
    }
    Ok(chunks)
}

/// Convert the mod batches into one chunk per column.
///
/// `modified` is empty (no modifications) or holds one key set per column;
/// column `i` of the concatenated batches must hold `modified[i].len()` rows.
pub(crate) fn parse_mod_batches(
    schema: &TableSchema,
    modified: &[RowKeySet],
    batches: &[Vec<ArrayRef>],
) -> Result<Vec<ColumnChunk>> {
    if modified.is_empty() {
        if batches.iter().any(|batch| batch.iter().any(|a| !a.is_empty())) {
            return Err(Error::protocol(
                "mod batches carry data but no modified keys were sent",
            ));
        }
        return Ok(Vec::new());
    }
    if modified.len() != schema.num_columns() {
        return Err(Error::protocol(format!(
            "modified key sets: expected one per column ({}), got {}",
            schema.num_columns(),
            modified.len()
        )));
    }
    for (batch_index, batch) in batches.iter().enumerate() {
        check_column_count(schema, batch, "mod", batch_index)?;
    }

    let chunks = concat_columns(schema, batches)?;
    for (column, (chunk, keys)) in chunks.iter().zip(modified).enumerate() {
        if chunk.len() as u64 != keys.len() {
            return Err(Error::protocol(format!(
                "mod data for column {column} has {} rows but {} keys were modified",
                chunk.len(),
                keys.len()
            )));
        }
    }
    Ok(chunks)
}

fn check_column_count(
    schema: &TableSchema,
    batch: &[ArrayRef],
    kind: &str,
    batch_index: usize,
) -> Result<()> {
    if batch.len() != schema.num_columns() {
        return Err(Error::protocol(format!(
            "{kind} batch {batch_index}: expected {} columns, got {}",
            schema.num_columns(),
            batch.len()
        )));
    }
    Ok(())
}

/// Column `i` of the result is the concatenation of column `i` of every batch.
fn concat_columns(schema: &TableSchema, batches: &[Vec<ArrayRef>]) -> Result<Vec<ColumnChunk>> {
    schema
        .columns()
        .iter()
        .enumerate()
        .map(|(column, definition)| {
            let mut chunk = ColumnChunk::new(definition.column_type().clone(), 0);
            for batch in batches {
                let part = ColumnChunk::from_arrow_as(definition.column_type(), batch[column].as_ref())
                    .map_err(|e| match e {
                        Error::TypeMismatch { expected, found } => Error::protocol(format!(
                            "column '{}': expected {expected}, got {found}",
                            definition.name()
                        )),
                        other => other,
                    })?;
                chunk.append(part)?;
            }
            Ok(chunk)
        })
        .collect()
}
