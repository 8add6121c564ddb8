//! Row-set driven copies between a column and a chunk.
//!
//! Positions are index-space row numbers. Every bound and capacity check
//! runs before the first element is written, so a failed fill leaves the
//! destination untouched.

use ticktab_result::{Error, Result};
use ticktab_rowset::{RowKey, RowKeySet};

use super::data::ColumnData;

/// Convert an index-space position to `usize`, checking it against `len`.
#[inline]
pub(crate) fn checked_index(index: RowKey, len: usize) -> Result<usize> {
    match usize::try_from(index) {
        Ok(i) if i < len => Ok(i),
        _ => Err(Error::IndexOutOfRangeError {
            index,
            len: len as u64,
        }),
    }
}

fn check_capacity(required: u64, available: usize) -> Result<usize> {
    let required = usize::try_from(required).map_err(|_| Error::CapacityError {
        required: usize::MAX,
        available,
    })?;
    if available < required {
        return Err(Error::CapacityError {
            required,
            available,
        });
    }
    Ok(required)
}

/// `dest[i] = src[rows[i]]` for the rows of `rows` in ascending order.
pub(crate) fn fill_ordered(src: &ColumnData, rows: &RowKeySet, dest: &mut ColumnData) -> Result<()> {
    check_capacity(rows.len(), dest.len())?;
    if let Some(last) = rows.last() {
        checked_index(last, src.len())?;
    }
    let mut offset = 0usize;
    rows.try_for_each_run(|first, last| {
        let begin = checked_index(first, src.len())?;
        let end = checked_index(last, src.len())? + 1;
        dest.copy_run_from(offset, src, begin, end)?;
        offset += end - begin;
        Ok(())
    })
}

/// `dest[i] = src[rows[i]]` for an arbitrary-order row list.
pub(crate) fn fill_unordered(src: &ColumnData, rows: &[RowKey], dest: &mut ColumnData) -> Result<()> {
    check_capacity(rows.len() as u64, dest.len())?;
    let positions = rows
        .iter()
        .map(|&row| checked_index(row, src.len()))
        .collect::<Result<Vec<_>>>()?;
    for (i, position) in positions.into_iter().enumerate() {
        dest.copy_one_from(i, src, position)?;
    }
    Ok(())
}

/// `dest[rows[i]] = src[i]` for the rows of `rows` in ascending order,
/// growing `dest` with nulls to cover the largest row.
pub(crate) fn fill_from(dest: &mut ColumnData, src: &ColumnData, rows: &RowKeySet) -> Result<()> {
    check_capacity(rows.len(), src.len())?;
    let Some(last) = rows.last() else {
        return Ok(());
    };
    let required_len = grown_len(last)?;
    dest.grow_to(required_len);
    let mut offset = 0usize;
    rows.try_for_each_run(|first, last| {
        let begin = checked_index(first, required_len)?;
        let end = checked_index(last, required_len)? + 1;
        dest.copy_run_from(begin, src, offset, offset + (end - begin))?;
        offset += end - begin;
        Ok(())
    })
}

/// `dest[rows[i]] = src[i]` for an arbitrary-order row list, growing `dest`
/// with nulls to cover the largest row.
pub(crate) fn fill_from_unordered(dest: &mut ColumnData, src: &ColumnData, rows: &[RowKey]) -> Result<()> {
    check_capacity(rows.len() as u64, src.len())?;
    let Some(&max) = rows.iter().max() else {
        return Ok(());
    };
    let required_len = grown_len(max)?;
    dest.grow_to(required_len);
    for (i, &row) in rows.iter().enumerate() {
        let position = checked_index(row, required_len)?;
        dest.copy_one_from(position, src, i)?;
    }
    Ok(())
}

fn grown_len(max_row: RowKey) -> Result<usize> {
    max_row
        .checked_add(1)
        .and_then(|len| usize::try_from(len).ok())
        .ok_or_else(|| Error::InvalidArgumentError(format!("row {max_row} cannot be addressed")))
}
