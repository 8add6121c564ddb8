//! Arrow array -> [`ColumnData`] conversion.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{CastOptions, cast_with_options};
use ticktab_result::{Error, Result};

use super::backing::Backing;
use super::data::ColumnData;
use crate::types::{ColumnType, StorageBacking};

/// Convert `array` into column values of `column_type`.
///
/// Any Arrow encoding that maps onto `column_type` is accepted and cast to
/// the canonical encoding first (`LargeUtf8` to `Utf8`, millisecond
/// timestamps to nanoseconds, `Date32` days to `Date64` milliseconds, and so
/// on). Casts run in unsafe mode so a failed conversion is an error rather
/// than a silent null.
pub(crate) fn ingest(
    column_type: &ColumnType,
    array: &dyn Array,
    kind: StorageBacking,
) -> Result<ColumnData> {
    let found = ColumnType::from_arrow(array.data_type())?;
    if &found != column_type {
        return Err(Error::type_mismatch(column_type, found));
    }

    let canonical_type = column_type.to_arrow();
    let cast: ArrayRef;
    let array: &dyn Array = if array.data_type() == &canonical_type {
        array
    } else {
        let options = CastOptions {
            safe: false,
            ..Default::default()
        };
        cast = cast_with_options(array, &canonical_type, &options)?;
        cast.as_ref()
    };

    let mut result: Option<ColumnData> = None;

    macro_rules! ingest_primitive {
        ($variant:ident, $physical_ty:ty, $array_ty:ty, $native_ty:ty) => {
            if matches!(column_type, ColumnType::$variant) {
                let values: Vec<Option<$native_ty>> =
                    array.as_primitive::<$physical_ty>().iter().collect();
                result = Some(ColumnData::$variant(Backing::from_vec(kind, values)));
            }
        };
    }

    crate::ticktab_for_each_primitive_column!(ingest_primitive);

    if let Some(data) = result {
        return Ok(data);
    }

    Ok(match column_type {
        ColumnType::Bool => {
            let values: Vec<Option<bool>> = array.as_boolean().iter().collect();
            ColumnData::Bool(Backing::from_vec(kind, values))
        }
        ColumnType::Utf8 => {
            let values: Vec<Option<Arc<str>>> = array
                .as_string::<i32>()
                .iter()
                .map(|v| v.map(Arc::from))
                .collect();
            ColumnData::Utf8(Backing::from_vec(kind, values))
        }
        ColumnType::List(_) => {
            let lists = array.as_list::<i32>();
            let values: Vec<Option<ArrayRef>> = (0..lists.len())
                .map(|i| (!lists.is_null(i)).then(|| lists.value(i)))
                .collect();
            ColumnData::List(Backing::from_vec(kind, values))
        }
        other => {
            return Err(Error::Internal(format!(
                "column type {other} has no ingest path"
            )));
        }
    })
}
