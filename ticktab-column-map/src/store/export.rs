//! [`ColumnData`] -> Arrow array conversion.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, ListArray, StringArray, new_empty_array};
use arrow::buffer::{NullBuffer, OffsetBuffer};
use arrow::datatypes::Field;
use ticktab_result::{Error, Result};

use super::data::ColumnData;
use super::slicing::concat_many;
use crate::types::{ColumnType, LIST_ITEM_FIELD_NAME};

/// Build the canonical Arrow array for `data`.
pub(crate) fn export(column_type: &ColumnType, data: &ColumnData) -> Result<ArrayRef> {
    let mut result: Option<ArrayRef> = None;

    macro_rules! export_primitive {
        ($variant:ident, $physical_ty:ty, $array_ty:ty, $native_ty:ty) => {
            if let ColumnData::$variant(b) = data {
                result = Some(Arc::new(b.iter().collect::<$array_ty>()) as ArrayRef);
            }
        };
    }

    crate::ticktab_for_each_primitive_column!(export_primitive);

    if let Some(array) = result {
        return Ok(array);
    }

    match (column_type, data) {
        (ColumnType::Bool, ColumnData::Bool(b)) => Ok(Arc::new(b.iter().collect::<BooleanArray>())),
        (ColumnType::Utf8, ColumnData::Utf8(b)) => Ok(Arc::new(
            b.iter().map(|v| v.as_deref()).collect::<StringArray>(),
        )),
        (ColumnType::List(element), ColumnData::List(b)) => {
            let element_type = element.to_arrow();
            let mut lengths = Vec::with_capacity(b.len());
            let mut validity = Vec::with_capacity(b.len());
            let mut parts: Vec<&ArrayRef> = Vec::new();
            for value in b.iter() {
                match value {
                    Some(list) => {
                        if list.data_type() != &element_type {
                            return Err(Error::type_mismatch(&element_type, list.data_type()));
                        }
                        lengths.push(list.len());
                        validity.push(true);
                        if !list.is_empty() {
                            parts.push(list);
                        }
                    }
                    None => {
                        lengths.push(0);
                        validity.push(false);
                    }
                }
            }
            let values = if parts.is_empty() {
                new_empty_array(&element_type)
            } else {
                concat_many(&parts)?
            };
            let field = Arc::new(Field::new(LIST_ITEM_FIELD_NAME, element_type, true));
            let nulls = validity
                .iter()
                .any(|valid| !valid)
                .then(|| NullBuffer::from(validity));
            let list = ListArray::try_new(field, OffsetBuffer::from_lengths(lengths), values, nulls)?;
            Ok(Arc::new(list))
        }
        _ => Err(Error::Internal(format!(
            "column data does not hold values of type {column_type}"
        ))),
    }
}
