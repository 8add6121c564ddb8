use arrow::array::{Array, ArrayRef};
use ticktab_result::{Error, Result};

/// Concatenate arrays of one type into a single array.
///
/// A lone input is returned as is (sliced arrays keep their offsets).
#[inline]
pub(crate) fn concat_many(parts: &[&ArrayRef]) -> Result<ArrayRef> {
    match parts {
        [] => Err(Error::Internal("concat_many: no arrays to concatenate".into())),
        [single] => Ok(ArrayRef::clone(single)),
        _ => {
            let parts: Vec<&dyn Array> = parts.iter().map(|a| a.as_ref()).collect();
            Ok(arrow::compute::concat(&parts)?)
        }
    }
}
