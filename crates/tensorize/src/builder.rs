//! Orchestrates introspection, flattening, and the allocation handoff.

use std::mem::size_of;

use crate::alloc::{TensorAlloc, TensorHandle};
use crate::dtype::TensorElement;
use crate::error::{Result, TensorizeError};
use crate::nested::{flatten, leaf_count, shape_of, NestedData};

/// Builds a dense tensor from a nested rectangular container.
///
/// Validates the scalar dtype before any traversal, computes the shape
/// descriptor and leaf count, flattens the value in row-major order,
/// cross-checks the independently computed count against the flattened
/// length, then allocates through `alloc` and copies the payload in with a
/// single byte copy. Ownership of the returned handle transfers to the
/// caller; no reference into `value` survives the call.
pub fn build_tensor<C, A>(alloc: &A, value: &C) -> Result<A::Handle>
where
    C: NestedData,
    A: TensorAlloc,
{
    C::Elem::validate()?;

    let shape = shape_of(value)?;
    let count = leaf_count(value)?;

    let values = flatten(value)?;
    if values.len() as u64 != count {
        return Err(TensorizeError::CountMismatch {
            expected: count,
            actual: values.len() as u64,
        });
    }

    let elems = usize::try_from(count).map_err(|_| TensorizeError::CountOverflow)?;
    let byte_size = elems
        .checked_mul(size_of::<C::Elem>())
        .ok_or(TensorizeError::CountOverflow)?;

    let mut handle = alloc.allocate(C::Elem::DTYPE, &shape, byte_size)?;
    if handle.byte_size() != byte_size {
        return Err(TensorizeError::ByteSizeMismatch {
            expected: byte_size,
            actual: handle.byte_size(),
        });
    }
    handle.data_mut().copy_from_slice(scalar_bytes(&values));
    Ok(handle)
}

/// Views the flattened scalars as raw bytes for the copy into the handle.
fn scalar_bytes<E: TensorElement>(values: &[E]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(values.as_ptr().cast::<u8>(), values.len() * size_of::<E>())
    }
}
