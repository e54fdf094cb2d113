//! Recursive shape, count, and flattening introspection over nested
//! containers.
//!
//! [`NestedData`] is a closed two-variant dispatch resolved per concrete
//! type: scalars implementing [`TensorElement`] are leaves, and fixed
//! arrays, `Vec`, boxed slices, and `VecDeque` are sequence nodes over any
//! nested element. Nesting depth and contiguity are associated constants,
//! so both are known before any value is touched.
//!
//! Rectangularity is a trust boundary, not a checked invariant: every query
//! measures the first element at each level and assumes siblings match.

use std::collections::VecDeque;
use std::mem::size_of;

use crate::dtype::TensorElement;
use crate::error::{Result, TensorizeError};
use crate::shape::Shape;

/// Nested, rectangular, non-empty container bottoming out at one scalar type.
pub trait NestedData {
    /// Scalar type found at the bottom of the nesting.
    type Elem: TensorElement;

    /// Nesting depth, derived from the type alone.
    const NDIM: usize;

    /// True when values of this type occupy one flat run of `Elem` with no
    /// indirection, so an entire subtree can be appended with a single copy.
    const CONTIGUOUS: bool;

    /// Records this level's extent into `dims` and recurses into the first
    /// element.
    fn record_extents(&self, dims: &mut Vec<usize>) -> Result<()>;

    /// Total number of leaves under this node, measuring the first subtree
    /// only.
    fn count_leaves(&self) -> Result<u64>;

    /// Appends every leaf under this node to `out` in row-major order.
    fn append_leaves(&self, out: &mut Vec<Self::Elem>) -> Result<()>;
}

/// Returns the nesting depth of `C` without touching a value.
pub fn ndim<C: NestedData>() -> usize {
    C::NDIM
}

/// Computes the shape descriptor of a nested value, outermost extent first.
pub fn shape_of<C: NestedData>(value: &C) -> Result<Shape> {
    let mut dims = Vec::with_capacity(C::NDIM);
    value.record_extents(&mut dims)?;
    debug_assert_eq!(dims.len(), C::NDIM);
    Ok(Shape::new(dims))
}

/// Returns the total number of scalar leaves in a nested value.
pub fn leaf_count<C: NestedData>(value: &C) -> Result<u64> {
    value.count_leaves()
}

/// Flattens a nested value into a row-major buffer of its scalar type.
///
/// The buffer is reserved to the exact leaf count up front; growing past it
/// would indicate a broken counter, which the builder cross-checks.
pub fn flatten<C: NestedData>(value: &C) -> Result<Vec<C::Elem>> {
    let count = value.count_leaves()?;
    let capacity = usize::try_from(count).map_err(|_| TensorizeError::CountOverflow)?;
    let mut out = Vec::with_capacity(capacity);
    value.append_leaves(&mut out)?;
    Ok(out)
}

/// Views a run of contiguous subtrees as one flat run of scalars.
///
/// Only reachable from a `CONTIGUOUS` branch: such subtrees are built
/// purely from scalars and fixed arrays, whose layout is exactly
/// `leaves-per-node` scalars with no padding or indirection, so the first
/// leaf's address starts a run covering every leaf under `nodes`.
fn flat_run<T: NestedData>(nodes: &[T]) -> Result<&[T::Elem]> {
    debug_assert!(T::CONTIGUOUS);
    let first = nodes.first().ok_or(TensorizeError::EmptyAxis)?;
    let per_node = first.count_leaves()?;
    debug_assert_eq!(size_of::<T>() as u64, per_node * size_of::<T::Elem>() as u64);
    let total = per_node
        .checked_mul(nodes.len() as u64)
        .ok_or(TensorizeError::CountOverflow)?;
    let total = usize::try_from(total).map_err(|_| TensorizeError::CountOverflow)?;
    Ok(unsafe { std::slice::from_raw_parts(nodes.as_ptr().cast::<T::Elem>(), total) })
}

/// Flattens one sequence level backed by a single slice of children.
fn append_slice_level<T: NestedData>(children: &[T], out: &mut Vec<T::Elem>) -> Result<()> {
    if children.is_empty() {
        return Err(TensorizeError::EmptyAxis);
    }
    if T::CONTIGUOUS {
        out.extend_from_slice(flat_run(children)?);
    } else {
        for child in children {
            child.append_leaves(out)?;
        }
    }
    Ok(())
}

macro_rules! impl_leaf {
    ($($ty:ty),* $(,)?) => {$(
        impl NestedData for $ty {
            type Elem = $ty;
            const NDIM: usize = 0;
            const CONTIGUOUS: bool = true;

            fn record_extents(&self, _dims: &mut Vec<usize>) -> Result<()> {
                Ok(())
            }

            fn count_leaves(&self) -> Result<u64> {
                Ok(1)
            }

            fn append_leaves(&self, out: &mut Vec<$ty>) -> Result<()> {
                out.push(*self);
                Ok(())
            }
        }
    )*};
}

// Every scalar with a TensorElement mapping is a depth-zero leaf, including
// the sentinel-dtype ones; those are refused later by dtype validation, not
// by the traversal machinery.
impl_leaf!(f32, f64, bool, i32, i64, u32, u64, i8, i16, u8, u16);

impl<T: NestedData, const N: usize> NestedData for [T; N] {
    type Elem = T::Elem;
    const NDIM: usize = 1 + T::NDIM;
    // Fixed arrays of contiguous children stay one flat run.
    const CONTIGUOUS: bool = T::CONTIGUOUS;

    fn record_extents(&self, dims: &mut Vec<usize>) -> Result<()> {
        let first = self.first().ok_or(TensorizeError::EmptyAxis)?;
        dims.push(N);
        first.record_extents(dims)
    }

    fn count_leaves(&self) -> Result<u64> {
        let first = self.first().ok_or(TensorizeError::EmptyAxis)?;
        (N as u64)
            .checked_mul(first.count_leaves()?)
            .ok_or(TensorizeError::CountOverflow)
    }

    fn append_leaves(&self, out: &mut Vec<Self::Elem>) -> Result<()> {
        append_slice_level(self.as_slice(), out)
    }
}

impl<T: NestedData> NestedData for Vec<T> {
    type Elem = T::Elem;
    const NDIM: usize = 1 + T::NDIM;
    // The heap indirection means a parent can never bulk-copy across this
    // level, but the elements themselves are one slice.
    const CONTIGUOUS: bool = false;

    fn record_extents(&self, dims: &mut Vec<usize>) -> Result<()> {
        let first = self.first().ok_or(TensorizeError::EmptyAxis)?;
        dims.push(self.len());
        first.record_extents(dims)
    }

    fn count_leaves(&self) -> Result<u64> {
        let first = self.first().ok_or(TensorizeError::EmptyAxis)?;
        (self.len() as u64)
            .checked_mul(first.count_leaves()?)
            .ok_or(TensorizeError::CountOverflow)
    }

    fn append_leaves(&self, out: &mut Vec<Self::Elem>) -> Result<()> {
        append_slice_level(self.as_slice(), out)
    }
}

impl<T: NestedData> NestedData for Box<[T]> {
    type Elem = T::Elem;
    const NDIM: usize = 1 + T::NDIM;
    const CONTIGUOUS: bool = false;

    fn record_extents(&self, dims: &mut Vec<usize>) -> Result<()> {
        let first = self.first().ok_or(TensorizeError::EmptyAxis)?;
        dims.push(self.len());
        first.record_extents(dims)
    }

    fn count_leaves(&self) -> Result<u64> {
        let first = self.first().ok_or(TensorizeError::EmptyAxis)?;
        (self.len() as u64)
            .checked_mul(first.count_leaves()?)
            .ok_or(TensorizeError::CountOverflow)
    }

    fn append_leaves(&self, out: &mut Vec<Self::Elem>) -> Result<()> {
        append_slice_level(self.as_ref(), out)
    }
}

impl<T: NestedData> NestedData for VecDeque<T> {
    type Elem = T::Elem;
    const NDIM: usize = 1 + T::NDIM;
    const CONTIGUOUS: bool = false;

    fn record_extents(&self, dims: &mut Vec<usize>) -> Result<()> {
        let first = self.front().ok_or(TensorizeError::EmptyAxis)?;
        dims.push(self.len());
        first.record_extents(dims)
    }

    fn count_leaves(&self) -> Result<u64> {
        let first = self.front().ok_or(TensorizeError::EmptyAxis)?;
        (self.len() as u64)
            .checked_mul(first.count_leaves()?)
            .ok_or(TensorizeError::CountOverflow)
    }

    fn append_leaves(&self, out: &mut Vec<Self::Elem>) -> Result<()> {
        if self.is_empty() {
            return Err(TensorizeError::EmptyAxis);
        }
        if T::CONTIGUOUS {
            // The ring buffer may wrap, leaving the logical sequence split
            // across two physical runs.
            let (front, back) = self.as_slices();
            for run in [front, back] {
                if !run.is_empty() {
                    out.extend_from_slice(flat_run(run)?);
                }
            }
        } else {
            for child in self {
                child.append_leaves(out)?;
            }
        }
        Ok(())
    }
}
