//! Contract for the external dense-tensor allocation facility.
//!
//! The core never allocates the final tensor itself. It asks a
//! [`TensorAlloc`] for a buffer of the computed size, copies the flattened
//! payload in exactly once, and returns the handle by value. Release is the
//! handle's own `Drop`; the core never re-enters the facility afterwards.

use crate::dtype::DType;
use crate::error::Result;
use crate::shape::Shape;

/// One allocated dense tensor.
///
/// Write-once from the core's perspective: the builder fills the payload a
/// single time and never mutates the handle again.
pub trait TensorHandle {
    /// Borrows the payload bytes as the copy target.
    fn data_mut(&mut self) -> &mut [u8];

    /// Reports the allocated payload size, cross-checked against the
    /// expected `leaf count * scalar width` after allocation.
    fn byte_size(&self) -> usize;
}

/// Dense-tensor allocation facility consumed by the builder.
pub trait TensorAlloc {
    /// Owned, scope-released tensor produced by this facility.
    type Handle: TensorHandle;

    /// Allocates a tensor of `byte_size` bytes tagged `dtype` and shaped
    /// per `shape`.
    ///
    /// Failure is fatal to the in-progress build; the core never retries or
    /// substitutes a fallback allocation strategy.
    fn allocate(&self, dtype: DType, shape: &Shape, byte_size: usize) -> Result<Self::Handle>;
}
