//! In-memory reference implementation of the tensorize allocator contract.
//!
//! Plays the role a real runtime's allocator would: [`HostAlloc`] hands out
//! [`HostTensor`] handles backed by zeroed host memory, releasing them when
//! the owning scope drops the handle. Integration tests and host-resident
//! callers use it to exercise the full build pipeline without any external
//! runtime.

use std::mem::size_of;

use tensorize::{DType, Result, Shape, TensorAlloc, TensorElement, TensorHandle, TensorizeError};

/// Host-resident dense tensor with an owned payload.
#[derive(Debug, Clone)]
pub struct HostTensor {
    dtype: DType,
    shape: Shape,
    byte_size: usize,
    // Backing store kept as u64 words so typed views up to 8-byte scalars
    // are always aligned.
    words: Vec<u64>,
}

impl HostTensor {
    /// Returns the dtype the tensor was allocated with.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Returns the shape the tensor was allocated with.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Borrows the payload bytes.
    pub fn data(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.words.as_ptr().cast::<u8>(), self.byte_size) }
    }

    /// Borrows the payload as typed scalars, panicking if the dtype differs.
    pub fn as_slice<E: TensorElement>(&self) -> &[E] {
        assert_eq!(
            E::DTYPE,
            self.dtype,
            "host tensor payload is {:?}, not {:?}",
            self.dtype,
            E::DTYPE
        );
        assert_eq!(
            self.byte_size % size_of::<E>(),
            0,
            "payload size {} is not a multiple of element size {}",
            self.byte_size,
            size_of::<E>()
        );
        unsafe {
            std::slice::from_raw_parts(
                self.words.as_ptr().cast::<E>(),
                self.byte_size / size_of::<E>(),
            )
        }
    }
}

impl TensorHandle for HostTensor {
    fn data_mut(&mut self) -> &mut [u8] {
        unsafe {
            std::slice::from_raw_parts_mut(self.words.as_mut_ptr().cast::<u8>(), self.byte_size)
        }
    }

    fn byte_size(&self) -> usize {
        self.byte_size
    }
}

/// Allocates host tensors backed by zeroed memory.
#[derive(Debug, Clone, Default)]
pub struct HostAlloc {
    limit: Option<usize>,
}

impl HostAlloc {
    /// Creates an allocator with no size cap.
    pub fn new() -> Self {
        HostAlloc { limit: None }
    }

    /// Caps allocations at `limit` bytes; larger requests fail the way an
    /// exhausted external runtime would.
    pub fn with_limit(limit: usize) -> Self {
        HostAlloc { limit: Some(limit) }
    }
}

impl TensorAlloc for HostAlloc {
    type Handle = HostTensor;

    fn allocate(&self, dtype: DType, shape: &Shape, byte_size: usize) -> Result<HostTensor> {
        if let Some(limit) = self.limit {
            if byte_size > limit {
                return Err(TensorizeError::AllocationFailed { dtype, byte_size });
            }
        }
        Ok(HostTensor {
            dtype,
            shape: shape.clone(),
            byte_size,
            words: vec![0u64; byte_size.div_ceil(8)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_is_zeroed_and_sized() {
        let alloc = HostAlloc::new();
        let tensor = alloc
            .allocate(DType::I32, &Shape::new(vec![2, 3]), 24)
            .unwrap();
        assert_eq!(tensor.byte_size(), 24);
        assert_eq!(tensor.dtype(), DType::I32);
        assert_eq!(tensor.shape().dims(), &[2, 3]);
        assert!(tensor.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn limit_fails_oversized_requests() {
        let alloc = HostAlloc::with_limit(8);
        let err = alloc
            .allocate(DType::F64, &Shape::new(vec![4]), 32)
            .unwrap_err();
        assert_eq!(
            err,
            TensorizeError::AllocationFailed {
                dtype: DType::F64,
                byte_size: 32
            }
        );
    }
}
