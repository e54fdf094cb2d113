//! Error taxonomy shared by introspection, flattening, and the builder.

use thiserror::Error;

use crate::dtype::DType;

/// All errors surfaced by the flattening core and its allocator contract.
///
/// Every variant aborts the in-progress build; none is ever downgraded to a
/// default value or a partially filled tensor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TensorizeError {
    /// An empty sequence was found at a level where a representative first
    /// element is required.
    #[error("empty sequence encountered; nested containers must be non-empty at every level")]
    EmptyAxis,

    /// The leaf scalar has no slot in the external dense-tensor format.
    #[error("scalar type {name} ({width} bytes) has no dense-tensor dtype")]
    UnsupportedScalar { name: &'static str, width: usize },

    /// Multiplying per-level extents overflowed the 64-bit leaf count.
    #[error("leaf count overflows u64")]
    CountOverflow,

    /// Defect signal: the element counter and the flattening engine disagree.
    #[error("flattened {actual} elements but counted {expected}")]
    CountMismatch { expected: u64, actual: u64 },

    /// Defect signal: the allocator reported a different payload size than
    /// was requested.
    #[error("allocator returned {actual} bytes, expected {expected}")]
    ByteSizeMismatch { expected: usize, actual: usize },

    /// The external facility could not provide the requested buffer.
    #[error("dense tensor allocation of {byte_size} bytes failed for dtype {dtype:?}")]
    AllocationFailed { dtype: DType, byte_size: usize },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TensorizeError>;
