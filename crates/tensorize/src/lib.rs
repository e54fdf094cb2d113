//! Converts arbitrarily nested, rectangular containers of scalars into
//! dense-tensor payloads.
//!
//! The crate answers three questions about a nested container without ever
//! mutating it: how deep does the nesting go, what are the per-level
//! extents, and what scalar type sits at the bottom. It then produces a
//! row-major flat buffer, preferring a single bulk copy whenever the
//! nesting is laid out as one contiguous run of scalars, and hands the
//! result to an external allocator through the [`TensorAlloc`] contract.

pub mod alloc;
pub mod builder;
pub mod dtype;
pub mod error;
pub mod nested;
pub mod shape;

pub use alloc::{TensorAlloc, TensorHandle};
pub use builder::build_tensor;
pub use dtype::{DType, TensorElement};
pub use error::{Result, TensorizeError};
pub use nested::{flatten, leaf_count, ndim, shape_of, NestedData};
pub use shape::Shape;
