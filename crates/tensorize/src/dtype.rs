//! Enumerates the scalar element types the external tensor format can store.

use std::mem::size_of;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TensorizeError};

/// Logical dtype identifier shared between flattened buffers and allocator
/// handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    /// 32-bit floating point following IEEE-754 semantics.
    F32,
    /// 64-bit floating point following IEEE-754 semantics.
    F64,
    /// Single-byte boolean.
    Bool,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit unsigned integer.
    U64,
    /// Sentinel for scalar types the external format has no slot for.
    ///
    /// Lookup stays total over every scalar; building a tensor with this
    /// dtype is refused by [`TensorElement::validate`].
    Invalid,
}

impl DType {
    /// Returns the number of bytes required per scalar element.
    ///
    /// [`DType::Invalid`] occupies no storage and reports zero.
    pub fn size_in_bytes(self) -> usize {
        match self {
            DType::F32 | DType::I32 | DType::U32 => 4,
            DType::F64 | DType::I64 | DType::U64 => 8,
            DType::Bool => 1,
            DType::Invalid => 0,
        }
    }

    /// Produces a stable tag for serialization and FFI.
    ///
    /// Values follow the TensorFlow C API numbering so tagged buffers can
    /// cross that boundary unchanged. That numbering never assigns zero,
    /// which is why `Invalid` maps to it.
    pub fn tag(self) -> u32 {
        match self {
            DType::F32 => 1,
            DType::F64 => 2,
            DType::I32 => 3,
            DType::I64 => 9,
            DType::Bool => 10,
            DType::U32 => 22,
            DType::U64 => 23,
            DType::Invalid => 0,
        }
    }

    /// Reconstructs a `DType` from its serialized tag representation.
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            1 => Some(DType::F32),
            2 => Some(DType::F64),
            3 => Some(DType::I32),
            9 => Some(DType::I64),
            10 => Some(DType::Bool),
            22 => Some(DType::U32),
            23 => Some(DType::U64),
            _ => None,
        }
    }
}

/// Scalar type that can terminate a nesting and be stored in a dense tensor.
///
/// Implementations map a concrete scalar to its [`DType`] once, at the type
/// level; [`validate`](TensorElement::validate) then confirms the in-memory
/// width against the external format's fixed-width assumption before any
/// data is traversed.
pub trait TensorElement: Copy + Send + Sync + 'static {
    /// Dtype tag for this scalar, or [`DType::Invalid`] when unsupported.
    const DTYPE: DType;

    /// Confirms the scalar's in-memory width matches the external format.
    fn validate() -> Result<()> {
        if Self::DTYPE == DType::Invalid || size_of::<Self>() != Self::DTYPE.size_in_bytes() {
            return Err(TensorizeError::UnsupportedScalar {
                name: std::any::type_name::<Self>(),
                width: size_of::<Self>(),
            });
        }
        Ok(())
    }
}

macro_rules! impl_tensor_element {
    ($($ty:ty => $dtype:expr),* $(,)?) => {$(
        impl TensorElement for $ty {
            const DTYPE: DType = $dtype;
        }
    )*};
}

impl_tensor_element!(
    f32 => DType::F32,
    f64 => DType::F64,
    bool => DType::Bool,
    i32 => DType::I32,
    i64 => DType::I64,
    u32 => DType::U32,
    u64 => DType::U64,
);

// Narrow integers resolve to the sentinel so lookup stays total; validate
// refuses them before a tensor is ever built.
impl_tensor_element!(
    i8 => DType::Invalid,
    i16 => DType::Invalid,
    u8 => DType::Invalid,
    u16 => DType::Invalid,
);

#[cfg(test)]
mod tests {
    use super::*;

    const SUPPORTED: [DType; 7] = [
        DType::F32,
        DType::F64,
        DType::Bool,
        DType::I32,
        DType::I64,
        DType::U32,
        DType::U64,
    ];

    #[test]
    fn tag_roundtrip_is_stable() {
        for dtype in SUPPORTED {
            assert_eq!(DType::from_tag(dtype.tag()), Some(dtype));
            // Calling twice must yield the same tag.
            assert_eq!(dtype.tag(), dtype.tag());
        }
        assert_eq!(DType::Invalid.tag(), 0);
        assert_eq!(DType::from_tag(0), None);
        assert_eq!(DType::from_tag(999), None);
    }

    #[test]
    fn widths_match_external_format() {
        assert_eq!(DType::F32.size_in_bytes(), 4);
        assert_eq!(DType::F64.size_in_bytes(), 8);
        assert_eq!(DType::Bool.size_in_bytes(), 1);
        assert_eq!(DType::I64.size_in_bytes(), 8);
        assert_eq!(DType::U32.size_in_bytes(), 4);
        assert_eq!(DType::Invalid.size_in_bytes(), 0);
    }

    #[test]
    fn supported_scalars_validate() {
        f32::validate().unwrap();
        f64::validate().unwrap();
        bool::validate().unwrap();
        i32::validate().unwrap();
        i64::validate().unwrap();
        u32::validate().unwrap();
        u64::validate().unwrap();
    }

    #[test]
    fn narrow_integers_resolve_but_refuse_to_validate() {
        assert_eq!(<u16 as TensorElement>::DTYPE, DType::Invalid);
        let err = u16::validate().unwrap_err();
        assert!(matches!(
            err,
            TensorizeError::UnsupportedScalar { width: 2, .. }
        ));
        assert!(i8::validate().is_err());
        assert!(u8::validate().is_err());
        assert!(i16::validate().is_err());
    }

    #[test]
    fn dtype_serde_roundtrip() {
        for dtype in SUPPORTED {
            let json = serde_json::to_string(&dtype).unwrap();
            let back: DType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, dtype);
        }
    }
}
