//! Element types accepted by numkern kernels
//!
//! Real kernels are generic over [`Element`] (`f32`, `f64`). Complex data is
//! stored interleaved (`[re0, im0, re1, im1, ...]`) and viewed as
//! [`Complex128`] / [`Complex64`] through bytemuck without copying.

pub mod complex;
mod element;

pub use complex::{Complex64, Complex128};
pub use element::Element;

use std::fmt;

/// Runtime tag for the element type of a flat buffer
///
/// Discriminants are stable; hosts may pass them across the flat boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DType {
    /// 64-bit floating point
    F64 = 0,
    /// 32-bit floating point
    F32 = 1,
    /// Interleaved pair of f32
    Complex64 = 40,
    /// Interleaved pair of f64
    Complex128 = 41,
}

impl DType {
    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 => 8,
            Self::F32 => 4,
            Self::Complex64 => 8,
            Self::Complex128 => 16,
        }
    }

    /// Returns true for the interleaved complex types
    #[inline]
    pub const fn is_complex(self) -> bool {
        matches!(self, Self::Complex64 | Self::Complex128)
    }

    /// The real component type (identity for real types)
    #[inline]
    pub const fn real_component(self) -> DType {
        match self {
            Self::F64 | Self::Complex128 => Self::F64,
            Self::F32 | Self::Complex64 => Self::F32,
        }
    }

    /// Parse a raw discriminant received across the flat boundary
    pub const fn from_u8(raw: u8) -> Option<DType> {
        match raw {
            0 => Some(Self::F64),
            1 => Some(Self::F32),
            40 => Some(Self::Complex64),
            41 => Some(Self::Complex128),
            _ => None,
        }
    }

    /// Short name of this type
    pub const fn name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::Complex64 => "c64",
            Self::Complex128 => "c128",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_sizes() {
        assert_eq!(DType::F64.size_in_bytes(), 8);
        assert_eq!(DType::F32.size_in_bytes(), 4);
        assert_eq!(DType::Complex128.size_in_bytes(), 16);
        assert_eq!(
            DType::Complex128.size_in_bytes(),
            std::mem::size_of::<Complex128>()
        );
    }

    #[test]
    fn test_dtype_roundtrip_discriminant() {
        for d in [DType::F64, DType::F32, DType::Complex64, DType::Complex128] {
            assert_eq!(DType::from_u8(d as u8), Some(d));
        }
        assert_eq!(DType::from_u8(7), None);
        assert_eq!(DType::Complex64.real_component(), DType::F32);
        assert!(DType::Complex128.is_complex());
        assert_eq!(DType::F64.to_string(), "f64");
    }
}
