//! Element trait for the floating point types kernels operate on

use super::DType;
use crate::kernels::simd;
use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// Trait for floating point types that can fill a flat kernel buffer
///
/// # Bounds
/// - `Pod + Zeroable` - Safe reinterpretation of host memory (bytemuck)
/// - Closed arithmetic (`Add`, `Sub`, `Mul`, `Div`, `Neg`) and compound assignment
/// - `PartialOrd` - Pivot selection and comparisons
///
/// The reduction hooks (`dot`, `axpy`, `sum`) dispatch to the SIMD kernels in
/// [`crate::kernels::simd`] so every generic caller gets the vector fast path
/// behind a single signature.
pub trait Element:
    Copy
    + Clone
    + Debug
    + Send
    + Sync
    + Pod
    + Zeroable
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + PartialOrd
{
    /// The corresponding runtime tag
    const DTYPE: DType;

    /// Machine epsilon
    const EPSILON: Self;

    /// Convert to f64
    fn to_f64(self) -> f64;

    /// Convert from f64 (rounding for narrower types)
    fn from_f64(v: f64) -> Self;

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// Absolute value
    fn abs_val(self) -> Self;

    /// Square root
    fn sqrt_val(self) -> Self;

    /// Inner product of two equally long slices
    fn dot(a: &[Self], b: &[Self]) -> Self;

    /// `y += alpha * x`
    fn axpy(alpha: Self, x: &[Self], y: &mut [Self]);

    /// Sum of all elements
    fn sum(a: &[Self]) -> Self;
}

macro_rules! impl_float_element {
    ($t:ident, $dtype:ident) => {
        paste::paste! {
            impl Element for $t {
                const DTYPE: DType = DType::$dtype;
                const EPSILON: Self = $t::EPSILON;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(v: f64) -> Self {
                    v as $t
                }

                #[inline]
                fn zero() -> Self {
                    0.0
                }

                #[inline]
                fn one() -> Self {
                    1.0
                }

                #[inline]
                fn abs_val(self) -> Self {
                    self.abs()
                }

                #[inline]
                fn sqrt_val(self) -> Self {
                    self.sqrt()
                }

                #[inline]
                fn dot(a: &[Self], b: &[Self]) -> Self {
                    simd::[<dot_ $t>](a, b)
                }

                #[inline]
                fn axpy(alpha: Self, x: &[Self], y: &mut [Self]) {
                    simd::[<axpy_ $t>](alpha, x, y)
                }

                #[inline]
                fn sum(a: &[Self]) -> Self {
                    simd::[<sum_ $t>](a)
                }
            }
        }
    };
}

impl_float_element!(f64, F64);
impl_float_element!(f32, F32);
