//! Complex number types for interleaved complex buffers
//!
//! `Complex64` and `Complex128` are `#[repr(C)]` pairs that are bytemuck
//! `Pod`, so an interleaved `&[f64]` buffer of even length can be viewed as
//! `&[Complex128]` with no copy.
//!
//! # Storage Format
//!
//! Interleaved (re, im, re, im, ...), matching the numpy / FFTW convention.
//!
//! # Arithmetic Operations
//!
//! - Multiplication: `(a+bi)(c+di) = (ac-bd) + (ad+bc)i`
//! - Division: `(a+bi)/(c+di) = (a+bi)*conj(c+di)/|c+di|²`
//! - Transcendentals use the principal branch (`arg` in `(-π, π]`)
//!
//! # Examples
//!
//! ```
//! use numkern::dtype::Complex128;
//!
//! let z = Complex128::new(3.0, 4.0);
//! assert_eq!(z.magnitude(), 5.0);
//! let w = z * z.conj();
//! assert_eq!(w, Complex128::new(25.0, 0.0));
//! ```

use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// Macro to implement a complex number type with all operations
macro_rules! impl_complex {
    ($name:ident, $float:ty, $doc_bits:literal, $doc_float:literal) => {
        #[doc = concat!($doc_bits, "-bit complex number with ", $doc_float, " real and imaginary parts")]
        ///
        #[doc = concat!("Memory layout: ", stringify!($name), " is ", stringify!($float), " × 2, interleaved.")]
        #[repr(C)]
        #[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
        pub struct $name {
            /// Real part
            pub re: $float,
            /// Imaginary part
            pub im: $float,
        }

        impl $name {
            /// Zero complex number
            pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

            /// One (real unit)
            pub const ONE: Self = Self { re: 1.0, im: 0.0 };

            /// Imaginary unit i
            pub const I: Self = Self { re: 0.0, im: 1.0 };

            /// Create a new complex number
            #[inline]
            pub const fn new(re: $float, im: $float) -> Self {
                Self { re, im }
            }

            /// Create a complex number from polar form: r * e^(iθ)
            #[inline]
            pub fn from_polar(r: $float, theta: $float) -> Self {
                Self {
                    re: r * theta.cos(),
                    im: r * theta.sin(),
                }
            }

            /// Magnitude |z|, computed without intermediate overflow
            #[inline]
            pub fn magnitude(self) -> $float {
                self.re.hypot(self.im)
            }

            /// Squared magnitude: |z|² = re² + im²
            #[inline]
            pub fn magnitude_squared(self) -> $float {
                self.re * self.re + self.im * self.im
            }

            /// Phase angle (argument): atan2(im, re)
            #[inline]
            pub fn phase(self) -> $float {
                self.im.atan2(self.re)
            }

            /// Complex conjugate: conj(a + bi) = a - bi
            #[inline]
            pub fn conj(self) -> Self {
                Self {
                    re: self.re,
                    im: -self.im,
                }
            }

            /// Multiply by a real scalar
            #[inline]
            pub fn scale(self, k: $float) -> Self {
                Self {
                    re: self.re * k,
                    im: self.im * k,
                }
            }

            /// Reciprocal: 1/z = conj(z)/|z|²
            #[inline]
            pub fn recip(self) -> Self {
                let mag_sq = self.magnitude_squared();
                if mag_sq == 0.0 {
                    Self {
                        re: <$float>::INFINITY,
                        im: <$float>::INFINITY,
                    }
                } else {
                    Self {
                        re: self.re / mag_sq,
                        im: -self.im / mag_sq,
                    }
                }
            }

            /// Complex exponential: e^z = e^re * (cos(im) + i*sin(im))
            #[inline]
            pub fn exp(self) -> Self {
                Self::from_polar(self.re.exp(), self.im)
            }

            /// Natural logarithm: ln(z) = ln(|z|) + i*arg(z)
            #[inline]
            pub fn ln(self) -> Self {
                Self {
                    re: self.magnitude().ln(),
                    im: self.phase(),
                }
            }

            /// Square root using the principal branch
            #[inline]
            pub fn sqrt(self) -> Self {
                let mag = self.magnitude();
                if mag == 0.0 {
                    Self::ZERO
                } else {
                    let re = ((mag + self.re) / 2.0).sqrt();
                    let im = ((mag - self.re) / 2.0).sqrt();
                    // -0.0 imaginary part selects the lower branch
                    let im = if self.im.is_sign_negative() { -im } else { im };
                    Self { re, im }
                }
            }

            /// Complex power z^w = exp(w ln z); 0^w is 0 for Re(w) > 0
            pub fn pow(self, w: Self) -> Self {
                if self == Self::ZERO {
                    if w == Self::ZERO {
                        return Self::ONE;
                    }
                    if w.re > 0.0 {
                        return Self::ZERO;
                    }
                    return Self::new(<$float>::NAN, <$float>::NAN);
                }
                (w * self.ln()).exp()
            }

            /// Real power z^x via polar form
            pub fn powf(self, x: $float) -> Self {
                if self == Self::ZERO {
                    return if x == 0.0 { Self::ONE } else { Self::ZERO };
                }
                Self::from_polar(self.magnitude().powf(x), self.phase() * x)
            }

            /// Integer power by repeated squaring
            pub fn powi(self, n: i32) -> Self {
                let mut base = if n < 0 { self.recip() } else { self };
                let mut e = n.unsigned_abs();
                let mut acc = Self::ONE;
                while e > 0 {
                    if e & 1 == 1 {
                        acc = acc * base;
                    }
                    base = base * base;
                    e >>= 1;
                }
                acc
            }

            /// sin(a+bi) = sin a cosh b + i cos a sinh b
            #[inline]
            pub fn sin(self) -> Self {
                Self {
                    re: self.re.sin() * self.im.cosh(),
                    im: self.re.cos() * self.im.sinh(),
                }
            }

            /// cos(a+bi) = cos a cosh b - i sin a sinh b
            #[inline]
            pub fn cos(self) -> Self {
                Self {
                    re: self.re.cos() * self.im.cosh(),
                    im: -self.re.sin() * self.im.sinh(),
                }
            }

            /// tan(z) = sin(z) / cos(z)
            #[inline]
            pub fn tan(self) -> Self {
                self.sin() / self.cos()
            }

            /// sinh(a+bi) = sinh a cos b + i cosh a sin b
            #[inline]
            pub fn sinh(self) -> Self {
                Self {
                    re: self.re.sinh() * self.im.cos(),
                    im: self.re.cosh() * self.im.sin(),
                }
            }

            /// cosh(a+bi) = cosh a cos b + i sinh a sin b
            #[inline]
            pub fn cosh(self) -> Self {
                Self {
                    re: self.re.cosh() * self.im.cos(),
                    im: self.re.sinh() * self.im.sin(),
                }
            }

            /// tanh(z) = sinh(z) / cosh(z)
            #[inline]
            pub fn tanh(self) -> Self {
                self.sinh() / self.cosh()
            }

            /// True when either component is NaN
            #[inline]
            pub fn is_nan(self) -> bool {
                self.re.is_nan() || self.im.is_nan()
            }
        }

        impl Add for $name {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self {
                    re: self.re + rhs.re,
                    im: self.im + rhs.im,
                }
            }
        }

        impl Sub for $name {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self {
                    re: self.re - rhs.re,
                    im: self.im - rhs.im,
                }
            }
        }

        impl Mul for $name {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                Self {
                    re: self.re * rhs.re - self.im * rhs.im,
                    im: self.re * rhs.im + self.im * rhs.re,
                }
            }
        }

        impl Div for $name {
            type Output = Self;

            /// Division by zero yields NaN components
            #[inline]
            fn div(self, rhs: Self) -> Self {
                let denom = rhs.magnitude_squared();
                if denom == 0.0 {
                    Self {
                        re: <$float>::NAN,
                        im: <$float>::NAN,
                    }
                } else {
                    Self {
                        re: (self.re * rhs.re + self.im * rhs.im) / denom,
                        im: (self.im * rhs.re - self.re * rhs.im) / denom,
                    }
                }
            }
        }

        impl Neg for $name {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self {
                    re: -self.re,
                    im: -self.im,
                }
            }
        }

        impl AddAssign for $name {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl SubAssign for $name {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl MulAssign for $name {
            #[inline]
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.im >= 0.0 {
                    write!(f, "{}+{}i", self.re, self.im)
                } else {
                    write!(f, "{}{}i", self.re, self.im)
                }
            }
        }

        impl From<$float> for $name {
            #[inline]
            fn from(re: $float) -> Self {
                Self { re, im: 0.0 }
            }
        }

        impl From<($float, $float)> for $name {
            #[inline]
            fn from((re, im): ($float, $float)) -> Self {
                Self { re, im }
            }
        }
    };
}

impl_complex!(Complex64, f32, "64", "f32");
impl_complex!(Complex128, f64, "128", "f64");

// ============================================================================
// Conversion between complex types
// ============================================================================

impl From<Complex64> for Complex128 {
    #[inline]
    fn from(c: Complex64) -> Self {
        Self {
            re: c.re as f64,
            im: c.im as f64,
        }
    }
}

impl From<Complex128> for Complex64 {
    #[inline]
    fn from(c: Complex128) -> Self {
        Self {
            re: c.re as f32,
            im: c.im as f32,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_complex_type {
        ($mod_name:ident, $type_name:ident, $float:ty, $pi:expr, $tol:expr) => {
            mod $mod_name {
                use super::*;

                #[test]
                fn test_arithmetic() {
                    let a = $type_name::new(1.0, 2.0);
                    let b = $type_name::new(3.0, 4.0);
                    assert_eq!(a + b, $type_name::new(4.0, 6.0));
                    assert_eq!(a - b, $type_name::new(-2.0, -2.0));
                    // (1+2i)(3+4i) = -5 + 10i
                    assert_eq!(a * b, $type_name::new(-5.0, 10.0));
                    let q = (a * b) / b;
                    assert!((q.re - 1.0).abs() < $tol);
                    assert!((q.im - 2.0).abs() < $tol);
                }

                #[test]
                fn test_exp_ln() {
                    let pi: $float = $pi;
                    let z = $type_name::new(0.0, pi).exp();
                    assert!((z.re + 1.0).abs() < $tol);
                    assert!(z.im.abs() < $tol);

                    let w = $type_name::new(-1.0, 0.0).ln();
                    assert!(w.re.abs() < $tol);
                    assert!((w.im - pi).abs() < $tol);
                }

                #[test]
                fn test_sqrt_branch() {
                    let r = $type_name::new(-4.0, 0.0).sqrt();
                    assert!(r.re.abs() < $tol);
                    assert!((r.im - 2.0).abs() < $tol);

                    let s = $type_name::new(3.0, -4.0).sqrt();
                    // sqrt(3-4i) = 2 - i
                    assert!((s.re - 2.0).abs() < $tol);
                    assert!((s.im + 1.0).abs() < $tol);
                }

                #[test]
                fn test_powers() {
                    let i = $type_name::I;
                    let m = i.powi(2);
                    assert!((m.re + 1.0).abs() < $tol);
                    assert!(m.im.abs() < $tol);

                    let p = $type_name::new(2.0, 0.0).pow($type_name::new(3.0, 0.0));
                    assert!((p.re - 8.0).abs() < 1e3 * $tol);
                    assert!(p.im.abs() < 1e3 * $tol);

                    let f = i.powf(0.5);
                    let h: $float = 0.5;
                    assert!((f.re - h.sqrt()).abs() < $tol);
                    assert!((f.im - h.sqrt()).abs() < $tol);

                    assert_eq!($type_name::ZERO.pow($type_name::ZERO), $type_name::ONE);
                    assert_eq!($type_name::ZERO.powf(2.0), $type_name::ZERO);
                }

                #[test]
                fn test_trig_identity() {
                    let z = $type_name::new(0.3, -0.7);
                    let s = z.sin();
                    let c = z.cos();
                    let one = s * s + c * c;
                    assert!((one.re - 1.0).abs() < 10.0 * $tol);
                    assert!(one.im.abs() < 10.0 * $tol);

                    let ch = z.cosh();
                    let sh = z.sinh();
                    let one_h = ch * ch - sh * sh;
                    assert!((one_h.re - 1.0).abs() < 10.0 * $tol);
                    assert!(one_h.im.abs() < 10.0 * $tol);

                    let t = z.tan() - s / c;
                    assert!(t.magnitude() < 10.0 * $tol);
                }

                #[test]
                fn test_division_by_zero_is_nan() {
                    let q = $type_name::ONE / $type_name::ZERO;
                    assert!(q.is_nan());
                }
            }
        };
    }

    test_complex_type!(complex64_tests, Complex64, f32, std::f32::consts::PI, 1e-5);
    test_complex_type!(complex128_tests, Complex128, f64, std::f64::consts::PI, 1e-12);

    #[test]
    fn test_interleaved_view() {
        let buf = [1.0f64, 2.0, 3.0, 4.0];
        let view: &[Complex128] = bytemuck::cast_slice(&buf);
        assert_eq!(view.len(), 2);
        assert_eq!(view[1], Complex128::new(3.0, 4.0));
    }

    #[test]
    fn test_complex_conversion() {
        let c64 = Complex64::new(1.5, 2.5);
        let c128: Complex128 = c64.into();
        assert_eq!(c128, Complex128::new(1.5, 2.5));
        let back: Complex64 = c128.into();
        assert_eq!(back, c64);
    }

    #[test]
    fn test_complex_sizes() {
        assert_eq!(std::mem::size_of::<Complex64>(), 8);
        assert_eq!(std::mem::size_of::<Complex128>(), 16);
        assert_eq!(std::mem::align_of::<Complex128>(), 8);
    }
}
