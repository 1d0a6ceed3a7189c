//! SIMD detection and dispatch for level-1 vector kernels
//!
//! The public entry points (`dot_f64`, `axpy_f32`, ...) have one signature per
//! element type and select the vector path at runtime. Callers never name an
//! instruction set.
//!
//! # Module Structure
//!
//! ```text
//! simd/
//! ├── mod.rs              # detection + dispatch
//! ├── avx2.rs             # x86-64 AVX2 + FMA kernels
//! └── aarch64/
//!     ├── mod.rs
//!     └── neon.rs         # ARM64 NEON kernels
//! ```
//!
//! | Architecture | Instruction Set | Vector Width |
//! |--------------|-----------------|--------------|
//! | x86-64       | AVX2 + FMA      | 256 bits     |
//! | ARM64        | NEON            | 128 bits     |
//! | Any          | Scalar          | N/A          |
//!
//! Summation order differs between the vector and scalar paths, so results
//! agree to rounding, not bit-for-bit.

#[cfg(target_arch = "x86_64")]
mod avx2;

#[cfg(target_arch = "aarch64")]
mod aarch64;

use crate::config::SIMD_THRESHOLD;
use std::sync::OnceLock;

/// SIMD capability level detected at runtime
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[allow(dead_code)] // variants are only constructed on their own architecture
pub enum SimdLevel {
    /// AVX2 with FMA (4 f64 / 8 f32 lanes)
    Avx2Fma = 2,
    /// NEON baseline for AArch64 (2 f64 / 4 f32 lanes)
    Neon = 1,
    /// Scalar fallback
    Scalar = 0,
}

impl SimdLevel {
    /// Number of f64 elements per vector register
    #[inline]
    pub const fn f64_lanes(self) -> usize {
        match self {
            Self::Avx2Fma => 4,
            Self::Neon => 2,
            Self::Scalar => 1,
        }
    }

    /// Number of f32 elements per vector register
    #[inline]
    pub const fn f32_lanes(self) -> usize {
        match self {
            Self::Avx2Fma => 8,
            Self::Neon => 4,
            Self::Scalar => 1,
        }
    }

    /// Name of this level
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Avx2Fma => "AVX2+FMA",
            Self::Neon => "NEON",
            Self::Scalar => "Scalar",
        }
    }
}

impl std::fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cached SIMD level detection
static SIMD_LEVEL: OnceLock<SimdLevel> = OnceLock::new();

/// Detect the best available SIMD level for the current CPU
///
/// The first call performs detection; later calls read the cached value.
#[inline]
pub fn detect_simd() -> SimdLevel {
    *SIMD_LEVEL.get_or_init(detect_simd_uncached)
}

#[cold]
fn detect_simd_uncached() -> SimdLevel {
    let level = probe();
    tracing::trace!(level = level.as_str(), "selected SIMD level");
    level
}

#[allow(unreachable_code)]
fn probe() -> SimdLevel {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
            return SimdLevel::Avx2Fma;
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        // NEON is mandatory on AArch64
        return SimdLevel::Neon;
    }

    SimdLevel::Scalar
}

// ============================================================================
// Dispatch
// ============================================================================

macro_rules! impl_blas1_dispatch {
    ($t:ident) => {
        paste::paste! {
            #[doc = concat!("Inner product of two ", stringify!($t), " slices (shorter length wins)")]
            #[inline]
            pub fn [<dot_ $t>](a: &[$t], b: &[$t]) -> $t {
                debug_assert_eq!(a.len(), b.len());
                let n = a.len().min(b.len());
                let (a, b) = (&a[..n], &b[..n]);
                if n < SIMD_THRESHOLD {
                    return [<dot_scalar_ $t>](a, b);
                }
                match detect_simd() {
                    #[cfg(target_arch = "x86_64")]
                    SimdLevel::Avx2Fma => unsafe { avx2::[<dot_ $t>](a, b) },
                    #[cfg(target_arch = "aarch64")]
                    SimdLevel::Neon => unsafe { aarch64::neon::[<dot_ $t>](a, b) },
                    _ => [<dot_scalar_ $t>](a, b),
                }
            }

            #[doc = concat!("`y += alpha * x` over ", stringify!($t), " slices")]
            #[inline]
            pub fn [<axpy_ $t>](alpha: $t, x: &[$t], y: &mut [$t]) {
                debug_assert_eq!(x.len(), y.len());
                let n = x.len().min(y.len());
                let (x, y) = (&x[..n], &mut y[..n]);
                if n < SIMD_THRESHOLD {
                    return [<axpy_scalar_ $t>](alpha, x, y);
                }
                match detect_simd() {
                    #[cfg(target_arch = "x86_64")]
                    SimdLevel::Avx2Fma => unsafe { avx2::[<axpy_ $t>](alpha, x, y) },
                    #[cfg(target_arch = "aarch64")]
                    SimdLevel::Neon => unsafe { aarch64::neon::[<axpy_ $t>](alpha, x, y) },
                    _ => [<axpy_scalar_ $t>](alpha, x, y),
                }
            }

            #[doc = concat!("Sum of a ", stringify!($t), " slice")]
            #[inline]
            pub fn [<sum_ $t>](a: &[$t]) -> $t {
                if a.len() < SIMD_THRESHOLD {
                    return [<sum_scalar_ $t>](a);
                }
                match detect_simd() {
                    #[cfg(target_arch = "x86_64")]
                    SimdLevel::Avx2Fma => unsafe { avx2::[<sum_ $t>](a) },
                    #[cfg(target_arch = "aarch64")]
                    SimdLevel::Neon => unsafe { aarch64::neon::[<sum_ $t>](a) },
                    _ => [<sum_scalar_ $t>](a),
                }
            }

            /// Scalar inner product
            #[inline]
            pub fn [<dot_scalar_ $t>](a: &[$t], b: &[$t]) -> $t {
                a.iter().zip(b).fold(0.0, |acc, (&x, &y)| acc + x * y)
            }

            /// Scalar `y += alpha * x`
            #[inline]
            pub fn [<axpy_scalar_ $t>](alpha: $t, x: &[$t], y: &mut [$t]) {
                for (yi, &xi) in y.iter_mut().zip(x) {
                    *yi += alpha * xi;
                }
            }

            /// Scalar sum
            #[inline]
            pub fn [<sum_scalar_ $t>](a: &[$t]) -> $t {
                a.iter().sum()
            }
        }
    };
}

impl_blas1_dispatch!(f64);
impl_blas1_dispatch!(f32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simd_detection_is_cached() {
        assert_eq!(detect_simd(), detect_simd());
    }

    #[test]
    fn test_simd_level_ordering() {
        assert!(SimdLevel::Avx2Fma > SimdLevel::Neon);
        assert!(SimdLevel::Neon > SimdLevel::Scalar);
        assert_eq!(SimdLevel::Avx2Fma.f64_lanes(), 4);
        assert_eq!(SimdLevel::Neon.f32_lanes(), 4);
    }

    #[test]
    fn test_dispatch_matches_scalar_across_tail_lengths() {
        for n in [0usize, 1, 7, 16, 17, 31, 64, 101] {
            let a: Vec<f64> = (0..n).map(|i| (i as f64 * 0.37).sin()).collect();
            let b: Vec<f64> = (0..n).map(|i| (i as f64 * 0.11).cos()).collect();
            let d = dot_f64(&a, &b);
            let ds = dot_scalar_f64(&a, &b);
            assert!((d - ds).abs() <= 1e-12 * (1.0 + ds.abs()), "n={n}");

            let s = sum_f64(&a);
            assert!((s - sum_scalar_f64(&a)).abs() <= 1e-12 * (1.0 + s.abs()));

            let mut y1 = b.clone();
            let mut y2 = b.clone();
            axpy_f64(0.5, &a, &mut y1);
            axpy_scalar_f64(0.5, &a, &mut y2);
            for (u, v) in y1.iter().zip(&y2) {
                assert!((u - v).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn test_f32_dispatch() {
        let a: Vec<f32> = (0..50).map(|i| i as f32).collect();
        let ones = vec![1.0f32; 50];
        assert_eq!(dot_f32(&a, &ones), 1225.0);
        assert_eq!(sum_f32(&a), 1225.0);
    }
}
