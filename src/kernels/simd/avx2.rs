//! AVX2 + FMA level-1 kernels
//!
//! Two accumulators per loop hide FMA latency. AVX2 has no horizontal reduce
//! intrinsic, so the final lane sums are done by hand.

use std::arch::x86_64::*;

const F64_LANES: usize = 4;
const F32_LANES: usize = 8;

// ============================================================================
// Horizontal reduction helpers
// ============================================================================

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn hsum_f64(v: __m256d) -> f64 {
    let high = _mm256_extractf128_pd(v, 1);
    let low = _mm256_castpd256_pd128(v);
    let sum128 = _mm_add_pd(low, high);
    let shuf = _mm_unpackhi_pd(sum128, sum128);
    _mm_cvtsd_f64(_mm_add_sd(sum128, shuf))
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn hsum_f32(v: __m256) -> f32 {
    let high = _mm256_extractf128_ps(v, 1);
    let low = _mm256_castps256_ps128(v);
    let sum128 = _mm_add_ps(low, high);
    let shuf = _mm_movehdup_ps(sum128);
    let sum64 = _mm_add_ps(sum128, shuf);
    let shuf2 = _mm_movehl_ps(sum64, sum64);
    _mm_cvtss_f32(_mm_add_ss(sum64, shuf2))
}

// ============================================================================
// f64
// ============================================================================

/// # Safety
/// CPU must support AVX2 and FMA; `a.len() == b.len()`.
#[target_feature(enable = "avx2,fma")]
pub unsafe fn dot_f64(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len();
    let step = 2 * F64_LANES;
    let chunks = n / step;
    let (pa, pb) = (a.as_ptr(), b.as_ptr());

    let mut acc0 = _mm256_setzero_pd();
    let mut acc1 = _mm256_setzero_pd();
    for c in 0..chunks {
        let o = c * step;
        unsafe {
            acc0 = _mm256_fmadd_pd(_mm256_loadu_pd(pa.add(o)), _mm256_loadu_pd(pb.add(o)), acc0);
            acc1 = _mm256_fmadd_pd(
                _mm256_loadu_pd(pa.add(o + F64_LANES)),
                _mm256_loadu_pd(pb.add(o + F64_LANES)),
                acc1,
            );
        }
    }
    let mut total = hsum_f64(_mm256_add_pd(acc0, acc1));
    for i in chunks * step..n {
        total += a[i] * b[i];
    }
    total
}

/// # Safety
/// CPU must support AVX2 and FMA; `x.len() == y.len()`.
#[target_feature(enable = "avx2,fma")]
pub unsafe fn axpy_f64(alpha: f64, x: &[f64], y: &mut [f64]) {
    let n = x.len();
    let chunks = n / F64_LANES;
    let va = _mm256_set1_pd(alpha);
    let px = x.as_ptr();
    let py = y.as_mut_ptr();
    for c in 0..chunks {
        let o = c * F64_LANES;
        unsafe {
            let r = _mm256_fmadd_pd(va, _mm256_loadu_pd(px.add(o)), _mm256_loadu_pd(py.add(o)));
            _mm256_storeu_pd(py.add(o), r);
        }
    }
    for i in chunks * F64_LANES..n {
        y[i] += alpha * x[i];
    }
}

/// # Safety
/// CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub unsafe fn sum_f64(a: &[f64]) -> f64 {
    let n = a.len();
    let chunks = n / F64_LANES;
    let pa = a.as_ptr();
    let mut acc = _mm256_setzero_pd();
    for c in 0..chunks {
        unsafe {
            acc = _mm256_add_pd(acc, _mm256_loadu_pd(pa.add(c * F64_LANES)));
        }
    }
    let mut total = hsum_f64(acc);
    for v in &a[chunks * F64_LANES..] {
        total += v;
    }
    total
}

// ============================================================================
// f32
// ============================================================================

/// # Safety
/// CPU must support AVX2 and FMA; `a.len() == b.len()`.
#[target_feature(enable = "avx2,fma")]
pub unsafe fn dot_f32(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len();
    let chunks = n / F32_LANES;
    let (pa, pb) = (a.as_ptr(), b.as_ptr());
    let mut acc = _mm256_setzero_ps();
    for c in 0..chunks {
        let o = c * F32_LANES;
        unsafe {
            acc = _mm256_fmadd_ps(_mm256_loadu_ps(pa.add(o)), _mm256_loadu_ps(pb.add(o)), acc);
        }
    }
    let mut total = hsum_f32(acc);
    for i in chunks * F32_LANES..n {
        total += a[i] * b[i];
    }
    total
}

/// # Safety
/// CPU must support AVX2 and FMA; `x.len() == y.len()`.
#[target_feature(enable = "avx2,fma")]
pub unsafe fn axpy_f32(alpha: f32, x: &[f32], y: &mut [f32]) {
    let n = x.len();
    let chunks = n / F32_LANES;
    let va = _mm256_set1_ps(alpha);
    let px = x.as_ptr();
    let py = y.as_mut_ptr();
    for c in 0..chunks {
        let o = c * F32_LANES;
        unsafe {
            let r = _mm256_fmadd_ps(va, _mm256_loadu_ps(px.add(o)), _mm256_loadu_ps(py.add(o)));
            _mm256_storeu_ps(py.add(o), r);
        }
    }
    for i in chunks * F32_LANES..n {
        y[i] += alpha * x[i];
    }
}

/// # Safety
/// CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub unsafe fn sum_f32(a: &[f32]) -> f32 {
    let n = a.len();
    let chunks = n / F32_LANES;
    let pa = a.as_ptr();
    let mut acc = _mm256_setzero_ps();
    for c in 0..chunks {
        unsafe {
            acc = _mm256_add_ps(acc, _mm256_loadu_ps(pa.add(c * F32_LANES)));
        }
    }
    let mut total = hsum_f32(acc);
    for v in &a[chunks * F32_LANES..] {
        total += v;
    }
    total
}
