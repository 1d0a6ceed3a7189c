//! NEON level-1 kernels for ARM64
//!
//! 2 f64 / 4 f32 lanes per register, fused multiply-add accumulation and a
//! scalar tail for the remainder.

use std::arch::aarch64::*;

const F64_LANES: usize = 2;
const F32_LANES: usize = 4;

/// # Safety
/// `a.len() == b.len()`; NEON is always present on AArch64.
#[target_feature(enable = "neon")]
pub unsafe fn dot_f64(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len();
    let chunks = n / F64_LANES;
    let (pa, pb) = (a.as_ptr(), b.as_ptr());
    let mut acc = vdupq_n_f64(0.0);
    for c in 0..chunks {
        let o = c * F64_LANES;
        unsafe {
            acc = vfmaq_f64(acc, vld1q_f64(pa.add(o)), vld1q_f64(pb.add(o)));
        }
    }
    let mut total = vaddvq_f64(acc);
    for i in chunks * F64_LANES..n {
        total += a[i] * b[i];
    }
    total
}

/// # Safety
/// `x.len() == y.len()`.
#[target_feature(enable = "neon")]
pub unsafe fn axpy_f64(alpha: f64, x: &[f64], y: &mut [f64]) {
    let n = x.len();
    let chunks = n / F64_LANES;
    let va = vdupq_n_f64(alpha);
    let px = x.as_ptr();
    let py = y.as_mut_ptr();
    for c in 0..chunks {
        let o = c * F64_LANES;
        unsafe {
            let r = vfmaq_f64(vld1q_f64(py.add(o)), vld1q_f64(px.add(o)), va);
            vst1q_f64(py.add(o), r);
        }
    }
    for i in chunks * F64_LANES..n {
        y[i] += alpha * x[i];
    }
}

/// # Safety
/// NEON is always present on AArch64.
#[target_feature(enable = "neon")]
pub unsafe fn sum_f64(a: &[f64]) -> f64 {
    let n = a.len();
    let chunks = n / F64_LANES;
    let pa = a.as_ptr();
    let mut acc = vdupq_n_f64(0.0);
    for c in 0..chunks {
        unsafe {
            acc = vaddq_f64(acc, vld1q_f64(pa.add(c * F64_LANES)));
        }
    }
    let mut total = vaddvq_f64(acc);
    for v in &a[chunks * F64_LANES..] {
        total += v;
    }
    total
}

/// # Safety
/// `a.len() == b.len()`.
#[target_feature(enable = "neon")]
pub unsafe fn dot_f32(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len();
    let chunks = n / F32_LANES;
    let (pa, pb) = (a.as_ptr(), b.as_ptr());
    let mut acc = vdupq_n_f32(0.0);
    for c in 0..chunks {
        let o = c * F32_LANES;
        unsafe {
            acc = vfmaq_f32(acc, vld1q_f32(pa.add(o)), vld1q_f32(pb.add(o)));
        }
    }
    let mut total = vaddvq_f32(acc);
    for i in chunks * F32_LANES..n {
        total += a[i] * b[i];
    }
    total
}

/// # Safety
/// `x.len() == y.len()`.
#[target_feature(enable = "neon")]
pub unsafe fn axpy_f32(alpha: f32, x: &[f32], y: &mut [f32]) {
    let n = x.len();
    let chunks = n / F32_LANES;
    let va = vdupq_n_f32(alpha);
    let px = x.as_ptr();
    let py = y.as_mut_ptr();
    for c in 0..chunks {
        let o = c * F32_LANES;
        unsafe {
            let r = vfmaq_f32(vld1q_f32(py.add(o)), vld1q_f32(px.add(o)), va);
            vst1q_f32(py.add(o), r);
        }
    }
    for i in chunks * F32_LANES..n {
        y[i] += alpha * x[i];
    }
}

/// # Safety
/// NEON is always present on AArch64.
#[target_feature(enable = "neon")]
pub unsafe fn sum_f32(a: &[f32]) -> f32 {
    let n = a.len();
    let chunks = n / F32_LANES;
    let pa = a.as_ptr();
    let mut acc = vdupq_n_f32(0.0);
    for c in 0..chunks {
        unsafe {
            acc = vaddq_f32(acc, vld1q_f32(pa.add(c * F32_LANES)));
        }
    }
    let mut total = vaddvq_f32(acc);
    for v in &a[chunks * F32_LANES..] {
        total += v;
    }
    total
}
