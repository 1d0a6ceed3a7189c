//! C ABI over raw pointers
//!
//! Every export takes `(pointer, length)` pairs, 32-bit counts and 64-bit
//! floats, and reports through an `i32` status (1 success, 0 failure) or a
//! NaN for scalar results with no answer. Null pointers are accepted only for
//! zero-length buffers; negative counts fail.
//!
//! # Safety
//!
//! For every export: each non-null pointer must be valid for reads (inputs)
//! or writes (outputs) of the documented number of elements, suitably
//! aligned, and output buffers must not alias any other argument.

use std::slice;

use crate::buffer::{expm_work_size, validate_work_ptr_size};
use crate::config::EigOptions;
use crate::error::Result;
use crate::outcome::{Outcome, Status};
use crate::{fft, kernels, linalg, ode, stats};

unsafe fn input<'a, T>(ptr: *const T, len: usize) -> Option<&'a [T]> {
    if len == 0 {
        return Some(Default::default());
    }
    if ptr.is_null() {
        return None;
    }
    // SAFETY: caller guarantees `len` readable elements at `ptr`
    Some(unsafe { slice::from_raw_parts(ptr, len) })
}

unsafe fn output<'a, T>(ptr: *mut T, len: usize) -> Option<&'a mut [T]> {
    if len == 0 {
        return Some(Default::default());
    }
    if ptr.is_null() {
        return None;
    }
    // SAFETY: caller guarantees `len` writable, unaliased elements at `ptr`
    Some(unsafe { slice::from_raw_parts_mut(ptr, len) })
}

fn dim(n: i32) -> Option<usize> {
    usize::try_from(n).ok()
}

fn square(n: usize) -> Option<usize> {
    n.checked_mul(n)
}

fn code<T>(op: &'static str, r: Option<Result<T>>) -> i32 {
    match r {
        Some(Ok(_)) => Status::Success.code(),
        Some(Err(e)) => {
            tracing::debug!(op, error = %e, "kernel call failed");
            Status::Failure.code()
        }
        None => {
            tracing::debug!(op, "invalid pointer or dimension");
            Status::Failure.code()
        }
    }
}

fn outcome_code<T>(op: &'static str, r: Option<Result<Outcome<T>>>) -> i32 {
    match r {
        Some(Ok(o)) => o.status().code(),
        other => code(op, other),
    }
}

// ============================================================================
// Dense linear algebra
// ============================================================================

/// `out (m×n) = a (m×k) · b (k×n)`
///
/// # Safety
///
/// See the [module documentation](self).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn numkern_multiply(
    a: *const f64,
    b: *const f64,
    out: *mut f64,
    m: i32,
    k: i32,
    n: i32,
) -> i32 {
    let r = (|| {
        let (m, k, n) = (dim(m)?, dim(k)?, dim(n)?);
        let a = unsafe { input(a, m.checked_mul(k)?) }?;
        let b = unsafe { input(b, k.checked_mul(n)?) }?;
        let out = unsafe { output(out, m.checked_mul(n)?) }?;
        Some(kernels::matmul_into(a, b, out, m, k, n))
    })();
    code("multiply", r)
}

/// Determinant of an `n×n` matrix; NaN on failure
///
/// # Safety
///
/// See the [module documentation](self).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn numkern_det(a: *const f64, n: i32, work: *mut f64, work_len: i32) -> f64 {
    let r = (|| {
        let n = dim(n)?;
        let a = unsafe { input(a, square(n)?) }?;
        let work = unsafe { output(work, dim(work_len)?) }?;
        Some(linalg::det_into(a, n, work))
    })();
    match r {
        Some(Ok(d)) => d,
        other => {
            code("det", other);
            f64::NAN
        }
    }
}

/// Inverse of an `n×n` matrix into `out`
///
/// # Safety
///
/// See the [module documentation](self).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn numkern_inv(
    a: *const f64,
    out: *mut f64,
    n: i32,
    work: *mut f64,
    work_len: i32,
) -> i32 {
    let r = (|| {
        let n = dim(n)?;
        let a = unsafe { input(a, square(n)?) }?;
        let out = unsafe { output(out, square(n)?) }?;
        let work = unsafe { output(work, dim(work_len)?) }?;
        Some(linalg::inv_into(a, n, out, work))
    })();
    code("inv", r)
}

/// Solve `a · x = b` for one right-hand side
///
/// # Safety
///
/// See the [module documentation](self).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn numkern_solve(
    a: *const f64,
    b: *const f64,
    x: *mut f64,
    n: i32,
    work: *mut f64,
    work_len: i32,
) -> i32 {
    let r = (|| {
        let n = dim(n)?;
        let a = unsafe { input(a, square(n)?) }?;
        let b = unsafe { input(b, n) }?;
        let x = unsafe { output(x, n) }?;
        let work = unsafe { output(work, dim(work_len)?) }?;
        Some(linalg::solve_into(a, b, n, 1, x, work))
    })();
    code("solve", r)
}

/// Packed LU factors (`n×n`) and row permutation (`n` indices)
///
/// # Safety
///
/// See the [module documentation](self).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn numkern_lu(a: *const f64, lu: *mut f64, perm: *mut i32, n: i32) -> i32 {
    let r = (|| {
        let n = dim(n)?;
        let a = unsafe { input(a, square(n)?) }?;
        let lu_out = unsafe { output(lu, square(n)?) }?;
        let perm_out = unsafe { output(perm, n) }?;
        Some(linalg::lu(a, n).map(|f| {
            lu_out.copy_from_slice(&f.lu);
            for (o, &p) in perm_out.iter_mut().zip(&f.perm) {
                // p < n and n came from an i32
                *o = p as i32;
            }
        }))
    })();
    code("lu", r)
}

/// Lower Cholesky factor of a symmetric positive-definite matrix
///
/// # Safety
///
/// See the [module documentation](self).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn numkern_cholesky(a: *const f64, l: *mut f64, n: i32) -> i32 {
    let r = (|| {
        let n = dim(n)?;
        let a = unsafe { input(a, square(n)?) }?;
        let l_out = unsafe { output(l, square(n)?) }?;
        Some(linalg::cholesky(a, n).map(|f| l_out.copy_from_slice(&f)))
    })();
    code("cholesky", r)
}

/// Jacobi eigendecomposition of a symmetric matrix
///
/// Returns 0 when the sweep budget runs out; `values` and `vectors` still
/// hold the best estimate.
///
/// # Safety
///
/// See the [module documentation](self).
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn numkern_eigs_symmetric(
    a: *const f64,
    n: i32,
    values: *mut f64,
    vectors: *mut f64,
    work: *mut f64,
    work_len: i32,
    precision: f64,
    max_sweeps: i32,
) -> i32 {
    let r = (|| {
        let n = dim(n)?;
        let a = unsafe { input(a, square(n)?) }?;
        let values = unsafe { output(values, n) }?;
        let vectors = unsafe { output(vectors, square(n)?) }?;
        let work = unsafe { output(work, dim(work_len)?) }?;
        let opts = EigOptions {
            precision,
            max_sweeps: dim(max_sweeps)?,
            ..EigOptions::default()
        };
        Some(linalg::eigs_symmetric_into(a, n, values, vectors, work, &opts))
    })();
    outcome_code("eigs_symmetric", r)
}

/// Matrix exponential into `out`
///
/// # Safety
///
/// See the [module documentation](self).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn numkern_expm(
    a: *const f64,
    out: *mut f64,
    n: i32,
    work: *mut f64,
    work_len: i32,
) -> i32 {
    let r = (|| {
        let n = dim(n)?;
        let a = unsafe { input(a, square(n)?) }?;
        let out = unsafe { output(out, square(n)?) }?;
        let work = unsafe { output(work, dim(work_len)?) }?;
        Some(linalg::expm_into(a, n, out, work))
    })();
    code("expm", r)
}

/// Work elements needed by [`numkern_expm`]; -1 if the size overflows `i32`
#[unsafe(no_mangle)]
pub extern "C" fn numkern_expm_work_size(n: i32) -> i32 {
    dim(n)
        .filter(|&n| square(n).and_then(|s| s.checked_mul(6)).is_some())
        .and_then(|n| i32::try_from(expm_work_size(n)).ok())
        .unwrap_or(-1)
}

// ============================================================================
// Signal processing
// ============================================================================

/// In-place forward FFT of `n` interleaved complex values (`2n` doubles)
///
/// # Safety
///
/// See the [module documentation](self).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn numkern_fft(buf: *mut f64, n: i32) -> i32 {
    let r = (|| {
        let buf = unsafe { output(buf, dim(n)?.checked_mul(2)?) }?;
        Some(fft::fft(buf))
    })();
    code("fft", r)
}

/// In-place inverse FFT (scaled by `1/n`)
///
/// # Safety
///
/// See the [module documentation](self).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn numkern_ifft(buf: *mut f64, n: i32) -> i32 {
    let r = (|| {
        let buf = unsafe { output(buf, dim(n)?.checked_mul(2)?) }?;
        Some(fft::ifft(buf))
    })();
    code("ifft", r)
}

/// Linear convolution; `out` holds `n + m - 1` values (0 if either input is
/// empty)
///
/// # Safety
///
/// See the [module documentation](self).
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn numkern_convolve(
    a: *const f64,
    n: i32,
    b: *const f64,
    m: i32,
    out: *mut f64,
    work: *mut f64,
    work_len: i32,
) -> i32 {
    let r = (|| {
        let (n, m) = (dim(n)?, dim(m)?);
        let out_len = if n == 0 || m == 0 { 0 } else { n + m - 1 };
        let a = unsafe { input(a, n) }?;
        let b = unsafe { input(b, m) }?;
        let out = unsafe { output(out, out_len) }?;
        let work = unsafe { output(work, dim(work_len)?) }?;
        Some(fft::convolve_into(a, b, out, work))
    })();
    code("convolve", r)
}

// ============================================================================
// ODE and statistics
// ============================================================================

/// Dormand–Prince step from seven stage derivatives `k` (`7n` doubles)
///
/// # Safety
///
/// See the [module documentation](self).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn numkern_rk45_step(
    y: *const f64,
    n: i32,
    h: f64,
    k: *const f64,
    y_next: *mut f64,
    y_err: *mut f64,
) -> i32 {
    let r = (|| {
        let n = dim(n)?;
        let y = unsafe { input(y, n) }?;
        let k = unsafe { input(k, n.checked_mul(ode::DP45.b.len())?) }?;
        let y_next = unsafe { output(y_next, n) }?;
        let y_err = unsafe { output(y_err, n) }?;
        Some(ode::rk45_step(y, h, k, y_next, y_err))
    })();
    code("rk45_step", r)
}

/// k-th smallest of `n` values, partially reordering `arr`; NaN on failure
///
/// # Safety
///
/// See the [module documentation](self).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn numkern_partition_select(arr: *mut f64, n: i32, k: i32) -> f64 {
    let r = (|| {
        let arr = unsafe { output(arr, dim(n)?) }?;
        Some(stats::partition_select(arr, dim(k)?))
    })();
    match r {
        Some(Ok(v)) => v,
        other => {
            code("partition_select", other);
            f64::NAN
        }
    }
}

/// 1 when `provided >= required` and both are non-negative, else 0
#[unsafe(no_mangle)]
pub extern "C" fn numkern_validate_work_ptr_size(required: i32, provided: i32) -> i32 {
    match (dim(required), dim(provided)) {
        (Some(r), Some(p)) => i32::from(validate_work_ptr_size(r, p)),
        _ => Status::Failure.code(),
    }
}
