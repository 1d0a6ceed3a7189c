//! Determinant, inverse, linear solve and condition numbers
//!
//! The `_into` variants run without allocation: the caller passes a `work`
//! buffer of `n*n + n` elements (see [`inv_work_size`]). The first `n*n`
//! hold the LU factors, the trailing `n` hold the pivot row chosen at each
//! elimination step.

use super::decompositions::lu_factor_inplace;
use super::norms::{norm_inf, norm1};
use crate::buffer::{check_len, check_matrix, check_work, det_work_size, inv_work_size, solve_work_size};
use crate::config::{INV_SMALL_DET_THRESHOLD, LU_PIVOT_THRESHOLD};
use crate::dtype::Element;
use crate::error::{Error, Result};

/// Factor `a` into `work` and return `(lu, ipiv)` views
fn factor_into_work<'w, T: Element>(
    a: &[T],
    n: usize,
    work: &'w mut [T],
    op: &'static str,
) -> Result<(&'w [T], &'w [T])> {
    let (lu, ipiv) = work[..n * n + n].split_at_mut(n * n);
    lu.copy_from_slice(a);
    lu_factor_inplace(lu, n, LU_PIVOT_THRESHOLD, op, |k, p| {
        ipiv[k] = T::from_f64(p as f64);
    })?;
    Ok((&*lu, &*ipiv))
}

/// Solve `A·X = B` in place on `x` (`n × nrhs`, row-major) from packed LU
///
/// Rows of `x` are permuted by `ipiv`, then forward and back substitution run
/// as row `axpy` updates so every inner loop is contiguous.
pub(crate) fn solve_packed_inplace<T: Element>(lu: &[T], ipiv: &[T], n: usize, x: &mut [T], nrhs: usize) {
    for k in 0..n {
        let p = ipiv[k].to_f64() as usize;
        if p != k {
            let (top, bottom) = x.split_at_mut(p * nrhs);
            top[k * nrhs..(k + 1) * nrhs].swap_with_slice(&mut bottom[..nrhs]);
        }
    }
    for i in 1..n {
        let (before, rest) = x.split_at_mut(i * nrhs);
        let row_i = &mut rest[..nrhs];
        for k in 0..i {
            let l = lu[i * n + k];
            if l != T::zero() {
                T::axpy(-l, &before[k * nrhs..(k + 1) * nrhs], row_i);
            }
        }
    }
    for i in (0..n).rev() {
        let (front, back) = x.split_at_mut((i + 1) * nrhs);
        let row_i = &mut front[i * nrhs..];
        for k in (i + 1)..n {
            let u = lu[i * n + k];
            if u != T::zero() {
                let off = (k - i - 1) * nrhs;
                T::axpy(-u, &back[off..off + nrhs], row_i);
            }
        }
        let d = T::one() / lu[i * n + i];
        for v in row_i.iter_mut() {
            *v *= d;
        }
    }
}

// ============================================================================
// Determinant
// ============================================================================

/// Determinant via LU into a caller work buffer
///
/// A matrix found singular during factorization has determinant `0`; that is
/// not an error.
pub fn det_into<T: Element>(a: &[T], n: usize, work: &mut [T]) -> Result<T> {
    check_matrix(a, n, n)?;
    check_work("det", work, det_work_size(n))?;
    if n == 0 {
        return Ok(T::one());
    }
    let (lu, ipiv) = match factor_into_work(a, n, work, "det") {
        Ok(f) => f,
        Err(Error::SingularMatrix { .. }) => return Ok(T::zero()),
        Err(e) => return Err(e),
    };
    let mut det = T::one();
    for k in 0..n {
        det *= lu[k * n + k];
        if ipiv[k].to_f64() as usize != k {
            det = -det;
        }
    }
    Ok(det)
}

/// Determinant via LU
pub fn det<T: Element>(a: &[T], n: usize) -> Result<T> {
    let mut work = vec![T::zero(); det_work_size(n)];
    det_into(a, n, &mut work)
}

// ============================================================================
// Inverse
// ============================================================================

/// Run the LU pivot test on a stack copy of a matrix of order 1–3
///
/// The closed-form inverses below share this test so a matrix is singular
/// for `inv` exactly when LU with the same threshold would reject it.
fn small_pivot_check<T: Element>(a: &[T], n: usize) -> Result<()> {
    let mut m = [T::zero(); 9];
    m[..n * n].copy_from_slice(a);
    lu_factor_inplace(&mut m[..n * n], n, INV_SMALL_DET_THRESHOLD, "inv", |_, _| {})?;
    Ok(())
}

/// Cofactor inverse for orders 1–3; `false` when `1/det` is not representable
fn closed_form_inverse<T: Element>(a: &[T], n: usize, out: &mut [T]) -> bool {
    let d = match n {
        1 => a[0],
        2 => a[0] * a[3] - a[1] * a[2],
        _ => {
            a[0] * (a[4] * a[8] - a[5] * a[7])
                + a[1] * (a[5] * a[6] - a[3] * a[8])
                + a[2] * (a[3] * a[7] - a[4] * a[6])
        }
    };
    let r = T::one() / d;
    if !r.to_f64().is_finite() {
        return false;
    }
    match n {
        1 => out[0] = r,
        2 => {
            out[0] = a[3] * r;
            out[1] = -a[1] * r;
            out[2] = -a[2] * r;
            out[3] = a[0] * r;
        }
        _ => {
            out[0] = (a[4] * a[8] - a[5] * a[7]) * r;
            out[1] = (a[2] * a[7] - a[1] * a[8]) * r;
            out[2] = (a[1] * a[5] - a[2] * a[4]) * r;
            out[3] = (a[5] * a[6] - a[3] * a[8]) * r;
            out[4] = (a[0] * a[8] - a[2] * a[6]) * r;
            out[5] = (a[2] * a[3] - a[0] * a[5]) * r;
            out[6] = (a[3] * a[7] - a[4] * a[6]) * r;
            out[7] = (a[1] * a[6] - a[0] * a[7]) * r;
            out[8] = (a[0] * a[4] - a[1] * a[3]) * r;
        }
    }
    true
}

/// Inverse of an `n×n` matrix into `out`
///
/// Orders 1–3 use closed-form cofactor formulas after the same partial-pivot
/// singularity test LU applies ([`INV_SMALL_DET_THRESHOLD`] equals
/// [`LU_PIVOT_THRESHOLD`]); larger matrices solve `A·X = I` from LU.
pub fn inv_into<T: Element>(a: &[T], n: usize, out: &mut [T], work: &mut [T]) -> Result<()> {
    check_matrix(a, n, n)?;
    check_matrix(out, n, n)?;
    check_work("inv", work, inv_work_size(n))?;
    if n == 0 {
        return Ok(());
    }
    if n <= 3 {
        small_pivot_check(a, n)?;
        if closed_form_inverse(a, n, out) {
            return Ok(());
        }
    }

    let (lu, ipiv) = factor_into_work(a, n, work, "inv")?;
    out.fill(T::zero());
    for i in 0..n {
        out[i * n + i] = T::one();
    }
    solve_packed_inplace(lu, ipiv, n, out, n);
    Ok(())
}

/// Inverse of an `n×n` matrix
pub fn inv<T: Element>(a: &[T], n: usize) -> Result<Vec<T>> {
    let mut out = vec![T::zero(); n * n];
    let mut work = vec![T::zero(); inv_work_size(n)];
    inv_into(a, n, &mut out, &mut work)?;
    Ok(out)
}

// ============================================================================
// Solve
// ============================================================================

/// Solve `A·X = B` for `nrhs` right-hand sides (B is `n × nrhs`) into `x`
pub fn solve_into<T: Element>(
    a: &[T],
    b: &[T],
    n: usize,
    nrhs: usize,
    x: &mut [T],
    work: &mut [T],
) -> Result<()> {
    check_matrix(a, n, n)?;
    check_matrix(b, n, nrhs)?;
    check_matrix(x, n, nrhs)?;
    check_work("solve", work, solve_work_size(n))?;
    if n == 0 {
        return Ok(());
    }
    let (lu, ipiv) = factor_into_work(a, n, work, "solve")?;
    x.copy_from_slice(b);
    solve_packed_inplace(lu, ipiv, n, x, nrhs);
    Ok(())
}

/// Solve `A·x = b` for a single right-hand side
pub fn solve<T: Element>(a: &[T], b: &[T], n: usize) -> Result<Vec<T>> {
    check_len(n, b.len())?;
    let mut x = vec![T::zero(); n];
    let mut work = vec![T::zero(); solve_work_size(n)];
    solve_into(a, b, n, 1, &mut x, &mut work)?;
    Ok(x)
}

// ============================================================================
// Condition numbers
// ============================================================================

/// `‖A‖₁ · ‖A⁻¹‖₁`; fails where [`inv`] fails
pub fn cond1<T: Element>(a: &[T], n: usize) -> Result<T> {
    let ai = inv(a, n)?;
    Ok(norm1(a, n, n)? * norm1(&ai, n, n)?)
}

/// `‖A‖∞ · ‖A⁻¹‖∞`; fails where [`inv`] fails
pub fn cond_inf<T: Element>(a: &[T], n: usize) -> Result<T> {
    let ai = inv(a, n)?;
    Ok(norm_inf(a, n, n)? * norm_inf(&ai, n, n)?)
}
