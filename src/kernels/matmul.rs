//! Dense matrix multiplication kernels
//!
//! ```text
//! C[m×n] = A[m×k] · B[k×n]      (row-major)
//! ```
//!
//! Two variants share one contract:
//! - [`matmul_into`] runs the i-k-j loop, so the inner update is an `axpy`
//!   over a contiguous row of B and C (SIMD through [`Element::axpy`]).
//! - [`matmul_blocked_into`] stages Bᵀ into the caller's work buffer and
//!   computes each C entry as a tiled dot product of two contiguous rows.
//!
//! Summation order differs between the variants; results agree to rounding.
//! With the `rayon` feature, large products split the output rows across
//! threads; each output element is still summed by one thread in order.

use crate::buffer::{check_matrix, check_work, matmul_blocked_work_size};
use crate::config::MATMUL_BLOCK_SIZE;
use crate::dtype::Element;
use crate::error::Result;

#[cfg(feature = "rayon")]
use crate::config::PARALLEL_ROW_THRESHOLD;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[inline]
fn row_kernel<T: Element>(a_row: &[T], b: &[T], c_row: &mut [T], n: usize) {
    c_row.fill(T::zero());
    for (p, &a_ip) in a_row.iter().enumerate() {
        if a_ip == T::zero() {
            continue;
        }
        T::axpy(a_ip, &b[p * n..(p + 1) * n], c_row);
    }
}

/// C = A · B into a caller-provided `m×n` buffer
pub fn matmul_into<T: Element>(
    a: &[T],
    b: &[T],
    c: &mut [T],
    m: usize,
    k: usize,
    n: usize,
) -> Result<()> {
    check_matrix(a, m, k)?;
    check_matrix(b, k, n)?;
    check_matrix(c, m, n)?;
    if n == 0 || m == 0 {
        return Ok(());
    }
    if k == 0 {
        c.fill(T::zero());
        return Ok(());
    }

    #[cfg(feature = "rayon")]
    if m >= PARALLEL_ROW_THRESHOLD {
        c.par_chunks_mut(n)
            .zip(a.par_chunks(k))
            .for_each(|(c_row, a_row)| row_kernel(a_row, b, c_row, n));
        return Ok(());
    }

    for (c_row, a_row) in c.chunks_mut(n).zip(a.chunks(k)) {
        row_kernel(a_row, b, c_row, n);
    }
    Ok(())
}

/// C = A · B, allocating the result
pub fn matmul<T: Element>(a: &[T], b: &[T], m: usize, k: usize, n: usize) -> Result<Vec<T>> {
    let mut c = vec![T::zero(); m * n];
    matmul_into(a, b, &mut c, m, k, n)?;
    Ok(c)
}

/// C = A · B using a transposed copy of B staged in `work`
///
/// `work` must hold at least [`matmul_blocked_work_size`]`(k, n)` elements.
pub fn matmul_blocked_into<T: Element>(
    a: &[T],
    b: &[T],
    c: &mut [T],
    m: usize,
    k: usize,
    n: usize,
    work: &mut [T],
) -> Result<()> {
    check_matrix(a, m, k)?;
    check_matrix(b, k, n)?;
    check_matrix(c, m, n)?;
    check_work("matmul_blocked", work, matmul_blocked_work_size(k, n))?;

    let bt = &mut work[..k * n];
    for p in 0..k {
        for j in 0..n {
            bt[j * k + p] = b[p * n + j];
        }
    }
    let bt = &*bt;

    c.fill(T::zero());
    let bs = MATMUL_BLOCK_SIZE;
    for i0 in (0..m).step_by(bs) {
        let i1 = (i0 + bs).min(m);
        for j0 in (0..n).step_by(bs) {
            let j1 = (j0 + bs).min(n);
            for p0 in (0..k).step_by(bs) {
                let p1 = (p0 + bs).min(k);
                for i in i0..i1 {
                    let a_seg = &a[i * k + p0..i * k + p1];
                    for j in j0..j1 {
                        let b_seg = &bt[j * k + p0..j * k + p1];
                        c[i * n + j] += T::dot(a_seg, b_seg);
                    }
                }
            }
        }
    }
    Ok(())
}

/// y = A · x for an `m×n` matrix
pub fn matvec_into<T: Element>(a: &[T], x: &[T], y: &mut [T], m: usize, n: usize) -> Result<()> {
    check_matrix(a, m, n)?;
    check_matrix(x, n, 1)?;
    check_matrix(y, m, 1)?;
    for (yi, row) in y.iter_mut().zip(a.chunks(n.max(1))) {
        *yi = if n == 0 { T::zero() } else { T::dot(row, x) };
    }
    Ok(())
}
