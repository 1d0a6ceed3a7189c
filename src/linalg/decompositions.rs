//! LU, QR and Cholesky decompositions
//!
//! All factorizations work on a scratch copy; the caller's input is never
//! modified. Row-major `n×n` (or `m×n`) buffers throughout.

use crate::buffer::{check_len, check_matrix};
use crate::config::{LuOptions, rank_tolerance};
use crate::dtype::Element;
use crate::error::{Error, Result};

// ============================================================================
// LU with partial pivoting
// ============================================================================

/// Result of LU factorization `P·A = L·U`
///
/// `lu` packs the unit lower triangle of L (diagonal implied) and U in one
/// `n×n` buffer. `perm[i]` is the original row that ended up at row `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct LuFactors<T> {
    /// Packed L (strictly lower) and U (upper incl. diagonal)
    pub lu: Vec<T>,
    /// Row permutation
    pub perm: Vec<usize>,
    /// Number of row interchanges (determinant sign parity)
    pub num_swaps: usize,
    /// Matrix order
    pub n: usize,
}

impl<T: Element> LuFactors<T> {
    /// Unit lower-triangular factor L
    pub fn l(&self) -> Vec<T> {
        let n = self.n;
        let mut l = vec![T::zero(); n * n];
        for i in 0..n {
            l[i * n..i * n + i].copy_from_slice(&self.lu[i * n..i * n + i]);
            l[i * n + i] = T::one();
        }
        l
    }

    /// Upper-triangular factor U
    pub fn u(&self) -> Vec<T> {
        let n = self.n;
        let mut u = vec![T::zero(); n * n];
        for i in 0..n {
            u[i * n + i..(i + 1) * n].copy_from_slice(&self.lu[i * n + i..(i + 1) * n]);
        }
        u
    }
}

/// Doolittle elimination with partial pivoting, in place on `a`
///
/// Pivot is the largest |a[r][k]| for r ≥ k; ties keep the lowest row index.
/// `record(k, p)` is told the pivot row chosen at each step (LAPACK `ipiv`
/// convention: rows `k` and `p` were interchanged). Returns the number of
/// interchanges.
pub(crate) fn lu_factor_inplace<T: Element>(
    a: &mut [T],
    n: usize,
    threshold: f64,
    op: &'static str,
    mut record: impl FnMut(usize, usize),
) -> Result<usize> {
    debug_assert_eq!(a.len(), n * n);
    let mut num_swaps = 0;

    for k in 0..n {
        let mut p = k;
        let mut max_val = a[k * n + k].abs_val();
        for r in (k + 1)..n {
            let v = a[r * n + k].abs_val();
            if v > max_val {
                max_val = v;
                p = r;
            }
        }

        // NaN pivots fail the comparison and are rejected too
        if !(max_val.to_f64() >= threshold) {
            return Err(Error::SingularMatrix {
                op,
                pivot_index: k,
            });
        }

        record(k, p);
        if p != k {
            let (top, bottom) = a.split_at_mut(p * n);
            top[k * n..(k + 1) * n].swap_with_slice(&mut bottom[..n]);
            num_swaps += 1;
        }

        let pivot = a[k * n + k];
        let (upper, lower) = a.split_at_mut((k + 1) * n);
        let pivot_row = &upper[k * n + k + 1..(k + 1) * n];
        for row in lower.chunks_mut(n) {
            let factor = row[k] / pivot;
            row[k] = factor;
            if factor != T::zero() {
                T::axpy(-factor, pivot_row, &mut row[k + 1..]);
            }
        }
    }
    Ok(num_swaps)
}

/// LU factorization with default options
pub fn lu<T: Element>(a: &[T], n: usize) -> Result<LuFactors<T>> {
    lu_with_options(a, n, &LuOptions::default())
}

/// LU factorization with an explicit pivot threshold
pub fn lu_with_options<T: Element>(a: &[T], n: usize, opts: &LuOptions) -> Result<LuFactors<T>> {
    check_matrix(a, n, n)?;
    let mut lu = a.to_vec();
    let mut perm: Vec<usize> = (0..n).collect();
    let num_swaps = lu_factor_inplace(&mut lu, n, opts.pivot_threshold, "lu", |k, p| {
        perm.swap(k, p);
    })?;
    Ok(LuFactors {
        lu,
        perm,
        num_swaps,
        n,
    })
}

/// Forward substitution with the unit lower triangle packed in `lu`
#[inline]
pub(crate) fn forward_unit_lower<T: Element>(lu: &[T], n: usize, x: &mut [T]) {
    for i in 1..n {
        let s = T::dot(&lu[i * n..i * n + i], &x[..i]);
        x[i] -= s;
    }
}

/// Back substitution with the upper triangle packed in `lu`
#[inline]
pub(crate) fn backward_upper<T: Element>(lu: &[T], n: usize, x: &mut [T]) {
    for i in (0..n).rev() {
        let s = T::dot(&lu[i * n + i + 1..(i + 1) * n], &x[i + 1..n]);
        x[i] = (x[i] - s) / lu[i * n + i];
    }
}

/// Solve `A·x = b` from LU factors; never re-derives pivoting
pub fn lu_solve<T: Element>(factors: &LuFactors<T>, b: &[T]) -> Result<Vec<T>> {
    let n = factors.n;
    check_len(n, b.len())?;
    let mut x: Vec<T> = factors.perm.iter().map(|&p| b[p]).collect();
    forward_unit_lower(&factors.lu, n, &mut x);
    backward_upper(&factors.lu, n, &mut x);
    Ok(x)
}

/// Determinant from LU factors: sign(P) · Π diag(U)
pub fn lu_determinant<T: Element>(factors: &LuFactors<T>) -> T {
    let n = factors.n;
    let mut det = T::one();
    for i in 0..n {
        det *= factors.lu[i * n + i];
    }
    if factors.num_swaps % 2 == 1 { -det } else { det }
}

// ============================================================================
// QR
// ============================================================================

/// Result of a QR factorization `A = Q·R`
#[derive(Debug, Clone, PartialEq)]
pub struct QrFactors<T> {
    /// Q, `rows × q_cols`, row-major
    pub q: Vec<T>,
    /// R, `q_cols × cols`, row-major upper triangular
    pub r: Vec<T>,
    /// Rows of A
    pub rows: usize,
    /// Columns of A
    pub cols: usize,
    /// Columns of Q (`cols` for thin Gram–Schmidt, `rows` for Householder)
    pub q_cols: usize,
}

/// Thin QR by modified Gram–Schmidt: Q is `m×n`, R is `n×n`
///
/// Columns that are numerically dependent on earlier ones come out as zero
/// columns of Q with a zero diagonal in R. Accuracy degrades with the
/// condition number of A; use [`qr_householder`] for ill-conditioned input.
pub fn qr<T: Element>(a: &[T], m: usize, n: usize) -> Result<QrFactors<T>> {
    check_matrix(a, m, n)?;

    // Work column-major so each column is contiguous
    let mut v = vec![T::zero(); n * m];
    for i in 0..m {
        for j in 0..n {
            v[j * m + i] = a[i * n + j];
        }
    }
    let mut r = vec![T::zero(); n * n];
    let scale = a.iter().fold(0.0f64, |acc, x| acc.max(x.to_f64().abs()));
    let tiny = T::EPSILON.to_f64() * scale * (m.max(1) as f64);

    for j in 0..n {
        let (done, rest) = v.split_at_mut(j * m);
        let col = &mut rest[..m];
        for k in 0..j {
            let qk = &done[k * m..(k + 1) * m];
            let rkj = T::dot(qk, col);
            r[k * n + j] = rkj;
            T::axpy(-rkj, qk, col);
        }
        let norm = T::dot(col, col).sqrt_val();
        if norm.to_f64() <= tiny {
            col.fill(T::zero());
            r[j * n + j] = T::zero();
        } else {
            r[j * n + j] = norm;
            for x in col.iter_mut() {
                *x = *x / norm;
            }
        }
    }

    let mut q = vec![T::zero(); m * n];
    for j in 0..n {
        for i in 0..m {
            q[i * n + j] = v[j * m + i];
        }
    }
    Ok(QrFactors {
        q,
        r,
        rows: m,
        cols: n,
        q_cols: n,
    })
}

/// Apply the reflector `I - 2·v·vᵀ/(vᵀv)` to rows `k..m` of columns `c0..n` of `r`
fn reflect_rows<T: Element>(r: &mut [T], n: usize, k: usize, v: &[T], vnorm2: T, c0: usize) {
    let two = T::from_f64(2.0);
    for j in c0..n {
        let mut s = T::zero();
        for (l, &vl) in v.iter().enumerate() {
            s += vl * r[(k + l) * n + j];
        }
        let f = two * s / vnorm2;
        for (l, &vl) in v.iter().enumerate() {
            r[(k + l) * n + j] -= f * vl;
        }
    }
}

/// Householder vector for `x`, returns `(v, vᵀv, alpha)` or `None` for x = 0
fn householder_vector<T: Element>(x: &[T]) -> Option<(Vec<T>, T, T)> {
    let norm = T::dot(x, x).sqrt_val();
    if norm == T::zero() {
        return None;
    }
    let alpha = if x[0] > T::zero() { -norm } else { norm };
    let mut v = x.to_vec();
    v[0] -= alpha;
    let vnorm2 = T::dot(&v, &v);
    if vnorm2 == T::zero() {
        return None;
    }
    Some((v, vnorm2, alpha))
}

/// Full QR by Householder reflections: Q is `m×m` orthogonal, R is `m×n`
pub fn qr_householder<T: Element>(a: &[T], m: usize, n: usize) -> Result<QrFactors<T>> {
    check_matrix(a, m, n)?;
    let mut r = a.to_vec();
    let mut q = vec![T::zero(); m * m];
    for i in 0..m {
        q[i * m + i] = T::one();
    }
    let two = T::from_f64(2.0);

    for k in 0..m.saturating_sub(1).min(n) {
        let x: Vec<T> = (k..m).map(|i| r[i * n + k]).collect();
        let Some((v, vnorm2, alpha)) = householder_vector(&x) else {
            continue;
        };
        reflect_rows(&mut r, n, k, &v, vnorm2, k);
        r[k * n + k] = alpha;
        for i in (k + 1)..m {
            r[i * n + k] = T::zero();
        }
        // Q ← Q·H
        for i in 0..m {
            let row = &mut q[i * m + k..(i + 1) * m];
            let f = two * T::dot(row, &v) / vnorm2;
            T::axpy(-f, &v, row);
        }
    }

    Ok(QrFactors {
        q,
        r,
        rows: m,
        cols: n,
        q_cols: m,
    })
}

/// Householder QR with column pivoting; returns `(R, column permutation)`
///
/// Only R is formed. At step k the remaining column with the largest norm is
/// moved to position k, so |R[k][k]| is non-increasing.
pub fn qr_pivoted_r<T: Element>(a: &[T], m: usize, n: usize) -> Result<(Vec<T>, Vec<usize>)> {
    check_matrix(a, m, n)?;
    let mut r = a.to_vec();
    let mut perm: Vec<usize> = (0..n).collect();

    for k in 0..m.min(n) {
        let mut best = k;
        let mut best_norm = -1.0f64;
        for j in k..n {
            let s: f64 = (k..m).map(|i| r[i * n + j].to_f64().powi(2)).sum();
            if s > best_norm {
                best_norm = s;
                best = j;
            }
        }
        if best != k {
            for i in 0..m {
                r.swap(i * n + k, i * n + best);
            }
            perm.swap(k, best);
        }
        let x: Vec<T> = (k..m).map(|i| r[i * n + k]).collect();
        let Some((v, vnorm2, alpha)) = householder_vector(&x) else {
            continue;
        };
        reflect_rows(&mut r, n, k, &v, vnorm2, k);
        r[k * n + k] = alpha;
        for i in (k + 1)..m {
            r[i * n + k] = T::zero();
        }
    }
    Ok((r, perm))
}

/// Numerical rank from column-pivoted QR
///
/// Counts |R[i][i]| above `tol`; `None` uses
/// [`rank_tolerance`]`(|R[0][0]|, rows, cols)`.
pub fn rank<T: Element>(a: &[T], rows: usize, cols: usize, tol: Option<f64>) -> Result<usize> {
    if rows == 0 || cols == 0 {
        check_matrix(a, rows, cols)?;
        return Ok(0);
    }
    let (r, _) = qr_pivoted_r(a, rows, cols)?;
    let r00 = r[0].to_f64().abs();
    let tol = tol.unwrap_or_else(|| rank_tolerance(r00, rows, cols));
    Ok((0..rows.min(cols))
        .filter(|&i| r[i * cols + i].to_f64().abs() > tol)
        .count())
}

// ============================================================================
// Cholesky
// ============================================================================

/// Cholesky factor L with `A = L·Lᵀ` (Cholesky–Banachiewicz)
///
/// Only the lower triangle of A is read. Fails with `NotPositiveDefinite` at
/// the first column whose pivot is not strictly positive.
pub fn cholesky<T: Element>(a: &[T], n: usize) -> Result<Vec<T>> {
    check_matrix(a, n, n)?;
    let mut l = vec![T::zero(); n * n];
    for i in 0..n {
        for j in 0..=i {
            let (before, row_i) = l.split_at_mut(i * n);
            let s = if j == i {
                T::dot(&row_i[..j], &row_i[..j])
            } else {
                T::dot(&row_i[..j], &before[j * n..j * n + j])
            };
            let v = a[i * n + j] - s;
            if i == j {
                if !(v > T::zero()) {
                    return Err(Error::NotPositiveDefinite {
                        op: "cholesky",
                        column: i,
                    });
                }
                row_i[j] = v.sqrt_val();
            } else {
                row_i[j] = v / before[j * n + j];
            }
        }
    }
    Ok(l)
}

/// Solve `A·x = b` given the Cholesky factor L of A
pub fn cholesky_solve<T: Element>(l: &[T], n: usize, b: &[T]) -> Result<Vec<T>> {
    check_matrix(l, n, n)?;
    check_len(n, b.len())?;
    let mut y = b.to_vec();
    for i in 0..n {
        let s = T::dot(&l[i * n..i * n + i], &y[..i]);
        y[i] = (y[i] - s) / l[i * n + i];
    }
    for i in (0..n).rev() {
        let mut s = T::zero();
        for k in (i + 1)..n {
            s += l[k * n + i] * y[k];
        }
        y[i] = (y[i] - s) / l[i * n + i];
    }
    Ok(y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matmul(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Vec<f64> {
        crate::kernels::matmul(a, b, m, k, n).unwrap()
    }

    #[test]
    fn test_lu_reconstructs_permuted_a() {
        let a = [2.0, 1.0, 1.0, 4.0, -6.0, 0.0, -2.0, 7.0, 2.0];
        let f = lu(&a, 3).unwrap();
        let pa: Vec<f64> = f
            .perm
            .iter()
            .flat_map(|&p| a[p * 3..p * 3 + 3].to_vec())
            .collect();
        let lu_prod = matmul(&f.l(), &f.u(), 3, 3, 3);
        for (x, y) in pa.iter().zip(&lu_prod) {
            assert!((x - y).abs() < 1e-12);
        }
        // first pivot is the 4.0 in row 1
        assert_eq!(f.perm[0], 1);
    }

    #[test]
    fn test_lu_pivot_tie_keeps_lowest_row() {
        let a = [3.0, 1.0, -3.0, 2.0];
        let f = lu(&a, 2).unwrap();
        assert_eq!(f.perm, vec![0, 1]);
        assert_eq!(f.num_swaps, 0);
    }

    #[test]
    fn test_lu_singular_reports_pivot() {
        let a = [1.0, 2.0, 2.0, 4.0];
        let err = lu(&a, 2).unwrap_err();
        assert_eq!(
            err,
            Error::SingularMatrix {
                op: "lu",
                pivot_index: 1
            }
        );
    }

    #[test]
    fn test_lu_threshold_is_configurable() {
        let a = [1.0, 0.0, 0.0, 1e-10];
        assert!(lu(&a, 2).is_ok());
        let strict = LuOptions {
            pivot_threshold: 1e-8,
        };
        assert!(lu_with_options(&a, 2, &strict).is_err());
    }

    #[test]
    fn test_lu_solve_and_determinant() {
        let a: [f64; 4] = [4.0, 3.0, 6.0, 3.0];
        let f = lu(&a, 2).unwrap();
        let x = lu_solve(&f, &[10.0, 12.0]).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
        assert!((lu_determinant(&f) + 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_qr_mgs_orthonormal() {
        let a: [f64; 9] = [12.0, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0];
        let f = qr(&a, 3, 3).unwrap();
        let qt_q = {
            let mut out = vec![0.0; 9];
            for i in 0..3 {
                for j in 0..3 {
                    for k in 0..3 {
                        out[i * 3 + j] += f.q[k * 3 + i] * f.q[k * 3 + j];
                    }
                }
            }
            out
        };
        for i in 0..3 {
            for j in 0..3 {
                let expect = if i == j { 1.0 } else { 0.0 };
                assert!((qt_q[i * 3 + j] - expect).abs() < 1e-12);
            }
        }
        let qr_prod = matmul(&f.q, &f.r, 3, 3, 3);
        for (x, y) in a.iter().zip(&qr_prod) {
            assert!((x - y).abs() < 1e-10);
        }
        assert!((f.r[0] - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_qr_mgs_dependent_column() {
        let a = [1.0, 2.0, 2.0, 4.0, 3.0, 6.0];
        let f = qr(&a, 3, 2).unwrap();
        assert_eq!(f.r[3], 0.0);
        assert_eq!(f.q[1], 0.0);
    }

    #[test]
    fn test_qr_householder_reconstructs() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0, 1.0, 0.0, 2.0];
        let f = qr_householder(&a, 4, 3).unwrap();
        assert_eq!(f.q_cols, 4);
        let prod = matmul(&f.q, &f.r, 4, 4, 3);
        for (x, y) in a.iter().zip(&prod) {
            assert!((x - y).abs() < 1e-10);
        }
        for i in 1..4 {
            for j in 0..i.min(3) {
                assert_eq!(f.r[i * 3 + j], 0.0);
            }
        }
    }

    #[test]
    fn test_rank() {
        let full = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(rank(&full, 2, 2, None).unwrap(), 2);
        let deficient = [1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 1.0, 1.0, 1.0];
        assert_eq!(rank(&deficient, 3, 3, Some(1e-10)).unwrap(), 2);
        let zero_col = [1.0, 0.0, 2.0, 3.0, 0.0, 4.0, 5.0, 0.0, 6.0];
        assert_eq!(rank(&zero_col, 3, 3, None).unwrap(), 2);
        let zero = [0.0; 6];
        assert_eq!(rank(&zero, 2, 3, None).unwrap(), 0);
        assert_eq!(rank(&full, 2, 2, Some(1e3)).unwrap(), 0);
    }

    #[test]
    fn test_cholesky() {
        let a: [f64; 9] = [4.0, 12.0, -16.0, 12.0, 37.0, -43.0, -16.0, -43.0, 98.0];
        let l = cholesky(&a, 3).unwrap();
        let expected = [2.0, 0.0, 0.0, 6.0, 1.0, 0.0, -8.0, 5.0, 3.0];
        for (x, y) in l.iter().zip(&expected) {
            assert!((x - y).abs() < 1e-12);
        }
        let x = cholesky_solve(&l, 3, &[1.0, 2.0, 3.0]).unwrap();
        let ax = crate::kernels::matmul(&a, &x, 3, 3, 1).unwrap();
        for (u, v) in ax.iter().zip(&[1.0, 2.0, 3.0]) {
            assert!((u - v).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cholesky_not_positive_definite() {
        let a = [1.0, 2.0, 2.0, 1.0];
        assert_eq!(
            cholesky(&a, 2).unwrap_err(),
            Error::NotPositiveDefinite {
                op: "cholesky",
                column: 1
            }
        );
    }
}
