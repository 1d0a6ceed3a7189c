//! Sparse Cholesky factorization
//!
//! Up-looking: row `k` of L is the solution of a sparse triangular system
//! whose pattern is the elimination-tree reach of column `k` of A.
//!
//! ```text
//! for k in 0..n:
//!     pattern = ereach(A, k)                 (columns j < k with L[k][j] != 0)
//!     x       = A(0..=k, k)                  (upper triangle only)
//!     for j in pattern (topological):
//!         L[k][j] = x[j] / L[j][j]
//!         x[i]   -= L[i][j] * L[k][j]        (i in column j, j < i < k)
//!     L[k][k] = sqrt(x[k] - sum L[k][j]^2)   (fails if <= 0)
//! ```
//!
//! Only entries with `row <= col` are read, so A may be stored as its upper
//! triangle or as the full symmetric matrix. The diagonal is stored first in
//! each column of L.

use super::CscMatrix;
use super::symbolic::{SymbolicCholesky, ereach};
use super::triangular_solve::{lsolve_csc_inplace, ltsolve_csc_inplace};
use crate::buffer::check_len;
use crate::error::{Error, Result};

/// Numeric Cholesky factorization `A = L·Lᵀ` using a precomputed analysis
///
/// The same [`SymbolicCholesky`] serves every matrix with the pattern it
/// was computed from.
pub fn sparse_cholesky(a: &CscMatrix, symbolic: &SymbolicCholesky) -> Result<CscMatrix> {
    let n = a.require_square()?;
    if n != symbolic.n {
        return Err(Error::ShapeMismatch {
            expected: vec![symbolic.n, symbolic.n],
            got: vec![n, n],
        });
    }

    let nnz = symbolic.nnz_l();
    let col_ptr = symbolic.col_ptr.clone();
    let mut rows = vec![0usize; nnz];
    let mut vals = vec![0.0; nnz];
    // next free slot in each column
    let mut next = col_ptr[..n].to_vec();

    let mut x = vec![0.0; n];
    let mut pattern = vec![0usize; n];
    let mut path = Vec::with_capacity(n);
    let mut mark = vec![false; n];

    for k in 0..n {
        let top = ereach(a, k, &symbolic.parent, &mut pattern, &mut path, &mut mark);

        let (a_rows, a_vals) = a.column(k);
        for (&i, &v) in a_rows.iter().zip(a_vals) {
            if i <= k {
                x[i] += v;
            }
        }
        let mut d = x[k];
        x[k] = 0.0;

        for &j in &pattern[top..] {
            let lkj = x[j] / vals[col_ptr[j]];
            x[j] = 0.0;
            for p in col_ptr[j] + 1..next[j] {
                x[rows[p]] -= vals[p] * lkj;
            }
            d -= lkj * lkj;
            let p = next[j];
            rows[p] = k;
            vals[p] = lkj;
            next[j] += 1;
        }

        if d <= 0.0 || d.is_nan() {
            tracing::debug!(column = k, pivot = d, "sparse_cholesky: non-positive pivot");
            return Err(Error::NotPositiveDefinite {
                op: "sparse_cholesky",
                column: k,
            });
        }
        let p = next[k];
        rows[p] = k;
        vals[p] = d.sqrt();
        next[k] += 1;
    }

    Ok(CscMatrix::from_parts_unchecked(n, n, col_ptr, rows, vals))
}

/// Analyze and factor in one call
pub fn sparse_cholesky_analyze(a: &CscMatrix) -> Result<(SymbolicCholesky, CscMatrix)> {
    let symbolic = SymbolicCholesky::analyze(a)?;
    let l = sparse_cholesky(a, &symbolic)?;
    Ok((symbolic, l))
}

/// Solve `A·x = b` given `L` with `A = L·Lᵀ`
pub fn sparse_cholesky_solve(l: &CscMatrix, b: &[f64]) -> Result<Vec<f64>> {
    let n = l.require_square()?;
    check_len(n, b.len())?;
    let mut x = b.to_vec();
    lsolve_csc_inplace(l, &mut x, false)?;
    ltsolve_csc_inplace(l, &mut x, false)?;
    Ok(x)
}
