//! Sparse LU factorization
//!
//! Left-looking Gilbert–Peierls with partial pivoting. Column `k` of the
//! factors is computed from column `q[k]` of A by a sparse triangular solve
//! against the columns of L already built:
//!
//! ```text
//! for k in 0..n:
//!     reach = DFS over L from the pattern of A(:, q[k])   (topological order)
//!     x     = L \ A(:, q[k])                             (only over reach)
//!     U(0..k, k) = x at pivotal rows
//!     pivot = argmax |x| over non-pivotal rows           (fails if <= tol)
//!     L(:, k) = x at non-pivotal rows / pivot
//! ```
//!
//! The factors satisfy `P·A·Q = L·U` where row `i` of A lands in row
//! `pinv[i]` and column `q[k]` of A lands in column `k`. L has a unit
//! diagonal stored explicitly.

use super::CscMatrix;
use super::triangular_solve::{lsolve_csc_inplace, usolve_csc_inplace};
use crate::buffer::check_len;
use crate::config::SPARSE_PIVOT_TOLERANCE;
use crate::error::{Error, Result};

/// Factors of a sparse LU decomposition
#[derive(Debug, Clone, PartialEq)]
pub struct SparseLu {
    /// Unit lower triangular factor (rows renumbered by `pinv`)
    pub l: CscMatrix,
    /// Upper triangular factor
    pub u: CscMatrix,
    /// Inverse row permutation: row `i` of A is row `pinv[i]` of `L·U`
    pub pinv: Vec<usize>,
    /// Column permutation used during factorization
    pub q: Vec<usize>,
}

impl SparseLu {
    /// Matrix order
    #[inline]
    pub fn n(&self) -> usize {
        self.pinv.len()
    }

    /// Solve `A·x = b` with these factors
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        sparse_lu_solve(self, b)
    }
}

fn check_permutation(q: &[usize], n: usize) -> Result<()> {
    check_len(n, q.len())?;
    let mut seen = vec![false; n];
    for &j in q {
        if j >= n || seen[j] {
            return Err(Error::InvalidArgument {
                arg: "q",
                reason: format!("not a permutation of 0..{n}"),
            });
        }
        seen[j] = true;
    }
    Ok(())
}

/// Nonzero pattern of `L \ A(:, col)` in topological order
///
/// Nodes are original row indices. A pivotal row `i` (with `pinv[i] = j`)
/// has the rows of L column `j` as children; non-pivotal rows are leaves.
#[allow(clippy::too_many_arguments)]
fn reach(
    a: &CscMatrix,
    col: usize,
    pinv: &[Option<usize>],
    l_ptr: &[usize],
    l_rows: &[usize],
    mark: &mut [bool],
    stack: &mut Vec<(usize, usize)>,
    order: &mut Vec<usize>,
) {
    order.clear();
    let (rows, _) = a.column(col);
    for &start in rows {
        if mark[start] {
            continue;
        }
        mark[start] = true;
        stack.push((start, 0));
        while let Some(top) = stack.last_mut() {
            let node = top.0;
            let children = match pinv[node] {
                // skip the pivot entry itself at the head of the column
                Some(j) => &l_rows[l_ptr[j] + 1..l_ptr[j + 1]],
                None => &[][..],
            };
            match children[top.1..].iter().position(|&c| !mark[c]) {
                Some(pos) => {
                    let child = children[top.1 + pos];
                    top.1 += pos + 1;
                    mark[child] = true;
                    stack.push((child, 0));
                }
                None => {
                    stack.pop();
                    order.push(node);
                }
            }
        }
    }
    order.reverse();
}

/// Sparse LU with partial pivoting
///
/// `q` is an optional fill-reducing column permutation (identity when
/// `None`); it is used as given, never computed here. A pivot with magnitude
/// `<= tol` aborts with [`Error::StructurallySingular`].
pub fn sparse_lu(a: &CscMatrix, q: Option<&[usize]>, tol: f64) -> Result<SparseLu> {
    let n = a.require_square()?;
    let q: Vec<usize> = match q {
        Some(q) => {
            check_permutation(q, n)?;
            q.to_vec()
        }
        None => (0..n).collect(),
    };
    if tol.is_nan() || tol < 0.0 {
        return Err(Error::InvalidArgument {
            arg: "tol",
            reason: format!("pivot tolerance must be non-negative, got {tol}"),
        });
    }

    let guess = 2 * a.nnz() + n;
    let mut l_ptr = Vec::with_capacity(n + 1);
    let mut l_rows = Vec::with_capacity(guess);
    let mut l_vals = Vec::with_capacity(guess);
    let mut u_ptr = Vec::with_capacity(n + 1);
    let mut u_rows = Vec::with_capacity(guess);
    let mut u_vals = Vec::with_capacity(guess);
    l_ptr.push(0);
    u_ptr.push(0);

    let mut pinv: Vec<Option<usize>> = vec![None; n];
    let mut x = vec![0.0; n];
    let mut mark = vec![false; n];
    let mut stack = Vec::with_capacity(n);
    let mut order = Vec::with_capacity(n);

    for k in 0..n {
        let col = q[k];
        reach(a, col, &pinv, &l_ptr, &l_rows, &mut mark, &mut stack, &mut order);

        // scatter A(:, col)
        let (rows, vals) = a.column(col);
        for (&i, &v) in rows.iter().zip(vals) {
            x[i] += v;
        }

        // x = L \ x over the reach
        for &i in &order {
            if let Some(j) = pinv[i] {
                let xi = x[i];
                if xi == 0.0 {
                    continue;
                }
                for p in l_ptr[j] + 1..l_ptr[j + 1] {
                    x[l_rows[p]] -= l_vals[p] * xi;
                }
            }
        }

        // U(0..k, k) and the pivot search
        let mut pivot_row = None;
        let mut pivot_abs = -1.0;
        for &i in &order {
            match pinv[i] {
                Some(j) => {
                    u_rows.push(j);
                    u_vals.push(x[i]);
                }
                None => {
                    if x[i].abs() > pivot_abs {
                        pivot_abs = x[i].abs();
                        pivot_row = Some(i);
                    }
                }
            }
        }
        let ipiv = match pivot_row {
            Some(i) if pivot_abs > tol => i,
            _ => {
                tracing::debug!(column = k, pivot = pivot_abs, "sparse_lu: pivot below tolerance");
                return Err(Error::StructurallySingular { column: k });
            }
        };
        let pivot = x[ipiv];
        pinv[ipiv] = Some(k);
        u_rows.push(k);
        u_vals.push(pivot);
        u_ptr.push(u_rows.len());

        l_rows.push(ipiv);
        l_vals.push(1.0);
        for &i in &order {
            if pinv[i].is_none() {
                l_rows.push(i);
                l_vals.push(x[i] / pivot);
            }
        }
        l_ptr.push(l_rows.len());

        for &i in &order {
            x[i] = 0.0;
            mark[i] = false;
        }
    }

    // every row is pivotal once all n columns succeeded
    let pinv: Vec<usize> = pinv.into_iter().map(|p| p.unwrap_or(0)).collect();
    for r in l_rows.iter_mut() {
        *r = pinv[*r];
    }

    tracing::debug!(n, l_nnz = l_rows.len(), u_nnz = u_rows.len(), "sparse_lu");

    Ok(SparseLu {
        l: CscMatrix::from_parts_unchecked(n, n, l_ptr, l_rows, l_vals),
        u: CscMatrix::from_parts_unchecked(n, n, u_ptr, u_rows, u_vals),
        pinv,
        q,
    })
}

/// Sparse LU with the identity column order and the default tolerance
pub fn sparse_lu_default(a: &CscMatrix) -> Result<SparseLu> {
    sparse_lu(a, None, SPARSE_PIVOT_TOLERANCE)
}

/// Solve `A·x = b` from sparse LU factors
///
/// ```text
/// y[pinv[i]] = b[i];  L·z = y;  U·w = z;  x[q[k]] = w[k]
/// ```
pub fn sparse_lu_solve(lu: &SparseLu, b: &[f64]) -> Result<Vec<f64>> {
    let n = lu.n();
    check_len(n, b.len())?;
    let mut y = vec![0.0; n];
    for (i, &bi) in b.iter().enumerate() {
        y[lu.pinv[i]] = bi;
    }
    lsolve_csc_inplace(&lu.l, &mut y, true)?;
    usolve_csc_inplace(&lu.u, &mut y, false)?;
    let mut x = vec![0.0; n];
    for (k, &qk) in lu.q.iter().enumerate() {
        x[qk] = y[k];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residual(a: &CscMatrix, x: &[f64], b: &[f64]) -> f64 {
        let ax = a.matvec(x).unwrap();
        ax.iter().zip(b).map(|(p, q)| (p - q).abs()).fold(0.0, f64::max)
    }

    #[test]
    fn test_permutation_matrix() {
        let a = CscMatrix::from_dense(&[0.0, 1.0, 1.0, 0.0], 2, 2).unwrap();
        let lu = sparse_lu_default(&a).unwrap();
        assert_eq!(lu.pinv, vec![1, 0]);
        let x = sparse_lu_solve(&lu, &[2.0, 3.0]).unwrap();
        assert_eq!(x, vec![3.0, 2.0]);
    }

    #[test]
    fn test_unsymmetric_solve() {
        let d = [
            4.0, 0.0, 1.0, 0.0, //
            1.0, 3.0, 0.0, 0.0, //
            0.0, 2.0, 5.0, 1.0, //
            0.0, 0.0, 1.0, 2.0,
        ];
        let a = CscMatrix::from_dense(&d, 4, 4).unwrap();
        let b = [1.0, 2.0, 3.0, 4.0];
        let lu = sparse_lu(&a, None, 1e-14).unwrap();
        let x = lu.solve(&b).unwrap();
        assert!(residual(&a, &x, &b) < 1e-12);

        // L has a unit diagonal stored first in each column
        for j in 0..4 {
            assert_eq!(lu.l.get(j, j), 1.0);
        }
    }

    #[test]
    fn test_column_permutation() {
        let d = [
            0.0, 2.0, 1.0, //
            3.0, 0.0, 0.0, //
            1.0, 1.0, 4.0,
        ];
        let a = CscMatrix::from_dense(&d, 3, 3).unwrap();
        let b = [1.0, -1.0, 2.0];
        let lu = sparse_lu(&a, Some(&[2, 0, 1]), SPARSE_PIVOT_TOLERANCE).unwrap();
        assert_eq!(lu.q, vec![2, 0, 1]);
        let x = sparse_lu_solve(&lu, &b).unwrap();
        assert!(residual(&a, &x, &b) < 1e-12);
    }

    #[test]
    fn test_singular_is_reported() {
        let a = CscMatrix::from_dense(&[1.0, 1.0, 1.0, 1.0], 2, 2).unwrap();
        assert_eq!(
            sparse_lu_default(&a).unwrap_err(),
            Error::StructurallySingular { column: 1 }
        );

        // empty column
        let a = CscMatrix::from_triplets(2, 2, &[(0, 0, 1.0), (1, 0, 1.0)]).unwrap();
        assert_eq!(
            sparse_lu_default(&a).unwrap_err(),
            Error::StructurallySingular { column: 1 }
        );
    }

    #[test]
    fn test_bad_permutation() {
        let a = CscMatrix::identity(3);
        assert!(sparse_lu(&a, Some(&[0, 0, 1]), 1e-14).is_err());
        assert!(sparse_lu(&a, Some(&[0, 1]), 1e-14).is_err());
    }
}
