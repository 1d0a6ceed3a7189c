//! Symmetric eigendecomposition by cyclic Jacobi rotations
//!
//! Algorithm:
//! 1. V = I, W = sym(A) (lower triangle mirrored)
//! 2. REPEAT up to `max_sweeps`:
//!    - off = ‖offdiag(W)‖_F; stop when off ≤ precision · ‖A‖_F
//!    - FOR each pair (p, q), p < q, with W[p,q] ≠ 0:
//!      rotate W ← Jᵀ·W·J to zero W[p,q]; V ← V·J
//! 3. eigenvalues = diag(W), sorted ascending with matching columns of V
//!
//! Jacobi always converges for real symmetric input; exhausting the sweep
//! budget is reported as [`Outcome::NotConverged`] with the current iterate.

use crate::buffer::{check_matrix, check_work, eigs_symmetric_work_size};
use crate::config::EigOptions;
use crate::error::Result;
use crate::outcome::Outcome;

/// Eigenvalues (ascending) and eigenvectors (columns of an `n×n` matrix)
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricEigen {
    /// Eigenvalues, ascending
    pub values: Vec<f64>,
    /// Eigenvectors as columns, row-major `n×n`
    pub vectors: Vec<f64>,
    /// Matrix order
    pub n: usize,
}

/// Jacobi rotation parameters (cosine and sine of rotation angle)
///
/// ```text
/// J = [ c  s ]
///     [-s  c ]   (acting on columns p, q)
/// ```
#[derive(Debug, Clone, Copy)]
pub(crate) struct JacobiRotation {
    pub c: f64,
    pub s: f64,
}

impl JacobiRotation {
    /// Rotation that zeroes `a_pq` of a symmetric 2×2 block
    ///
    /// ```text
    /// τ = (a_qq - a_pp) / (2 a_pq)
    /// t = sign(τ) / (|τ| + sqrt(1 + τ²))
    /// c = 1 / sqrt(1 + t²),  s = t c
    /// ```
    #[inline]
    pub(crate) fn compute(a_pp: f64, a_qq: f64, a_pq: f64) -> Self {
        if a_pq == 0.0 {
            return Self { c: 1.0, s: 0.0 };
        }
        let tau = (a_qq - a_pp) / (2.0 * a_pq);
        let t = if tau >= 0.0 {
            1.0 / (tau + (1.0 + tau * tau).sqrt())
        } else {
            -1.0 / (-tau + (1.0 + tau * tau).sqrt())
        };
        let c = 1.0 / (1.0 + t * t).sqrt();
        Self { c, s: t * c }
    }
}

/// W ← Jᵀ·W·J on the symmetric `n×n` matrix `w`
fn apply_two_sided(w: &mut [f64], n: usize, p: usize, q: usize, rot: JacobiRotation) {
    let (c, s) = (rot.c, rot.s);
    let a_pp = w[p * n + p];
    let a_qq = w[q * n + q];
    let a_pq = w[p * n + q];

    for k in 0..n {
        if k == p || k == q {
            continue;
        }
        let a_kp = w[k * n + p];
        let a_kq = w[k * n + q];
        let new_kp = c * a_kp - s * a_kq;
        let new_kq = s * a_kp + c * a_kq;
        w[k * n + p] = new_kp;
        w[p * n + k] = new_kp;
        w[k * n + q] = new_kq;
        w[q * n + k] = new_kq;
    }

    let cs2 = 2.0 * c * s;
    w[p * n + p] = c * c * a_pp - cs2 * a_pq + s * s * a_qq;
    w[q * n + q] = s * s * a_pp + cs2 * a_pq + c * c * a_qq;
    w[p * n + q] = 0.0;
    w[q * n + p] = 0.0;
}

/// V ← V·J on columns p, q
fn apply_to_columns(v: &mut [f64], n: usize, p: usize, q: usize, rot: JacobiRotation) {
    for row in v.chunks_mut(n) {
        let vp = row[p];
        let vq = row[q];
        row[p] = rot.c * vp - rot.s * vq;
        row[q] = rot.s * vp + rot.c * vq;
    }
}

fn off_diagonal_norm(w: &[f64], n: usize) -> f64 {
    let mut s = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            s += 2.0 * w[i * n + j] * w[i * n + j];
        }
    }
    s.sqrt()
}

/// Jacobi eigensolver writing into caller buffers
///
/// `values` (n) and `vectors` (n×n) receive the result; `work` needs
/// [`eigs_symmetric_work_size`]`(n)` elements. The returned outcome carries
/// only the convergence status.
pub fn eigs_symmetric_into(
    a: &[f64],
    n: usize,
    values: &mut [f64],
    vectors: &mut [f64],
    work: &mut [f64],
    opts: &EigOptions,
) -> Result<Outcome<()>> {
    check_matrix(a, n, n)?;
    check_matrix(values, n, 1)?;
    check_matrix(vectors, n, n)?;
    check_work("eigs_symmetric", work, eigs_symmetric_work_size(n))?;

    let w = &mut work[..n * n];
    for i in 0..n {
        for j in 0..=i {
            let v = a[i * n + j];
            w[i * n + j] = v;
            w[j * n + i] = v;
        }
    }
    vectors.fill(0.0);
    for i in 0..n {
        vectors[i * n + i] = 1.0;
    }

    let scale = w.iter().map(|x| x * x).sum::<f64>().sqrt();
    let target = opts.precision * scale;

    let mut sweeps = 0;
    let mut off = off_diagonal_norm(w, n);
    while off > target && sweeps < opts.max_sweeps {
        for p in 0..n {
            for q in (p + 1)..n {
                let a_pq = w[p * n + q];
                if a_pq == 0.0 {
                    continue;
                }
                let rot = JacobiRotation::compute(w[p * n + p], w[q * n + q], a_pq);
                apply_two_sided(w, n, p, q, rot);
                apply_to_columns(vectors, n, p, q, rot);
            }
        }
        sweeps += 1;
        off = off_diagonal_norm(w, n);
    }
    tracing::debug!(n, sweeps, off, "jacobi eigensolver finished");

    for i in 0..n {
        values[i] = w[i * n + i];
    }

    // selection sort ascending, swapping eigenvector columns alongside
    for i in 0..n {
        let mut m = i;
        for j in (i + 1)..n {
            if values[j] < values[m] {
                m = j;
            }
        }
        if m != i {
            values.swap(i, m);
            for row in vectors.chunks_mut(n) {
                row.swap(i, m);
            }
        }
    }

    Ok(Outcome::from_parts((), off <= target, sweeps, off))
}

/// Jacobi eigensolver with default options
pub fn eigs_symmetric(a: &[f64], n: usize) -> Result<Outcome<SymmetricEigen>> {
    eigs_symmetric_with_options(a, n, &EigOptions::default())
}

/// Jacobi eigensolver with explicit precision and sweep budget
pub fn eigs_symmetric_with_options(
    a: &[f64],
    n: usize,
    opts: &EigOptions,
) -> Result<Outcome<SymmetricEigen>> {
    let mut values = vec![0.0; n];
    let mut vectors = vec![0.0; n * n];
    let mut work = vec![0.0; eigs_symmetric_work_size(n)];
    let status = eigs_symmetric_into(a, n, &mut values, &mut vectors, &mut work, opts)?;
    Ok(status.map(|()| SymmetricEigen { values, vectors, n }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_2x2_known_eigenvalues() {
        let a = [2.0, 1.0, 1.0, 2.0];
        let out = eigs_symmetric(&a, 2).unwrap();
        assert!(out.is_converged());
        let eig = out.value();
        assert!((eig.values[0] - 1.0).abs() < 1e-12);
        assert!((eig.values[1] - 3.0).abs() < 1e-12);
        // eigenvector for 3 is (1, 1)/√2 up to sign
        let v = [eig.vectors[1], eig.vectors[3]];
        assert!((v[0].abs() - 0.5f64.sqrt()).abs() < 1e-12);
        assert!((v[0] - v[1]).abs() < 1e-12);
    }

    #[test]
    fn test_reconstruction_and_trace() {
        let n = 4;
        let a = [
            4.0, 1.0, -2.0, 2.0, //
            1.0, 2.0, 0.0, 1.0, //
            -2.0, 0.0, 3.0, -2.0, //
            2.0, 1.0, -2.0, -1.0,
        ];
        let eig = eigs_symmetric(&a, n).unwrap().into_value();
        let sum: f64 = eig.values.iter().sum();
        assert!((sum - 8.0).abs() < 1e-10);
        for k in 0..n {
            for i in 0..n {
                let av: f64 = (0..n).map(|j| a[i * n + j] * eig.vectors[j * n + k]).sum();
                assert!((av - eig.values[k] * eig.vectors[i * n + k]).abs() < 1e-9);
            }
        }
        for w in eig.values.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn test_budget_exhaustion_returns_best_estimate() {
        let a = [4.0, 1.0, -2.0, 1.0, 2.0, 0.0, -2.0, 0.0, 3.0];
        let opts = EigOptions {
            max_sweeps: 1,
            precision: 1e-300,
            ..EigOptions::default()
        };
        let out = eigs_symmetric_with_options(&a, 3, &opts).unwrap();
        assert!(!out.is_converged());
        assert_eq!(out.iterations(), 1);
        assert_eq!(out.value().values.len(), 3);
    }

    #[test]
    fn test_diagonal_needs_no_sweeps() {
        let a = [3.0, 0.0, 0.0, -1.0];
        let out = eigs_symmetric(&a, 2).unwrap();
        assert_eq!(out.iterations(), 0);
        assert_eq!(out.value().values, vec![-1.0, 3.0]);
        assert_eq!(out.value().vectors, vec![0.0, 1.0, 1.0, 0.0]);
    }
}
