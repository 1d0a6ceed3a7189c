//! Matrix functions and matrix equations
//!
//! All routines here operate on f64. Scaling-and-squaring, Newton–Schulz and
//! the Kronecker solvers accumulate rounding over many matrix products, so
//! single precision is not offered.
//!
//! # expm
//!
//! ```text
//! s = max(0, ceil(log2(‖A‖₁ / 0.5)))
//! X = A / 2^s
//! exp(X) ≈ D(X)⁻¹ · N(X)        (diagonal Padé [6/6])
//! exp(A) = exp(X)^(2^s)          (s squarings)
//! ```
//!
//! # Matrix equations
//!
//! Sylvester `A·X + X·B = C` is vectorized row-major:
//!
//! ```text
//! (A ⊗ I_m + I_n ⊗ Bᵀ) · vec(X) = vec(C)
//! ```
//!
//! and solved by dense LU. The system has order `n·m`, so cost grows as
//! `O((n·m)³)`; these solvers are meant for small matrices only.

use super::decompositions::{cholesky, lu_factor_inplace};
use super::eig_symmetric::eigs_symmetric;
use super::norms::norm1;
use super::solvers::solve_packed_inplace;
use crate::buffer::{check_matrix, check_work, expm_work_size, sqrtm_work_size, sylvester_work_size};
use crate::config::{EXPM_PADE_DEGREE, EXPM_SCALING_NORM_TARGET, IterationOptions, LU_PIVOT_THRESHOLD};
use crate::error::{Error, Result};
use crate::kernels::matmul_into;
use crate::outcome::Outcome;

fn set_identity(out: &mut [f64], n: usize) {
    out.fill(0.0);
    for i in 0..n {
        out[i * n + i] = 1.0;
    }
}

fn fro(a: &[f64]) -> f64 {
    a.iter().map(|x| x * x).sum::<f64>().sqrt()
}

// ============================================================================
// Exponential
// ============================================================================

/// Number of halvings that bring `‖A‖₁` down to the Padé target
pub fn expm_scaling(norm: f64) -> u32 {
    if norm <= EXPM_SCALING_NORM_TARGET {
        return 0;
    }
    (norm / EXPM_SCALING_NORM_TARGET).log2().ceil().max(0.0) as u32
}

/// Padé [q/q] coefficients `c_k = (2q−k)! q! / ((2q)! k! (q−k)!)`
fn pade_coefficients() -> [f64; EXPM_PADE_DEGREE + 1] {
    let q = EXPM_PADE_DEGREE as f64;
    let mut c = [0.0; EXPM_PADE_DEGREE + 1];
    c[0] = 1.0;
    for k in 1..=EXPM_PADE_DEGREE {
        let kf = k as f64;
        c[k] = c[k - 1] * (q - kf + 1.0) / (kf * (2.0 * q - kf + 1.0));
    }
    c
}

/// Matrix exponential into `out` with a caller work buffer
///
/// `work` needs [`expm_work_size`]`(n)` elements.
pub fn expm_into(a: &[f64], n: usize, out: &mut [f64], work: &mut [f64]) -> Result<()> {
    check_matrix(a, n, n)?;
    check_matrix(out, n, n)?;
    check_work("expm", work, expm_work_size(n))?;
    if n == 0 {
        return Ok(());
    }

    let norm = norm1(a, n, n)?;
    if !norm.is_finite() {
        return Err(Error::InvalidArgument {
            arg: "a",
            reason: "matrix contains non-finite entries".into(),
        });
    }
    let s = expm_scaling(norm);
    let inv_scale = 0.5f64.powi(s as i32);

    let nn = n * n;
    let (x, rest) = work.split_at_mut(nn);
    let (pow, rest) = rest.split_at_mut(nn);
    let (num, rest) = rest.split_at_mut(nn);
    let (den, rest) = rest.split_at_mut(nn);
    let (tmp, rest) = rest.split_at_mut(nn);
    let ipiv = &mut rest[..n];

    for (xi, ai) in x.iter_mut().zip(a) {
        *xi = ai * inv_scale;
    }

    let c = pade_coefficients();
    set_identity(num, n);
    set_identity(den, n);
    pow.copy_from_slice(x);
    for (k, &ck) in c.iter().enumerate().skip(1) {
        if k > 1 {
            matmul_into(pow, x, tmp, n, n, n)?;
            pow.copy_from_slice(tmp);
        }
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        for ((nv, dv), pv) in num.iter_mut().zip(den.iter_mut()).zip(pow.iter()) {
            *nv += ck * pv;
            *dv += sign * ck * pv;
        }
    }

    // D · R = N
    lu_factor_inplace(den, n, LU_PIVOT_THRESHOLD, "expm", |k, p| {
        ipiv[k] = p as f64;
    })?;
    out.copy_from_slice(num);
    solve_packed_inplace(den, ipiv, n, out, n);

    for _ in 0..s {
        matmul_into(out, out, tmp, n, n, n)?;
        out.copy_from_slice(tmp);
    }
    tracing::debug!(n, squarings = s, norm, "expm finished");
    Ok(())
}

/// Matrix exponential
pub fn expm(a: &[f64], n: usize) -> Result<Vec<f64>> {
    let mut out = vec![0.0; n * n];
    let mut work = vec![0.0; expm_work_size(n)];
    expm_into(a, n, &mut out, &mut work)?;
    Ok(out)
}

// ============================================================================
// Square root
// ============================================================================

/// Principal square root by coupled Newton–Schulz iteration into `out`
///
/// ```text
/// Y₀ = A / ‖A‖_F,  Z₀ = I
/// T  = (3I − Z·Y) / 2
/// Y ← Y·T,  Z ← T·Z          (Y → √(A/‖A‖_F),  Z → its inverse)
/// √A = √‖A‖_F · Y
/// ```
///
/// Convergence is guaranteed when `‖I − A/‖A‖_F‖ < 1` (e.g. symmetric
/// positive definite input). Iteration stops when `‖I − Z·Y‖_F` reaches the
/// tolerance; a diverging or exhausted run returns the last `Y` as
/// [`Outcome::NotConverged`]. `work` needs [`sqrtm_work_size`]`(n)` elements.
pub fn sqrtm_into(
    a: &[f64],
    n: usize,
    out: &mut [f64],
    work: &mut [f64],
    opts: &IterationOptions,
) -> Result<Outcome<()>> {
    check_matrix(a, n, n)?;
    check_matrix(out, n, n)?;
    check_work("sqrtm", work, sqrtm_work_size(n))?;

    let c = fro(a);
    if c == 0.0 {
        out.fill(0.0);
        return Ok(Outcome::Converged {
            value: (),
            iterations: 0,
        });
    }
    if !c.is_finite() {
        return Err(Error::InvalidArgument {
            arg: "a",
            reason: "matrix contains non-finite entries".into(),
        });
    }

    let nn = n * n;
    let (y, rest) = work.split_at_mut(nn);
    let (z, rest) = rest.split_at_mut(nn);
    let (t, rest) = rest.split_at_mut(nn);
    let (y_next, rest) = rest.split_at_mut(nn);
    let z_next = &mut rest[..nn];

    for (yi, ai) in y.iter_mut().zip(a) {
        *yi = ai / c;
    }
    set_identity(z, n);

    let mut converged = false;
    let mut iterations = 0;
    let mut residual = f64::INFINITY;
    loop {
        matmul_into(z, y, t, n, n, n)?;
        let mut r2 = 0.0;
        for i in 0..n {
            for j in 0..n {
                let id = if i == j { 1.0 } else { 0.0 };
                let d = id - t[i * n + j];
                r2 += d * d;
            }
        }
        residual = r2.sqrt();
        if residual <= opts.tolerance {
            converged = true;
            break;
        }
        if !residual.is_finite() || iterations >= opts.max_iterations {
            break;
        }

        for i in 0..n {
            for j in 0..n {
                let id = if i == j { 3.0 } else { 0.0 };
                t[i * n + j] = 0.5 * (id - t[i * n + j]);
            }
        }
        matmul_into(y, t, y_next, n, n, n)?;
        matmul_into(t, z, z_next, n, n, n)?;
        y.copy_from_slice(y_next);
        z.copy_from_slice(z_next);
        iterations += 1;
    }

    let root = c.sqrt();
    for (o, yi) in out.iter_mut().zip(y.iter()) {
        *o = root * yi;
    }
    tracing::debug!(n, iterations, residual, "newton-schulz finished");
    Ok(Outcome::from_parts((), converged, iterations, residual))
}

/// Principal square root by Newton–Schulz
pub fn sqrtm(a: &[f64], n: usize) -> Result<Outcome<Vec<f64>>> {
    sqrtm_with_options(a, n, &IterationOptions::sqrtm())
}

/// Principal square root by Newton–Schulz with explicit budget
pub fn sqrtm_with_options(a: &[f64], n: usize, opts: &IterationOptions) -> Result<Outcome<Vec<f64>>> {
    let mut out = vec![0.0; n * n];
    let mut work = vec![0.0; sqrtm_work_size(n)];
    let status = sqrtm_into(a, n, &mut out, &mut work, opts)?;
    Ok(status.map(|()| out))
}

/// Square root of a symmetric positive (semi)definite matrix, `V·√Λ·Vᵀ`
///
/// A successful Cholesky factorization proves definiteness; otherwise the
/// eigenvalues decide. Eigenvalues within `n·eps·max|λ|` of zero are clamped;
/// anything more negative has no real square root.
///
/// The Jacobi outcome is carried through: a budget-exhausted eigensolve
/// yields [`Outcome::NotConverged`] with the root built from the best
/// eigenpairs.
pub fn sqrtm_spd(a: &[f64], n: usize) -> Result<Outcome<Vec<f64>>> {
    check_matrix(a, n, n)?;
    if a.iter().any(|v| !v.is_finite()) {
        return Err(Error::InvalidArgument {
            arg: "a",
            reason: "matrix contains non-finite entries".into(),
        });
    }
    let definite = match cholesky(a, n) {
        Ok(_) => true,
        Err(Error::NotPositiveDefinite { .. }) => false,
        Err(e) => return Err(e),
    };

    let status = eigs_symmetric(a, n)?;
    if let Some(bad) = status.value().values.iter().find(|v| !v.is_finite()) {
        return Err(Error::InvalidArgument {
            arg: "a",
            reason: format!("eigensolver produced non-finite eigenvalue {bad}"),
        });
    }
    status.try_map(|eig| spd_root(&eig.values, &eig.vectors, n, definite))
}

fn spd_root(values: &[f64], v: &[f64], n: usize, definite: bool) -> Result<Vec<f64>> {
    let lmax = values.iter().fold(0.0f64, |m, x| m.max(x.abs()));
    let floor = n as f64 * f64::EPSILON * lmax;
    let mut roots = vec![0.0; n];
    for (r, &lambda) in roots.iter_mut().zip(values) {
        if lambda < -floor && !definite {
            return Err(Error::NoRealSquareRoot { eigenvalue: lambda });
        }
        *r = lambda.max(0.0).sqrt();
    }

    let mut out = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..=i {
            let mut s = 0.0;
            for k in 0..n {
                s += v[i * n + k] * roots[k] * v[j * n + k];
            }
            out[i * n + j] = s;
            out[j * n + i] = s;
        }
    }
    Ok(out)
}

// ============================================================================
// Sylvester / Lyapunov
// ============================================================================

/// Solve `A·X + X·B = C` (`A` n×n, `B` m×m, `C` and `X` n×m) into `x`
///
/// `work` needs [`sylvester_work_size`]`(n, m)` elements. Fails with
/// `SingularMatrix` when `A` and `−B` share an eigenvalue.
pub fn sylvester_into(
    a: &[f64],
    n: usize,
    b: &[f64],
    m: usize,
    c: &[f64],
    x: &mut [f64],
    work: &mut [f64],
) -> Result<()> {
    check_matrix(a, n, n)?;
    check_matrix(b, m, m)?;
    check_matrix(c, n, m)?;
    check_matrix(x, n, m)?;
    check_work("sylvester", work, sylvester_work_size(n, m))?;
    let nm = n * m;
    if nm == 0 {
        return Ok(());
    }

    let (k, rest) = work.split_at_mut(nm * nm);
    let ipiv = &mut rest[..nm];
    k.fill(0.0);
    // row (i, j) of the Kronecker system
    for i in 0..n {
        for j in 0..m {
            let row = (i * m + j) * nm;
            for p in 0..n {
                k[row + p * m + j] += a[i * n + p];
            }
            for q in 0..m {
                k[row + i * m + q] += b[q * m + j];
            }
        }
    }
    lu_factor_inplace(k, nm, LU_PIVOT_THRESHOLD, "sylvester", |s, p| {
        ipiv[s] = p as f64;
    })?;
    x.copy_from_slice(c);
    solve_packed_inplace(k, ipiv, nm, x, 1);
    Ok(())
}

/// Solve `A·X + X·B = C`
pub fn sylvester(a: &[f64], n: usize, b: &[f64], m: usize, c: &[f64]) -> Result<Vec<f64>> {
    let mut x = vec![0.0; n * m];
    let mut work = vec![0.0; sylvester_work_size(n, m)];
    sylvester_into(a, n, b, m, c, &mut x, &mut work)?;
    Ok(x)
}

/// Continuous Lyapunov equation `A·X + X·Aᵀ + Q = 0`
pub fn lyap(a: &[f64], q: &[f64], n: usize) -> Result<Vec<f64>> {
    check_matrix(a, n, n)?;
    check_matrix(q, n, n)?;
    let mut at = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            at[j * n + i] = a[i * n + j];
        }
    }
    let neg_q: Vec<f64> = q.iter().map(|v| -v).collect();
    sylvester(a, n, &at, n, &neg_q)
}

/// Discrete Lyapunov equation `A·X·Aᵀ − X + Q = 0`
///
/// Solved as `(A ⊗ A − I)·vec(X) = −vec(Q)`.
pub fn dlyap(a: &[f64], q: &[f64], n: usize) -> Result<Vec<f64>> {
    check_matrix(a, n, n)?;
    check_matrix(q, n, n)?;
    let nn = n * n;
    let mut work = vec![0.0; sylvester_work_size(n, n)];
    if nn == 0 {
        return Ok(Vec::new());
    }
    let (k, rest) = work.split_at_mut(nn * nn);
    let ipiv = &mut rest[..nn];
    for i in 0..n {
        for j in 0..n {
            let row = (i * n + j) * nn;
            for p in 0..n {
                for r in 0..n {
                    k[row + p * n + r] = a[i * n + p] * a[j * n + r];
                }
            }
            k[row + i * n + j] -= 1.0;
        }
    }
    lu_factor_inplace(k, nn, LU_PIVOT_THRESHOLD, "dlyap", |s, p| {
        ipiv[s] = p as f64;
    })?;
    let mut x: Vec<f64> = q.iter().map(|v| -v).collect();
    solve_packed_inplace(k, ipiv, nn, &mut x, 1);
    Ok(x)
}
