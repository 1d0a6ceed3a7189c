//! Power and inverse iteration for single eigenpairs
//!
//! Both methods normalize the iterate each step and estimate the eigenvalue
//! by the Rayleigh quotient `λ = vᵀAv / vᵀv`. Iteration stops once the
//! eigenpair residual `‖A·v − λ·v‖₂` drops to `tol·‖A‖₁`. A settled quotient
//! alone is not enough: with dominant eigenvalues `±λ` the quotient stays put
//! while the vector keeps flipping. Otherwise the last iterate is returned as
//! [`Outcome::NotConverged`] with the residual.

use super::decompositions::{LuFactors, lu_solve, lu_with_options};
use super::norms::norm1;
use crate::buffer::{check_len, check_matrix};
use crate::config::{IterationOptions, LuOptions};
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::kernels::matvec_into;
use crate::outcome::Outcome;

/// One eigenvalue with a unit-norm eigenvector
#[derive(Debug, Clone, PartialEq)]
pub struct EigenPair {
    /// Eigenvalue estimate (Rayleigh quotient)
    pub value: f64,
    /// Unit 2-norm eigenvector estimate
    pub vector: Vec<f64>,
}

/// Start vector with distinct entries so it is unlikely to be orthogonal to
/// the target eigenvector
fn start_vector(n: usize) -> Vec<f64> {
    let mut v: Vec<f64> = (0..n).map(|i| 1.0 + 1.0 / (i as f64 + 2.0)).collect();
    normalize(&mut v);
    v
}

fn normalize(v: &mut [f64]) -> f64 {
    let norm = f64::dot(v, v).sqrt();
    if norm > 0.0 {
        let inv = 1.0 / norm;
        for x in v.iter_mut() {
            *x *= inv;
        }
    }
    norm
}

fn rayleigh(a: &[f64], v: &[f64], av: &mut [f64], n: usize) -> Result<f64> {
    matvec_into(a, v, av, n, n)?;
    Ok(f64::dot(v, av) / f64::dot(v, v))
}

/// `‖A·v − λ·v‖₂` with `av = A·v` already formed
fn residual_norm(av: &[f64], v: &[f64], lambda: f64) -> f64 {
    av.iter()
        .zip(v)
        .map(|(x, y)| {
            let d = x - lambda * y;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Dominant eigenpair (largest |λ|) by power iteration
pub fn power_iteration(a: &[f64], n: usize) -> Result<Outcome<EigenPair>> {
    power_iteration_with_options(a, n, None, &IterationOptions::default())
}

/// Power iteration from an optional start vector with explicit budget
pub fn power_iteration_with_options(
    a: &[f64],
    n: usize,
    start: Option<&[f64]>,
    opts: &IterationOptions,
) -> Result<Outcome<EigenPair>> {
    check_matrix(a, n, n)?;
    if n == 0 {
        return Err(Error::InvalidArgument {
            arg: "n",
            reason: "power iteration needs a non-empty matrix".into(),
        });
    }
    let mut v = match start {
        Some(s) => {
            check_len(n, s.len())?;
            let mut v = s.to_vec();
            if normalize(&mut v) == 0.0 {
                return Err(Error::InvalidArgument {
                    arg: "start",
                    reason: "start vector is zero".into(),
                });
            }
            v
        }
        None => start_vector(n),
    };
    let threshold = opts.tolerance * norm1(a, n, n)?;
    let mut av = vec![0.0; n];
    let mut lambda = rayleigh(a, &v, &mut av, n)?;

    let mut converged = false;
    let mut iterations = 0;
    let mut residual = residual_norm(&av, &v, lambda);
    while iterations < opts.max_iterations {
        iterations += 1;
        if f64::dot(&av, &av) == 0.0 {
            // A·v = 0, so v is an eigenvector for λ = 0
            lambda = 0.0;
            residual = 0.0;
            converged = true;
            break;
        }
        v.copy_from_slice(&av);
        normalize(&mut v);
        lambda = rayleigh(a, &v, &mut av, n)?;
        residual = residual_norm(&av, &v, lambda);
        if residual <= threshold {
            converged = true;
            break;
        }
    }
    tracing::debug!(n, iterations, lambda, residual, "power iteration finished");
    Ok(Outcome::from_parts(
        EigenPair { value: lambda, vector: v },
        converged,
        iterations,
        residual,
    ))
}

/// Eigenpair whose eigenvalue is nearest `shift`, by shifted inverse iteration
///
/// `(A − μI)` is factored once; each step solves against the factors. A shift
/// that hits an eigenvalue exactly is nudged by a relative `1e-10` so the
/// factorization succeeds.
pub fn inverse_iteration(a: &[f64], n: usize, shift: f64) -> Result<Outcome<EigenPair>> {
    inverse_iteration_with_options(a, n, shift, &IterationOptions::default())
}

/// Shifted inverse iteration with explicit budget
pub fn inverse_iteration_with_options(
    a: &[f64],
    n: usize,
    shift: f64,
    opts: &IterationOptions,
) -> Result<Outcome<EigenPair>> {
    check_matrix(a, n, n)?;
    if n == 0 {
        return Err(Error::InvalidArgument {
            arg: "n",
            reason: "inverse iteration needs a non-empty matrix".into(),
        });
    }

    let factors = factor_shifted(a, n, shift)?;
    let threshold = opts.tolerance * norm1(a, n, n)?;
    let mut v = start_vector(n);
    let mut av = vec![0.0; n];
    let mut lambda = rayleigh(a, &v, &mut av, n)?;

    let mut converged = false;
    let mut iterations = 0;
    let mut residual = residual_norm(&av, &v, lambda);
    while iterations < opts.max_iterations {
        iterations += 1;
        v = lu_solve(&factors, &v)?;
        normalize(&mut v);
        lambda = rayleigh(a, &v, &mut av, n)?;
        residual = residual_norm(&av, &v, lambda);
        if residual <= threshold {
            converged = true;
            break;
        }
    }
    tracing::debug!(n, iterations, shift, lambda, residual, "inverse iteration finished");
    Ok(Outcome::from_parts(
        EigenPair { value: lambda, vector: v },
        converged,
        iterations,
        residual,
    ))
}

fn factor_shifted(a: &[f64], n: usize, shift: f64) -> Result<LuFactors<f64>> {
    let opts = LuOptions::default();
    let mut mu = shift;
    for _ in 0..2 {
        let mut shifted = a.to_vec();
        for i in 0..n {
            shifted[i * n + i] -= mu;
        }
        match lu_with_options(&shifted, n, &opts) {
            Ok(f) => return Ok(f),
            Err(Error::SingularMatrix { .. }) => {
                mu += 1e-10 * mu.abs().max(1.0);
            }
            Err(e) => return Err(e),
        }
    }
    Err(Error::SingularMatrix {
        op: "inverse_iteration",
        pivot_index: 0,
    })
}
