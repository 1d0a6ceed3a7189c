//! Common test utilities
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Deterministic RNG for reproducible inputs
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// `rows×cols` matrix with entries uniform in [-1, 1)
pub fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Vec<f64> {
    (0..rows * cols).map(|_| rng.random_range(-1.0..1.0)).collect()
}

/// Random matrix made strictly diagonally dominant (hence nonsingular)
pub fn random_well_conditioned(rng: &mut StdRng, n: usize) -> Vec<f64> {
    let mut a = random_matrix(rng, n, n);
    for i in 0..n {
        a[i * n + i] += n as f64 + 1.0;
    }
    a
}

/// `B·Bᵀ + n·I` for a random `B`: symmetric positive definite
pub fn random_spd(rng: &mut StdRng, n: usize) -> Vec<f64> {
    let b = random_matrix(rng, n, n);
    let mut a = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            let s: f64 = (0..n).map(|k| b[i * n + k] * b[j * n + k]).sum();
            a[i * n + j] = s;
        }
        a[i * n + i] += n as f64;
    }
    a
}

/// Random vector with entries uniform in [-1, 1)
pub fn random_vector(rng: &mut StdRng, n: usize) -> Vec<f64> {
    (0..n).map(|_| rng.random_range(-1.0..1.0)).collect()
}

/// Naive triple-loop product used as a reference
pub fn naive_matmul(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Vec<f64> {
    let mut c = vec![0.0; m * n];
    for i in 0..m {
        for j in 0..n {
            c[i * n + j] = (0..k).map(|p| a[i * k + p] * b[p * n + j]).sum();
        }
    }
    c
}

/// n×n identity
pub fn eye(n: usize) -> Vec<f64> {
    let mut a = vec![0.0; n * n];
    for i in 0..n {
        a[i * n + i] = 1.0;
    }
    a
}
