//! LU, QR, Cholesky and rank

mod common;

use common::{
    assert_allclose_f64, eye, random_matrix, random_spd, random_vector, random_well_conditioned,
    rng,
};
use numkern::config::LuOptions;
use numkern::error::Error;
use numkern::linalg::{
    cholesky, cholesky_solve, det, lu, lu_determinant, lu_solve, lu_with_options, matmul_vec,
    multiply, qr, qr_householder, rank, transpose,
};

// ============================================================================
// LU
// ============================================================================

#[test]
fn test_lu_reconstructs_permuted_matrix() {
    let mut r = rng(10);
    for n in [1, 3, 8] {
        let a = random_matrix(&mut r, n, n);
        let f = lu(&a, n).unwrap();
        let prod = multiply(&f.l(), &f.u(), n, n, n).unwrap();
        let mut pa = vec![0.0; n * n];
        for (i, &p) in f.perm.iter().enumerate() {
            pa[i * n..(i + 1) * n].copy_from_slice(&a[p * n..(p + 1) * n]);
        }
        assert_allclose_f64(&prod, &pa, 1e-12, 1e-12, "P·A = L·U");
    }
}

#[test]
fn test_lu_pivots_on_largest_entry() {
    let a: [f64; 4] = [1.0, 2.0, 3.0, 4.0];
    let f = lu(&a, 2).unwrap();
    assert_eq!(f.perm, vec![1, 0]);
    assert_eq!(f.num_swaps, 1);
    // L[1][0] = 1/3, U = [[3, 4], [0, 2 - 4/3]]
    assert!((f.lu[2] - 1.0 / 3.0).abs() < 1e-15);
    assert!((f.lu[3] - 2.0 / 3.0).abs() < 1e-15);
    assert!((lu_determinant(&f) + 2.0).abs() < 1e-14);
}

#[test]
fn test_lu_solve_and_determinant_agree() {
    let mut r = rng(11);
    let n = 7;
    let a = random_well_conditioned(&mut r, n);
    let b = random_vector(&mut r, n);
    let f = lu(&a, n).unwrap();
    let x = lu_solve(&f, &b).unwrap();
    assert_allclose_f64(&matmul_vec(&a, &x, n, n).unwrap(), &b, 0.0, 1e-12, "A·x");
    let d = det(&a, n).unwrap();
    assert!((lu_determinant(&f) - d).abs() <= 1e-12 * d.abs());
}

#[test]
fn test_lu_threshold_is_configurable() {
    let a = [1e-10, 0.0, 0.0, 1e-10];
    assert!(lu(&a, 2).is_ok());
    let strict = LuOptions {
        pivot_threshold: 1e-8,
    };
    assert!(matches!(
        lu_with_options(&a, 2, &strict),
        Err(Error::SingularMatrix { pivot_index: 0, .. })
    ));
}

// ============================================================================
// QR
// ============================================================================

#[test]
fn test_gram_schmidt_qr() {
    let mut r = rng(12);
    let (m, n) = (6, 4);
    let a = random_matrix(&mut r, m, n);
    let f = qr(&a, m, n).unwrap();
    assert_eq!(f.q_cols, n);
    let qr_prod = multiply(&f.q, &f.r, m, n, n).unwrap();
    assert_allclose_f64(&qr_prod, &a, 1e-12, 1e-12, "Q·R");
    let qt = transpose(&f.q, m, n).unwrap();
    let qtq = multiply(&qt, &f.q, n, m, n).unwrap();
    assert_allclose_f64(&qtq, &eye(n), 0.0, 1e-12, "QᵀQ");
    for i in 1..n {
        for j in 0..i {
            assert_eq!(f.r[i * n + j], 0.0);
        }
    }
}

#[test]
fn test_householder_qr_is_orthogonal() {
    let mut r = rng(13);
    let (m, n) = (5, 3);
    let a = random_matrix(&mut r, m, n);
    let f = qr_householder(&a, m, n).unwrap();
    assert_eq!(f.q_cols, m);
    let qr_prod = multiply(&f.q, &f.r, m, m, n).unwrap();
    assert_allclose_f64(&qr_prod, &a, 1e-12, 1e-12, "Q·R");
    let qt = transpose(&f.q, m, m).unwrap();
    let qtq = multiply(&qt, &f.q, m, m, m).unwrap();
    assert_allclose_f64(&qtq, &eye(m), 0.0, 1e-12, "QᵀQ");
}

#[test]
fn test_rank() {
    let full = [1.0, 0.0, 0.0, 1.0];
    assert_eq!(rank(&full, 2, 2, None).unwrap(), 2);
    // zero third column
    let deficient = [1.0, 2.0, 0.0, 3.0, 4.0, 0.0, 5.0, 6.0, 0.0];
    assert_eq!(rank(&deficient, 3, 3, None).unwrap(), 2);
    assert_eq!(rank(&[0.0; 6], 2, 3, None).unwrap(), 0);
    assert_eq!(rank(&[] as &[f64], 0, 3, None).unwrap(), 0);
    // an explicit tolerance can drop the small direction
    let near = [1.0, 0.0, 0.0, 1e-9];
    assert_eq!(rank(&near, 2, 2, None).unwrap(), 2);
    assert_eq!(rank(&near, 2, 2, Some(1e-6)).unwrap(), 1);
}

// ============================================================================
// Cholesky
// ============================================================================

#[test]
fn test_cholesky_reconstructs() {
    let mut r = rng(14);
    let n = 6;
    let a = random_spd(&mut r, n);
    let l = cholesky(&a, n).unwrap();
    let lt = transpose(&l, n, n).unwrap();
    assert_allclose_f64(&multiply(&l, &lt, n, n, n).unwrap(), &a, 1e-12, 1e-12, "L·Lᵀ");
    let b = random_vector(&mut r, n);
    let x = cholesky_solve(&l, n, &b).unwrap();
    assert_allclose_f64(&matmul_vec(&a, &x, n, n).unwrap(), &b, 0.0, 1e-11, "A·x");
}

#[test]
fn test_cholesky_rejects_indefinite() {
    let a = [1.0, 2.0, 2.0, 1.0];
    assert!(matches!(
        cholesky(&a, 2),
        Err(Error::NotPositiveDefinite { column: 1, .. })
    ));
    assert!(matches!(
        cholesky(&[-1.0], 1),
        Err(Error::NotPositiveDefinite { column: 0, .. })
    ));
}
