//! Dense linear algebra on row-major flat buffers
//!
//! - [`matrix_ops`]: products, transpose, Kronecker, triangular solves
//! - [`norms`]: matrix and vector norms
//! - [`decompositions`]: LU, QR, Cholesky, rank
//! - [`solvers`]: determinant, inverse, solve, condition numbers
//! - [`eig_symmetric`], [`eig_iterative`], [`eig_general`]: eigenproblems
//! - [`matrix_functions`]: expm, sqrtm, Sylvester and Lyapunov equations
//!
//! Dense ops, decompositions and solvers are generic over [`Element`](crate::dtype::Element)
//! (f32 and f64). Eigen-solvers and matrix functions run in f64.

pub mod decompositions;
pub mod eig_general;
pub mod eig_iterative;
pub mod eig_symmetric;
pub mod matrix_functions;
pub mod matrix_ops;
pub mod norms;
pub mod solvers;

pub use decompositions::{
    LuFactors, QrFactors, cholesky, cholesky_solve, lu, lu_determinant, lu_solve,
    lu_with_options, qr, qr_householder, qr_pivoted_r, rank,
};
pub use eig_general::{
    Balanced, GeneralEigen, Hessenberg, SchurForm, balance, eig_general, eig_general_into,
    eig_general_with_options, hessenberg, schur, schur_with_options, spectral_radius,
};
pub use eig_iterative::{
    EigenPair, inverse_iteration, inverse_iteration_with_options, power_iteration,
    power_iteration_with_options,
};
pub use eig_symmetric::{
    SymmetricEigen, eigs_symmetric, eigs_symmetric_into, eigs_symmetric_with_options,
};
pub use matrix_functions::{
    dlyap, expm, expm_into, expm_scaling, lyap, sqrtm, sqrtm_into, sqrtm_spd, sqrtm_with_options,
    sylvester, sylvester_into,
};
pub use matrix_ops::{
    add, cross, dot_product, identity, kron, lsolve, matmul_vec, multiply, outer,
    scalar_multiply, subtract, trace, transpose, transpose_into, usolve,
};
pub use norms::{norm_fro, norm_inf, norm_p, norm1};
pub use solvers::{cond_inf, cond1, det, det_into, inv, inv_into, solve, solve_into};
