//! Sparse direct solvers on compressed sparse column matrices
//!
//! The work splits into two phases:
//!
//! - **Symbolic** ([`etree`], [`column_counts`], [`SymbolicCholesky`]): reads
//!   only `col_ptr`/`row_idx`. One analysis serves any number of numeric
//!   factorizations of matrices with the same pattern.
//! - **Numeric** ([`sparse_lu`], [`sparse_cholesky`]): produces CSC factors.
//!   LU takes an optional caller-supplied column permutation `q`; no
//!   fill-reducing ordering is computed here.
//!
//! Triangular solves ([`lsolve_csc`] and friends) run in `O(n + nnz)`.
//!
//! A pivot at or below the tolerance is reported as
//! [`Error::StructurallySingular`](crate::error::Error::StructurallySingular),
//! never as a silently wrong factor.
//!
//! ```
//! use numkern::sparse::{CscMatrix, sparse_lu, sparse_lu_solve};
//! use numkern::config::SPARSE_PIVOT_TOLERANCE;
//!
//! let a = CscMatrix::from_triplets(2, 2, &[(0, 0, 4.0), (1, 0, 1.0), (1, 1, 3.0)])?;
//! let lu = sparse_lu(&a, None, SPARSE_PIVOT_TOLERANCE)?;
//! let x = sparse_lu_solve(&lu, &[4.0, 4.0])?;
//! assert_eq!(x, vec![1.0, 1.0]);
//! # Ok::<(), numkern::error::Error>(())
//! ```

mod cholesky;
mod csc;
mod lu;
mod symbolic;
mod triangular_solve;

pub use cholesky::{sparse_cholesky, sparse_cholesky_analyze, sparse_cholesky_solve};
pub use csc::CscMatrix;
pub use lu::{SparseLu, sparse_lu, sparse_lu_default, sparse_lu_solve};
pub use symbolic::{SymbolicCholesky, column_counts, etree, post_order};
pub use triangular_solve::{
    lsolve_csc, lsolve_csc_inplace, ltsolve_csc, ltsolve_csc_inplace, usolve_csc,
    usolve_csc_inplace, utsolve_csc, utsolve_csc_inplace,
};
