//! # numkern
//!
//! **Flat-buffer numerical kernels for embedding behind a narrow ABI.**
//!
//! numkern works on caller-owned, row-major `&[f64]` buffers with explicit
//! dimensions. It never retains memory between calls, holds no global state
//! and is safe to call from independent threads on disjoint buffers.
//!
//! ## Features
//!
//! - **Arithmetic**: scalar math, integer number theory, elementwise arrays
//!   with a SIMD fast path, interleaved complex arrays
//! - **Dense linear algebra**: products, norms, LU, QR, Cholesky, rank,
//!   determinant, inverse, solve
//! - **Eigenproblems**: Jacobi (symmetric), power and inverse iteration,
//!   balanced Hessenberg + Francis QR (general)
//! - **Matrix functions**: `expm`, `sqrtm`, Sylvester and Lyapunov equations
//! - **Sparse**: CSC triangular solves, left-looking LU, up-looking Cholesky
//! - **FFT**: radix-2 1-D/2-D transforms, convolution, correlation, freqz,
//!   polynomials
//! - **ODE**: embedded Runge–Kutta steps with caller-driven step control
//! - **Statistics**: selection, moments, quantiles, correlation
//!
//! ## Buffers and results
//!
//! Allocating entry points (`inv`, `expm`, ...) copy on entry. Their `*_into`
//! siblings write into caller buffers and take a `work` slice sized by the
//! matching function in [`buffer`]. Hard failures are [`error::Error`];
//! iterative routines that run out of budget return
//! [`Outcome::NotConverged`](outcome::Outcome::NotConverged) with the best
//! estimate so far.
//!
//! ```
//! use numkern::prelude::*;
//!
//! let a: [f64; 4] = [4.0, 1.0, 1.0, 3.0];
//! let x = solve(&a, &[1.0, 2.0], 2)?;
//! assert!((4.0 * x[0] + x[1] - 1.0).abs() < 1e-12);
//! # Ok::<(), Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): parallel row loops in large products and 2-D FFTs
//! - `serde`: `Serialize`/`Deserialize` on the option structs
//! - `ffi`: `extern "C"` exports in [`ffi`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod config;
pub mod dtype;
pub mod error;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod fft;
pub mod kernels;
pub mod linalg;
pub mod ode;
pub mod outcome;
pub mod sparse;
pub mod stats;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{EigOptions, IterationOptions, LuOptions, StepControl};
    pub use crate::dtype::{Complex128, DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::outcome::{Outcome, Status};

    pub use crate::fft::{convolve, fft, ifft};
    pub use crate::linalg::{
        cholesky, det, eig_general, eigs_symmetric, expm, inv, lu, multiply, qr, solve, sqrtm,
    };
    pub use crate::sparse::{CscMatrix, sparse_cholesky_analyze, sparse_lu};
    pub use crate::stats::{mean, median, quantile, variance};
}
