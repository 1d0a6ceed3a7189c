//! Error types for numkern

use thiserror::Error;

/// Result type alias using numkern's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in numkern kernels
///
/// Numerical failure modes (singular input, indefinite input) are reported
/// here as values. Non-convergence of an iterative routine is NOT an error:
/// it is reported through [`crate::outcome::Outcome::NotConverged`] together
/// with the best available estimate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Buffer or dimension mismatch at the call boundary
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Invalid argument provided to a kernel
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Why it is invalid
        reason: String,
    },

    /// Caller-provided work buffer is smaller than the sizing function requires
    #[error("Work buffer too small for '{op}': required {required} elements, provided {provided}")]
    WorkspaceTooSmall {
        /// Operation name
        op: &'static str,
        /// Elements required by `<op>_work_size`
        required: usize,
        /// Elements provided
        provided: usize,
    },

    /// Pivot magnitude fell below the singularity threshold
    #[error("Singular matrix in '{op}' (pivot {pivot_index} below threshold)")]
    SingularMatrix {
        /// Operation name
        op: &'static str,
        /// Elimination step at which the pivot vanished
        pivot_index: usize,
    },

    /// Cholesky pivot would require the square root of a non-positive number
    #[error("Matrix is not positive definite in '{op}' (column {column})")]
    NotPositiveDefinite {
        /// Operation name
        op: &'static str,
        /// Column whose diagonal pivot was non-positive
        column: usize,
    },

    /// Principal real square root does not exist
    #[error("Matrix has no real principal square root (eigenvalue {eigenvalue})")]
    NoRealSquareRoot {
        /// Offending eigenvalue
        eigenvalue: f64,
    },

    /// Sparse factorization hit a zero (or tiny) pivot
    #[error("Sparse matrix is structurally or numerically singular at column {column}")]
    StructurallySingular {
        /// Column where no acceptable pivot was found
        column: usize,
    },

    /// FFT length is not a power of two
    #[error("FFT length {len} is not a power of two")]
    NotPowerOfTwo {
        /// Offending length
        len: usize,
    },
}

impl Error {
    /// Convenience constructor for `ShapeMismatch` on flat buffers
    pub(crate) fn len_mismatch(expected: usize, got: usize) -> Self {
        Error::ShapeMismatch {
            expected: vec![expected],
            got: vec![got],
        }
    }

    /// True for the numerical failure classes (singular / indefinite / no root)
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            Error::SingularMatrix { .. }
                | Error::NotPositiveDefinite { .. }
                | Error::NoRealSquareRoot { .. }
                | Error::StructurallySingular { .. }
        )
    }
}
