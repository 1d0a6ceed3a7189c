//! Flat-buffer protocol
//!
//! Every kernel receives row-major slices plus explicit dimensions. Routines
//! that need scratch take a caller-provided `work` slice whose minimum length
//! comes from the paired `*_work_size` function. Sizes are in elements; use
//! [`work_size_bytes`] when the host allocates raw memory.
//!
//! ```text
//! idx(i, j, cols) = i * cols + j
//! ```

use crate::dtype::Element;
use crate::error::{Error, Result};

/// Row-major index of element (i, j) in a matrix with `cols` columns
#[inline(always)]
pub const fn idx(i: usize, j: usize, cols: usize) -> usize {
    i * cols + j
}

/// True when a work buffer of `provided` elements satisfies `required`
#[inline]
pub const fn validate_work_ptr_size(required: usize, provided: usize) -> bool {
    provided >= required
}

/// Byte size of a work buffer of `elements` values of `T`
#[inline]
pub fn work_size_bytes<T: Element>(elements: usize) -> usize {
    elements * T::DTYPE.size_in_bytes()
}

// ============================================================================
// Sizing functions
// ============================================================================

/// Transposed copy of B for the blocked multiply
#[inline]
pub const fn matmul_blocked_work_size(k: usize, n: usize) -> usize {
    k * n
}

/// LU scratch copy plus permutation column
#[inline]
pub const fn inv_work_size(n: usize) -> usize {
    n * n + n
}

/// LU scratch copy plus permutation column
#[inline]
pub const fn det_work_size(n: usize) -> usize {
    n * n + n
}

/// LU scratch copy plus permutation column
#[inline]
pub const fn solve_work_size(n: usize) -> usize {
    n * n + n
}

/// Scaled matrix, power, numerator, denominator and two squaring buffers
#[inline]
pub const fn expm_work_size(n: usize) -> usize {
    6 * n * n
}

/// Newton–Schulz iterates Y, Z, the update T and two products, plus one vector
#[inline]
pub const fn sqrtm_work_size(n: usize) -> usize {
    5 * n * n + n
}

/// Jacobi working copy
#[inline]
pub const fn eigs_symmetric_work_size(n: usize) -> usize {
    n * n
}

/// Hessenberg/Schur copy, accumulated transform and balancing scale vector
#[inline]
pub const fn eig_general_work_size(n: usize) -> usize {
    2 * n * n + n
}

/// Kronecker system of order `n*m` plus its right-hand side and pivots
#[inline]
pub const fn sylvester_work_size(n: usize, m: usize) -> usize {
    let nm = n * m;
    nm * nm + 2 * nm
}

/// One interleaved complex line of the longer dimension
#[inline]
pub const fn fft2d_work_size(rows: usize, cols: usize) -> usize {
    let len = if rows > cols { rows } else { cols };
    2 * len
}

/// Two zero-padded interleaved complex buffers
#[inline]
pub const fn convolve_work_size(n: usize, m: usize) -> usize {
    if n == 0 || m == 0 {
        return 0;
    }
    4 * (n + m - 1).next_power_of_two()
}

/// Stage input buffer for Dormand–Prince
#[inline]
pub const fn rk45_work_size(n: usize) -> usize {
    n
}

// ============================================================================
// Boundary checks
// ============================================================================

/// Check that a flat buffer holds exactly `expected` elements
#[inline]
pub(crate) fn check_len(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(Error::len_mismatch(expected, got));
    }
    Ok(())
}

/// Check that a row-major buffer matches `rows × cols`
#[inline]
pub(crate) fn check_matrix<T>(data: &[T], rows: usize, cols: usize) -> Result<()> {
    if data.len() != rows * cols {
        return Err(Error::ShapeMismatch {
            expected: vec![rows, cols],
            got: vec![data.len()],
        });
    }
    Ok(())
}

/// Check a work buffer against its sizing function
#[inline]
pub(crate) fn check_work<T>(op: &'static str, work: &[T], required: usize) -> Result<()> {
    if !validate_work_ptr_size(required, work.len()) {
        return Err(Error::WorkspaceTooSmall {
            op,
            required,
            provided: work.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idx_row_major() {
        assert_eq!(idx(0, 0, 4), 0);
        assert_eq!(idx(1, 2, 4), 6);
        assert_eq!(idx(2, 3, 4), 11);
    }

    #[test]
    fn test_work_sizes() {
        assert_eq!(expm_work_size(3), 54);
        assert_eq!(inv_work_size(4), 20);
        assert_eq!(sylvester_work_size(2, 3), 36 + 12);
        assert_eq!(fft2d_work_size(4, 8), 16);
        assert_eq!(convolve_work_size(3, 2), 16);
        assert_eq!(convolve_work_size(0, 2), 0);
        assert_eq!(work_size_bytes::<f64>(expm_work_size(2)), 24 * 8);
        assert_eq!(work_size_bytes::<f32>(10), 40);
    }

    #[test]
    fn test_check_work() {
        let work = vec![0.0f64; 5];
        assert!(check_work("expm", &work, 5).is_ok());
        let err = check_work("expm", &work, 6).unwrap_err();
        assert_eq!(
            err,
            Error::WorkspaceTooSmall {
                op: "expm",
                required: 6,
                provided: 5
            }
        );
        assert!(validate_work_ptr_size(4, 4));
        assert!(!validate_work_ptr_size(4, 3));
    }

    #[test]
    fn test_check_matrix() {
        let a = [1.0f64; 6];
        assert!(check_matrix(&a, 2, 3).is_ok());
        assert!(check_matrix(&a, 3, 3).is_err());
    }
}
