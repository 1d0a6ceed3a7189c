//! Named numerical constants and tuning options
//!
//! Convergence thresholds, pivot thresholds and safety factors shape the
//! numerical behaviour of every kernel downstream. They live here, with their
//! exact values, instead of as literals at the point of use.

// ============================================================================
// Decomposition thresholds
// ============================================================================

/// Pivot magnitude below which LU declares a matrix singular (absolute)
pub const LU_PIVOT_THRESHOLD: f64 = 1e-14;

/// Pivot magnitude below which the closed-form inverses of order 1–3 fail;
/// equal to [`LU_PIVOT_THRESHOLD`] so every order shares one singularity test
pub const INV_SMALL_DET_THRESHOLD: f64 = 1e-14;

/// Pivot magnitude below which sparse LU reports structural singularity
pub const SPARSE_PIVOT_TOLERANCE: f64 = 1e-14;

// ============================================================================
// Eigen-solvers
// ============================================================================

/// Off-diagonal Frobenius norm at which Jacobi sweeps stop
pub const EIGS_SYMMETRIC_PRECISION: f64 = 1e-12;

/// Sweep budget for the cyclic Jacobi eigensolver
pub const EIGS_SYMMETRIC_MAX_SWEEPS: usize = 100;

/// Eigenpair residual `‖Av − λv‖₂`, relative to `‖A‖₁`, at which power /
/// inverse iteration stop
pub const POWER_ITERATION_TOLERANCE: f64 = 1e-10;

/// Iteration budget for power / inverse iteration
pub const POWER_ITERATION_MAX_ITER: usize = 1000;

/// Francis QR sweeps allowed per deflated eigenvalue
pub const SCHUR_MAX_ITER_PER_EIGENVALUE: usize = 30;

/// Radix used by diagonal balancing (powers of the radix are exact in binary)
pub const BALANCE_RADIX: f64 = 2.0;

// ============================================================================
// Matrix functions
// ============================================================================

/// Degree of the diagonal Padé approximant used by `expm`
pub const EXPM_PADE_DEGREE: usize = 6;

/// Target 1-norm of the scaled matrix before the Padé approximant is applied
pub const EXPM_SCALING_NORM_TARGET: f64 = 0.5;

/// Relative residual at which Newton–Schulz square root iteration stops
pub const SQRTM_TOLERANCE: f64 = 1e-12;

/// Iteration budget for Newton–Schulz
pub const SQRTM_MAX_ITER: usize = 100;

// ============================================================================
// ODE step control
// ============================================================================

/// Safety factor applied to the optimal step scale
pub const ODE_SAFETY_FACTOR: f64 = 0.84;

/// Smallest allowed step shrink factor
pub const ODE_MIN_DELTA: f64 = 0.2;

/// Largest allowed step growth factor
pub const ODE_MAX_DELTA: f64 = 5.0;

// ============================================================================
// Dense kernels
// ============================================================================

/// Tile edge used by the blocked matrix multiply
pub const MATMUL_BLOCK_SIZE: usize = 64;

/// Minimum vector length before SIMD kernels are used
pub const SIMD_THRESHOLD: usize = 16;

/// Minimum output rows before the matrix multiply goes parallel
#[cfg(feature = "rayon")]
pub const PARALLEL_ROW_THRESHOLD: usize = 128;

/// Default rank tolerance: `max(rows, cols) * eps * norm`
///
/// `norm` is the largest absolute diagonal entry of R from column-pivoted QR,
/// which is the 2-norm of the largest column of A.
#[inline]
pub fn rank_tolerance(norm: f64, rows: usize, cols: usize) -> f64 {
    rows.max(cols) as f64 * f64::EPSILON * norm
}

// ============================================================================
// Option structs
// ============================================================================

/// Options for dense LU factorization
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LuOptions {
    /// Absolute pivot magnitude below which the matrix is declared singular
    pub pivot_threshold: f64,
}

impl Default for LuOptions {
    fn default() -> Self {
        Self {
            pivot_threshold: LU_PIVOT_THRESHOLD,
        }
    }
}

/// Options for the Jacobi and Schur eigensolvers
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EigOptions {
    /// Off-diagonal norm threshold (Jacobi)
    pub precision: f64,
    /// Sweep budget (Jacobi)
    pub max_sweeps: usize,
    /// QR sweeps allowed per eigenvalue (Schur)
    pub max_iter_per_eigenvalue: usize,
    /// Balance before Hessenberg reduction (general eigenproblem)
    pub balance: bool,
}

impl Default for EigOptions {
    fn default() -> Self {
        Self {
            precision: EIGS_SYMMETRIC_PRECISION,
            max_sweeps: EIGS_SYMMETRIC_MAX_SWEEPS,
            max_iter_per_eigenvalue: SCHUR_MAX_ITER_PER_EIGENVALUE,
            balance: true,
        }
    }
}

/// Tolerance / budget pair for bounded iterative routines
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationOptions {
    /// Convergence tolerance
    pub tolerance: f64,
    /// Iteration budget
    pub max_iterations: usize,
}

impl Default for IterationOptions {
    fn default() -> Self {
        Self {
            tolerance: POWER_ITERATION_TOLERANCE,
            max_iterations: POWER_ITERATION_MAX_ITER,
        }
    }
}

impl IterationOptions {
    /// Options tuned for the Newton–Schulz square root
    pub fn sqrtm() -> Self {
        Self {
            tolerance: SQRTM_TOLERANCE,
            max_iterations: SQRTM_MAX_ITER,
        }
    }
}

/// Adaptive step-size control parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepControl {
    /// Error tolerance per step (max-norm)
    pub tolerance: f64,
    /// Safety factor applied to the optimal scale
    pub safety: f64,
    /// Smallest step scale factor
    pub min_delta: f64,
    /// Largest step scale factor
    pub max_delta: f64,
    /// Smallest step magnitude the controller may propose
    pub min_step: f64,
    /// Largest step magnitude the controller may propose
    pub max_step: f64,
}

impl Default for StepControl {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            safety: ODE_SAFETY_FACTOR,
            min_delta: ODE_MIN_DELTA,
            max_delta: ODE_MAX_DELTA,
            min_step: 0.0,
            max_step: f64::INFINITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_carry_named_constants() {
        assert_eq!(LuOptions::default().pivot_threshold, 1e-14);
        let eig = EigOptions::default();
        assert_eq!(eig.precision, 1e-12);
        assert_eq!(eig.max_sweeps, 100);
        let step = StepControl::default();
        assert_eq!(step.safety, 0.84);
        assert_eq!(step.min_delta, 0.2);
        assert_eq!(step.max_delta, 5.0);
    }

    #[test]
    fn test_rank_tolerance_scales_with_shape_and_norm() {
        let t1 = rank_tolerance(1.0, 3, 3);
        let t2 = rank_tolerance(10.0, 3, 6);
        assert_eq!(t1, 3.0 * f64::EPSILON);
        assert!((t2 - 60.0 * f64::EPSILON).abs() < 1e-30);
    }
}
