//! Partial-success results for iterative kernels
//!
//! Iterative routines (Jacobi sweeps, power iteration, Newton–Schulz, shifted
//! QR) are bounded by an iteration budget. When the budget runs out the
//! latest iterate is still handed back: callers decide whether an
//! approximate eigenpair or square root is good enough.

use crate::error::{Error, Result};

/// Result of a bounded iterative computation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Tolerance was met
    Converged {
        /// Converged value
        value: T,
        /// Iterations (or sweeps) performed
        iterations: usize,
    },
    /// Iteration budget exhausted; `best` is the last iterate
    NotConverged {
        /// Best available estimate
        best: T,
        /// Iterations performed (equals the budget)
        iterations: usize,
        /// Final convergence measure (same units as the tolerance)
        residual: f64,
    },
}

impl<T> Outcome<T> {
    /// Returns true when the tolerance was met
    #[inline]
    pub fn is_converged(&self) -> bool {
        matches!(self, Outcome::Converged { .. })
    }

    /// Borrow the carried value, converged or not
    #[inline]
    pub fn value(&self) -> &T {
        match self {
            Outcome::Converged { value, .. } => value,
            Outcome::NotConverged { best, .. } => best,
        }
    }

    /// Take the carried value, converged or not
    #[inline]
    pub fn into_value(self) -> T {
        match self {
            Outcome::Converged { value, .. } => value,
            Outcome::NotConverged { best, .. } => best,
        }
    }

    /// Iterations performed
    #[inline]
    pub fn iterations(&self) -> usize {
        match self {
            Outcome::Converged { iterations, .. } | Outcome::NotConverged { iterations, .. } => {
                *iterations
            }
        }
    }

    /// Integer status for flat calling conventions
    #[inline]
    pub fn status(&self) -> Status {
        if self.is_converged() {
            Status::Success
        } else {
            Status::Failure
        }
    }

    /// Map the carried value
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Converged { value, iterations } => Outcome::Converged {
                value: f(value),
                iterations,
            },
            Outcome::NotConverged {
                best,
                iterations,
                residual,
            } => Outcome::NotConverged {
                best: f(best),
                iterations,
                residual,
            },
        }
    }

    /// Map the carried value through a fallible function, keeping the status
    pub fn try_map<U, F: FnOnce(T) -> Result<U>>(self, f: F) -> Result<Outcome<U>> {
        Ok(match self {
            Outcome::Converged { value, iterations } => Outcome::Converged {
                value: f(value)?,
                iterations,
            },
            Outcome::NotConverged {
                best,
                iterations,
                residual,
            } => Outcome::NotConverged {
                best: f(best)?,
                iterations,
                residual,
            },
        })
    }

    /// Build an outcome from a converged flag
    pub(crate) fn from_parts(value: T, converged: bool, iterations: usize, residual: f64) -> Self {
        if converged {
            Outcome::Converged { value, iterations }
        } else {
            tracing::warn!(iterations, residual, "iteration budget exhausted");
            Outcome::NotConverged {
                best: value,
                iterations,
                residual,
            }
        }
    }
}

/// Status sentinel used across the flat boundary: 0 = failure, 1 = success
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Singular, indefinite, non-convergent or invalid
    Failure = 0,
    /// Result buffers hold a valid answer
    Success = 1,
}

impl Status {
    /// Raw integer code
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl<T> From<&Result<T>> for Status {
    fn from(r: &Result<T>) -> Self {
        if r.is_ok() {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

impl Status {
    /// Status of an iterative result: `Failure` on error or non-convergence
    pub fn of_outcome<T>(r: &Result<Outcome<T>>) -> Self {
        match r {
            Ok(o) => o.status(),
            Err(_) => Status::Failure,
        }
    }
}

impl From<&Error> for Status {
    fn from(_: &Error) -> Self {
        Status::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_value_access() {
        let ok: Outcome<f64> = Outcome::Converged {
            value: 2.0,
            iterations: 3,
        };
        assert!(ok.is_converged());
        assert_eq!(*ok.value(), 2.0);
        assert_eq!(ok.status(), Status::Success);

        let partial: Outcome<f64> = Outcome::NotConverged {
            best: 1.9,
            iterations: 100,
            residual: 1e-3,
        };
        assert!(!partial.is_converged());
        assert_eq!(partial.iterations(), 100);
        assert_eq!(partial.status().code(), 0);
        assert_eq!(partial.into_value(), 1.9);
    }

    #[test]
    fn test_outcome_map_keeps_variant() {
        let partial: Outcome<Vec<f64>> = Outcome::NotConverged {
            best: vec![1.0, 2.0],
            iterations: 7,
            residual: 0.5,
        };
        let mapped = partial.map(|v| v.len());
        assert_eq!(
            mapped,
            Outcome::NotConverged {
                best: 2,
                iterations: 7,
                residual: 0.5
            }
        );
    }

    #[test]
    fn test_status_from_result() {
        let ok: Result<u8> = Ok(1);
        let err: Result<u8> = Err(Error::SingularMatrix {
            op: "inv",
            pivot_index: 0,
        });
        assert_eq!(Status::from(&ok), Status::Success);
        assert_eq!(Status::from(&err), Status::Failure);

        let partial: Result<Outcome<u8>> = Ok(Outcome::NotConverged {
            best: 0,
            iterations: 5,
            residual: 1.0,
        });
        assert_eq!(Status::of_outcome(&partial), Status::Failure);
        assert_eq!(Status::from(&partial), Status::Success);
    }
}
