//! Sparse triangular solves on CSC factors
//!
//! All four solves run in `O(n + nnz)`. Row indices within a column may be
//! unsorted; the diagonal is located by search. With `unit = true` the
//! diagonal is taken as 1 and any stored diagonal entry is ignored.
//!
//! ```text
//! lsolve:  L·x = b    columns left to right,  scatter below the diagonal
//! usolve:  U·x = b    columns right to left,  scatter above the diagonal
//! ltsolve: Lᵀ·x = b   columns right to left,  gather (dot) per column
//! utsolve: Uᵀ·x = b   columns left to right,  gather (dot) per column
//! ```

use super::CscMatrix;
use crate::buffer::check_len;
use crate::error::{Error, Result};

fn diagonal(m: &CscMatrix, j: usize, unit: bool, op: &'static str) -> Result<f64> {
    if unit {
        return Ok(1.0);
    }
    let d = m.get(j, j);
    if d == 0.0 {
        return Err(Error::SingularMatrix { op, pivot_index: j });
    }
    Ok(d)
}

/// Solve `L·x = b` in place on `x` (holding `b` on entry)
pub fn lsolve_csc_inplace(l: &CscMatrix, x: &mut [f64], unit: bool) -> Result<()> {
    let n = l.require_square()?;
    check_len(n, x.len())?;
    for j in 0..n {
        let d = diagonal(l, j, unit, "lsolve_csc")?;
        x[j] /= d;
        let xj = x[j];
        let (rows, vals) = l.column(j);
        for (&i, &v) in rows.iter().zip(vals) {
            if i > j {
                x[i] -= v * xj;
            }
        }
    }
    Ok(())
}

/// Solve `U·x = b` in place on `x`
pub fn usolve_csc_inplace(u: &CscMatrix, x: &mut [f64], unit: bool) -> Result<()> {
    let n = u.require_square()?;
    check_len(n, x.len())?;
    for j in (0..n).rev() {
        let d = diagonal(u, j, unit, "usolve_csc")?;
        x[j] /= d;
        let xj = x[j];
        let (rows, vals) = u.column(j);
        for (&i, &v) in rows.iter().zip(vals) {
            if i < j {
                x[i] -= v * xj;
            }
        }
    }
    Ok(())
}

/// Solve `Lᵀ·x = b` in place on `x`
pub fn ltsolve_csc_inplace(l: &CscMatrix, x: &mut [f64], unit: bool) -> Result<()> {
    let n = l.require_square()?;
    check_len(n, x.len())?;
    for j in (0..n).rev() {
        let (rows, vals) = l.column(j);
        let mut s = x[j];
        for (&i, &v) in rows.iter().zip(vals) {
            if i > j {
                s -= v * x[i];
            }
        }
        x[j] = s / diagonal(l, j, unit, "ltsolve_csc")?;
    }
    Ok(())
}

/// Solve `Uᵀ·x = b` in place on `x`
pub fn utsolve_csc_inplace(u: &CscMatrix, x: &mut [f64], unit: bool) -> Result<()> {
    let n = u.require_square()?;
    check_len(n, x.len())?;
    for j in 0..n {
        let (rows, vals) = u.column(j);
        let mut s = x[j];
        for (&i, &v) in rows.iter().zip(vals) {
            if i < j {
                s -= v * x[i];
            }
        }
        x[j] = s / diagonal(u, j, unit, "utsolve_csc")?;
    }
    Ok(())
}

/// Forward substitution `L·x = b` with explicit diagonal
pub fn lsolve_csc(l: &CscMatrix, b: &[f64]) -> Result<Vec<f64>> {
    let mut x = b.to_vec();
    lsolve_csc_inplace(l, &mut x, false)?;
    Ok(x)
}

/// Back substitution `U·x = b`
pub fn usolve_csc(u: &CscMatrix, b: &[f64]) -> Result<Vec<f64>> {
    let mut x = b.to_vec();
    usolve_csc_inplace(u, &mut x, false)?;
    Ok(x)
}

/// Transposed lower solve `Lᵀ·x = b`
pub fn ltsolve_csc(l: &CscMatrix, b: &[f64]) -> Result<Vec<f64>> {
    let mut x = b.to_vec();
    ltsolve_csc_inplace(l, &mut x, false)?;
    Ok(x)
}

/// Transposed upper solve `Uᵀ·x = b`
pub fn utsolve_csc(u: &CscMatrix, b: &[f64]) -> Result<Vec<f64>> {
    let mut x = b.to_vec();
    utsolve_csc_inplace(u, &mut x, false)?;
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower() -> CscMatrix {
        // [2, 0, 0]
        // [1, 4, 0]
        // [0, 3, 5]
        CscMatrix::new(
            3,
            3,
            vec![0, 2, 4, 5],
            vec![1, 0, 2, 1, 2],
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
        )
        .unwrap()
    }

    #[test]
    fn test_lower_round_trip() {
        let l = lower();
        let b = [2.0, 9.0, 26.0];
        let x = lsolve_csc(&l, &b).unwrap();
        assert_eq!(x, vec![1.0, 2.0, 4.0]);
        assert_eq!(l.matvec(&x).unwrap(), b.to_vec());
    }

    #[test]
    fn test_transposed_solves() {
        let l = lower();
        let x = ltsolve_csc(&l, &[3.0, 11.0, 5.0]).unwrap();
        assert_eq!(l.matvec_transpose(&x).unwrap(), vec![3.0, 11.0, 5.0]);

        let u = l.transpose();
        let y = usolve_csc(&u, &[3.0, 11.0, 5.0]).unwrap();
        assert_eq!(y, x);
        let z = utsolve_csc(&u, &[2.0, 9.0, 26.0]).unwrap();
        assert_eq!(z, vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn test_unit_diagonal_ignores_stored_diagonal() {
        let l = lower();
        let mut x = vec![1.0, 1.0, 1.0];
        lsolve_csc_inplace(&l, &mut x, true).unwrap();
        // x0 = 1, x1 = 1 - 1 = 0, x2 = 1 - 3*0 = 1
        assert_eq!(x, vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_missing_diagonal_is_singular() {
        let l = CscMatrix::from_dense(&[1.0, 0.0, 1.0, 0.0], 2, 2).unwrap();
        assert!(matches!(
            lsolve_csc(&l, &[1.0, 1.0]),
            Err(Error::SingularMatrix { pivot_index: 1, .. })
        ));
    }
}
