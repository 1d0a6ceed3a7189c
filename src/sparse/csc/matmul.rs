//! CSC matrix-vector products

use super::CscMatrix;
use crate::buffer::check_len;
use crate::error::Result;

impl CscMatrix {
    /// y = A · x
    ///
    /// Column-oriented: each stored entry scatters `a_ij · x_j` into `y_i`.
    pub fn matvec(&self, x: &[f64]) -> Result<Vec<f64>> {
        check_len(self.ncols, x.len())?;
        let mut y = vec![0.0; self.nrows];
        for (j, &xj) in x.iter().enumerate() {
            if xj == 0.0 {
                continue;
            }
            let (rows, vals) = self.column(j);
            for (&i, &v) in rows.iter().zip(vals) {
                y[i] += v * xj;
            }
        }
        Ok(y)
    }

    /// y = Aᵀ · x, a dot product per column
    pub fn matvec_transpose(&self, x: &[f64]) -> Result<Vec<f64>> {
        check_len(self.nrows, x.len())?;
        Ok((0..self.ncols)
            .map(|j| {
                let (rows, vals) = self.column(j);
                rows.iter().zip(vals).map(|(&i, &v)| v * x[i]).sum()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matvec() {
        // [1, 0, 2]
        // [0, 0, 3]
        // [4, 5, 0]
        let a = CscMatrix::from_dense(&[1.0, 0.0, 2.0, 0.0, 0.0, 3.0, 4.0, 5.0, 0.0], 3, 3).unwrap();
        assert_eq!(a.matvec(&[1.0, 1.0, 1.0]).unwrap(), vec![3.0, 3.0, 9.0]);
        assert_eq!(a.matvec_transpose(&[1.0, 1.0, 1.0]).unwrap(), vec![5.0, 5.0, 5.0]);
        assert!(a.matvec(&[1.0]).is_err());
    }
}
