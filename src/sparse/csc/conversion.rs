//! CSC format conversion: triplets, dense, transpose

use super::CscMatrix;
use crate::buffer::check_matrix;
use crate::error::{Error, Result};

impl CscMatrix {
    /// Build from `(row, col, value)` triplets; duplicates are summed
    ///
    /// Row indices come out sorted within each column.
    pub fn from_triplets(nrows: usize, ncols: usize, triplets: &[(usize, usize, f64)]) -> Result<Self> {
        let mut counts = vec![0usize; ncols];
        for &(r, c, _) in triplets {
            if r >= nrows || c >= ncols {
                return Err(Error::InvalidArgument {
                    arg: "triplets",
                    reason: format!("entry ({r}, {c}) outside {nrows}x{ncols}"),
                });
            }
            counts[c] += 1;
        }

        // bucket by column
        let mut col_ptr = vec![0usize; ncols + 1];
        for (j, &c) in counts.iter().enumerate() {
            col_ptr[j + 1] = col_ptr[j] + c;
        }
        let mut next = col_ptr.clone();
        let mut rows = vec![0usize; triplets.len()];
        let mut vals = vec![0.0; triplets.len()];
        for &(r, c, v) in triplets {
            let p = next[c];
            rows[p] = r;
            vals[p] = v;
            next[c] += 1;
        }

        // sort each column and merge duplicates
        let mut out_ptr = vec![0usize; ncols + 1];
        let mut out_rows = Vec::with_capacity(triplets.len());
        let mut out_vals = Vec::with_capacity(triplets.len());
        let mut order: Vec<usize> = Vec::new();
        for j in 0..ncols {
            order.clear();
            order.extend(col_ptr[j]..col_ptr[j + 1]);
            order.sort_by_key(|&p| rows[p]);
            let start = out_rows.len();
            for &p in &order {
                if out_rows.len() > start && out_rows.last() == Some(&rows[p]) {
                    if let Some(last) = out_vals.last_mut() {
                        *last += vals[p];
                    }
                } else {
                    out_rows.push(rows[p]);
                    out_vals.push(vals[p]);
                }
            }
            out_ptr[j + 1] = out_rows.len();
        }
        Ok(Self::from_parts_unchecked(nrows, ncols, out_ptr, out_rows, out_vals))
    }

    /// Compress a row-major dense matrix, dropping exact zeros
    pub fn from_dense(a: &[f64], nrows: usize, ncols: usize) -> Result<Self> {
        check_matrix(a, nrows, ncols)?;
        let mut col_ptr = Vec::with_capacity(ncols + 1);
        let mut row_idx = Vec::new();
        let mut values = Vec::new();
        col_ptr.push(0);
        for j in 0..ncols {
            for i in 0..nrows {
                let v = a[i * ncols + j];
                if v != 0.0 {
                    row_idx.push(i);
                    values.push(v);
                }
            }
            col_ptr.push(row_idx.len());
        }
        Ok(Self::from_parts_unchecked(nrows, ncols, col_ptr, row_idx, values))
    }

    /// Expand to a row-major dense buffer; duplicates are summed
    pub fn to_dense(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.nrows * self.ncols];
        for j in 0..self.ncols {
            let (rows, vals) = self.column(j);
            for (&i, &v) in rows.iter().zip(vals) {
                out[i * self.ncols + j] += v;
            }
        }
        out
    }

    /// Transpose: `B = Aᵀ` (row indices of B come out sorted)
    pub fn transpose(&self) -> Self {
        let mut counts = vec![0usize; self.nrows + 1];
        for &i in &self.row_idx {
            counts[i + 1] += 1;
        }
        for i in 0..self.nrows {
            counts[i + 1] += counts[i];
        }
        let col_ptr = counts.clone();
        let mut next = counts;
        let mut row_idx = vec![0usize; self.nnz()];
        let mut values = vec![0.0; self.nnz()];
        for j in 0..self.ncols {
            let (rows, vals) = self.column(j);
            for (&i, &v) in rows.iter().zip(vals) {
                let p = next[i];
                row_idx[p] = j;
                values[p] = v;
                next[i] += 1;
            }
        }
        Self::from_parts_unchecked(self.ncols, self.nrows, col_ptr, row_idx, values)
    }
}
