//! Core CSC implementation: struct, creation, getters

use crate::error::{Error, Result};

/// CSC (Compressed Sparse Column) matrix of f64
///
/// ```text
/// column j occupies values[col_ptr[j]..col_ptr[j+1]]
/// with row indices   row_idx[col_ptr[j]..col_ptr[j+1]]
/// ```
///
/// Row indices inside a column need not be sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix {
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
    pub(crate) col_ptr: Vec<usize>,
    pub(crate) row_idx: Vec<usize>,
    pub(crate) values: Vec<f64>,
}

impl CscMatrix {
    /// Create a CSC matrix from components, checking every structural invariant
    pub fn new(
        nrows: usize,
        ncols: usize,
        col_ptr: Vec<usize>,
        row_idx: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<Self> {
        let m = Self {
            nrows,
            ncols,
            col_ptr,
            row_idx,
            values,
        };
        m.validate()?;
        Ok(m)
    }

    /// Assemble without validation; callers guarantee the invariants
    pub(crate) fn from_parts_unchecked(
        nrows: usize,
        ncols: usize,
        col_ptr: Vec<usize>,
        row_idx: Vec<usize>,
        values: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(col_ptr.len(), ncols + 1);
        debug_assert_eq!(row_idx.len(), values.len());
        Self {
            nrows,
            ncols,
            col_ptr,
            row_idx,
            values,
        }
    }

    /// Create an empty `nrows × ncols` matrix
    pub fn empty(nrows: usize, ncols: usize) -> Self {
        Self::from_parts_unchecked(nrows, ncols, vec![0; ncols + 1], Vec::new(), Vec::new())
    }

    /// Sparse `n × n` identity
    pub fn identity(n: usize) -> Self {
        Self::from_parts_unchecked(n, n, (0..=n).collect(), (0..n).collect(), vec![1.0; n])
    }

    /// Check the CSC invariants
    ///
    /// `col_ptr` has `ncols + 1` entries, starts at 0, never decreases and
    /// ends at `nnz`; every row index is below `nrows`.
    pub fn validate(&self) -> Result<()> {
        if self.col_ptr.len() != self.ncols + 1 {
            return Err(Error::ShapeMismatch {
                expected: vec![self.ncols + 1],
                got: vec![self.col_ptr.len()],
            });
        }
        if self.row_idx.len() != self.values.len() {
            return Err(Error::ShapeMismatch {
                expected: vec![self.values.len()],
                got: vec![self.row_idx.len()],
            });
        }
        let nnz = self.values.len();
        if self.col_ptr[0] != 0 || self.col_ptr[self.ncols] != nnz {
            return Err(Error::InvalidArgument {
                arg: "col_ptr",
                reason: format!(
                    "expected col_ptr[0] = 0 and col_ptr[{}] = {}, got {} and {}",
                    self.ncols, nnz, self.col_ptr[0], self.col_ptr[self.ncols]
                ),
            });
        }
        if let Some(j) = self.col_ptr.windows(2).position(|w| w[0] > w[1]) {
            return Err(Error::InvalidArgument {
                arg: "col_ptr",
                reason: format!("decreases at column {j}"),
            });
        }
        if let Some(&r) = self.row_idx.iter().find(|&&r| r >= self.nrows) {
            return Err(Error::InvalidArgument {
                arg: "row_idx",
                reason: format!("row index {r} out of range for {} rows", self.nrows),
            });
        }
        Ok(())
    }

    /// Number of rows
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Stored entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Column pointers (`ncols + 1`)
    #[inline]
    pub fn col_ptr(&self) -> &[usize] {
        &self.col_ptr
    }

    /// Row index of each stored entry
    #[inline]
    pub fn row_idx(&self) -> &[usize] {
        &self.row_idx
    }

    /// Value of each stored entry
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Row indices and values of column `j`
    #[inline]
    pub fn column(&self, j: usize) -> (&[usize], &[f64]) {
        let range = self.col_ptr[j]..self.col_ptr[j + 1];
        (&self.row_idx[range.clone()], &self.values[range])
    }

    /// Entry (i, j), summing duplicates; zero when not stored
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let (rows, vals) = self.column(j);
        rows.iter()
            .zip(vals)
            .filter(|(r, _)| **r == i)
            .map(|(_, v)| *v)
            .sum()
    }

    pub(crate) fn require_square(&self) -> Result<usize> {
        if self.nrows != self.ncols {
            return Err(Error::ShapeMismatch {
                expected: vec![self.nrows, self.nrows],
                got: vec![self.nrows, self.ncols],
            });
        }
        Ok(self.ncols)
    }
}
