//! Symbolic analysis for sparse Cholesky
//!
//! Everything here reads only the sparsity pattern (`col_ptr`/`row_idx`) of
//! the upper triangle of a symmetric matrix. The result can be reused for any
//! number of numeric factorizations of matrices sharing that pattern, e.g. the
//! Jacobians of successive Newton steps.

use super::CscMatrix;
use crate::error::{Error, Result};

/// Elimination tree of a symmetric matrix
///
/// `parent[j]` is the parent of column `j`, `None` for a root. Built with the
/// ancestor (path compression) walk over the upper triangle.
pub fn etree(a: &CscMatrix) -> Result<Vec<Option<usize>>> {
    let n = a.require_square()?;
    let mut parent = vec![None; n];
    let mut ancestor: Vec<Option<usize>> = vec![None; n];
    for k in 0..n {
        let (rows, _) = a.column(k);
        for &row in rows {
            let mut i = row;
            while i < k {
                let next = ancestor[i];
                ancestor[i] = Some(k);
                match next {
                    None => {
                        parent[i] = Some(k);
                        break;
                    }
                    Some(nx) => i = nx,
                }
            }
        }
    }
    Ok(parent)
}

/// Postorder of a forest given by `parent`; children are visited in
/// ascending order
pub fn post_order(parent: &[Option<usize>]) -> Vec<usize> {
    let n = parent.len();
    let mut head: Vec<Option<usize>> = vec![None; n];
    let mut next: Vec<Option<usize>> = vec![None; n];
    for j in (0..n).rev() {
        if let Some(p) = parent[j] {
            next[j] = head[p];
            head[p] = Some(j);
        }
    }

    let mut post = Vec::with_capacity(n);
    let mut stack = Vec::with_capacity(n);
    for root in (0..n).filter(|&j| parent[j].is_none()) {
        stack.push(root);
        while let Some(&p) = stack.last() {
            match head[p] {
                Some(child) => {
                    head[p] = next[child];
                    stack.push(child);
                }
                None => {
                    stack.pop();
                    post.push(p);
                }
            }
        }
    }
    post
}

/// Pattern of row `k` of the Cholesky factor L (columns `j < k` with
/// `L[k][j] ≠ 0`), written to `out[top..]`; returns `top`
///
/// Walks the elimination tree from each `i < k` in column `k` of A up to
/// `k`. `mark` must be all-false on entry and is restored on exit.
pub(crate) fn ereach(
    a: &CscMatrix,
    k: usize,
    parent: &[Option<usize>],
    out: &mut [usize],
    path: &mut Vec<usize>,
    mark: &mut [bool],
) -> usize {
    let n = out.len();
    let mut top = n;
    mark[k] = true;
    let (rows, _) = a.column(k);
    for &row in rows {
        if row > k {
            continue;
        }
        path.clear();
        let mut i = row;
        while !mark[i] {
            path.push(i);
            mark[i] = true;
            match parent[i] {
                Some(p) => i = p,
                None => break,
            }
        }
        while let Some(i) = path.pop() {
            top -= 1;
            out[top] = i;
        }
    }
    for &i in &out[top..] {
        mark[i] = false;
    }
    mark[k] = false;
    top
}

/// Column counts of the Cholesky factor L, diagonal included
pub fn column_counts(a: &CscMatrix, parent: &[Option<usize>]) -> Result<Vec<usize>> {
    let n = a.require_square()?;
    if parent.len() != n {
        return Err(Error::len_mismatch(n, parent.len()));
    }
    let mut counts = vec![1usize; n];
    let mut out = vec![0usize; n];
    let mut path = Vec::with_capacity(n);
    let mut mark = vec![false; n];
    for k in 0..n {
        let top = ereach(a, k, parent, &mut out, &mut path, &mut mark);
        for &j in &out[top..] {
            counts[j] += 1;
        }
    }
    Ok(counts)
}

/// Reusable symbolic Cholesky analysis
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicCholesky {
    /// Matrix order
    pub n: usize,
    /// Elimination tree
    pub parent: Vec<Option<usize>>,
    /// Postorder of the elimination tree
    pub post: Vec<usize>,
    /// Nonzeros per column of L, diagonal included
    pub counts: Vec<usize>,
    /// Column pointers of L (prefix sums of `counts`)
    pub col_ptr: Vec<usize>,
}

impl SymbolicCholesky {
    /// Analyze the pattern of the upper triangle of `a`
    pub fn analyze(a: &CscMatrix) -> Result<Self> {
        let n = a.require_square()?;
        let parent = etree(a)?;
        let post = post_order(&parent);
        let counts = column_counts(a, &parent)?;
        let mut col_ptr = vec![0usize; n + 1];
        for j in 0..n {
            col_ptr[j + 1] = col_ptr[j] + counts[j];
        }
        tracing::debug!(n, nnz_l = col_ptr[n], "symbolic cholesky analysis");
        Ok(Self {
            n,
            parent,
            post,
            counts,
            col_ptr,
        })
    }

    /// Nonzeros of L
    #[inline]
    pub fn nnz_l(&self) -> usize {
        self.col_ptr[self.n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // arrow matrix: dense last row/column, diagonal elsewhere
    fn arrow(n: usize) -> CscMatrix {
        let mut t = Vec::new();
        for i in 0..n {
            t.push((i, i, 4.0));
            if i + 1 < n {
                t.push((i, n - 1, 1.0));
                t.push((n - 1, i, 1.0));
            }
        }
        CscMatrix::from_triplets(n, n, &t).unwrap()
    }

    // tridiagonal pattern
    fn tridiag(n: usize) -> CscMatrix {
        let mut t = Vec::new();
        for i in 0..n {
            t.push((i, i, 2.0));
            if i + 1 < n {
                t.push((i, i + 1, -1.0));
                t.push((i + 1, i, -1.0));
            }
        }
        CscMatrix::from_triplets(n, n, &t).unwrap()
    }

    #[test]
    fn test_etree_tridiagonal_is_a_path() {
        let parent = etree(&tridiag(4)).unwrap();
        assert_eq!(parent, vec![Some(1), Some(2), Some(3), None]);
        assert_eq!(post_order(&parent), vec![0, 1, 2, 3]);
        assert_eq!(column_counts(&tridiag(4), &parent).unwrap(), vec![2, 2, 2, 1]);
    }

    #[test]
    fn test_arrow_has_no_fill() {
        let a = arrow(4);
        let sym = SymbolicCholesky::analyze(&a).unwrap();
        assert_eq!(sym.parent, vec![Some(3), Some(3), Some(3), None]);
        assert_eq!(sym.post, vec![0, 1, 2, 3]);
        assert_eq!(sym.counts, vec![2, 2, 2, 1]);
        assert_eq!(sym.nnz_l(), 7);
    }

    #[test]
    fn test_reversed_arrow_fills_in() {
        // dense first row/column: eliminating column 0 fills everything
        let n = 4;
        let mut t = Vec::new();
        for i in 0..n {
            t.push((i, i, 4.0));
            if i > 0 {
                t.push((0, i, 1.0));
                t.push((i, 0, 1.0));
            }
        }
        let a = CscMatrix::from_triplets(n, n, &t).unwrap();
        let sym = SymbolicCholesky::analyze(&a).unwrap();
        assert_eq!(sym.parent, vec![Some(1), Some(2), Some(3), None]);
        assert_eq!(sym.counts, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_post_order_forest() {
        let parent = vec![Some(2), Some(2), None, None];
        assert_eq!(post_order(&parent), vec![0, 1, 2, 3]);
        let parent = vec![None, Some(0), Some(0)];
        assert_eq!(post_order(&parent), vec![1, 2, 0]);
    }
}
