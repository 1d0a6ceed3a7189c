//! Basic dense matrix operations on row-major buffers

use crate::buffer::{check_len, check_matrix};
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::kernels::{self, elementwise};

/// C = A · B (`m×k` times `k×n`)
#[inline]
pub fn multiply<T: Element>(a: &[T], b: &[T], m: usize, k: usize, n: usize) -> Result<Vec<T>> {
    kernels::matmul(a, b, m, k, n)
}

/// y = A · x for an `m×n` matrix
pub fn matmul_vec<T: Element>(a: &[T], x: &[T], m: usize, n: usize) -> Result<Vec<T>> {
    let mut y = vec![T::zero(); m];
    kernels::matvec_into(a, x, &mut y, m, n)?;
    Ok(y)
}

/// Transpose of a `rows×cols` matrix into a `cols×rows` buffer
pub fn transpose_into<T: Element>(a: &[T], rows: usize, cols: usize, out: &mut [T]) -> Result<()> {
    check_matrix(a, rows, cols)?;
    check_matrix(out, cols, rows)?;
    for i in 0..rows {
        for j in 0..cols {
            out[j * rows + i] = a[i * cols + j];
        }
    }
    Ok(())
}

/// Transpose of a `rows×cols` matrix
pub fn transpose<T: Element>(a: &[T], rows: usize, cols: usize) -> Result<Vec<T>> {
    let mut out = vec![T::zero(); rows * cols];
    transpose_into(a, rows, cols, &mut out)?;
    Ok(out)
}

/// Elementwise A + B
pub fn add<T: Element>(a: &[T], b: &[T]) -> Result<Vec<T>> {
    let mut out = vec![T::zero(); a.len()];
    elementwise::add_into(a, b, &mut out)?;
    Ok(out)
}

/// Elementwise A - B
pub fn subtract<T: Element>(a: &[T], b: &[T]) -> Result<Vec<T>> {
    let mut out = vec![T::zero(); a.len()];
    elementwise::sub_into(a, b, &mut out)?;
    Ok(out)
}

/// k · A
pub fn scalar_multiply<T: Element>(a: &[T], k: T) -> Vec<T> {
    let mut out = a.to_vec();
    elementwise::scale(k, &mut out);
    out
}

/// Inner product of two vectors
#[inline]
pub fn dot_product<T: Element>(a: &[T], b: &[T]) -> Result<T> {
    elementwise::dot(a, b)
}

/// Sum of the diagonal of an `n×n` matrix
pub fn trace<T: Element>(a: &[T], n: usize) -> Result<T> {
    check_matrix(a, n, n)?;
    let mut t = T::zero();
    for i in 0..n {
        t += a[i * n + i];
    }
    Ok(t)
}

/// `n×n` identity
pub fn identity<T: Element>(n: usize) -> Vec<T> {
    let mut out = vec![T::zero(); n * n];
    for i in 0..n {
        out[i * n + i] = T::one();
    }
    out
}

/// Outer product `x·yᵀ` (`len(x) × len(y)`)
pub fn outer<T: Element>(x: &[T], y: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(x.len() * y.len());
    for &xi in x {
        out.extend(y.iter().map(|&yj| xi * yj));
    }
    out
}

/// Cross product of two 3-vectors
pub fn cross<T: Element>(a: &[T], b: &[T]) -> Result<[T; 3]> {
    check_len(3, a.len())?;
    check_len(3, b.len())?;
    Ok([
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ])
}

/// Kronecker product of `A (ar×ac)` and `B (br×bc)`, giving `(ar·br) × (ac·bc)`
pub fn kron<T: Element>(
    a: &[T],
    ar: usize,
    ac: usize,
    b: &[T],
    br: usize,
    bc: usize,
) -> Result<Vec<T>> {
    check_matrix(a, ar, ac)?;
    check_matrix(b, br, bc)?;
    let cols = ac * bc;
    let mut out = vec![T::zero(); ar * br * cols];
    for i in 0..ar {
        for j in 0..ac {
            let aij = a[i * ac + j];
            for k in 0..br {
                let row = (i * br + k) * cols + j * bc;
                for l in 0..bc {
                    out[row + l] = aij * b[k * bc + l];
                }
            }
        }
    }
    Ok(out)
}

/// Solve `L·x = b` for lower-triangular `L` (forward substitution)
///
/// Only the lower triangle of `l` is read. A zero diagonal is `SingularMatrix`.
pub fn lsolve<T: Element>(l: &[T], n: usize, b: &[T]) -> Result<Vec<T>> {
    check_matrix(l, n, n)?;
    check_len(n, b.len())?;
    let mut x = b.to_vec();
    for i in 0..n {
        let d = l[i * n + i];
        if d == T::zero() {
            return Err(Error::SingularMatrix {
                op: "lsolve",
                pivot_index: i,
            });
        }
        let s = T::dot(&l[i * n..i * n + i], &x[..i]);
        x[i] = (x[i] - s) / d;
    }
    Ok(x)
}

/// Solve `U·x = b` for upper-triangular `U` (back substitution)
pub fn usolve<T: Element>(u: &[T], n: usize, b: &[T]) -> Result<Vec<T>> {
    check_matrix(u, n, n)?;
    check_len(n, b.len())?;
    let mut x = b.to_vec();
    for i in (0..n).rev() {
        let d = u[i * n + i];
        if d == T::zero() {
            return Err(Error::SingularMatrix {
                op: "usolve",
                pivot_index: i,
            });
        }
        let s = T::dot(&u[i * n + i + 1..(i + 1) * n], &x[i + 1..]);
        x[i] = (x[i] - s) / d;
    }
    Ok(x)
}
