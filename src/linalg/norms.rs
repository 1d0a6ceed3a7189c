//! Matrix and vector norms

use crate::buffer::check_matrix;
use crate::dtype::Element;
use crate::error::Result;

/// Maximum absolute column sum
pub fn norm1<T: Element>(a: &[T], rows: usize, cols: usize) -> Result<T> {
    check_matrix(a, rows, cols)?;
    let mut best = T::zero();
    for j in 0..cols {
        let mut s = T::zero();
        for i in 0..rows {
            s += a[i * cols + j].abs_val();
        }
        if s > best {
            best = s;
        }
    }
    Ok(best)
}

/// Maximum absolute row sum
pub fn norm_inf<T: Element>(a: &[T], rows: usize, cols: usize) -> Result<T> {
    check_matrix(a, rows, cols)?;
    let mut best = T::zero();
    for row in a.chunks(cols.max(1)) {
        let mut s = T::zero();
        for &v in row {
            s += v.abs_val();
        }
        if s > best {
            best = s;
        }
    }
    Ok(best)
}

/// Frobenius norm: sqrt of the sum of squares
pub fn norm_fro<T: Element>(a: &[T], rows: usize, cols: usize) -> Result<T> {
    check_matrix(a, rows, cols)?;
    Ok(T::dot(a, a).sqrt_val())
}

/// Vector p-norm
///
/// Literal paths for `p = 1`, `p = 2`, `p = ∞` (max |x|) and `p = -∞`
/// (min |x|); `p = 0` counts non-zeros. Other `p` use `(Σ|x|^p)^(1/p)`.
pub fn norm_p<T: Element>(x: &[T], p: f64) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    if p == 2.0 {
        // scaled to avoid overflow in the squares
        let scale = x.iter().fold(0.0f64, |m, v| m.max(v.to_f64().abs()));
        if scale == 0.0 || !scale.is_finite() {
            return scale;
        }
        let s: f64 = x.iter().map(|v| (v.to_f64() / scale).powi(2)).sum();
        return scale * s.sqrt();
    }
    if p == 1.0 {
        return x.iter().map(|v| v.to_f64().abs()).sum();
    }
    if p == f64::INFINITY {
        return x.iter().fold(0.0f64, |m, v| m.max(v.to_f64().abs()));
    }
    if p == f64::NEG_INFINITY {
        return x.iter().fold(f64::INFINITY, |m, v| m.min(v.to_f64().abs()));
    }
    if p == 0.0 {
        return x.iter().filter(|v| v.to_f64() != 0.0).count() as f64;
    }
    let s: f64 = x.iter().map(|v| v.to_f64().abs().powf(p)).sum();
    s.powf(1.0 / p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_norms() {
        let a = [1.0, -2.0, -3.0, 4.0];
        assert_eq!(norm1(&a, 2, 2).unwrap(), 6.0);
        assert_eq!(norm_inf(&a, 2, 2).unwrap(), 7.0);
        assert!((norm_fro(&a, 2, 2).unwrap() - 30f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_vector_norms() {
        let x = [3.0, -4.0, 0.0];
        assert_eq!(norm_p(&x, 1.0), 7.0);
        assert_eq!(norm_p(&x, 2.0), 5.0);
        assert_eq!(norm_p(&x, f64::INFINITY), 4.0);
        assert_eq!(norm_p(&x, f64::NEG_INFINITY), 0.0);
        assert_eq!(norm_p(&x, 0.0), 2.0);
        assert!((norm_p(&x, 3.0) - 91f64.cbrt()).abs() < 1e-12);
        assert_eq!(norm_p(&[1e200, 1e200], 2.0), 1e200 * 2f64.sqrt());
    }
}
