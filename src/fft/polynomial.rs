//! Polynomials with complex coefficients
//!
//! Coefficients are stored highest power first:
//! `p = [p0, p1, ..., pn]` means `p0·zⁿ + p1·zⁿ⁻¹ + ... + pn`.
//!
//! Roots come from the eigenvalues of the companion matrix, so their
//! accuracy follows the general eigensolver.

use crate::dtype::Complex128;
use crate::error::{Error, Result};
use crate::linalg::eig_general::eig_general;
use crate::outcome::Outcome;

/// Evaluate `p(z)` with Horner's rule (0 for an empty polynomial)
pub fn polyval(p: &[Complex128], z: Complex128) -> Complex128 {
    p.iter().fold(Complex128::ZERO, |acc, &c| acc * z + c)
}

/// Evaluate a real polynomial at a real point
pub fn polyval_real(p: &[f64], x: f64) -> f64 {
    p.iter().fold(0.0, |acc, &c| acc.mul_add(x, c))
}

/// Product of two polynomials (direct convolution of the coefficients)
pub fn polymul(a: &[Complex128], b: &[Complex128]) -> Vec<Complex128> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![Complex128::ZERO; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Sum of two polynomials, aligned on the constant term
pub fn polyadd(a: &[Complex128], b: &[Complex128]) -> Vec<Complex128> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = long.to_vec();
    let offset = long.len() - short.len();
    for (o, &s) in out[offset..].iter_mut().zip(short) {
        *o += s;
    }
    out
}

/// Derivative; a constant differentiates to `[0]`
pub fn polyder(p: &[Complex128]) -> Vec<Complex128> {
    let n = p.len();
    if n <= 1 {
        return vec![Complex128::ZERO];
    }
    p[..n - 1]
        .iter()
        .enumerate()
        .map(|(i, &c)| c.scale((n - 1 - i) as f64))
        .collect()
}

/// Monic polynomial with the given roots: `Π (z - r_k)`
pub fn poly_from_roots(roots: &[Complex128]) -> Vec<Complex128> {
    let mut p = Vec::with_capacity(roots.len() + 1);
    p.push(Complex128::ONE);
    for &r in roots {
        p.push(Complex128::ZERO);
        for k in (1..p.len()).rev() {
            let prev = p[k - 1];
            p[k] -= r * prev;
        }
    }
    p
}

/// Roots of a real polynomial
///
/// Leading zeros are stripped; trailing zeros contribute roots at the
/// origin. The remaining roots are the eigenvalues of the companion matrix
///
/// ```text
/// [-p1/p0  -p2/p0  ...  -pn/p0]
/// [  1       0     ...    0   ]
/// [  0       1     ...    0   ]
/// [  ...                      ]
/// ```
///
/// `NotConverged` carries the best eigenvalue estimates from the QR sweeps.
pub fn poly_roots(p: &[f64]) -> Result<Outcome<Vec<Complex128>>> {
    let Some(first) = p.iter().position(|&c| c != 0.0) else {
        return Err(Error::InvalidArgument {
            arg: "p",
            reason: "polynomial is identically zero".into(),
        });
    };
    let p = &p[first..];
    let last = p.iter().rposition(|&c| c != 0.0).unwrap_or(0);
    let zeros_at_origin = p.len() - 1 - last;
    let p = &p[..=last];

    let n = p.len() - 1;
    let mut roots = vec![Complex128::ZERO; zeros_at_origin];
    if n == 0 {
        return Ok(Outcome::Converged {
            value: roots,
            iterations: 0,
        });
    }

    let mut companion = vec![0.0; n * n];
    for j in 0..n {
        companion[j] = -p[j + 1] / p[0];
    }
    for i in 1..n {
        companion[i * n + i - 1] = 1.0;
    }
    let eig = eig_general(&companion, n)?;
    Ok(eig.map(|e| {
        roots.extend(
            e.real
                .iter()
                .zip(&e.imag)
                .map(|(&re, &im)| Complex128::new(re, im)),
        );
        roots
    }))
}

/// Transfer function from zeros, poles and gain
///
/// Returns `(b, a)` with `b = k·Π(z - z_i)` and `a = Π(z - p_j)`, highest
/// power first.
pub fn zpk2tf(
    zeros: &[Complex128],
    poles: &[Complex128],
    gain: f64,
) -> (Vec<Complex128>, Vec<Complex128>) {
    let b = poly_from_roots(zeros)
        .into_iter()
        .map(|c| c.scale(gain))
        .collect();
    (b, poly_from_roots(poles))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex128 {
        Complex128::new(re, im)
    }

    fn real(v: &[f64]) -> Vec<Complex128> {
        v.iter().map(|&x| c(x, 0.0)).collect()
    }

    #[test]
    fn test_polyval() {
        // z^2 + 1 vanishes at ±i
        let p = real(&[1.0, 0.0, 1.0]);
        assert_eq!(polyval(&p, Complex128::I), Complex128::ZERO);
        assert_eq!(polyval(&p, c(2.0, 0.0)), c(5.0, 0.0));
        assert_eq!(polyval(&[], c(2.0, 0.0)), Complex128::ZERO);
        assert_eq!(polyval_real(&[2.0, -3.0, 1.0], 3.0), 10.0);
    }

    #[test]
    fn test_mul_add_der() {
        let a = real(&[1.0, 1.0]);
        let b = real(&[1.0, -1.0]);
        assert_eq!(polymul(&a, &b), real(&[1.0, 0.0, -1.0]));
        assert_eq!(polyadd(&real(&[1.0, 2.0, 3.0]), &real(&[1.0, 1.0])), real(&[1.0, 3.0, 4.0]));
        assert_eq!(polyder(&real(&[3.0, 2.0, 1.0])), real(&[6.0, 2.0]));
        assert_eq!(polyder(&real(&[7.0])), real(&[0.0]));
    }

    #[test]
    fn test_poly_from_roots() {
        assert_eq!(poly_from_roots(&real(&[1.0, 2.0])), real(&[1.0, -3.0, 2.0]));
        // (z - i)(z + i) = z^2 + 1
        let p = poly_from_roots(&[Complex128::I, c(0.0, -1.0)]);
        assert_eq!(p, real(&[1.0, 0.0, 1.0]));
        assert_eq!(poly_from_roots(&[]), real(&[1.0]));
    }

    #[test]
    fn test_poly_roots() {
        // (x - 1)(x - 2)(x - 3) with a zero root and a leading zero
        let out = poly_roots(&[0.0, 1.0, -6.0, 11.0, -6.0, 0.0]).unwrap();
        assert!(out.is_converged());
        let mut roots: Vec<f64> = out.into_value().iter().map(|z| z.re).collect();
        roots.sort_by(f64::total_cmp);
        for (r, e) in roots.iter().zip([0.0, 1.0, 2.0, 3.0]) {
            assert!((r - e).abs() < 1e-10);
        }
        assert!(poly_roots(&[0.0, 0.0]).is_err());
        assert!(poly_roots(&[5.0]).unwrap().into_value().is_empty());
    }

    #[test]
    fn test_zpk2tf() {
        let (b, a) = zpk2tf(&real(&[-1.0]), &real(&[0.5]), 2.0);
        assert_eq!(b, real(&[2.0, 2.0]));
        assert_eq!(a, real(&[1.0, -0.5]));
    }
}
