//! General (non-symmetric) eigenproblem
//!
//! Pipeline:
//! 1. Optional diagonal balancing `B = D⁻¹·A·D` with `D` a power of the radix
//! 2. Householder reduction to upper Hessenberg form `H = Qᵀ·B·Q`
//! 3. Francis implicit double-shift QR on `H` with deflation, producing a real
//!    Schur form. 1×1 diagonal blocks are real eigenvalues; 2×2 blocks with a
//!    negative discriminant are complex-conjugate pairs.
//!
//! Deflation: `|h[l][l-1]| <= eps * (|h[l-1][l-1]| + |h[l][l]|)`.
//! Exceptional shifts are taken at iterations 10 and 20 of a stalled block.

use crate::buffer::{check_matrix, check_work, eig_general_work_size};
use crate::config::{BALANCE_RADIX, EigOptions};
use crate::error::{Error, Result};
use crate::outcome::Outcome;

/// Balanced matrix and its diagonal similarity
#[derive(Debug, Clone, PartialEq)]
pub struct Balanced {
    /// `D⁻¹·A·D`
    pub matrix: Vec<f64>,
    /// Diagonal of `D`
    pub scale: Vec<f64>,
}

/// Hessenberg reduction `A = Q·H·Qᵀ`
#[derive(Debug, Clone, PartialEq)]
pub struct Hessenberg {
    /// Upper Hessenberg matrix
    pub h: Vec<f64>,
    /// Orthogonal transform
    pub q: Vec<f64>,
}

/// Real Schur decomposition `A = Z·T·Zᵀ`
#[derive(Debug, Clone, PartialEq)]
pub struct SchurForm {
    /// Upper quasi-triangular factor
    pub t: Vec<f64>,
    /// Orthogonal factor
    pub z: Vec<f64>,
    /// Matrix order
    pub n: usize,
}

/// Eigenvalues of a general real matrix, in Schur diagonal order
///
/// Complex-conjugate pairs are adjacent with the positive imaginary part
/// first.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralEigen {
    /// Real parts
    pub real: Vec<f64>,
    /// Imaginary parts
    pub imag: Vec<f64>,
}

impl GeneralEigen {
    /// True when every eigenvalue has a zero imaginary part
    pub fn is_real(&self) -> bool {
        self.imag.iter().all(|&v| v == 0.0)
    }
}

// ============================================================================
// Balancing
// ============================================================================

fn check_finite(a: &[f64]) -> Result<()> {
    if a.iter().all(|v| v.is_finite()) {
        return Ok(());
    }
    Err(Error::InvalidArgument {
        arg: "a",
        reason: "matrix contains non-finite entries".into(),
    })
}

/// Balance `a` in place; `scale` receives the diagonal of `D`
///
/// Rows whose off-diagonal sums are not finite are left unscaled.
pub(crate) fn balance_inplace(a: &mut [f64], n: usize, scale: &mut [f64]) {
    let radix = BALANCE_RADIX;
    let radix2 = radix * radix;
    scale[..n].fill(1.0);

    let mut done = false;
    while !done {
        done = true;
        for i in 0..n {
            let mut c = 0.0;
            let mut r = 0.0;
            for j in 0..n {
                if j != i {
                    c += a[j * n + i].abs();
                    r += a[i * n + j].abs();
                }
            }
            if c == 0.0 || r == 0.0 || !c.is_finite() || !r.is_finite() {
                continue;
            }
            let s = c + r;
            let mut f = 1.0;
            let mut g = r / radix;
            while c < g {
                f *= radix;
                c *= radix2;
            }
            g = r * radix;
            while c >= g {
                f /= radix;
                c /= radix2;
            }
            if (c + r) / f < 0.95 * s {
                done = false;
                let inv = 1.0 / f;
                scale[i] *= f;
                for j in 0..n {
                    a[i * n + j] *= inv;
                }
                for j in 0..n {
                    a[j * n + i] *= f;
                }
            }
        }
    }
}

/// Diagonal similarity that equalizes row and column norms
///
/// Scale factors are powers of [`BALANCE_RADIX`], so balancing introduces no
/// rounding error and leaves eigenvalues unchanged.
pub fn balance(a: &[f64], n: usize) -> Result<Balanced> {
    check_matrix(a, n, n)?;
    check_finite(a)?;
    let mut matrix = a.to_vec();
    let mut scale = vec![1.0; n];
    balance_inplace(&mut matrix, n, &mut scale);
    Ok(Balanced { matrix, scale })
}

// ============================================================================
// Hessenberg reduction
// ============================================================================

/// Householder reduction of `h` to upper Hessenberg form, in place
///
/// When `q` is given it must hold the identity (or a prior transform) and is
/// multiplied on the right by each reflector. `v` is `n` elements of scratch.
pub(crate) fn hessenberg_inplace(h: &mut [f64], mut q: Option<&mut [f64]>, n: usize, v: &mut [f64]) {
    if n < 3 {
        return;
    }
    for k in 0..n - 2 {
        let len = n - k - 1;
        let v = &mut v[..len];
        let mut norm2 = 0.0;
        for (i, vi) in v.iter_mut().enumerate() {
            *vi = h[(k + 1 + i) * n + k];
            norm2 += *vi * *vi;
        }
        if norm2 == 0.0 {
            continue;
        }
        let alpha = if v[0] >= 0.0 { -norm2.sqrt() } else { norm2.sqrt() };
        v[0] -= alpha;
        let vnorm2: f64 = v.iter().map(|x| x * x).sum();
        if vnorm2 == 0.0 {
            continue;
        }
        let beta = 2.0 / vnorm2;

        // H ← P·H on rows k+1.., columns k..
        for j in k..n {
            let mut dot = 0.0;
            for (i, vi) in v.iter().enumerate() {
                dot += vi * h[(k + 1 + i) * n + j];
            }
            dot *= beta;
            for (i, vi) in v.iter().enumerate() {
                h[(k + 1 + i) * n + j] -= dot * vi;
            }
        }
        // H ← H·P on all rows, columns k+1..
        for row in h.chunks_mut(n) {
            let tail = &mut row[k + 1..];
            let dot = beta * tail.iter().zip(v.iter()).map(|(a, b)| a * b).sum::<f64>();
            for (t, vi) in tail.iter_mut().zip(v.iter()) {
                *t -= dot * vi;
            }
        }
        if let Some(q) = q.as_deref_mut() {
            for row in q.chunks_mut(n) {
                let tail = &mut row[k + 1..];
                let dot = beta * tail.iter().zip(v.iter()).map(|(a, b)| a * b).sum::<f64>();
                for (t, vi) in tail.iter_mut().zip(v.iter()) {
                    *t -= dot * vi;
                }
            }
        }

        h[(k + 1) * n + k] = alpha;
        for i in (k + 2)..n {
            h[i * n + k] = 0.0;
        }
    }
}

/// Reduce `a` to upper Hessenberg form `H = Qᵀ·A·Q`
pub fn hessenberg(a: &[f64], n: usize) -> Result<Hessenberg> {
    check_matrix(a, n, n)?;
    let mut h = a.to_vec();
    let mut q = vec![0.0; n * n];
    for i in 0..n {
        q[i * n + i] = 1.0;
    }
    let mut v = vec![0.0; n];
    hessenberg_inplace(&mut h, Some(&mut q), n, &mut v);
    Ok(Hessenberg { h, q })
}

// ============================================================================
// Francis double-shift QR
// ============================================================================

/// Drive the Hessenberg matrix `h` to real Schur form
///
/// Eigenvalues land in `real`/`imag` in diagonal order. Returns
/// `(converged, total_iterations, last_subdiagonal)`. On budget exhaustion the
/// undeflated block's diagonal is reported as its eigenvalue estimate.
pub(crate) fn francis_qr(
    h: &mut [f64],
    mut z: Option<&mut [f64]>,
    n: usize,
    real: &mut [f64],
    imag: &mut [f64],
    max_iter_per_eigenvalue: usize,
) -> (bool, usize, f64) {
    let nn = n;
    let eps = f64::EPSILON;
    let at = |i: usize, j: usize| i * nn + j;

    let mut norm = 0.0;
    for i in 0..nn {
        for j in i.saturating_sub(1)..nn {
            norm += h[at(i, j)].abs();
        }
    }

    let mut exshift = 0.0;
    let mut iter = 0usize;
    let mut total = 0usize;
    let (mut p, mut q, mut r, mut s, mut zz): (f64, f64, f64, f64, f64);
    let (mut x, mut y, mut w): (f64, f64, f64);

    // hi is one past the bottom row of the active block
    let mut hi = nn;
    while hi > 0 {
        let nb = hi - 1;

        let mut l = nb;
        while l > 0 {
            s = h[at(l - 1, l - 1)].abs() + h[at(l, l)].abs();
            if s == 0.0 {
                s = norm;
            }
            if h[at(l, l - 1)].abs() <= eps * s {
                break;
            }
            l -= 1;
        }

        if l == nb {
            // one real root
            h[at(nb, nb)] += exshift;
            real[nb] = h[at(nb, nb)];
            imag[nb] = 0.0;
            if nb > 0 {
                h[at(nb, nb - 1)] = 0.0;
            }
            hi -= 1;
            iter = 0;
        } else if l + 1 == nb {
            // 2×2 block
            w = h[at(nb, nb - 1)] * h[at(nb - 1, nb)];
            p = (h[at(nb - 1, nb - 1)] - h[at(nb, nb)]) / 2.0;
            q = p * p + w;
            zz = q.abs().sqrt();
            h[at(nb, nb)] += exshift;
            h[at(nb - 1, nb - 1)] += exshift;
            x = h[at(nb, nb)];

            if q >= 0.0 {
                zz = if p >= 0.0 { p + zz } else { p - zz };
                real[nb - 1] = x + zz;
                real[nb] = if zz != 0.0 { x - w / zz } else { x + zz };
                imag[nb - 1] = 0.0;
                imag[nb] = 0.0;

                // rotate the block to upper triangular
                x = h[at(nb, nb - 1)];
                s = x.abs() + zz.abs();
                p = x / s;
                q = zz / s;
                r = (p * p + q * q).sqrt();
                p /= r;
                q /= r;
                for j in (nb - 1)..nn {
                    let t = h[at(nb - 1, j)];
                    h[at(nb - 1, j)] = q * t + p * h[at(nb, j)];
                    h[at(nb, j)] = q * h[at(nb, j)] - p * t;
                }
                for i in 0..=nb {
                    let t = h[at(i, nb - 1)];
                    h[at(i, nb - 1)] = q * t + p * h[at(i, nb)];
                    h[at(i, nb)] = q * h[at(i, nb)] - p * t;
                }
                if let Some(z) = z.as_deref_mut() {
                    for i in 0..nn {
                        let t = z[at(i, nb - 1)];
                        z[at(i, nb - 1)] = q * t + p * z[at(i, nb)];
                        z[at(i, nb)] = q * z[at(i, nb)] - p * t;
                    }
                }
                h[at(nb, nb - 1)] = 0.0;
            } else {
                real[nb - 1] = x + p;
                real[nb] = x + p;
                imag[nb - 1] = zz;
                imag[nb] = -zz;
            }
            if nb > 1 {
                h[at(nb - 1, nb - 2)] = 0.0;
            }
            hi -= 2;
            iter = 0;
        } else {
            if iter >= max_iter_per_eigenvalue {
                for i in 0..hi {
                    real[i] = h[at(i, i)] + exshift;
                    imag[i] = 0.0;
                }
                let residual = h[at(nb, nb - 1)].abs();
                return (false, total, residual);
            }

            x = h[at(nb, nb)];
            y = h[at(nb - 1, nb - 1)];
            w = h[at(nb, nb - 1)] * h[at(nb - 1, nb)];

            if iter == 10 {
                exshift += x;
                for i in 0..=nb {
                    h[at(i, i)] -= x;
                }
                s = h[at(nb, nb - 1)].abs() + h[at(nb - 1, nb - 2)].abs();
                x = 0.75 * s;
                y = x;
                w = -0.4375 * s * s;
            }
            if iter == 20 {
                s = (y - x) / 2.0;
                s = s * s + w;
                if s > 0.0 {
                    s = s.sqrt();
                    if y < x {
                        s = -s;
                    }
                    s = x - w / ((y - x) / 2.0 + s);
                    for i in 0..=nb {
                        h[at(i, i)] -= s;
                    }
                    exshift += s;
                    x = 0.964;
                    y = x;
                    w = x;
                }
            }
            iter += 1;
            total += 1;

            // two consecutive small subdiagonal elements
            let mut m = nb - 2;
            loop {
                zz = h[at(m, m)];
                r = x - zz;
                s = y - zz;
                p = (r * s - w) / h[at(m + 1, m)] + h[at(m, m + 1)];
                q = h[at(m + 1, m + 1)] - zz - r - s;
                r = h[at(m + 2, m + 1)];
                s = p.abs() + q.abs() + r.abs();
                p /= s;
                q /= s;
                r /= s;
                if m == l {
                    break;
                }
                let lhs = h[at(m, m - 1)].abs() * (q.abs() + r.abs());
                let rhs = eps
                    * (p.abs() * (h[at(m - 1, m - 1)].abs() + zz.abs() + h[at(m + 1, m + 1)].abs()));
                if lhs < rhs {
                    break;
                }
                m -= 1;
            }

            for i in (m + 2)..=nb {
                h[at(i, i - 2)] = 0.0;
                if i > m + 2 {
                    h[at(i, i - 3)] = 0.0;
                }
            }

            // double QR step on rows l..=nb, columns m..=nb
            for k in m..nb {
                let notlast = k != nb - 1;
                if k != m {
                    p = h[at(k, k - 1)];
                    q = h[at(k + 1, k - 1)];
                    r = if notlast { h[at(k + 2, k - 1)] } else { 0.0 };
                    x = p.abs() + q.abs() + r.abs();
                    if x == 0.0 {
                        continue;
                    }
                    p /= x;
                    q /= x;
                    r /= x;
                }
                s = (p * p + q * q + r * r).sqrt();
                if p < 0.0 {
                    s = -s;
                }
                if s == 0.0 {
                    continue;
                }
                if k != m {
                    h[at(k, k - 1)] = -s * x;
                } else if l != m {
                    h[at(k, k - 1)] = -h[at(k, k - 1)];
                }
                p += s;
                x = p / s;
                y = q / s;
                zz = r / s;
                q /= p;
                r /= p;

                for j in k..nn {
                    let mut t = h[at(k, j)] + q * h[at(k + 1, j)];
                    if notlast {
                        t += r * h[at(k + 2, j)];
                        h[at(k + 2, j)] -= t * zz;
                    }
                    h[at(k, j)] -= t * x;
                    h[at(k + 1, j)] -= t * y;
                }
                for i in 0..=nb.min(k + 3) {
                    let mut t = x * h[at(i, k)] + y * h[at(i, k + 1)];
                    if notlast {
                        t += zz * h[at(i, k + 2)];
                        h[at(i, k + 2)] -= t * r;
                    }
                    h[at(i, k)] -= t;
                    h[at(i, k + 1)] -= t * q;
                }
                if let Some(z) = z.as_deref_mut() {
                    for i in 0..nn {
                        let mut t = x * z[at(i, k)] + y * z[at(i, k + 1)];
                        if notlast {
                            t += zz * z[at(i, k + 2)];
                            z[at(i, k + 2)] -= t * r;
                        }
                        z[at(i, k)] -= t;
                        z[at(i, k + 1)] -= t * q;
                    }
                }
            }
        }
    }

    (true, total, 0.0)
}

// ============================================================================
// Public entry points
// ============================================================================

/// Real Schur decomposition `A = Z·T·Zᵀ` (no balancing, so `Z` is orthogonal)
pub fn schur(a: &[f64], n: usize) -> Result<Outcome<SchurForm>> {
    schur_with_options(a, n, &EigOptions::default())
}

/// Real Schur decomposition with explicit iteration budget
pub fn schur_with_options(a: &[f64], n: usize, opts: &EigOptions) -> Result<Outcome<SchurForm>> {
    check_matrix(a, n, n)?;
    check_finite(a)?;
    let mut t = a.to_vec();
    let mut z = vec![0.0; n * n];
    for i in 0..n {
        z[i * n + i] = 1.0;
    }
    let mut scratch = vec![0.0; n];
    hessenberg_inplace(&mut t, Some(&mut z), n, &mut scratch);

    let mut real = vec![0.0; n];
    let mut imag = vec![0.0; n];
    let (converged, iterations, residual) = francis_qr(
        &mut t,
        Some(&mut z),
        n,
        &mut real,
        &mut imag,
        opts.max_iter_per_eigenvalue,
    );
    if converged {
        for i in 2..n {
            for j in 0..i - 1 {
                t[i * n + j] = 0.0;
            }
        }
    }
    tracing::debug!(n, iterations, "schur decomposition finished");
    Ok(Outcome::from_parts(SchurForm { t, z, n }, converged, iterations, residual))
}

/// Eigenvalues of a general matrix into `real`/`imag` (each `n`)
///
/// `work` needs [`eig_general_work_size`]`(n)` elements.
pub fn eig_general_into(
    a: &[f64],
    n: usize,
    real: &mut [f64],
    imag: &mut [f64],
    work: &mut [f64],
    opts: &EigOptions,
) -> Result<Outcome<()>> {
    check_matrix(a, n, n)?;
    check_matrix(real, n, 1)?;
    check_matrix(imag, n, 1)?;
    check_work("eig_general", work, eig_general_work_size(n))?;
    check_finite(a)?;

    let (h, rest) = work.split_at_mut(n * n);
    let (_z, tail) = rest.split_at_mut(n * n);
    let scratch = &mut tail[..n];
    h.copy_from_slice(a);
    if opts.balance {
        balance_inplace(h, n, scratch);
    }
    hessenberg_inplace(h, None, n, scratch);
    let (converged, iterations, residual) =
        francis_qr(h, None, n, real, imag, opts.max_iter_per_eigenvalue);
    tracing::debug!(n, iterations, "general eigensolver finished");
    Ok(Outcome::from_parts((), converged, iterations, residual))
}

/// Eigenvalues of a general matrix
pub fn eig_general(a: &[f64], n: usize) -> Result<Outcome<GeneralEigen>> {
    eig_general_with_options(a, n, &EigOptions::default())
}

/// Eigenvalues of a general matrix with explicit options
pub fn eig_general_with_options(
    a: &[f64],
    n: usize,
    opts: &EigOptions,
) -> Result<Outcome<GeneralEigen>> {
    let mut real = vec![0.0; n];
    let mut imag = vec![0.0; n];
    let mut work = vec![0.0; eig_general_work_size(n)];
    let status = eig_general_into(a, n, &mut real, &mut imag, &mut work, opts)?;
    Ok(status.map(|()| GeneralEigen { real, imag }))
}

/// Largest eigenvalue modulus `max |λ|`
pub fn spectral_radius(a: &[f64], n: usize) -> Result<Outcome<f64>> {
    let eig = eig_general(a, n)?;
    Ok(eig.map(|e| {
        e.real
            .iter()
            .zip(&e.imag)
            .fold(0.0f64, |m, (re, im)| m.max(re.hypot(*im)))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_pairs(e: &GeneralEigen) -> Vec<(f64, f64)> {
        let mut v: Vec<(f64, f64)> = e.real.iter().copied().zip(e.imag.iter().copied()).collect();
        v.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        v
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        let a = [1.0, f64::INFINITY, 1.0, 1.0];
        let rejected = |r: Result<_>| matches!(r, Err(Error::InvalidArgument { arg: "a", .. }));
        assert!(rejected(balance(&a, 2).map(|_| ())));
        assert!(rejected(eig_general(&a, 2).map(|_| ())));
        assert!(rejected(schur(&[f64::NAN, 0.0, 0.0, 1.0], 2).map(|_| ())));
    }

    #[test]
    fn test_balance_skips_infinite_rows() {
        let mut a = [1.0, f64::INFINITY, 1.0, 1.0];
        let mut scale = [0.0; 2];
        balance_inplace(&mut a, 2, &mut scale);
        assert_eq!(scale, [1.0, 1.0]);
    }

    #[test]
    fn test_rotation_has_imaginary_pair() {
        let a = [0.0, -1.0, 1.0, 0.0];
        let e = eig_general(&a, 2).unwrap().into_value();
        assert!(!e.is_real());
        assert!(e.real.iter().all(|r| r.abs() < 1e-14));
        assert!((e.imag[0] - 1.0).abs() < 1e-14);
        assert!((e.imag[1] + 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_real_pair_2x2() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let e = eig_general(&a, 2).unwrap().into_value();
        let p = sorted_pairs(&e);
        let d = 33f64.sqrt();
        assert!((p[0].0 - (5.0 - d) / 2.0).abs() < 1e-12);
        assert!((p[1].0 - (5.0 + d) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_companion_matrix_roots() {
        // x³ - 6x² + 11x - 6 = (x-1)(x-2)(x-3)
        let a = [6.0, -11.0, 6.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let out = eig_general(&a, 3).unwrap();
        assert!(out.is_converged());
        let p = sorted_pairs(out.value());
        for (k, want) in [1.0, 2.0, 3.0].iter().enumerate() {
            assert!((p[k].0 - want).abs() < 1e-9, "{p:?}");
            assert!(p[k].1.abs() < 1e-9);
        }
    }

    #[test]
    fn test_complex_roots_of_companion() {
        // (x - 2)(x² + 1) = x³ - 2x² + x - 2
        let a = [2.0, -1.0, 2.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let e = eig_general(&a, 3).unwrap().into_value();
        let p = sorted_pairs(&e);
        assert!(p[0].0.abs() < 1e-10 && (p[0].1 + 1.0).abs() < 1e-10);
        assert!(p[1].0.abs() < 1e-10 && (p[1].1 - 1.0).abs() < 1e-10);
        assert!((p[2].0 - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_schur_reconstruction() {
        let n = 4;
        let a = [
            4.0, -2.0, 1.0, 3.0, //
            1.0, 1.0, -5.0, 2.0, //
            0.5, 2.0, 3.0, -1.0, //
            -2.0, 1.0, 0.0, 2.0,
        ];
        let out = schur(&a, n).unwrap();
        assert!(out.is_converged());
        let s = out.value();
        for i in 2..n {
            for j in 0..i - 1 {
                assert_eq!(s.t[i * n + j], 0.0);
            }
        }
        for i in 0..n {
            for j in 0..n {
                let mut zzt = 0.0;
                let mut rec = 0.0;
                for k in 0..n {
                    zzt += s.z[i * n + k] * s.z[j * n + k];
                    for l in 0..n {
                        rec += s.z[i * n + k] * s.t[k * n + l] * s.z[j * n + l];
                    }
                }
                let id = if i == j { 1.0 } else { 0.0 };
                assert!((zzt - id).abs() < 1e-12);
                assert!((rec - a[i * n + j]).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_hessenberg_structure() {
        let n = 5;
        let a: Vec<f64> = (0..n * n).map(|i| ((i * 7 + 3) % 11) as f64 - 5.0).collect();
        let hs = hessenberg(&a, n).unwrap();
        for i in 2..n {
            for j in 0..i - 1 {
                assert_eq!(hs.h[i * n + j], 0.0);
            }
        }
        // trace is a similarity invariant
        let tr_a: f64 = (0..n).map(|i| a[i * n + i]).sum();
        let tr_h: f64 = (0..n).map(|i| hs.h[i * n + i]).sum();
        assert!((tr_a - tr_h).abs() < 1e-12);
    }

    #[test]
    fn test_balance_uses_radix_powers() {
        let a = [1.0, 1e4, 1e-4, 1.0];
        let b = balance(&a, 2).unwrap();
        for s in &b.scale {
            assert_eq!(s.log2().fract(), 0.0);
        }
        let off = (b.matrix[1].abs(), b.matrix[2].abs());
        assert!(off.0 / off.1 < 1e8 / 10.0);
        assert_eq!(b.matrix[0], 1.0);
        assert_eq!(b.matrix[3], 1.0);
    }

    #[test]
    fn test_zero_and_trivial_orders() {
        let z = eig_general(&[0.0; 9], 3).unwrap();
        assert!(z.is_converged());
        assert!(z.value().real.iter().all(|v| *v == 0.0));
        let one = eig_general(&[-2.5], 1).unwrap().into_value();
        assert_eq!(one.real, vec![-2.5]);
        assert!(eig_general(&[], 0).unwrap().value().real.is_empty());
    }

    #[test]
    fn test_spectral_radius() {
        let a = [0.0, -2.0, 2.0, 0.0];
        assert!((spectral_radius(&a, 2).unwrap().into_value() - 2.0).abs() < 1e-14);
    }
}
