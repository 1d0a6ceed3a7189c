//! FFT-based convolution and correlation, spectra and frequency response
//!
//! Linear (non-circular) convolution through the FFT needs both operands
//! zero-padded to a common length `L >= n + m - 1`; `L` is rounded up to a
//! power of two:
//!
//! ```text
//! A = FFT(pad(a, L))     B = FFT(pad(b, L))
//! convolve:  c = IFFT(A · B)[0 .. n+m-1]
//! correlate: c = IFFT(A · conj(B)), lags -(m-1) ..= n-1 read from the wrap
//! ```

use super::transform::{is_power_of_two, transform};
use crate::buffer::{check_len, check_work, convolve_work_size};
use crate::dtype::Complex128;
use crate::error::{Error, Result};
use crate::kernels::complex::{as_complex_mut, to_interleaved};
use std::f64::consts::PI;

/// Length of the full linear result, 0 when either operand is empty
fn full_len(a: &[f64], b: &[f64]) -> usize {
    if a.is_empty() || b.is_empty() {
        0
    } else {
        a.len() + b.len() - 1
    }
}

/// Zero-pad `a` and `b` into the two halves of `work` and transform both
fn spectra<'w>(
    a: &[f64],
    b: &[f64],
    work: &'w mut [f64],
) -> Result<(&'w mut [Complex128], &'w mut [Complex128])> {
    let len = convolve_work_size(a.len(), b.len()) / 4;
    let (fa, rest) = work.split_at_mut(2 * len);
    let fa = as_complex_mut(fa)?;
    let fb = as_complex_mut(&mut rest[..2 * len])?;
    fa.fill(Complex128::ZERO);
    fb.fill(Complex128::ZERO);
    for (z, &v) in fa.iter_mut().zip(a) {
        z.re = v;
    }
    for (z, &v) in fb.iter_mut().zip(b) {
        z.re = v;
    }
    transform(fa, false);
    transform(fb, false);
    Ok((fa, fb))
}

/// Linear convolution of two real sequences into `out` (`n + m - 1`)
///
/// `work` needs [`convolve_work_size`]`(n, m)` elements.
pub fn convolve_into(a: &[f64], b: &[f64], out: &mut [f64], work: &mut [f64]) -> Result<()> {
    if a.is_empty() || b.is_empty() {
        check_len(0, out.len())?;
        return Ok(());
    }
    let full = a.len() + b.len() - 1;
    check_len(full, out.len())?;
    check_work("convolve", work, convolve_work_size(a.len(), b.len()))?;

    let (fa, fb) = spectra(a, b, work)?;
    for (x, y) in fa.iter_mut().zip(fb.iter()) {
        *x *= *y;
    }
    transform(fa, true);
    for (o, z) in out.iter_mut().zip(fa.iter()) {
        *o = z.re;
    }
    Ok(())
}

/// Linear convolution of two real sequences
///
/// ```
/// let c = numkern::fft::convolve(&[1.0, 2.0, 3.0], &[1.0, 1.0])?;
/// let expected = [1.0, 3.0, 5.0, 3.0];
/// assert!(c.iter().zip(&expected).all(|(a, b)| (a - b).abs() < 1e-12));
/// # Ok::<(), numkern::error::Error>(())
/// ```
pub fn convolve(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    let mut out = vec![0.0; full_len(a, b)];
    let mut work = vec![0.0; convolve_work_size(a.len(), b.len())];
    convolve_into(a, b, &mut out, &mut work)?;
    Ok(out)
}

/// Full cross-correlation into `out` (`n + m - 1`)
///
/// `out[j] = Σ_i a[i + j - (m-1)] · b[i]`, i.e. lags `-(m-1) ..= n-1`. This
/// equals `convolve(a, reverse(b))`.
pub fn correlate_into(a: &[f64], b: &[f64], out: &mut [f64], work: &mut [f64]) -> Result<()> {
    if a.is_empty() || b.is_empty() {
        check_len(0, out.len())?;
        return Ok(());
    }
    let (n, m) = (a.len(), b.len());
    check_len(n + m - 1, out.len())?;
    check_work("correlate", work, convolve_work_size(n, m))?;

    let (fa, fb) = spectra(a, b, work)?;
    for (x, y) in fa.iter_mut().zip(fb.iter()) {
        *x *= y.conj();
    }
    transform(fa, true);
    let len = fa.len();
    for (j, o) in out.iter_mut().enumerate() {
        // lag j - (m-1), negative lags wrap to the end of the buffer
        let idx = (j + len - (m - 1)) % len;
        *o = fa[idx].re;
    }
    Ok(())
}

/// Full cross-correlation of two real sequences
pub fn correlate(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    let mut out = vec![0.0; full_len(a, b)];
    let mut work = vec![0.0; convolve_work_size(a.len(), b.len())];
    correlate_into(a, b, &mut out, &mut work)?;
    Ok(out)
}

/// Autocorrelation for lags `0 ..= n-1` (the non-negative half of the
/// symmetric full result)
pub fn autocorrelate(x: &[f64]) -> Result<Vec<f64>> {
    let full = correlate(x, x)?;
    let skip = x.len().saturating_sub(1);
    Ok(full[skip..].to_vec())
}

/// Periodogram `|X_k|² / n` of a real signal of power-of-two length
///
/// With this scaling the bins sum to the signal energy `Σ x²`.
pub fn power_spectrum(x: &[f64]) -> Result<Vec<f64>> {
    let n = x.len();
    if !is_power_of_two(n) {
        return Err(Error::NotPowerOfTwo { len: n });
    }
    let mut z: Vec<Complex128> = x.iter().map(|&v| Complex128::new(v, 0.0)).collect();
    transform(&mut z, false);
    let inv_n = 1.0 / n as f64;
    Ok(z.iter().map(|c| c.magnitude_squared() * inv_n).collect())
}

// ============================================================================
// Frequency response
// ============================================================================

/// Frequency response of a digital filter
#[derive(Debug, Clone, PartialEq)]
pub struct FreqResponse {
    /// Angular frequencies in radians per sample
    pub w: Vec<f64>,
    /// Complex response at each frequency, interleaved
    pub h: Vec<f64>,
}

impl FreqResponse {
    /// Magnitude `|H(w)|` per frequency
    pub fn magnitude(&self) -> Vec<f64> {
        self.h.chunks_exact(2).map(|c| c[0].hypot(c[1])).collect()
    }
}

/// Horner evaluation of `Σ c_k z^k` (ascending powers)
fn horner_ascending(c: &[f64], z: Complex128) -> Complex128 {
    c.iter()
        .rev()
        .fold(Complex128::ZERO, |acc, &ck| acc * z + Complex128::new(ck, 0.0))
}

/// `H(w) = B(e^{-jw}) / A(e^{-jw})` at the given frequencies
///
/// `b` and `a` hold coefficients of ascending powers of `z⁻¹`. Evaluated
/// directly with Horner's method, not through an FFT.
pub fn freqz_at(b: &[f64], a: &[f64], w: &[f64]) -> Result<FreqResponse> {
    if b.is_empty() {
        return Err(Error::InvalidArgument {
            arg: "b",
            reason: "numerator has no coefficients".into(),
        });
    }
    if a.iter().all(|&c| c == 0.0) {
        return Err(Error::InvalidArgument {
            arg: "a",
            reason: "denominator is identically zero".into(),
        });
    }
    let h: Vec<Complex128> = w
        .iter()
        .map(|&wk| {
            let z = Complex128::from_polar(1.0, -wk);
            horner_ascending(b, z) / horner_ascending(a, z)
        })
        .collect();
    Ok(FreqResponse {
        w: w.to_vec(),
        h: to_interleaved(&h),
    })
}

/// Frequency response at `n` uniformly spaced frequencies `w_k = πk/n` on `[0, π)`
pub fn freqz(b: &[f64], a: &[f64], n: usize) -> Result<FreqResponse> {
    let w: Vec<f64> = (0..n).map(|k| PI * k as f64 / n as f64).collect();
    freqz_at(b, a, &w)
}
