//! Radix-2 Cooley–Tukey transforms on interleaved complex buffers
//!
//! # Algorithm
//!
//! ```text
//! bit-reverse permute x
//! for len = 2, 4, ..., N:
//!     half = len / 2
//!     for each block start (step len):
//!         for k in 0..half:
//!             w = exp(sign * iπk / half)          sign = -1 forward, +1 inverse
//!             t = w * x[start + k + half]
//!             x[start + k + half] = x[start + k] - t
//!             x[start + k]        = x[start + k] + t
//! inverse: scale by 1/N
//! ```
//!
//! All transforms run in place. Lengths must be exact powers of two; the
//! public entry points reject anything else with [`Error::NotPowerOfTwo`].

use crate::buffer::{check_work, fft2d_work_size};
use crate::dtype::Complex128;
use crate::error::{Error, Result};
use crate::kernels::complex::{as_complex, as_complex_mut, to_interleaved};
use std::f64::consts::PI;

/// True when `n` is a positive power of two
#[inline]
pub fn is_power_of_two(n: usize) -> bool {
    n != 0 && n & (n - 1) == 0
}

/// Smallest power of two `>= n` (1 for `n == 0`)
#[inline]
pub fn next_power_of_two(n: usize) -> usize {
    n.next_power_of_two()
}

#[inline]
fn require_power_of_two(n: usize) -> Result<()> {
    if !is_power_of_two(n) {
        return Err(Error::NotPowerOfTwo { len: n });
    }
    Ok(())
}

fn bit_reverse(z: &mut [Complex128]) {
    let n = z.len();
    if n <= 2 {
        return;
    }
    let bits = n.trailing_zeros();
    for i in 0..n {
        let j = i.reverse_bits() >> (usize::BITS - bits);
        if i < j {
            z.swap(i, j);
        }
    }
}

/// Unchecked in-place transform; `z.len()` must be a power of two
pub(crate) fn transform(z: &mut [Complex128], inverse: bool) {
    let n = z.len();
    debug_assert!(is_power_of_two(n));
    if n <= 1 {
        return;
    }
    bit_reverse(z);

    let sign = if inverse { 1.0 } else { -1.0 };
    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let step = sign * PI / half as f64;
        // one twiddle per column, shared by every block of the stage
        for k in 0..half {
            let w = Complex128::from_polar(1.0, step * k as f64);
            for even in (k..n).step_by(len) {
                let odd = even + half;
                let t = w * z[odd];
                z[odd] = z[even] - t;
                z[even] += t;
            }
        }
        len *= 2;
    }

    if inverse {
        let scale = 1.0 / n as f64;
        for v in z.iter_mut() {
            *v = v.scale(scale);
        }
    }
}

// ============================================================================
// 1D
// ============================================================================

/// Forward FFT of complex elements in place
pub fn fft_complex(z: &mut [Complex128]) -> Result<()> {
    require_power_of_two(z.len())?;
    transform(z, false);
    Ok(())
}

/// Inverse FFT of complex elements in place (includes the `1/N` scale)
pub fn ifft_complex(z: &mut [Complex128]) -> Result<()> {
    require_power_of_two(z.len())?;
    transform(z, true);
    Ok(())
}

/// Forward FFT in place on an interleaved `[re0, im0, ...]` buffer
///
/// ```
/// use numkern::fft::fft;
///
/// let mut x = vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
/// fft(&mut x)?;
/// assert_eq!(&x[..2], &[4.0, 0.0]);
/// # Ok::<(), numkern::error::Error>(())
/// ```
pub fn fft(buf: &mut [f64]) -> Result<()> {
    fft_complex(as_complex_mut(buf)?)
}

/// Inverse FFT in place on an interleaved buffer
pub fn ifft(buf: &mut [f64]) -> Result<()> {
    ifft_complex(as_complex_mut(buf)?)
}

// ============================================================================
// 2D
// ============================================================================

fn transform_2d(
    buf: &mut [f64],
    rows: usize,
    cols: usize,
    work: &mut [f64],
    inverse: bool,
) -> Result<()> {
    require_power_of_two(rows)?;
    require_power_of_two(cols)?;
    let z = as_complex_mut(buf)?;
    if z.len() != rows * cols {
        return Err(Error::ShapeMismatch {
            expected: vec![rows, cols],
            got: vec![z.len()],
        });
    }
    check_work("fft2d", work, fft2d_work_size(rows, cols))?;

    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        z.par_chunks_mut(cols).for_each(|row| transform(row, inverse));
    }
    #[cfg(not(feature = "rayon"))]
    for row in z.chunks_mut(cols) {
        transform(row, inverse);
    }

    let line = as_complex_mut(&mut work[..2 * rows])?;
    for j in 0..cols {
        for i in 0..rows {
            line[i] = z[i * cols + j];
        }
        transform(line, inverse);
        for i in 0..rows {
            z[i * cols + j] = line[i];
        }
    }
    Ok(())
}

/// 2D FFT in place on a row-major `rows × cols` interleaved complex buffer
///
/// Rows are transformed first, then columns through `work`, which needs
/// [`fft2d_work_size`](crate::buffer::fft2d_work_size)`(rows, cols)` elements.
pub fn fft2d(buf: &mut [f64], rows: usize, cols: usize, work: &mut [f64]) -> Result<()> {
    transform_2d(buf, rows, cols, work, false)
}

/// Inverse 2D FFT in place
pub fn ifft2d(buf: &mut [f64], rows: usize, cols: usize, work: &mut [f64]) -> Result<()> {
    transform_2d(buf, rows, cols, work, true)
}

// ============================================================================
// Real transforms
// ============================================================================

/// FFT of a real signal; returns the `n/2 + 1` non-negative frequency bins
/// interleaved
pub fn rfft(x: &[f64]) -> Result<Vec<f64>> {
    let n = x.len();
    require_power_of_two(n)?;
    let mut z: Vec<Complex128> = x.iter().map(|&v| Complex128::new(v, 0.0)).collect();
    transform(&mut z, false);
    z.truncate(n / 2 + 1);
    Ok(to_interleaved(&z))
}

/// Inverse of [`rfft`]: rebuilds the Hermitian spectrum and returns `n`
/// real samples
///
/// The imaginary parts of the DC and Nyquist bins are ignored.
pub fn irfft(spectrum: &[f64], n: usize) -> Result<Vec<f64>> {
    require_power_of_two(n)?;
    let half = as_complex(spectrum)?;
    if half.len() != n / 2 + 1 {
        return Err(Error::len_mismatch(n / 2 + 1, half.len()));
    }
    let mut z = vec![Complex128::ZERO; n];
    z[..half.len()].copy_from_slice(half);
    for k in 1..n.div_ceil(2) {
        z[n - k] = half[k].conj();
    }
    z[0].im = 0.0;
    if n > 1 {
        z[n / 2].im = 0.0;
    }
    transform(&mut z, true);
    Ok(z.iter().map(|c| c.re).collect())
}

/// Move the zero-frequency element to the centre (rotate right by `n/2`)
///
/// Works on whole elements: pass a real spectrum directly, or an interleaved
/// complex buffer through
/// [`as_complex_mut`](crate::kernels::complex::as_complex_mut).
pub fn fftshift<T>(data: &mut [T]) {
    let n = data.len();
    data.rotate_right(n / 2);
}

/// Undo [`fftshift`] (rotate left by `n/2`)
pub fn ifftshift<T>(data: &mut [T]) {
    let n = data.len();
    data.rotate_left(n / 2);
}
