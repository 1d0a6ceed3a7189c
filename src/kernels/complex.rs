//! Complex array kernels over interleaved `[re0, im0, re1, im1, ...]` buffers
//!
//! Buffers are reinterpreted as `&[Complex128]` with bytemuck; no copies are
//! made. Lengths in the checks below are in complex elements.

use crate::buffer::check_len;
use crate::dtype::Complex128;
use crate::error::{Error, Result};

/// View an interleaved buffer as complex elements
pub fn as_complex(buf: &[f64]) -> Result<&[Complex128]> {
    bytemuck::try_cast_slice(buf).map_err(|_| Error::InvalidArgument {
        arg: "buf",
        reason: format!("interleaved complex buffer has odd length {}", buf.len()),
    })
}

/// Mutable view of an interleaved buffer as complex elements
pub fn as_complex_mut(buf: &mut [f64]) -> Result<&mut [Complex128]> {
    let len = buf.len();
    bytemuck::try_cast_slice_mut(buf).map_err(|_| Error::InvalidArgument {
        arg: "buf",
        reason: format!("interleaved complex buffer has odd length {len}"),
    })
}

/// Flatten complex elements back to an interleaved vector
pub fn to_interleaved(z: &[Complex128]) -> Vec<f64> {
    bytemuck::cast_slice(z).to_vec()
}

fn zip_into(
    a: &[f64],
    b: &[f64],
    out: &mut [f64],
    f: impl Fn(Complex128, Complex128) -> Complex128,
) -> Result<()> {
    let a = as_complex(a)?;
    let b = as_complex(b)?;
    let out = as_complex_mut(out)?;
    check_len(a.len(), b.len())?;
    check_len(a.len(), out.len())?;
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = f(x, y);
    }
    Ok(())
}

fn map_into(a: &[f64], out: &mut [f64], f: impl Fn(Complex128) -> Complex128) -> Result<()> {
    let a = as_complex(a)?;
    let out = as_complex_mut(out)?;
    check_len(a.len(), out.len())?;
    for (o, &x) in out.iter_mut().zip(a) {
        *o = f(x);
    }
    Ok(())
}

fn map_real_into(a: &[f64], out: &mut [f64], f: impl Fn(Complex128) -> f64) -> Result<()> {
    let a = as_complex(a)?;
    check_len(a.len(), out.len())?;
    for (o, &x) in out.iter_mut().zip(a) {
        *o = f(x);
    }
    Ok(())
}

/// Elementwise complex sum
pub fn add_into(a: &[f64], b: &[f64], out: &mut [f64]) -> Result<()> {
    zip_into(a, b, out, |x, y| x + y)
}

/// Elementwise complex difference
pub fn sub_into(a: &[f64], b: &[f64], out: &mut [f64]) -> Result<()> {
    zip_into(a, b, out, |x, y| x - y)
}

/// Elementwise complex product
pub fn mul_into(a: &[f64], b: &[f64], out: &mut [f64]) -> Result<()> {
    zip_into(a, b, out, |x, y| x * y)
}

/// Elementwise complex quotient (NaN where the divisor is zero)
pub fn div_into(a: &[f64], b: &[f64], out: &mut [f64]) -> Result<()> {
    zip_into(a, b, out, |x, y| x / y)
}

/// Elementwise conjugate
pub fn conj_into(a: &[f64], out: &mut [f64]) -> Result<()> {
    map_into(a, out, Complex128::conj)
}

/// Elementwise principal exponential
pub fn exp_into(a: &[f64], out: &mut [f64]) -> Result<()> {
    map_into(a, out, Complex128::exp)
}

/// Elementwise principal logarithm
pub fn ln_into(a: &[f64], out: &mut [f64]) -> Result<()> {
    map_into(a, out, Complex128::ln)
}

/// Elementwise principal square root
pub fn sqrt_into(a: &[f64], out: &mut [f64]) -> Result<()> {
    map_into(a, out, Complex128::sqrt)
}

/// Elementwise magnitude into a real buffer of `n` values
pub fn abs_into(a: &[f64], out: &mut [f64]) -> Result<()> {
    map_real_into(a, out, Complex128::magnitude)
}

/// Elementwise argument into a real buffer of `n` values
pub fn arg_into(a: &[f64], out: &mut [f64]) -> Result<()> {
    map_real_into(a, out, Complex128::phase)
}
