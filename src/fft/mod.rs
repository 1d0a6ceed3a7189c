//! Fast Fourier transforms, FFT-based signal processing and polynomials
//!
//! Complex data uses the interleaved `[re0, im0, re1, im1, ...]` layout;
//! lengths quoted in complex elements. Transforms are radix-2 and require
//! power-of-two lengths; use [`is_power_of_two`] / [`next_power_of_two`] to
//! prepare inputs.
//!
//! # Normalization
//!
//! Forward transforms are unscaled and inverse transforms divide by `N`, so
//! `ifft(fft(x)) == x` up to rounding.

pub mod polynomial;
pub mod signal;
mod transform;

pub use polynomial::{
    poly_from_roots, poly_roots, polyadd, polyder, polymul, polyval, polyval_real, zpk2tf,
};
pub use signal::{
    FreqResponse, autocorrelate, convolve, convolve_into, correlate, correlate_into, freqz,
    freqz_at, power_spectrum,
};
pub use transform::{
    fft, fft_complex, fft2d, fftshift, ifft, ifft_complex, ifft2d, ifftshift, irfft,
    is_power_of_two, next_power_of_two, rfft,
};
