#![allow(dead_code)]

use fluxbench::{Bencher, flux};
use std::hint::black_box;

use numkern::buffer::fft2d_work_size;
use numkern::fft::{convolve, fft, fft2d, ifft, rfft};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn signal(n: usize) -> Vec<f64> {
    (0..n).map(|i| ((i * 31 + 7) % 997) as f64 / 997.0 - 0.5).collect()
}

// ---------------------------------------------------------------------------
// 1D complex FFT (interleaved, power-of-2 sizes)
// ---------------------------------------------------------------------------

#[flux::bench(group = "fft_1d", args = [64, 256, 1024, 4096, 16384, 65536])]
fn complex_fft(b: &mut Bencher, n: usize) {
    let x = signal(2 * n);
    let mut buf = x.clone();
    b.iter(|| {
        buf.copy_from_slice(&x);
        fft(&mut buf).unwrap();
        black_box(buf[0])
    });
}

#[flux::bench(group = "fft_roundtrip", args = [1024, 16384])]
fn fft_roundtrip(b: &mut Bencher, n: usize) {
    let mut buf = signal(2 * n);
    b.iter(|| {
        fft(&mut buf).unwrap();
        ifft(&mut buf).unwrap();
        black_box(buf[0])
    });
}

// ---------------------------------------------------------------------------
// Real input
// ---------------------------------------------------------------------------

#[flux::bench(group = "rfft_1d", args = [1024, 4096, 65536])]
fn real_fft(b: &mut Bencher, n: usize) {
    let x = signal(n);
    b.iter(|| black_box(rfft(&x).unwrap()));
}

// ---------------------------------------------------------------------------
// 2D and convolution
// ---------------------------------------------------------------------------

#[flux::bench(group = "fft_2d", args = [64, 256])]
fn fft_2d(b: &mut Bencher, size: usize) {
    let x = signal(2 * size * size);
    let mut buf = x.clone();
    let mut work = vec![0.0; fft2d_work_size(size, size)];
    b.iter(|| {
        buf.copy_from_slice(&x);
        fft2d(&mut buf, size, size, &mut work).unwrap();
        black_box(buf[0])
    });
}

#[flux::bench(group = "convolve", args = [128, 1024, 8192])]
fn fft_convolve(b: &mut Bencher, n: usize) {
    let a = signal(n);
    let k = signal(n / 4 + 1);
    b.iter(|| black_box(convolve(&a, &k).unwrap()));
}

#[flux::compare(
    id = "real_vs_complex",
    title = "FFT 4096 (complex vs real input)",
    benchmarks = ["complex_fft@4096", "real_fft@4096"],
    baseline = "complex_fft@4096",
    metric = "mean"
)]
struct RealVsComplex;

fn main() {
    fluxbench::run().unwrap();
}
