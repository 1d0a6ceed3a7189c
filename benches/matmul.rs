#![allow(dead_code)]

use fluxbench::{Bencher, flux};
use std::hint::black_box;

use numkern::buffer::matmul_blocked_work_size;
use numkern::kernels::{matmul_blocked_into, matvec_into};
use numkern::linalg::multiply;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fill(n: usize, salt: usize) -> Vec<f64> {
    (0..n)
        .map(|i| ((i * 17 + salt) % 1000) as f64 / 1000.0)
        .collect()
}

fn fill_f32(n: usize, salt: usize) -> Vec<f32> {
    (0..n)
        .map(|i| ((i * 13 + salt) % 1000) as f32 / 1000.0)
        .collect()
}

// ---------------------------------------------------------------------------
// Square matmul
// ---------------------------------------------------------------------------

#[flux::bench(group = "matmul_f64", args = [32, 128, 256, 512])]
fn square_matmul(b: &mut Bencher, size: usize) {
    let a = fill(size * size, 3);
    let bm = fill(size * size, 7);
    b.iter(|| black_box(multiply(&a, &bm, size, size, size).unwrap()));
}

#[flux::bench(group = "matmul_f64", args = [128, 512])]
fn blocked_matmul(b: &mut Bencher, size: usize) {
    let a = fill(size * size, 3);
    let bm = fill(size * size, 7);
    let mut c = vec![0.0; size * size];
    let mut work = vec![0.0; matmul_blocked_work_size(size, size)];
    b.iter(|| {
        matmul_blocked_into(&a, &bm, &mut c, size, size, size, &mut work).unwrap();
        black_box(c[0])
    });
}

#[flux::bench(group = "matmul_f32", args = [128, 512])]
fn square_matmul_f32(b: &mut Bencher, size: usize) {
    let a = fill_f32(size * size, 3);
    let bm = fill_f32(size * size, 7);
    b.iter(|| black_box(multiply(&a, &bm, size, size, size).unwrap()));
}

// ---------------------------------------------------------------------------
// Tall-skinny and matrix-vector
// ---------------------------------------------------------------------------

#[flux::bench(group = "matmul_tall")]
fn tall_4096x64x64(b: &mut Bencher) {
    let a = fill(4096 * 64, 3);
    let bm = fill(64 * 64, 7);
    b.iter(|| black_box(multiply(&a, &bm, 4096, 64, 64).unwrap()));
}

#[flux::bench(group = "matvec_f64", args = [256, 1024])]
fn matvec(b: &mut Bencher, size: usize) {
    let a = fill(size * size, 3);
    let x = fill(size, 5);
    let mut y = vec![0.0; size];
    b.iter(|| {
        matvec_into(&a, &x, &mut y, size, size).unwrap();
        black_box(y[0])
    });
}

// ---------------------------------------------------------------------------
// Comparisons
// ---------------------------------------------------------------------------

#[flux::compare(
    id = "matmul_blocking",
    title = "Matmul 512×512 (row-parallel vs blocked)",
    benchmarks = ["square_matmul@512", "blocked_matmul@512"],
    baseline = "square_matmul@512",
    metric = "mean"
)]
struct MatmulBlocking;

#[flux::compare(
    id = "matmul_precision",
    title = "Matmul 512×512 (f64 vs f32)",
    benchmarks = ["square_matmul@512", "square_matmul_f32@512"],
    baseline = "square_matmul@512",
    metric = "mean"
)]
struct MatmulPrecision;

fn main() {
    fluxbench::run().unwrap();
}
