//! Property-based checks across the kernel families

use numkern::fft::{convolve, fft, ifft};
use numkern::kernels::arith::{gcd, lcm};
use numkern::linalg::{cholesky, det, inv, matmul_vec, multiply, solve, transpose};
use numkern::stats::{Interpolation, introselect, max, median, min, partition_select, quantile};
use proptest::prelude::*;

fn square_dominant(n: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0f64..1.0, n * n).prop_map(move |mut a| {
        for i in 0..n {
            a[i * n + i] += n as f64 + 1.0;
        }
        a
    })
}

proptest! {
    /// Every selector returns the k-th element of the sorted input.
    #[test]
    fn selection_matches_sort(
        data in prop::collection::vec(-1e6f64..1e6, 1..300),
        idx in any::<prop::sample::Index>(),
    ) {
        let k = idx.index(data.len());
        let mut s = data.clone();
        s.sort_by(f64::total_cmp);
        prop_assert_eq!(partition_select(&mut data.clone(), k).unwrap(), s[k]);
        prop_assert_eq!(introselect(&mut data.clone(), k).unwrap(), s[k]);
    }

    /// The median and every quantile lie within the data range, and
    /// quantiles are monotone in q.
    #[test]
    fn quantiles_are_ordered(
        data in prop::collection::vec(-1e3f64..1e3, 1..100),
        q1 in 0.0f64..=1.0,
        q2 in 0.0f64..=1.0,
    ) {
        let (lo, hi) = (min(&data).unwrap(), max(&data).unwrap());
        let m = median(&data).unwrap();
        prop_assert!(lo <= m && m <= hi);
        let (qa, qb) = if q1 <= q2 { (q1, q2) } else { (q2, q1) };
        let va = quantile(&data, qa, Interpolation::Linear).unwrap();
        let vb = quantile(&data, qb, Interpolation::Linear).unwrap();
        prop_assert!(va <= vb + 1e-9);
        prop_assert!(lo - 1e-9 <= va && vb <= hi + 1e-9);
    }

    /// ifft(fft(x)) recovers x for every power-of-two length.
    #[test]
    fn fft_round_trip(
        log in 0u32..9,
        seed in prop::collection::vec(-100.0f64..100.0, 512),
    ) {
        let n = 1usize << log;
        let x = &seed[..2 * n];
        let mut buf = x.to_vec();
        fft(&mut buf).unwrap();
        ifft(&mut buf).unwrap();
        for (a, b) in buf.iter().zip(x) {
            prop_assert!((a - b).abs() < 1e-9);
        }
    }

    /// FFT convolution agrees with the direct O(nm) sum.
    #[test]
    fn convolution_matches_direct(
        a in prop::collection::vec(-10.0f64..10.0, 1..40),
        b in prop::collection::vec(-10.0f64..10.0, 1..40),
    ) {
        let got = convolve(&a, &b).unwrap();
        prop_assert_eq!(got.len(), a.len() + b.len() - 1);
        let mut direct = vec![0.0; got.len()];
        for (i, &x) in a.iter().enumerate() {
            for (j, &y) in b.iter().enumerate() {
                direct[i + j] += x * y;
            }
        }
        for (g, d) in got.iter().zip(&direct) {
            prop_assert!((g - d).abs() < 1e-9);
        }
    }

    /// (A·B)ᵀ = Bᵀ·Aᵀ
    #[test]
    fn matmul_transpose_identity(
        (m, k, n) in (1usize..12, 1usize..12, 1usize..12),
        vals in prop::collection::vec(-5.0f64..5.0, 288),
    ) {
        let a = &vals[..m * k];
        let b = &vals[144..144 + k * n];
        let ab_t = transpose(&multiply(a, b, m, k, n).unwrap(), m, n).unwrap();
        let bt = transpose(b, k, n).unwrap();
        let at = transpose(a, m, k).unwrap();
        let bt_at = multiply(&bt, &at, n, k, m).unwrap();
        for (x, y) in ab_t.iter().zip(&bt_at) {
            prop_assert!((x - y).abs() < 1e-10);
        }
    }

    /// Solving a diagonally dominant system leaves a tiny residual.
    #[test]
    fn solve_residual(
        a in square_dominant(6),
        b in prop::collection::vec(-10.0f64..10.0, 6),
    ) {
        let x = solve(&a, &b, 6).unwrap();
        let ax = matmul_vec(&a, &x, 6, 6).unwrap();
        for (l, r) in ax.iter().zip(&b) {
            prop_assert!((l - r).abs() < 1e-10);
        }
    }

    /// Inverting twice returns the original matrix.
    #[test]
    fn inverse_involution(a in square_dominant(5)) {
        let back = inv(&inv(&a, 5).unwrap(), 5).unwrap();
        for (x, y) in back.iter().zip(&a) {
            prop_assert!((x - y).abs() < 1e-10 * (1.0 + y.abs()));
        }
    }

    /// det(A·B) = det(A)·det(B)
    #[test]
    fn determinant_multiplicativity(a in square_dominant(4), b in square_dominant(4)) {
        let ab = multiply(&a, &b, 4, 4, 4).unwrap();
        let lhs = det(&ab, 4).unwrap();
        let rhs = det(&a, 4).unwrap() * det(&b, 4).unwrap();
        prop_assert!((lhs - rhs).abs() <= 1e-10 * rhs.abs());
    }

    /// Cholesky factors of B·Bᵀ + nI reproduce the matrix.
    #[test]
    fn cholesky_reconstructs(bm in prop::collection::vec(-1.0f64..1.0, 25)) {
        let n = 5;
        let bt = transpose(&bm, n, n).unwrap();
        let mut a = multiply(&bm, &bt, n, n, n).unwrap();
        for i in 0..n {
            a[i * n + i] += n as f64;
        }
        let l = cholesky(&a, n).unwrap();
        let lt = transpose(&l, n, n).unwrap();
        let llt = multiply(&l, &lt, n, n, n).unwrap();
        for (x, y) in llt.iter().zip(&a) {
            prop_assert!((x - y).abs() < 1e-12);
        }
    }

    /// gcd divides both operands and gcd·lcm = |a·b|.
    #[test]
    fn gcd_lcm_identity(a in -10_000i64..10_000, b in 1i64..10_000) {
        let g = gcd(a, b);
        prop_assert!(g > 0);
        prop_assert_eq!(a % g, 0);
        prop_assert_eq!(b % g, 0);
        prop_assert_eq!(g * lcm(a, b), (a * b).abs());
    }
}
