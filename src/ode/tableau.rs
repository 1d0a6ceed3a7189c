//! Butcher tableaux for the embedded Runge–Kutta pairs

/// Explicit embedded Runge–Kutta tableau with `S` stages
///
/// ```text
/// c | a
/// --+-----
///   | b       (propagated solution)
///   | b_hat   (embedded companion; error = h·Σ (b - b_hat)·k)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tableau<const S: usize> {
    /// Stage time fractions
    pub c: [f64; S],
    /// Stage coefficients (strictly lower triangular)
    pub a: [[f64; S]; S],
    /// Weights of the propagated solution
    pub b: [f64; S],
    /// Weights of the embedded solution
    pub b_hat: [f64; S],
    /// Exponent denominator used by step-size control
    pub order: u32,
}

impl<const S: usize> Tableau<S> {
    /// Number of stages
    pub const STAGES: usize = S;

    /// Error weights `b - b_hat`
    pub fn error_weights(&self) -> [f64; S] {
        let mut e = [0.0; S];
        for (s, w) in e.iter_mut().enumerate() {
            *w = self.b[s] - self.b_hat[s];
        }
        e
    }
}

/// Bogacki–Shampine 3(2), first-same-as-last
pub const BS23: Tableau<4> = Tableau {
    c: [0.0, 1.0 / 2.0, 3.0 / 4.0, 1.0],
    a: [
        [0.0, 0.0, 0.0, 0.0],
        [1.0 / 2.0, 0.0, 0.0, 0.0],
        [0.0, 3.0 / 4.0, 0.0, 0.0],
        [2.0 / 9.0, 1.0 / 3.0, 4.0 / 9.0, 0.0],
    ],
    b: [2.0 / 9.0, 1.0 / 3.0, 4.0 / 9.0, 0.0],
    b_hat: [7.0 / 24.0, 1.0 / 4.0, 1.0 / 3.0, 1.0 / 8.0],
    order: 3,
};

/// Dormand–Prince 5(4), first-same-as-last
pub const DP45: Tableau<7> = Tableau {
    c: [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0],
    a: [
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0, 0.0],
        [
            19372.0 / 6561.0,
            -25360.0 / 2187.0,
            64448.0 / 6561.0,
            -212.0 / 729.0,
            0.0,
            0.0,
            0.0,
        ],
        [
            9017.0 / 3168.0,
            -355.0 / 33.0,
            46732.0 / 5247.0,
            49.0 / 176.0,
            -5103.0 / 18656.0,
            0.0,
            0.0,
        ],
        [
            35.0 / 384.0,
            0.0,
            500.0 / 1113.0,
            125.0 / 192.0,
            -2187.0 / 6784.0,
            11.0 / 84.0,
            0.0,
        ],
    ],
    b: [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
        0.0,
    ],
    b_hat: [
        5179.0 / 57600.0,
        0.0,
        7571.0 / 16695.0,
        393.0 / 640.0,
        -92097.0 / 339200.0,
        187.0 / 2100.0,
        1.0 / 40.0,
    ],
    order: 5,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn check_consistency<const S: usize>(t: &Tableau<S>) {
        // rows of a sum to c, weights sum to 1
        for s in 0..S {
            let row: f64 = t.a[s].iter().sum();
            assert!((row - t.c[s]).abs() < 1e-14, "row {s}");
        }
        assert!((t.b.iter().sum::<f64>() - 1.0).abs() < 1e-14);
        assert!((t.b_hat.iter().sum::<f64>() - 1.0).abs() < 1e-14);
        assert!(t.error_weights().iter().sum::<f64>().abs() < 1e-14);
    }

    #[test]
    fn test_tableaux_are_consistent() {
        check_consistency(&BS23);
        check_consistency(&DP45);
        assert_eq!(Tableau::<7>::STAGES, 7);
        // first same as last: final stage row equals b
        assert_eq!(BS23.a[3], BS23.b);
        assert_eq!(DP45.a[6], DP45.b);
    }
}
