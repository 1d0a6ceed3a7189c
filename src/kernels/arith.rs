//! Scalar arithmetic and transcendental primitives
//!
//! Real-valued functions without a real answer return NaN (even root of a
//! negative number, log of a negative number) rather than a status code, so
//! they compose inline. Integer number theory is generic over
//! [`num_traits::PrimInt`].

use num_traits::{PrimInt, Signed};

// ============================================================================
// Real scalars
// ============================================================================

/// a + b
#[inline]
pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

/// a - b
#[inline]
pub fn sub(a: f64, b: f64) -> f64 {
    a - b
}

/// a * b
#[inline]
pub fn mul(a: f64, b: f64) -> f64 {
    a * b
}

/// a / b (IEEE semantics: ±inf or NaN on zero divisor)
#[inline]
pub fn div(a: f64, b: f64) -> f64 {
    a / b
}

/// Real cube root (sign-preserving)
#[inline]
pub fn cbrt(x: f64) -> f64 {
    x.cbrt()
}

/// Real n-th root
///
/// Odd roots of negative numbers keep the sign; even roots of negative numbers
/// and the zeroth root are NaN. A negative `n` gives the reciprocal root;
/// `i32::MIN` has no positive counterpart and is NaN as well.
pub fn nth_root(x: f64, n: i32) -> f64 {
    if n == 0 {
        return f64::NAN;
    }
    if n < 0 {
        return match n.checked_neg() {
            Some(m) => 1.0 / nth_root(x, m),
            None => f64::NAN,
        };
    }
    if n == 1 {
        return x;
    }
    if n == 2 {
        return x.sqrt();
    }
    if n == 3 {
        return x.cbrt();
    }
    if x < 0.0 {
        if n % 2 == 0 {
            return f64::NAN;
        }
        return -(-x).powf(1.0 / n as f64);
    }
    let r = x.powf(1.0 / n as f64);
    // one Newton correction recovers exact roots of perfect powers
    if r > 0.0 && r.is_finite() {
        let nf = n as f64;
        let corrected = r - (r.powi(n) - x) / (nf * r.powi(n - 1));
        if (corrected.powi(n) - x).abs() <= (r.powi(n) - x).abs() {
            return corrected;
        }
    }
    r
}

/// x^y
#[inline]
pub fn pow(x: f64, y: f64) -> f64 {
    x.powf(y)
}

/// e^x
#[inline]
pub fn exp(x: f64) -> f64 {
    x.exp()
}

/// e^x - 1, accurate near zero
#[inline]
pub fn expm1(x: f64) -> f64 {
    x.exp_m1()
}

/// Natural logarithm (NaN for negative input)
#[inline]
pub fn log(x: f64) -> f64 {
    x.ln()
}

/// Logarithm in an arbitrary base
#[inline]
pub fn log_base(x: f64, base: f64) -> f64 {
    x.ln() / base.ln()
}

/// Base-2 logarithm
#[inline]
pub fn log2(x: f64) -> f64 {
    x.log2()
}

/// Base-10 logarithm
#[inline]
pub fn log10(x: f64) -> f64 {
    x.log10()
}

/// ln(1 + x), accurate near zero
#[inline]
pub fn log1p(x: f64) -> f64 {
    x.ln_1p()
}

/// Sign: -1, 0 or 1 (NaN for NaN)
#[inline]
pub fn sign(x: f64) -> f64 {
    if x.is_nan() {
        f64::NAN
    } else if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Round toward zero
#[inline]
pub fn fix(x: f64) -> f64 {
    x.trunc()
}

/// sqrt(a² + b²) without intermediate overflow
#[inline]
pub fn hypot(a: f64, b: f64) -> f64 {
    a.hypot(b)
}

/// x²
#[inline]
pub fn square(x: f64) -> f64 {
    x * x
}

/// x³
#[inline]
pub fn cube(x: f64) -> f64 {
    x * x * x
}

/// Floored modulo on reals: result takes the sign of the divisor; `x mod 0 = x`
#[inline]
pub fn modulo_f64(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return a;
    }
    a - b * (a / b).floor()
}

// ============================================================================
// Integer number theory
// ============================================================================

#[inline]
fn abs_int<T: PrimInt>(a: T) -> T {
    if a < T::zero() { T::zero() - a } else { a }
}

/// Greatest common divisor (non-negative; `gcd(0, 0) = 0`)
pub fn gcd<T: PrimInt>(a: T, b: T) -> T {
    let mut a = abs_int(a);
    let mut b = abs_int(b);
    while b != T::zero() {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Least common multiple (0 if either operand is 0)
pub fn lcm<T: PrimInt>(a: T, b: T) -> T {
    if a == T::zero() || b == T::zero() {
        return T::zero();
    }
    abs_int(a / gcd(a, b) * b)
}

/// Mathematical modulo: result has the sign of the divisor; `x mod 0 = x`
pub fn modulo<T: PrimInt>(a: T, b: T) -> T {
    if b == T::zero() {
        return a;
    }
    let r = a % b;
    if r != T::zero() && ((r < T::zero()) != (b < T::zero())) {
        r + b
    } else {
        r
    }
}

/// Extended Euclid: returns `(g, x, y)` with `a*x + b*y = g`, `g >= 0`
pub fn xgcd<T: PrimInt + Signed>(a: T, b: T) -> (T, T, T) {
    let (mut old_r, mut r) = (a, b);
    let (mut old_s, mut s) = (T::one(), T::zero());
    let (mut old_t, mut t) = (T::zero(), T::one());
    while r != T::zero() {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
        (old_t, t) = (t, old_t - q * t);
    }
    if old_r < T::zero() {
        (-old_r, -old_s, -old_t)
    } else {
        (old_r, old_s, old_t)
    }
}

/// Modular inverse of `a` modulo `m`; `None` when they are not coprime
pub fn invmod<T: PrimInt + Signed>(a: T, m: T) -> Option<T> {
    if m == T::zero() {
        return None;
    }
    let (g, x, _) = xgcd(a, m);
    if g != T::one() {
        return None;
    }
    Some(modulo(x, abs_int(m)))
}

/// `base^exp mod m` by square-and-multiply with 128-bit intermediates
///
/// Returns `None` for `m == 0`.
pub fn powmod(base: u64, mut exp: u64, m: u64) -> Option<u64> {
    if m == 0 {
        return None;
    }
    if m == 1 {
        return Some(0);
    }
    let m128 = m as u128;
    let mut b = (base % m) as u128;
    let mut acc: u128 = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc * b % m128;
        }
        b = b * b % m128;
        exp >>= 1;
    }
    Some(acc as u64)
}
