//! Elementwise array kernels over flat buffers
//!
//! Binary kernels write into a caller-provided output of the same length.
//! Reductions (`sum`, `dot`) and `axpy` go through [`Element`]'s SIMD hooks.

use crate::buffer::check_len;
use crate::dtype::Element;
use crate::error::Result;

/// Binary elementwise operation
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// a + b
    Add,
    /// a - b
    Sub,
    /// a * b
    Mul,
    /// a / b
    Div,
}

impl BinaryOp {
    #[inline(always)]
    fn apply<T: Element>(self, a: T, b: T) -> T {
        match self {
            Self::Add => a + b,
            Self::Sub => a - b,
            Self::Mul => a * b,
            Self::Div => a / b,
        }
    }
}

/// Unary elementwise operation, evaluated in f64
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// |x|
    Abs,
    /// -x
    Neg,
    /// x²
    Square,
    /// √x
    Sqrt,
    /// ∛x
    Cbrt,
    /// e^x
    Exp,
    /// e^x - 1
    Expm1,
    /// ln x
    Log,
    /// ln(1 + x)
    Log1p,
    /// log₂ x
    Log2,
    /// log₁₀ x
    Log10,
    /// sin x
    Sin,
    /// cos x
    Cos,
    /// tan x
    Tan,
    /// tanh x
    Tanh,
    /// -1, 0 or 1
    Sign,
    /// Round toward zero
    Fix,
    /// 1 / x
    Recip,
}

impl UnaryOp {
    /// Apply to a single value
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        use super::arith;
        match self {
            Self::Abs => x.abs(),
            Self::Neg => -x,
            Self::Square => x * x,
            Self::Sqrt => x.sqrt(),
            Self::Cbrt => x.cbrt(),
            Self::Exp => x.exp(),
            Self::Expm1 => x.exp_m1(),
            Self::Log => x.ln(),
            Self::Log1p => x.ln_1p(),
            Self::Log2 => x.log2(),
            Self::Log10 => x.log10(),
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Tanh => x.tanh(),
            Self::Sign => arith::sign(x),
            Self::Fix => x.trunc(),
            Self::Recip => 1.0 / x,
        }
    }
}

/// `out[i] = op(a[i], b[i])`
pub fn binary_into<T: Element>(op: BinaryOp, a: &[T], b: &[T], out: &mut [T]) -> Result<()> {
    check_len(a.len(), b.len())?;
    check_len(a.len(), out.len())?;
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = op.apply(x, y);
    }
    Ok(())
}

/// Elementwise sum into `out`
#[inline]
pub fn add_into<T: Element>(a: &[T], b: &[T], out: &mut [T]) -> Result<()> {
    binary_into(BinaryOp::Add, a, b, out)
}

/// Elementwise difference into `out`
#[inline]
pub fn sub_into<T: Element>(a: &[T], b: &[T], out: &mut [T]) -> Result<()> {
    binary_into(BinaryOp::Sub, a, b, out)
}

/// Elementwise product into `out`
#[inline]
pub fn mul_into<T: Element>(a: &[T], b: &[T], out: &mut [T]) -> Result<()> {
    binary_into(BinaryOp::Mul, a, b, out)
}

/// Elementwise quotient into `out`
#[inline]
pub fn div_into<T: Element>(a: &[T], b: &[T], out: &mut [T]) -> Result<()> {
    binary_into(BinaryOp::Div, a, b, out)
}

/// `out[i] = op(a[i])`
pub fn unary_into<T: Element>(op: UnaryOp, a: &[T], out: &mut [T]) -> Result<()> {
    check_len(a.len(), out.len())?;
    for (o, &x) in out.iter_mut().zip(a) {
        *o = T::from_f64(op.apply(x.to_f64()));
    }
    Ok(())
}

/// Apply `op` in place
pub fn unary_inplace<T: Element>(op: UnaryOp, a: &mut [T]) {
    for x in a.iter_mut() {
        *x = T::from_f64(op.apply(x.to_f64()));
    }
}

/// `x *= alpha`
#[inline]
pub fn scale<T: Element>(alpha: T, x: &mut [T]) {
    for v in x.iter_mut() {
        *v *= alpha;
    }
}

/// `y += alpha * x`
#[inline]
pub fn axpy<T: Element>(alpha: T, x: &[T], y: &mut [T]) -> Result<()> {
    check_len(x.len(), y.len())?;
    T::axpy(alpha, x, y);
    Ok(())
}

/// Sum of all elements
#[inline]
pub fn sum<T: Element>(a: &[T]) -> T {
    T::sum(a)
}

/// Inner product
#[inline]
pub fn dot<T: Element>(a: &[T], b: &[T]) -> Result<T> {
    check_len(a.len(), b.len())?;
    Ok(T::dot(a, b))
}
