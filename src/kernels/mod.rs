//! Low-level kernels: scalar arithmetic, elementwise arrays, complex arrays,
//! matrix multiplication and SIMD dispatch

pub mod arith;
pub mod complex;
pub mod elementwise;
pub mod matmul;
pub mod simd;

pub use matmul::{matmul, matmul_blocked_into, matmul_into, matvec_into};
pub use simd::{SimdLevel, detect_simd};
