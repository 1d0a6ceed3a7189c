//! CSC (Compressed Sparse Column) format

mod conversion;
mod core;
mod matmul;

pub use core::CscMatrix;
