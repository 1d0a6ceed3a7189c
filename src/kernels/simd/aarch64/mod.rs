//! ARM64 kernels

pub mod neon;
