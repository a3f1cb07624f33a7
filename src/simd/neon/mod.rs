//! ARM NEON backend for 128-bit integer vectors.
//!
//! NEON (Advanced SIMD) is mandatory on every AArch64 processor, including Apple
//! Silicon and AWS Graviton, so on those targets this backend is always usable.
//!
//! # Architecture Requirements
//!
//! - **Target Architecture**: AArch64
//! - **Build detection**: compiled only when `build.rs` sets `cfg(neon)`
//!
//! # Available Types
//!
//! - [`Neon`](i32x4::Neon): 4 packed `i32` lanes in one `int32x4_t`

pub mod i32x4;

pub use i32x4::Neon;
