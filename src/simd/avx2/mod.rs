//! AVX2 backend for 256-bit integer vectors.
//!
//! AVX2 is available on Intel processors since Haswell (2013) and AMD processors
//! since Excavator (2015). It brings 256-bit packed 32-bit integer add, subtract,
//! low multiply and min/max, which is everything the operation descriptors need
//! except division.
//!
//! # Architecture Requirements
//!
//! - **Target Architecture**: x86 or x86_64
//! - **Build detection**: compiled only when `build.rs` sets `cfg(avx2)`
//!
//! # Available Types
//!
//! - [`Avx2`](i32x8::Avx2): 8 packed `i32` lanes in one `__m256i`

pub mod i32x8;

pub use i32x8::Avx2;
