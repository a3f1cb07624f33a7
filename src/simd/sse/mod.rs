//! SSE4.1 backend for 128-bit integer vectors.
//!
//! SSE2 already provides unaligned 128-bit loads, stores and packed add/sub;
//! SSE4.1 adds `pmulld` and signed 32-bit `pminsd`/`pmaxsd`, so it is the lowest
//! x86 level that covers every operation descriptor natively except division.
//!
//! # Architecture Requirements
//!
//! - **Target Architecture**: x86 or x86_64
//! - **Build detection**: compiled only when `build.rs` sets `cfg(sse)`

pub mod i32x4;

pub use i32x4::Sse41;
