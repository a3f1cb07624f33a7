//! Lane-parallel `i32` kernels.
//!
//! Each operation is a zero-sized descriptor (see [`ops`]) with one scalar rule
//! and one vector form per backend (see [`simd`]). The generic harnesses in
//! [`map`](mod@map), [`zip`](mod@zip) and [`reduce`](mod@reduce) drive them over
//! slices: full registers through the vector form, the tail through the scalar
//! rule, so every backend produces exactly the scalar result.
//! [`convolve`](mod@convolve) builds a 2-D convolution on top of the same pieces.
//!
//! Native backends are compiled in only when `build.rs` detects the matching CPU
//! feature on the build host; [`simd::Portable4`] and [`simd::Portable8`] are
//! always available. A native backend checks the running CPU each time the
//! harness enters it and panics if the feature is missing, so binaries built
//! with one must be run on machines that have it.

pub mod convolve;
pub mod error;
pub mod image;
pub mod map;
pub mod ops;
pub mod parallel;
pub mod reduce;
pub mod simd;
pub mod zip;

pub use convolve::{convolve, convolve3x3, convolve3x3_valid};
pub use error::{LanewiseError, Result};
pub use map::{map, map_in_place, square};
pub use parallel::{par_map, par_reduce, par_zip};
pub use reduce::{max, min, reduce, reduce_with, sum};
pub use zip::{add, div, max_elementwise, min_elementwise, mul, sub, zip};

/// Independent accumulators used by [`reduce()`].
pub const ACCUMULATOR_COUNT: usize = 4;

/// Below this many elements the `par_*` functions run sequentially.
pub const PARALLEL_THRESHOLD: usize = 1 << 15;

/// Elements handed to one rayon task.
pub const PARALLEL_CHUNK_SIZE: usize = 1 << 13;
