//! SSE4.1 4-lane i32 backend.
//!
//! Wraps the 128-bit `__m128i` register. Loads and stores are unaligned
//! (`_mm_loadu_si128` / `_mm_storeu_si128`), so any `i32` slice position works.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::{
    ops::{Add, Div, Max, Min, Mul, Square, Sub, Sum},
    simd::{
        traits::{Binary, BinaryVector, Isa, UnaryVector},
        utils::per_lane,
    },
};

/// Number of i32 elements that fit in an SSE 128-bit vector.
pub(crate) const LANE_COUNT: usize = 4;

/// SSE4.1 backend tag: 4 × i32 per `__m128i`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Sse41;

impl Isa for Sse41 {
    const LANES: usize = LANE_COUNT;

    type V = __m128i;

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn load(ptr: *const i32) -> __m128i {
        _mm_loadu_si128(ptr as *const __m128i)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn store(ptr: *mut i32, v: __m128i) {
        _mm_storeu_si128(ptr as *mut __m128i, v)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn splat(value: i32) -> __m128i {
        _mm_set1_epi32(value)
    }

    type Lanes = [i32; LANE_COUNT];

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn to_lanes(v: __m128i) -> [i32; LANE_COUNT] {
        let mut lanes = [0i32; LANE_COUNT];
        _mm_storeu_si128(lanes.as_mut_ptr() as *mut __m128i, v);
        lanes
    }

    #[inline]
    fn enter<R, F: FnOnce() -> R>(f: F) -> R {
        assert!(
            is_x86_feature_detected!("sse4.1"),
            "Sse41 backend used on a CPU without SSE4.1"
        );
        // SAFETY: support was just checked.
        unsafe { with_sse41(f) }
    }
}

/// Target-feature frame for [`Sse41::enter`]; `f` is inlined into it.
#[inline]
#[target_feature(enable = "sse4.1")]
unsafe fn with_sse41<R, F: FnOnce() -> R>(f: F) -> R {
    f()
}

impl BinaryVector<Sse41> for Add {
    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn vector(a: __m128i, b: __m128i) -> __m128i {
        _mm_add_epi32(a, b)
    }
}

impl BinaryVector<Sse41> for Sub {
    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn vector(a: __m128i, b: __m128i) -> __m128i {
        _mm_sub_epi32(a, b)
    }
}

impl BinaryVector<Sse41> for Mul {
    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn vector(a: __m128i, b: __m128i) -> __m128i {
        _mm_mullo_epi32(a, b)
    }
}

// No packed integer divide in SSE.
impl BinaryVector<Sse41> for Div {
    #[inline]
    unsafe fn vector(a: __m128i, b: __m128i) -> __m128i {
        per_lane::<Sse41>(a, b, <Div as Binary>::scalar)
    }
}

impl BinaryVector<Sse41> for Min {
    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn vector(a: __m128i, b: __m128i) -> __m128i {
        _mm_min_epi32(a, b)
    }
}

impl BinaryVector<Sse41> for Max {
    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn vector(a: __m128i, b: __m128i) -> __m128i {
        _mm_max_epi32(a, b)
    }
}

impl BinaryVector<Sse41> for Sum {
    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn vector(a: __m128i, b: __m128i) -> __m128i {
        _mm_add_epi32(a, b)
    }
}

impl UnaryVector<Sse41> for Square {
    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn vector(a: __m128i) -> __m128i {
        _mm_mullo_epi32(a, a)
    }
}
