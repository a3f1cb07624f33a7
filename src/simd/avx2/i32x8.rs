//! AVX2 8-lane i32 backend.
//!
//! Wraps the 256-bit `__m256i` register. Loads and stores are unaligned
//! (`_mm256_loadu_si256` / `_mm256_storeu_si256`), so any `i32` slice position works.

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

/// Number of i32 elements that fit in an AVX2 256-bit vector.
pub(crate) const LANE_COUNT: usize = 8;

/// AVX2 backend tag: 8 × i32 per `__m256i`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Avx2;

impl Isa for Avx2 {
    const LANES: usize = LANE_COUNT;

    type V = __m256i;

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn load(ptr: *const i32) -> __m256i {
        _mm256_loadu_si256(ptr as *const __m256i)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn store(ptr: *mut i32, v: __m256i) {
        _mm256_storeu_si256(ptr as *mut __m256i, v)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn splat(value: i32) -> __m256i {
        _mm256_set1_epi32(value)
    }

    type Lanes = [i32; LANE_COUNT];

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn to_lanes(v: __m256i) -> [i32; LANE_COUNT] {
        let mut lanes = [0i32; LANE_COUNT];
        _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, v);
        lanes
    }

    #[inline]
    fn enter<R, F: FnOnce() -> R>(f: F) -> R {
        assert!(
            is_x86_feature_detected!("avx2"),
            "Avx2 backend used on a CPU without AVX2"
        );
        // SAFETY: support was just checked.
        unsafe { with_avx2(f) }
    }
}

/// Target-feature frame for [`Avx2::enter`]; `f` is inlined into it.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn with_avx2<R, F: FnOnce() -> R>(f: F) -> R {
    f()
}

impl BinaryVector<Avx2> for Add {
    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn vector(a: __m256i, b: __m256i) -> __m256i {
        _mm256_add_epi32(a, b)
    }
}

impl BinaryVector<Avx2> for Sub {
    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn vector(a: __m256i, b: __m256i) -> __m256i {
        _mm256_sub_epi32(a, b)
    }
}

impl BinaryVector<Avx2> for Mul {
    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn vector(a: __m256i, b: __m256i) -> __m256i {
        _mm256_mullo_epi32(a, b)
    }
}

// No packed integer divide in AVX2.
impl BinaryVector<Avx2> for Div {
    #[inline]
    unsafe fn vector(a: __m256i, b: __m256i) -> __m256i {
        per_lane::<Avx2>(a, b, <Div as Binary>::scalar)
    }
}

impl BinaryVector<Avx2> for Min {
    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn vector(a: __m256i, b: __m256i) -> __m256i {
        _mm256_min_epi32(a, b)
    }
}

impl BinaryVector<Avx2> for Max {
    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn vector(a: __m256i, b: __m256i) -> __m256i {
        _mm256_max_epi32(a, b)
    }
}

impl BinaryVector<Avx2> for Sum {
    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn vector(a: __m256i, b: __m256i) -> __m256i {
        _mm256_add_epi32(a, b)
    }
}

impl UnaryVector<Avx2> for Square {
    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn vector(a: __m256i) -> __m256i {
        _mm256_mullo_epi32(a, a)
    }
}
