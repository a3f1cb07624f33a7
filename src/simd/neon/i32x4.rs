//! NEON 4-lane i32 backend.
//!
//! Wraps the 128-bit `int32x4_t` register. `vld1q_s32` / `vst1q_s32` only need
//! element alignment, which every `i32` pointer has.

use std::arch::aarch64::*;

use crate::{
    ops::{Add, Div, Max, Min, Mul, Square, Sub, Sum},
    simd::{
        traits::{Binary, BinaryVector, Isa, UnaryVector},
        utils::per_lane,
    },
};

/// Number of i32 elements that fit in a NEON 128-bit vector.
pub(crate) const LANE_COUNT: usize = 4;

/// NEON backend tag: 4 × i32 per `int32x4_t`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Neon;

impl Isa for Neon {
    const LANES: usize = LANE_COUNT;

    type V = int32x4_t;

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn load(ptr: *const i32) -> int32x4_t {
        vld1q_s32(ptr)
    }

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn store(ptr: *mut i32, v: int32x4_t) {
        vst1q_s32(ptr, v)
    }

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn splat(value: i32) -> int32x4_t {
        vdupq_n_s32(value)
    }

    type Lanes = [i32; LANE_COUNT];

    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn to_lanes(v: int32x4_t) -> [i32; LANE_COUNT] {
        let mut lanes = [0i32; LANE_COUNT];
        vst1q_s32(lanes.as_mut_ptr(), v);
        lanes
    }

    #[inline]
    fn enter<R, F: FnOnce() -> R>(f: F) -> R {
        assert!(
            std::arch::is_aarch64_feature_detected!("neon"),
            "Neon backend used on a CPU without NEON"
        );
        // SAFETY: support was just checked.
        unsafe { with_neon(f) }
    }
}

/// Target-feature frame for [`Neon::enter`]; `f` is inlined into it.
#[inline]
#[target_feature(enable = "neon")]
unsafe fn with_neon<R, F: FnOnce() -> R>(f: F) -> R {
    f()
}

impl BinaryVector<Neon> for Add {
    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn vector(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        vaddq_s32(a, b)
    }
}

impl BinaryVector<Neon> for Sub {
    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn vector(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        vsubq_s32(a, b)
    }
}

impl BinaryVector<Neon> for Mul {
    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn vector(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        vmulq_s32(a, b)
    }
}

// NEON has no integer divide.
impl BinaryVector<Neon> for Div {
    #[inline]
    unsafe fn vector(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        per_lane::<Neon>(a, b, <Div as Binary>::scalar)
    }
}

impl BinaryVector<Neon> for Min {
    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn vector(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        vminq_s32(a, b)
    }
}

impl BinaryVector<Neon> for Max {
    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn vector(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        vmaxq_s32(a, b)
    }
}

impl BinaryVector<Neon> for Sum {
    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn vector(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        vaddq_s32(a, b)
    }
}

impl UnaryVector<Neon> for Square {
    #[inline]
    #[target_feature(enable = "neon")]
    unsafe fn vector(a: int32x4_t) -> int32x4_t {
        vmulq_s32(a, a)
    }
}
