//! Portable backends over plain `[i32; N]` registers.
//!
//! These compile on every target and leave instruction selection to the
//! auto-vectorizer. They are the reference each native backend is tested against,
//! and `Portable<16>` or `Portable<32>` show that a wider variant plugs into the
//! harness unchanged.

use crate::{
    ops::{Add, Div, Max, Min, Mul, Square, Sub, Sum},
    simd::traits::{Binary, BinaryVector, Isa, Unary, UnaryVector},
};

/// An `N`-lane backend whose register is an `[i32; N]`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Portable<const N: usize>;

/// 4-lane portable backend.
pub type Portable4 = Portable<4>;

/// 8-lane portable backend.
pub type Portable8 = Portable<8>;

impl<const N: usize> Isa for Portable<N> {
    const LANES: usize = N;

    type V = [i32; N];

    #[inline(always)]
    unsafe fn load(ptr: *const i32) -> Self::V {
        ptr.cast::<[i32; N]>().read_unaligned()
    }

    #[inline(always)]
    unsafe fn store(ptr: *mut i32, v: Self::V) {
        ptr.cast::<[i32; N]>().write_unaligned(v)
    }

    #[inline(always)]
    unsafe fn splat(value: i32) -> Self::V {
        [value; N]
    }

    type Lanes = [i32; N];

    #[inline(always)]
    unsafe fn to_lanes(v: Self::V) -> Self::Lanes {
        v
    }

    #[inline(always)]
    fn enter<R, F: FnOnce() -> R>(f: F) -> R {
        f()
    }
}

#[inline(always)]
fn lanes<const N: usize>(a: [i32; N], b: [i32; N], f: impl Fn(i32, i32) -> i32) -> [i32; N] {
    std::array::from_fn(|j| f(a[j], b[j]))
}

macro_rules! portable_binary {
    ($($op:ty),* $(,)?) => {
        $(
            impl<const N: usize> BinaryVector<Portable<N>> for $op {
                #[inline(always)]
                unsafe fn vector(a: [i32; N], b: [i32; N]) -> [i32; N] {
                    lanes(a, b, <$op as Binary>::scalar)
                }
            }
        )*
    };
}

portable_binary!(Add, Sub, Mul, Div, Min, Max, Sum);

impl<const N: usize> UnaryVector<Portable<N>> for Square {
    #[inline(always)]
    unsafe fn vector(a: [i32; N]) -> [i32; N] {
        a.map(<Square as Unary>::scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_store_unaligned_offsets() {
        let data: Vec<i32> = (0..20).collect();
        let mut out = [0i32; 8];

        for offset in 0..data.len() - 8 {
            unsafe {
                let v = Portable8::load(data.as_ptr().add(offset));
                Portable8::store(out.as_mut_ptr(), v);
            }
            assert_eq!(&out[..], &data[offset..offset + 8]);
        }
    }

    #[test]
    fn test_vector_forms_match_scalar() {
        let a = [i32::MIN, -7, 0, 9];
        let b = [-1, 2, 5, -3];

        unsafe {
            assert_eq!(<Add as BinaryVector<Portable4>>::vector(a, b), [i32::MAX, -5, 5, 6]);
            assert_eq!(<Div as BinaryVector<Portable4>>::vector(a, b), [i32::MIN, -3, 0, -3]);
            assert_eq!(<Min as BinaryVector<Portable4>>::vector(a, b), [i32::MIN, -7, 0, -3]);
            assert_eq!(<Square as UnaryVector<Portable4>>::vector(b), [1, 4, 25, 9]);
        }
    }

    #[test]
    fn test_wide_backend_lane_count() {
        assert_eq!(<Portable<16> as Isa>::LANES, 16);
        let v = unsafe { Portable::<16>::splat(3) };
        assert_eq!(v, [3; 16]);

        assert_eq!(<Portable<64> as Isa>::LANES, 64);
        let wide = unsafe { Portable::<64>::to_lanes(Portable::<64>::splat(-1)) };
        assert!(wide.iter().all(|&x| x == -1));
    }
}
