use crate::simd::traits::Isa;

/// Applies `f` lane by lane through the backend's [`Isa::Lanes`] buffer.
///
/// Used for operations that have no native instruction (integer division).
///
/// # Safety
///
/// The CPU must support the instruction set of `I`.
#[inline(always)]
pub(crate) unsafe fn per_lane<I: Isa>(a: I::V, b: I::V, f: impl Fn(i32, i32) -> i32) -> I::V {
    let mut lhs = I::to_lanes(a);
    let rhs = I::to_lanes(b);

    for (l, r) in lhs.as_mut().iter_mut().zip(rhs.as_ref()) {
        *l = f(*l, *r);
    }

    I::load(lhs.as_ref().as_ptr())
}

/// Folds the lanes of `v` left to right with `f`.
///
/// # Safety
///
/// The CPU must support the instruction set of `I`.
#[inline(always)]
pub(crate) unsafe fn horizontal<I: Isa>(v: I::V, f: impl Fn(i32, i32) -> i32) -> i32 {
    let lanes = I::to_lanes(v);
    let (first, rest) = lanes.as_ref().split_at(1);

    rest.iter().fold(first[0], |acc, &x| f(acc, x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::portable::{Portable, Portable4, Portable8};

    #[test]
    fn test_per_lane_matches_scalar() {
        let a = [10, -20, 30, 41];
        let b = [3, 4, -5, 2];
        let out = unsafe {
            per_lane::<Portable4>(
                Portable4::load(a.as_ptr()),
                Portable4::load(b.as_ptr()),
                |x, y| x / y,
            )
        };
        assert_eq!(out, [3, -5, -6, 20]);
    }

    #[test]
    fn test_horizontal_is_left_to_right() {
        let a = [1, 2, 3, 4, 5, 6, 7, 8];
        // subtraction exposes the fold order
        let result = unsafe { horizontal::<Portable8>(Portable8::load(a.as_ptr()), |x, y| x - y) };
        assert_eq!(result, 1 - 2 - 3 - 4 - 5 - 6 - 7 - 8);
    }

    #[test]
    fn test_helpers_on_wide_register() {
        let a: Vec<i32> = (1..=32).collect();
        let b = vec![2; 32];

        unsafe {
            let va = Portable::<32>::load(a.as_ptr());
            let vb = Portable::<32>::load(b.as_ptr());

            let halves = per_lane::<Portable<32>>(va, vb, |x, y| x / y);
            let expected: Vec<i32> = (1..=32).map(|x| x / 2).collect();
            assert_eq!(&halves[..], &expected[..]);

            assert_eq!(horizontal::<Portable<32>>(va, |x, y| x + y), 528);
        }
    }
}
