//! Multi-accumulator reduction harness.
//!
//! The main loop keeps `K` independent vector accumulators so that consecutive
//! loads do not serialize on a single register dependency chain. After the main
//! loop the accumulators are merged, leftover full vectors are folded in, the
//! register is reduced horizontally and finally the scalar tail is folded.

use crate::{
    ops::{Max, Min, Sum},
    simd::{
        traits::{BinaryVector, Isa, Reduction},
        utils::horizontal,
    },
    ACCUMULATOR_COUNT,
};

/// Reduces `src` under `O` using `K` vector accumulators.
///
/// The result does not depend on `K`: every supported reduction is associative
/// and commutative. An empty slice yields `O::IDENTITY`.
///
/// # Panics
///
/// Panics if `K == 0`, or with a native backend if the running CPU lacks its
/// instruction set.
#[inline]
pub fn reduce_with<I, O, const K: usize>(src: &[i32]) -> i32
where
    I: Isa,
    O: Reduction + BinaryVector<I>,
{
    assert!(K > 0, "at least one accumulator is required");

    let lanes = I::LANES;

    // SAFETY: every load reads a sub-slice of `src` holding at least LANES elements;
    // `enter` checked that the CPU supports the backend.
    I::enter(|| unsafe {
        let mut accumulators = [I::splat(O::IDENTITY); K];

        let mut blocks = src.chunks_exact(K * lanes);
        for block in &mut blocks {
            for (j, acc) in accumulators.iter_mut().enumerate() {
                *acc = O::vector(*acc, I::load(block.as_ptr().add(j * lanes)));
            }
        }

        let mut accumulator = accumulators[0];
        for acc in &accumulators[1..] {
            accumulator = O::vector(accumulator, *acc);
        }

        let mut vectors = blocks.remainder().chunks_exact(lanes);
        for v in &mut vectors {
            accumulator = O::vector(accumulator, I::load(v.as_ptr()));
        }

        let result = horizontal::<I>(accumulator, O::scalar);

        vectors
            .remainder()
            .iter()
            .fold(result, |acc, &x| O::scalar(acc, x))
    })
}

/// Reduces `src` under `O` with [`ACCUMULATOR_COUNT`] accumulators.
///
/// # Examples
///
/// ```rust
/// use lanewise::{reduce, ops::Sum, simd::Portable8};
///
/// let src = [1, 2, 3, 4, 5, 6, 7, 8, 9];
/// assert_eq!(reduce::<Portable8, Sum>(&src), 45);
/// ```
#[inline]
pub fn reduce<I, O>(src: &[i32]) -> i32
where
    I: Isa,
    O: Reduction + BinaryVector<I>,
{
    reduce_with::<I, O, ACCUMULATOR_COUNT>(src)
}

/// Wrapping sum of `src`; `0` when empty.
#[inline]
pub fn sum<I>(src: &[i32]) -> i32
where
    I: Isa,
    Sum: BinaryVector<I>,
{
    reduce::<I, Sum>(src)
}

/// Smallest element of `src`; `i32::MAX` when empty.
#[inline]
pub fn min<I>(src: &[i32]) -> i32
where
    I: Isa,
    Min: BinaryVector<I>,
{
    reduce::<I, Min>(src)
}

/// Largest element of `src`; `i32::MIN` when empty.
#[inline]
pub fn max<I>(src: &[i32]) -> i32
where
    I: Isa,
    Max: BinaryVector<I>,
{
    reduce::<I, Max>(src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::portable::{Portable4, Portable8};

    #[test]
    fn test_one_to_nine() {
        let src = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        assert_eq!(sum::<Portable8>(&src), 45);
        assert_eq!(min::<Portable8>(&src), 1);
        assert_eq!(max::<Portable8>(&src), 9);
    }

    #[test]
    fn test_empty_yields_identity() {
        assert_eq!(sum::<Portable4>(&[]), 0);
        assert_eq!(min::<Portable4>(&[]), i32::MAX);
        assert_eq!(max::<Portable4>(&[]), i32::MIN);
    }

    #[test]
    fn test_accumulator_count_does_not_change_result() {
        let src: Vec<i32> = (0..1000).map(|i| (i * 7919) % 1013 - 500).collect();
        let expected: i32 = src.iter().sum();

        for n in [0, 1, 3, 4, 5, 31, 32, 33, 127, 1000] {
            let slice = &src[..n];
            let expected_n: i32 = slice.iter().sum();
            assert_eq!(reduce_with::<Portable4, Sum, 1>(slice), expected_n);
            assert_eq!(reduce_with::<Portable4, Sum, 2>(slice), expected_n);
            assert_eq!(reduce_with::<Portable8, Sum, 3>(slice), expected_n);
            assert_eq!(reduce_with::<Portable8, Sum, 8>(slice), expected_n);
        }
        assert_eq!(sum::<Portable8>(&src), expected);
    }

    #[test]
    fn test_extremes_sit_in_tail() {
        // 8 * 4 + 8 + 3 elements: main loop, one leftover vector, scalar tail
        let mut src = vec![0; 43];
        src[42] = -9;
        src[41] = 9;
        assert_eq!(min::<Portable8>(&src), -9);
        assert_eq!(max::<Portable8>(&src), 9);

        src[35] = -10;
        assert_eq!(min::<Portable8>(&src), -10);
    }

    #[test]
    fn test_sum_wraps() {
        let src = [i32::MAX; 10];
        let expected = src.iter().fold(0i32, |acc, &x| acc.wrapping_add(x));
        assert_eq!(sum::<Portable4>(&src), expected);
    }

    #[test]
    #[should_panic(expected = "at least one accumulator")]
    fn test_zero_accumulators_rejected() {
        reduce_with::<Portable4, Sum, 0>(&[1, 2, 3]);
    }
}
