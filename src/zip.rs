//! Binary elementwise harness.

use crate::{
    error::{ensure_destination, length_mismatch, Result},
    ops::{Add, Div, Max, Min, Mul, Sub},
    simd::traits::{BinaryVector, Isa},
};

/// Combines `lhs` and `rhs` elementwise, writing `dst[i] = O::scalar(lhs[i], rhs[i])`.
///
/// Chunking follows [`map`](crate::map::map): one register from each source per
/// step while `I::LANES` elements remain, then the scalar form for the tail.
///
/// # Errors
///
/// Checked in this order, before anything is written:
///
/// - `LengthMismatch` if `lhs.len() != rhs.len()`
/// - `DestinationTooShort` if `dst.len() < lhs.len()`
/// - whatever `O::validate` reports (`DivisionByZero` for [`Div`])
#[inline]
pub fn zip<I, O>(lhs: &[i32], rhs: &[i32], dst: &mut [i32]) -> Result<()>
where
    I: Isa,
    O: BinaryVector<I>,
{
    if lhs.len() != rhs.len() {
        return Err(length_mismatch(lhs.len(), rhs.len()));
    }

    let n = lhs.len();
    ensure_destination(n, dst)?;
    O::validate(lhs, rhs)?;

    zip_kernel::<I, O>(lhs, rhs, &mut dst[..n]);
    Ok(())
}

/// Vector loop plus scalar tail over equally long, already validated operands.
#[inline]
pub(crate) fn zip_kernel<I, O>(lhs: &[i32], rhs: &[i32], dst: &mut [i32])
where
    I: Isa,
    O: BinaryVector<I>,
{
    debug_assert!(lhs.len() == rhs.len() && lhs.len() == dst.len());

    I::enter(|| {
        let mut lhs_chunks = lhs.chunks_exact(I::LANES);
        let mut rhs_chunks = rhs.chunks_exact(I::LANES);
        let mut dst_chunks = dst.chunks_exact_mut(I::LANES);

        for ((a, b), c) in (&mut lhs_chunks)
            .zip(&mut rhs_chunks)
            .zip(&mut dst_chunks)
        {
            // SAFETY: every chunk holds exactly LANES elements.
            unsafe {
                let v = O::vector(I::load(a.as_ptr()), I::load(b.as_ptr()));
                I::store(c.as_mut_ptr(), v);
            }
        }

        for ((a, b), c) in lhs_chunks
            .remainder()
            .iter()
            .zip(rhs_chunks.remainder())
            .zip(dst_chunks.into_remainder())
        {
            *c = O::scalar(*a, *b);
        }
    })
}

/// `dst[i] = lhs[i] + rhs[i]` (wrapping).
#[inline]
pub fn add<I>(lhs: &[i32], rhs: &[i32], dst: &mut [i32]) -> Result<()>
where
    I: Isa,
    Add: BinaryVector<I>,
{
    zip::<I, Add>(lhs, rhs, dst)
}

/// `dst[i] = lhs[i] - rhs[i]` (wrapping).
#[inline]
pub fn sub<I>(lhs: &[i32], rhs: &[i32], dst: &mut [i32]) -> Result<()>
where
    I: Isa,
    Sub: BinaryVector<I>,
{
    zip::<I, Sub>(lhs, rhs, dst)
}

/// `dst[i] = lhs[i] * rhs[i]` (low 32 bits).
#[inline]
pub fn mul<I>(lhs: &[i32], rhs: &[i32], dst: &mut [i32]) -> Result<()>
where
    I: Isa,
    Mul: BinaryVector<I>,
{
    zip::<I, Mul>(lhs, rhs, dst)
}

/// `dst[i] = lhs[i] / rhs[i]`, truncating toward zero.
///
/// Any zero in `rhs` yields `DivisionByZero` with the index of the first one and
/// leaves `dst` untouched.
#[inline]
pub fn div<I>(lhs: &[i32], rhs: &[i32], dst: &mut [i32]) -> Result<()>
where
    I: Isa,
    Div: BinaryVector<I>,
{
    zip::<I, Div>(lhs, rhs, dst)
}

#[inline]
pub fn min_elementwise<I>(lhs: &[i32], rhs: &[i32], dst: &mut [i32]) -> Result<()>
where
    I: Isa,
    Min: BinaryVector<I>,
{
    zip::<I, Min>(lhs, rhs, dst)
}

#[inline]
pub fn max_elementwise<I>(lhs: &[i32], rhs: &[i32], dst: &mut [i32]) -> Result<()>
where
    I: Isa,
    Max: BinaryVector<I>,
{
    zip::<I, Max>(lhs, rhs, dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::LanewiseError,
        simd::portable::{Portable4, Portable8},
    };

    #[test]
    fn test_add_sub_mul() {
        let a: Vec<i32> = (0..13).collect();
        let b: Vec<i32> = (0..13).map(|x| 3 - x).collect();
        let mut out = vec![0; 13];

        add::<Portable4>(&a, &b, &mut out).unwrap();
        assert!(out.iter().all(|&x| x == 3));

        sub::<Portable8>(&a, &b, &mut out).unwrap();
        let expected: Vec<i32> = (0..13).map(|x| 2 * x - 3).collect();
        assert_eq!(out, expected);

        mul::<Portable8>(&a, &b, &mut out).unwrap();
        let expected: Vec<i32> = (0..13).map(|x| x * (3 - x)).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_min_max_elementwise() {
        let a = [1, 9, -4, 7, 0];
        let b = [3, 2, -5, 7, -1];
        let mut out = [0; 5];

        min_elementwise::<Portable4>(&a, &b, &mut out).unwrap();
        assert_eq!(out, [1, 2, -5, 7, -1]);

        max_elementwise::<Portable4>(&a, &b, &mut out).unwrap();
        assert_eq!(out, [3, 9, -4, 7, 0]);
    }

    #[test]
    fn test_length_mismatch() {
        let mut out = [0; 4];
        assert_eq!(
            add::<Portable4>(&[1, 2, 3, 4], &[1, 2, 3], &mut out),
            Err(LanewiseError::LengthMismatch { left: 4, right: 3 })
        );
    }

    #[test]
    fn test_division_by_zero_leaves_destination() {
        let a = [10, 20, 30, 40, 50, 60, 70, 80, 90];
        let b = [1, 2, 3, 4, 5, 6, 7, 8, 0];
        let mut out = [-1; 9];

        assert_eq!(
            div::<Portable8>(&a, &b, &mut out),
            Err(LanewiseError::DivisionByZero { index: 8 })
        );
        assert_eq!(out, [-1; 9]);
    }

    #[test]
    fn test_division() {
        let a = [7, -7, 7, -7, i32::MIN];
        let b = [2, 2, -2, -2, -1];
        let mut out = [0; 5];
        div::<Portable4>(&a, &b, &mut out).unwrap();
        assert_eq!(out, [3, -3, -3, 3, i32::MIN]);
    }
}
