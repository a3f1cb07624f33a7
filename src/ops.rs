//! Operation descriptors.
//!
//! Each operation is a zero-sized type carrying its scalar rule here; the vector
//! rule lives next to each backend (`simd::portable`, `simd::sse`, `simd::avx2`,
//! `simd::neon`). All arithmetic wraps on overflow so that the scalar rule agrees
//! bit for bit with the vector lanes.

use crate::{
    error::{LanewiseError, Result},
    simd::traits::{Binary, Reduction, Unary},
};

/// Elementwise addition.
#[derive(Copy, Clone, Debug, Default)]
pub struct Add;

/// Elementwise subtraction.
#[derive(Copy, Clone, Debug, Default)]
pub struct Sub;

/// Elementwise multiplication, keeping the low 32 bits of the product.
#[derive(Copy, Clone, Debug, Default)]
pub struct Mul;

/// Elementwise truncating division.
///
/// A zero divisor is rejected by [`Binary::validate`] before any write, and
/// panics if the scalar rule is ever reached with one. `i32::MIN / -1` wraps to
/// `i32::MIN`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Div;

/// Elementwise square.
#[derive(Copy, Clone, Debug, Default)]
pub struct Square;

/// Minimum; identity `i32::MAX`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Min;

/// Maximum; identity `i32::MIN`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Max;

/// Wrapping sum; identity `0`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Sum;

impl Binary for Add {
    #[inline(always)]
    fn scalar(a: i32, b: i32) -> i32 {
        a.wrapping_add(b)
    }
}

impl Binary for Sub {
    #[inline(always)]
    fn scalar(a: i32, b: i32) -> i32 {
        a.wrapping_sub(b)
    }
}

impl Binary for Mul {
    #[inline(always)]
    fn scalar(a: i32, b: i32) -> i32 {
        a.wrapping_mul(b)
    }
}

impl Binary for Div {
    #[inline(always)]
    fn scalar(a: i32, b: i32) -> i32 {
        assert!(b != 0, "integer division by zero");
        a.wrapping_div(b)
    }

    fn validate(_lhs: &[i32], rhs: &[i32]) -> Result<()> {
        match rhs.iter().position(|&b| b == 0) {
            Some(index) => {
                log::debug!("rejecting division: zero divisor at index {index}");
                Err(LanewiseError::DivisionByZero { index })
            }
            None => Ok(()),
        }
    }
}

impl Unary for Square {
    #[inline(always)]
    fn scalar(a: i32) -> i32 {
        a.wrapping_mul(a)
    }
}

impl Binary for Min {
    #[inline(always)]
    fn scalar(a: i32, b: i32) -> i32 {
        a.min(b)
    }
}

impl Reduction for Min {
    const IDENTITY: i32 = i32::MAX;
}

impl Binary for Max {
    #[inline(always)]
    fn scalar(a: i32, b: i32) -> i32 {
        a.max(b)
    }
}

impl Reduction for Max {
    const IDENTITY: i32 = i32::MIN;
}

impl Binary for Sum {
    #[inline(always)]
    fn scalar(a: i32, b: i32) -> i32 {
        a.wrapping_add(b)
    }
}

impl Reduction for Sum {
    const IDENTITY: i32 = 0;
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [i32; 9] = [i32::MIN, i32::MIN + 1, -1000, -1, 0, 1, 7, 1000, i32::MAX];

    fn identity_holds<R: Reduction>() {
        for &x in &SAMPLES {
            assert_eq!(R::scalar(R::IDENTITY, x), x);
            assert_eq!(R::scalar(x, R::IDENTITY), x);
        }
    }

    #[test]
    fn test_reduction_identities() {
        identity_holds::<Min>();
        identity_holds::<Max>();
        identity_holds::<Sum>();
    }

    #[test]
    fn test_wrapping_arithmetic() {
        assert_eq!(Add::scalar(i32::MAX, 1), i32::MIN);
        assert_eq!(Sub::scalar(i32::MIN, 1), i32::MAX);
        assert_eq!(Mul::scalar(65536, 65536), 0);
        assert_eq!(Square::scalar(-46341), (-46341i32).wrapping_mul(-46341));
        assert_eq!(Div::scalar(i32::MIN, -1), i32::MIN);
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        assert_eq!(Div::scalar(7, 2), 3);
        assert_eq!(Div::scalar(-7, 2), -3);
        assert_eq!(Div::scalar(7, -2), -3);
    }

    #[test]
    #[should_panic(expected = "integer division by zero")]
    fn test_division_by_zero_panics() {
        Div::scalar(1, 0);
    }

    #[test]
    fn test_division_validation_reports_first_zero() {
        assert_eq!(Div::validate(&[1, 2, 3], &[1, 2, 3]), Ok(()));
        assert_eq!(
            Div::validate(&[1, 2, 3, 4], &[5, 0, 1, 0]),
            Err(LanewiseError::DivisionByZero { index: 1 })
        );
    }
}
