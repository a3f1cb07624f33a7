//! Unary elementwise harness.
//!
//! Full `I::LANES` chunks are loaded, transformed by the operation's vector form
//! and stored; the tail that does not fill a register goes through the scalar form.

use crate::{
    error::{ensure_destination, Result},
    ops::Square,
    simd::traits::{Isa, UnaryVector},
};

/// Applies `O` to every element of `src`, writing `dst[i] = O::scalar(src[i])`.
///
/// # Arguments
///
/// * `src` - Input slice, `n = src.len()` elements
/// * `dst` - Output slice; must hold at least `n` elements. Positions past `n` are
///   left untouched.
///
/// # Errors
///
/// [`LanewiseError::DestinationTooShort`](crate::LanewiseError::DestinationTooShort)
/// if `dst.len() < src.len()`. Nothing is written in that case.
///
/// # Panics
///
/// With a native backend, if the running CPU lacks its instruction set (see
/// [`Isa::enter`]).
///
/// # Examples
///
/// ```rust
/// use lanewise::{map, ops::Square, simd::Portable8};
///
/// let src = [-3, -2, -1, 0, 1, 2, 3];
/// let mut dst = [0; 7];
/// map::<Portable8, Square>(&src, &mut dst).unwrap();
/// assert_eq!(dst, [9, 4, 1, 0, 1, 4, 9]);
/// ```
#[inline]
pub fn map<I, O>(src: &[i32], dst: &mut [i32]) -> Result<()>
where
    I: Isa,
    O: UnaryVector<I>,
{
    ensure_destination(src.len(), dst)?;
    map_kernel::<I, O>(src, &mut dst[..src.len()]);
    Ok(())
}

/// Vector loop plus scalar tail over equally long `src` and `dst`.
#[inline]
pub(crate) fn map_kernel<I, O>(src: &[i32], dst: &mut [i32])
where
    I: Isa,
    O: UnaryVector<I>,
{
    debug_assert_eq!(src.len(), dst.len());

    I::enter(|| {
        let mut src_chunks = src.chunks_exact(I::LANES);
        let mut dst_chunks = dst.chunks_exact_mut(I::LANES);

        for (s, d) in (&mut src_chunks).zip(&mut dst_chunks) {
            // SAFETY: both chunks hold exactly LANES elements; `enter` checked
            // that the CPU supports the backend.
            unsafe { I::store(d.as_mut_ptr(), O::vector(I::load(s.as_ptr()))) };
        }

        for (s, d) in src_chunks
            .remainder()
            .iter()
            .zip(dst_chunks.into_remainder())
        {
            *d = O::scalar(*s);
        }
    })
}

/// Applies `O` to every element of `data` in place.
///
/// Each register is loaded, transformed and stored back before the next load, so
/// reading and writing the same buffer is well defined.
#[inline]
pub fn map_in_place<I, O>(data: &mut [i32])
where
    I: Isa,
    O: UnaryVector<I>,
{
    I::enter(|| {
        let mut chunks = data.chunks_exact_mut(I::LANES);

        for chunk in &mut chunks {
            // SAFETY: the chunk holds exactly LANES elements.
            unsafe {
                let v = I::load(chunk.as_ptr());
                I::store(chunk.as_mut_ptr(), O::vector(v));
            }
        }

        for x in chunks.into_remainder() {
            *x = O::scalar(*x);
        }
    })
}

/// `dst[i] = src[i] * src[i]` (wrapping).
#[inline]
pub fn square<I>(src: &[i32], dst: &mut [i32]) -> Result<()>
where
    I: Isa,
    Square: UnaryVector<I>,
{
    map::<I, Square>(src, dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::LanewiseError,
        simd::portable::{Portable4, Portable8},
    };

    #[test]
    fn test_square_example() {
        let src = [-3, -2, -1, 0, 1, 2, 3];
        let mut dst = [0; 7];
        square::<Portable4>(&src, &mut dst).unwrap();
        assert_eq!(dst, [9, 4, 1, 0, 1, 4, 9]);
    }

    #[test]
    fn test_tail_sizes() {
        for n in [0usize, 1, 7, 8, 9, 16, 19, 35] {
            let src: Vec<i32> = (0..n as i32).map(|x| x - 11).collect();
            let mut dst = vec![0; n];
            map::<Portable8, Square>(&src, &mut dst).unwrap();

            let expected: Vec<i32> = src.iter().map(|x| x * x).collect();
            assert_eq!(dst, expected, "n = {n}");
        }
    }

    #[test]
    fn test_longer_destination_keeps_extra_elements() {
        let src = [2, 3, 4, 5, 6];
        let mut dst = [-1; 8];
        square::<Portable4>(&src, &mut dst).unwrap();
        assert_eq!(dst, [4, 9, 16, 25, 36, -1, -1, -1]);
    }

    #[test]
    fn test_short_destination_is_rejected() {
        let src = [1, 2, 3, 4, 5];
        let mut dst = [7; 4];
        assert_eq!(
            square::<Portable4>(&src, &mut dst),
            Err(LanewiseError::DestinationTooShort {
                required: 5,
                actual: 4
            })
        );
        assert_eq!(dst, [7; 4]);
    }

    #[test]
    fn test_in_place() {
        let mut data: Vec<i32> = (-10..11).collect();
        map_in_place::<Portable8, Square>(&mut data);
        let expected: Vec<i32> = (-10..11).map(|x: i32| x * x).collect();
        assert_eq!(data, expected);
    }
}
