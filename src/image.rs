//! ndarray front-end for the convolution kernels.
//!
//! Views must be in standard (row-major, contiguous) layout so they can be handed
//! to the slice kernels without copying; anything else is rejected with
//! `NonContiguous`.

use ndarray::{ArrayView2, ArrayViewMut2};

use crate::{
    convolve::{convolve, convolve3x3, convolve3x3_valid},
    error::{LanewiseError, Result},
    ops::{Add, Mul},
    simd::traits::{BinaryVector, Isa},
};

fn contiguous<'a>(view: &'a ArrayView2<'_, i32>, what: &'static str) -> Result<&'a [i32]> {
    view.as_slice().ok_or_else(|| {
        log::debug!("rejecting {what} view with strides {:?}", view.strides());
        LanewiseError::NonContiguous { what }
    })
}

fn contiguous_mut<'a>(
    view: &'a mut ArrayViewMut2<'_, i32>,
    what: &'static str,
) -> Result<&'a mut [i32]> {
    if !view.is_standard_layout() {
        log::debug!("rejecting {what} view with strides {:?}", view.strides());
        return Err(LanewiseError::NonContiguous { what });
    }
    view.as_slice_mut()
        .ok_or(LanewiseError::NonContiguous { what })
}

fn check_dim(expected: (usize, usize), actual: (usize, usize)) -> Result<()> {
    if expected != actual {
        log::debug!("rejecting destination view: expected {expected:?}, got {actual:?}");
        return Err(LanewiseError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// [`convolve`] over 2-D views; `dst` must have the shape of `src`.
///
/// # Examples
///
/// ```rust
/// use ndarray::{array, Array2};
/// use lanewise::image::convolve_view;
///
/// let src = Array2::<i32>::ones((4, 4));
/// let kernel = Array2::<i32>::ones((3, 3));
/// let mut dst = Array2::<i32>::zeros((4, 4));
///
/// convolve_view(src.view(), dst.view_mut(), kernel.view()).unwrap();
/// assert_eq!(dst.row(0), array![4, 6, 6, 4]);
/// ```
pub fn convolve_view(
    src: ArrayView2<'_, i32>,
    mut dst: ArrayViewMut2<'_, i32>,
    kernel: ArrayView2<'_, i32>,
) -> Result<()> {
    let (height, width) = src.dim();
    let (kernel_height, kernel_width) = kernel.dim();
    check_dim((height, width), dst.dim())?;

    convolve(
        contiguous(&src, "source")?,
        contiguous_mut(&mut dst, "destination")?,
        contiguous(&kernel, "kernel")?,
        height,
        width,
        kernel_height,
        kernel_width,
    )
}

/// [`convolve3x3`] over 2-D views; `dst` must have the shape of `src`.
pub fn convolve3x3_view<I>(
    src: ArrayView2<'_, i32>,
    mut dst: ArrayViewMut2<'_, i32>,
    kernel: ArrayView2<'_, i32>,
) -> Result<()>
where
    I: Isa,
    Add: BinaryVector<I>,
    Mul: BinaryVector<I>,
{
    let (height, width) = src.dim();
    let (kernel_height, kernel_width) = kernel.dim();
    check_dim((height, width), dst.dim())?;

    convolve3x3::<I>(
        contiguous(&src, "source")?,
        contiguous_mut(&mut dst, "destination")?,
        contiguous(&kernel, "kernel")?,
        height,
        width,
        kernel_height,
        kernel_width,
    )
}

/// [`convolve3x3_valid`] over 2-D views; `dst` must be `(height-2, width-2)`.
pub fn convolve3x3_valid_view<I>(
    src: ArrayView2<'_, i32>,
    mut dst: ArrayViewMut2<'_, i32>,
    kernel: ArrayView2<'_, i32>,
) -> Result<()>
where
    I: Isa,
    Add: BinaryVector<I>,
    Mul: BinaryVector<I>,
{
    let (height, width) = src.dim();
    let (kernel_height, kernel_width) = kernel.dim();
    check_dim(
        (height.saturating_sub(2), width.saturating_sub(2)),
        dst.dim(),
    )?;

    convolve3x3_valid::<I>(
        contiguous(&src, "source")?,
        contiguous_mut(&mut dst, "destination")?,
        contiguous(&kernel, "kernel")?,
        height,
        width,
        kernel_height,
        kernel_width,
    )
}

#[cfg(test)]
mod tests {
    use ndarray::{s, Array2};

    use super::*;
    use crate::simd::portable::{Portable4, Portable8};

    fn ramp(height: usize, width: usize) -> Array2<i32> {
        Array2::from_shape_fn((height, width), |(y, x)| (y * 7 + x * 3) as i32 % 11 - 5)
    }

    #[test]
    fn test_views_match_slice_kernels() {
        let src = ramp(6, 13);
        let kernel = Array2::from_shape_vec((3, 3), vec![1, 2, 1, 0, -1, 0, 2, 1, 2]).unwrap();

        let mut reference = Array2::zeros((6, 13));
        convolve_view(src.view(), reference.view_mut(), kernel.view()).unwrap();

        let mut vectorized = Array2::zeros((6, 13));
        convolve3x3_view::<Portable8>(src.view(), vectorized.view_mut(), kernel.view()).unwrap();
        assert_eq!(vectorized, reference);

        let mut valid = Array2::zeros((4, 11));
        convolve3x3_valid_view::<Portable4>(src.view(), valid.view_mut(), kernel.view()).unwrap();
        assert_eq!(valid, reference.slice(s![1..5, 1..12]));
    }

    #[test]
    fn test_transposed_view_is_rejected() {
        let src = ramp(5, 5);
        let kernel = Array2::<i32>::ones((3, 3));
        let mut dst = Array2::zeros((5, 5));

        assert_eq!(
            convolve_view(src.t(), dst.view_mut(), kernel.view()),
            Err(LanewiseError::NonContiguous { what: "source" })
        );
    }

    #[test]
    fn test_wrong_destination_shape() {
        let src = ramp(5, 6);
        let kernel = Array2::<i32>::ones((3, 3));
        let mut dst = Array2::zeros((6, 5));

        assert_eq!(
            convolve3x3_view::<Portable4>(src.view(), dst.view_mut(), kernel.view()),
            Err(LanewiseError::DimensionMismatch {
                expected: (5, 6),
                actual: (6, 5)
            })
        );
    }
}
