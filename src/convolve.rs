//! Stencil convolution over row-major `i32` images.
//!
//! [`convolve`] is the scalar reference: any odd kernel, every output pixel, with
//! source pixels outside the image contributing zero. [`convolve3x3`] produces the
//! same output for 3×3 kernels but streams the interior through vector registers;
//! only the one-pixel frame and the columns left over after the last full register
//! go through the scalar stencil. [`convolve3x3_valid`] computes only the region
//! where the window stays inside the image and writes it densely.
//!
//! All sums wrap on overflow, so the vectorized and scalar paths agree bit for bit
//! whatever order they accumulate in.

use crate::{
    error::{shape_mismatch, LanewiseError, Result},
    ops::{Add, Mul},
    simd::traits::{Binary, BinaryVector, Isa},
};

const K3: usize = 3;

fn check_kernel_odd(kernel_height: usize, kernel_width: usize) -> Result<()> {
    if kernel_height % 2 == 0 || kernel_width % 2 == 0 {
        log::debug!("rejecting convolution: kernel {kernel_height}x{kernel_width} has no center");
        return Err(LanewiseError::EvenKernel {
            height: kernel_height,
            width: kernel_width,
        });
    }
    Ok(())
}

fn check_kernel_3x3(kernel_height: usize, kernel_width: usize) -> Result<()> {
    if kernel_height != K3 || kernel_width != K3 {
        log::debug!(
            "rejecting vectorized convolution: kernel {kernel_height}x{kernel_width} is not 3x3"
        );
        return Err(LanewiseError::UnsupportedKernel {
            height: kernel_height,
            width: kernel_width,
        });
    }
    Ok(())
}

/// `height * width`, or `DimensionOverflow` if the product does not fit a `usize`.
fn area(what: &'static str, height: usize, width: usize) -> Result<usize> {
    height.checked_mul(width).ok_or_else(|| {
        log::debug!("rejecting convolution: {what} of {height}x{width} overflows usize");
        LanewiseError::DimensionOverflow {
            what,
            height,
            width,
        }
    })
}

fn check_len(what: &'static str, buffer: &[i32], expected: usize) -> Result<()> {
    if buffer.len() != expected {
        return Err(shape_mismatch(what, expected, buffer.len()));
    }
    Ok(())
}

/// Zero-padded stencil sum for output pixel `(y, x)`.
#[inline(always)]
#[allow(clippy::too_many_arguments)]
fn stencil_at(
    src: &[i32],
    kernel: &[i32],
    height: usize,
    width: usize,
    kernel_height: usize,
    kernel_width: usize,
    y: usize,
    x: usize,
) -> i32 {
    let half_kernel_height = kernel_height / 2;
    let half_kernel_width = kernel_width / 2;

    let mut sum = 0i32;

    for dy in 0..kernel_height {
        let Some(sy) = (y + dy).checked_sub(half_kernel_height) else {
            continue;
        };
        if sy >= height {
            continue;
        }

        for dx in 0..kernel_width {
            let Some(sx) = (x + dx).checked_sub(half_kernel_width) else {
                continue;
            };
            if sx >= width {
                continue;
            }

            let product = src[sy * width + sx].wrapping_mul(kernel[dy * kernel_width + dx]);
            sum = sum.wrapping_add(product);
        }
    }

    sum
}

/// Scalar reference convolution with implicit zero padding.
///
/// For every output pixel `(y, x)`:
///
/// ```text
/// dst[y*width + x] = Σ kernel[dy*kernel_width + dx] * src[(y+dy-hh)*width + (x+dx-hw)]
/// ```
///
/// where `hh = kernel_height / 2`, `hw = kernel_width / 2` and out-of-image source
/// pixels are zero.
///
/// # Errors
///
/// - `EvenKernel` if either kernel dimension is even
/// - `DimensionOverflow` if `height * width` or `kernel_height * kernel_width`
///   does not fit a `usize`
/// - `ShapeMismatch` if `src` or `dst` is not `height * width` long, or `kernel` is
///   not `kernel_height * kernel_width` long
pub fn convolve(
    src: &[i32],
    dst: &mut [i32],
    kernel: &[i32],
    height: usize,
    width: usize,
    kernel_height: usize,
    kernel_width: usize,
) -> Result<()> {
    check_kernel_odd(kernel_height, kernel_width)?;
    check_len("kernel", kernel, area("kernel", kernel_height, kernel_width)?)?;
    let pixels = area("image", height, width)?;
    check_len("source", src, pixels)?;
    check_len("destination", dst, pixels)?;

    log::trace!("scalar convolution: {height}x{width} image, {kernel_height}x{kernel_width} kernel");

    for y in 0..height {
        for x in 0..width {
            dst[y * width + x] =
                stencil_at(src, kernel, height, width, kernel_height, kernel_width, y, x);
        }
    }

    Ok(())
}

/// Convolves three source rows with a 3×3 kernel into one output row.
/// Must run inside [`Isa::enter`].
///
/// `out[x] = Σ kernel[yy*3 + xx] * rows[yy][x + xx]`. Every row must hold at least
/// `out.len() + 2` elements.
#[inline]
fn row3x3<I>(rows: [&[i32]; 3], out: &mut [i32], kernel: &[i32], weights: &[I::V; 9])
where
    I: Isa,
    Add: BinaryVector<I>,
    Mul: BinaryVector<I>,
{
    let n = out.len();
    assert!(
        rows.iter().all(|row| row.len() >= n + 2),
        "source rows shorter than the output row plus the kernel overhang"
    );

    let lanes = I::LANES;
    let [r0, r1, r2] = rows;
    let madd = |acc: I::V, v: I::V, k: I::V| unsafe {
        <Add as BinaryVector<I>>::vector(acc, <Mul as BinaryVector<I>>::vector(v, k))
    };

    let mut x = 0;
    while x + lanes <= n {
        // SAFETY: loads read [x, x + 2 + lanes) of each row, within `n + 2`;
        // the store writes [x, x + lanes) of `out`.
        unsafe {
            let p0 = r0.as_ptr().add(x);
            let p1 = r1.as_ptr().add(x);
            let p2 = r2.as_ptr().add(x);

            // row 0
            let mut a0 = <Mul as BinaryVector<I>>::vector(I::load(p0), weights[0]);
            a0 = madd(a0, I::load(p0.add(1)), weights[1]);
            a0 = madd(a0, I::load(p0.add(2)), weights[2]);

            // row 1
            let mut a1 = <Mul as BinaryVector<I>>::vector(I::load(p1), weights[3]);
            a1 = madd(a1, I::load(p1.add(1)), weights[4]);
            a1 = madd(a1, I::load(p1.add(2)), weights[5]);

            // row 2
            let mut a2 = <Mul as BinaryVector<I>>::vector(I::load(p2), weights[6]);
            a2 = madd(a2, I::load(p2.add(1)), weights[7]);
            a2 = madd(a2, I::load(p2.add(2)), weights[8]);

            let merged = <Add as BinaryVector<I>>::vector(
                <Add as BinaryVector<I>>::vector(a0, a1),
                a2,
            );
            I::store(out.as_mut_ptr().add(x), merged);
        }
        x += lanes;
    }

    for (x, o) in out.iter_mut().enumerate().skip(x) {
        let mut sum = 0i32;
        for (yy, row) in rows.iter().enumerate() {
            for xx in 0..K3 {
                let product = Mul::scalar(row[x + xx], kernel[yy * K3 + xx]);
                sum = Add::scalar(sum, product);
            }
        }
        *o = sum;
    }
}

/// Must run inside [`Isa::enter`].
fn broadcast_weights<I: Isa>(kernel: &[i32]) -> [I::V; 9] {
    // SAFETY: callers run inside `I::enter`, which checked CPU support.
    std::array::from_fn(|i| unsafe { I::splat(kernel[i]) })
}

/// Vectorized 3×3 convolution over the full image with zero padding.
///
/// Produces exactly the output of [`convolve`] for the same arguments. Interior
/// pixels `[1, height-1) × [1, width-1)` are computed `I::LANES` columns at a time
/// from three source rows (nine multiply-adds into three row accumulators); the
/// one-pixel frame and leftover columns use the scalar stencil.
///
/// # Errors
///
/// - `UnsupportedKernel` unless `kernel_height == kernel_width == 3`
/// - `DimensionOverflow` and `ShapeMismatch` as for [`convolve`]
pub fn convolve3x3<I>(
    src: &[i32],
    dst: &mut [i32],
    kernel: &[i32],
    height: usize,
    width: usize,
    kernel_height: usize,
    kernel_width: usize,
) -> Result<()>
where
    I: Isa,
    Add: BinaryVector<I>,
    Mul: BinaryVector<I>,
{
    check_kernel_3x3(kernel_height, kernel_width)?;
    check_len("kernel", kernel, K3 * K3)?;
    let pixels = area("image", height, width)?;
    check_len("source", src, pixels)?;
    check_len("destination", dst, pixels)?;

    log::trace!("vectorized 3x3 convolution: {height}x{width} image, {} lanes", I::LANES);

    let padded = |y: usize, x: usize| stencil_at(src, kernel, height, width, K3, K3, y, x);

    if height < K3 || width < K3 {
        for y in 0..height {
            for x in 0..width {
                dst[y * width + x] = padded(y, x);
            }
        }
        return Ok(());
    }

    let last_row = (height - 1) * width;

    for x in 0..width {
        dst[x] = padded(0, x);
        dst[last_row + x] = padded(height - 1, x);
    }

    I::enter(|| {
        let weights = broadcast_weights::<I>(kernel);

        for y in 1..height - 1 {
            let rows = [
                &src[(y - 1) * width..y * width],
                &src[y * width..(y + 1) * width],
                &src[(y + 1) * width..(y + 2) * width],
            ];
            row3x3::<I>(
                rows,
                &mut dst[y * width + 1..(y + 1) * width - 1],
                kernel,
                &weights,
            );

            dst[y * width] = padded(y, 0);
            dst[y * width + width - 1] = padded(y, width - 1);
        }
    });

    Ok(())
}

/// Vectorized 3×3 convolution over the valid region only.
///
/// `dst` is a dense `(height-2) × (width-2)` image with
/// `dst[y*(width-2) + x] = Σ kernel[yy*3 + xx] * src[(y+yy)*width + x+xx]`, which
/// equals pixel `(y+1, x+1)` of [`convolve`]. Images with fewer than three rows or
/// columns have an empty valid region.
///
/// # Errors
///
/// - `UnsupportedKernel` unless `kernel_height == kernel_width == 3`
/// - `DimensionOverflow` if `height * width` does not fit a `usize`
/// - `ShapeMismatch` if `src` is not `height * width` long, `dst` is not
///   `(height-2) * (width-2)` long, or `kernel` is not 9 long
pub fn convolve3x3_valid<I>(
    src: &[i32],
    dst: &mut [i32],
    kernel: &[i32],
    height: usize,
    width: usize,
    kernel_height: usize,
    kernel_width: usize,
) -> Result<()>
where
    I: Isa,
    Add: BinaryVector<I>,
    Mul: BinaryVector<I>,
{
    check_kernel_3x3(kernel_height, kernel_width)?;
    check_len("kernel", kernel, K3 * K3)?;
    check_len("source", src, area("image", height, width)?)?;

    let out_height = height.saturating_sub(K3 - 1);
    let out_width = width.saturating_sub(K3 - 1);
    check_len("destination", dst, out_height * out_width)?;

    log::trace!("valid 3x3 convolution: {height}x{width} image, {} lanes", I::LANES);

    if out_height == 0 || out_width == 0 {
        return Ok(());
    }

    I::enter(|| {
        let weights = broadcast_weights::<I>(kernel);

        for (y, out) in dst.chunks_exact_mut(out_width).enumerate() {
            let rows = [
                &src[y * width..(y + 1) * width],
                &src[(y + 1) * width..(y + 2) * width],
                &src[(y + 2) * width..(y + 3) * width],
            ];
            row3x3::<I>(rows, out, kernel, &weights);
        }
    });

    Ok(())
}
