//! Error types for lanewise operations.
//!
//! Every failure in this crate is a caller contract violation: mismatched buffer
//! lengths, a zero divisor, or a kernel shape a specialized path cannot handle.
//! They are reported before any destination element is written.

use thiserror::Error;

/// Errors that can occur during lanewise operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanewiseError {
    /// The two sources of a binary operation have different lengths.
    #[error("Length mismatch: left operand has {left} elements, right operand has {right}")]
    LengthMismatch {
        /// Length of the left source.
        left: usize,
        /// Length of the right source.
        right: usize,
    },

    /// The destination cannot hold every result.
    #[error("Destination too short: {required} elements required, {actual} available")]
    DestinationTooShort {
        /// Number of elements the operation writes.
        required: usize,
        /// Length of the destination slice.
        actual: usize,
    },

    /// Integer division with a zero divisor.
    #[error("Division by zero: divisor at index {index} is zero")]
    DivisionByZero {
        /// Position of the first zero divisor.
        index: usize,
    },

    /// A specialized convolution received a kernel shape it does not implement.
    #[error("Unsupported kernel shape {height}x{width}: only 3x3 is vectorized")]
    UnsupportedKernel { height: usize, width: usize },

    /// Kernels need a center pixel, so both dimensions must be odd.
    #[error("Kernel dimensions must be odd, got {height}x{width}")]
    EvenKernel { height: usize, width: usize },

    /// A buffer does not match the dimensions it was declared with.
    #[error("Shape mismatch for {what}: expected {expected} elements, got {actual}")]
    ShapeMismatch {
        /// Which buffer is wrong (`"source"`, `"destination"`, `"kernel"`).
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Declared dimensions whose element count does not fit a `usize`.
    #[error("Dimension overflow for {what}: {height}x{width} elements do not fit in usize")]
    DimensionOverflow {
        /// Which shape overflowed (`"image"` or `"kernel"`).
        what: &'static str,
        height: usize,
        width: usize,
    },

    /// A 2-D destination view does not have the shape the operation produces.
    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// An ndarray view is not laid out as a dense row-major buffer.
    #[error("Array view {what} is not contiguous in row-major order")]
    NonContiguous { what: &'static str },
}

/// Result type alias for lanewise operations.
pub type Result<T> = std::result::Result<T, LanewiseError>;

/// Creates a length-mismatch error.
pub fn length_mismatch(left: usize, right: usize) -> LanewiseError {
    log::debug!("rejecting binary operation: operand lengths {left} and {right} differ");
    LanewiseError::LengthMismatch { left, right }
}

/// Creates a destination-too-short error.
pub fn destination_too_short(required: usize, actual: usize) -> LanewiseError {
    log::debug!("rejecting operation: destination holds {actual} of {required} results");
    LanewiseError::DestinationTooShort { required, actual }
}

/// Creates a shape-mismatch error.
pub fn shape_mismatch(what: &'static str, expected: usize, actual: usize) -> LanewiseError {
    log::debug!("rejecting convolution: {what} has {actual} elements, expected {expected}");
    LanewiseError::ShapeMismatch {
        what,
        expected,
        actual,
    }
}

/// Checks that `dst` can receive `required` results.
#[inline]
pub(crate) fn ensure_destination(required: usize, dst: &[i32]) -> Result<()> {
    if dst.len() < required {
        return Err(destination_too_short(required, dst.len()));
    }
    Ok(())
}
