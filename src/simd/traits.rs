use crate::error::Result;

/// An instruction-set variant: a lane count and the primitives that move
/// `LANES` contiguous `i32` values between memory and a register.
///
/// Implementors are zero-sized tags. The harness in [`crate::map`],
/// [`crate::zip`] and [`crate::reduce`] is generic over this trait, so adding a
/// wider variant only takes these items plus the vector forms of the operations
/// it should support.
pub trait Isa: Copy + Send + Sync + 'static {
    /// Number of `i32` lanes in one register.
    const LANES: usize;

    /// Native register type holding exactly `LANES` integers.
    type V: Copy;

    /// Loads `LANES` consecutive integers starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `LANES` elements. No alignment is required.
    /// The CPU must support the instruction set.
    unsafe fn load(ptr: *const i32) -> Self::V;

    /// Stores `LANES` consecutive integers starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of `LANES` elements. No alignment is required.
    /// The CPU must support the instruction set.
    unsafe fn store(ptr: *mut i32, v: Self::V);

    /// Broadcasts `value` to every lane.
    ///
    /// # Safety
    ///
    /// The CPU must support the instruction set.
    unsafe fn splat(value: i32) -> Self::V;

    /// Register contents spilled to memory, one `i32` per lane.
    type Lanes: Copy + AsRef<[i32]> + AsMut<[i32]>;

    /// Stores `v` into a fresh [`Self::Lanes`] buffer.
    ///
    /// # Safety
    ///
    /// The CPU must support the instruction set.
    unsafe fn to_lanes(v: Self::V) -> Self::Lanes;

    /// Runs `f` inside a frame compiled with the instruction set enabled.
    ///
    /// Every harness loop goes through `enter`, so the backend's
    /// `#[target_feature]` primitives inline into the loop body instead of
    /// being called out of line once per register.
    ///
    /// # Panics
    ///
    /// Native backends panic if the running CPU lacks the instruction set.
    fn enter<R, F: FnOnce() -> R>(f: F) -> R;
}

/// Scalar rule of a unary elementwise operation, shared by every backend.
pub trait Unary {
    fn scalar(a: i32) -> i32;
}

/// Vector form of a unary operation on backend `I`.
///
/// Lane `j` of `vector(a)` must equal `scalar(a[j])` bit for bit.
pub trait UnaryVector<I: Isa>: Unary {
    /// # Safety
    ///
    /// The CPU must support the instruction set of `I`.
    unsafe fn vector(a: I::V) -> I::V;
}

/// Scalar rule of a binary elementwise operation, shared by every backend.
pub trait Binary {
    fn scalar(a: i32, b: i32) -> i32;

    /// Pre-flight check run over both operands before anything is written.
    fn validate(_lhs: &[i32], _rhs: &[i32]) -> Result<()> {
        Ok(())
    }
}

/// Vector form of a binary operation on backend `I`.
///
/// Lane `j` of `vector(a, b)` must equal `scalar(a[j], b[j])` bit for bit.
pub trait BinaryVector<I: Isa>: Binary {
    /// # Safety
    ///
    /// The CPU must support the instruction set of `I`.
    unsafe fn vector(a: I::V, b: I::V) -> I::V;
}

/// An associative, commutative binary operation with an identity element.
///
/// `scalar(IDENTITY, x) == x` for every `i32` `x`.
pub trait Reduction: Binary {
    const IDENTITY: i32;
}
