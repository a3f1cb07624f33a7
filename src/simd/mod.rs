//! Vector backends and the traits the harness is generic over.
//!
//! | Backend | Lanes | Compiled when |
//! |---------|-------|---------------|
//! | [`Portable4`] | 4 | always |
//! | [`Portable8`] | 8 | always |
//! | `Sse41` | 4 | `cfg(sse)` on x86/x86_64 |
//! | `Avx2` | 8 | `cfg(avx2)` on x86/x86_64 |
//! | `Neon` | 4 | `cfg(neon)` on aarch64 |
//!
//! The cfg flags come from `build.rs`, which inspects the build host. The backend
//! is picked by the caller as a type parameter. Every harness runs its loop
//! inside [`Isa::enter`]; a native backend checks the running CPU there, panics
//! if the feature is missing, and otherwise runs the loop in a
//! `#[target_feature]` frame so the register primitives inline.

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
pub mod avx2;

#[cfg(all(sse, any(target_arch = "x86", target_arch = "x86_64")))]
pub mod sse;

#[cfg(all(neon, target_arch = "aarch64"))]
pub mod neon;

pub mod portable;

pub mod traits;

pub(crate) mod utils;

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
pub use avx2::Avx2;

#[cfg(all(sse, any(target_arch = "x86", target_arch = "x86_64")))]
pub use sse::Sse41;

#[cfg(all(neon, target_arch = "aarch64"))]
pub use neon::Neon;

pub use portable::{Portable, Portable4, Portable8};
pub use traits::{Binary, BinaryVector, Isa, Reduction, Unary, UnaryVector};
