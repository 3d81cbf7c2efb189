//! Image operations built on [`gm_core::GrayImage`].
//!
//! - [`pointwise`]: in-place per-sample transforms (negative, threshold,
//!   brighten). Never fail.
//! - [`geometry`]: rotate, mirror and crop. Always allocate a fresh image and
//!   leave the source untouched; storage failures surface as
//!   [`gm_core::Error::Allocation`].
//! - [`composite`]: paste and alpha-blend a source image into a destination
//!   in place.
//!
//! Rounding is half-up; results saturate at `255`, not at the image maxval.

pub mod composite;
pub mod geometry;
pub mod pointwise;

pub use composite::{blend, paste};
pub use geometry::{crop, mirror_lr, rotate_ccw90};
pub use pointwise::{brighten, negative, threshold};

/// Rounds half-up and saturates into `0..=255`.
#[inline]
pub fn round_to_level(v: f64) -> u8 {
    (v + 0.5).floor().clamp(0.0, 255.0) as u8
}
