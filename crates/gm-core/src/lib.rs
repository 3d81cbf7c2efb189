//! Foundational types for 8-bit grayscale raster processing.
//!
//! ## Pixel Layout
//! A [`GrayImage`] owns a contiguous row-major sample buffer. Pixel `(x, y)`
//! is stored at index `y * width + x`; `(0, 0)` is the top-left corner.
//! Borrowed [`GrayView`]/[`GrayViewMut`] use element stride, which may exceed
//! the width for subviews into a larger image.
//!
//! ## Maxval
//! Every image carries a `maxval` in `1..=255`, the level shown as pure white.
//!
//! ## Contracts
//! Coordinate and rectangle preconditions are asserted and panic when
//! violated. Only storage failures are reported through [`Error`].
//!
//! ## Instrumentation
//! Pixel accesses and subimage comparisons are tallied in thread-local
//! counters, see [`instr`].

mod error;
mod geom;
mod image;
pub mod instr;

pub use error::Error;
pub use geom::{Point, Rect};
pub use image::{GrayImage, GrayView, GrayViewMut, PIX_MAX};
