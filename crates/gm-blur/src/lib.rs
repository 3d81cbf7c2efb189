//! Box (mean) blur for 8-bit grayscale images.
//!
//! Each output pixel is the mean of the `(2*dx + 1) x (2*dy + 1)` window
//! centred on it, rounded half-up. Windows are clipped at the image border:
//! pixels near an edge average fewer samples, with no padding or reflection.
//!
//! The filter works in place but reads only original values: the full result
//! is produced into scratch storage before it is copied back.
//!
//! Cost is O(width * height * dx * dy). Filters go through the
//! [`BlurFilter`] trait so a summed-area implementation can replace
//! [`MeanBlur`] without touching callers.

mod mean;

pub use mean::{BlurFilter, MeanBlur, blur};
