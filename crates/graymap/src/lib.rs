//! Umbrella crate for the `graymap` workspace.
//!
//! Re-exports the pixel buffer from `gm-core`, the operations from `gm-ops`,
//! `gm-match` and `gm-blur`, and the PGM codec as the [`pgm`] module.

pub use gm_blur::*;
pub use gm_core::*;
pub use gm_match::*;
pub use gm_ops::*;

pub mod pgm {
    pub use gm_pgm::*;
}
