//! Exact subimage matching.
//!
//! [`matches_at`] compares a needle against the haystack window at one
//! position. [`locate`] scans every position where the needle fits in raster
//! order (rows top-to-bottom, left-to-right within a row) and returns the
//! first hit.
//!
//! Search goes through the [`SubimageLocator`] trait so other strategies can
//! be swapped in; [`BruteForceLocator`] is the O(w1*h1*w2*h2) reference.

mod locate;

pub use locate::{BruteForceLocator, SubimageLocator, locate, matches_at};
