use gm_core::{GrayImage, GrayView, Point, Rect, instr};
use log::debug;

/// Strategy for finding the first raster-order position of a needle inside a
/// haystack.
pub trait SubimageLocator {
    fn locate(&self, haystack: GrayView<'_>, needle: GrayView<'_>) -> Option<Point>;
}

/// Exhaustive search: every candidate position is compared sample by sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceLocator;

impl SubimageLocator for BruteForceLocator {
    fn locate(&self, haystack: GrayView<'_>, needle: GrayView<'_>) -> Option<Point> {
        if haystack.width() == 0 || haystack.height() == 0 {
            return None;
        }
        let max_x = haystack.width().checked_sub(needle.width())?;
        let max_y = haystack.height().checked_sub(needle.height())?;

        for y in 0..=max_y {
            for x in 0..=max_x {
                let at = Point::new(x, y);
                if window_equals(&haystack, at, &needle) {
                    return Some(at);
                }
            }
        }
        None
    }
}

/// True when `needle` fits in `haystack` at `at` and every sample pair is
/// equal. Stops at the first mismatch.
///
/// # Panics
/// If `at` is not a valid position of `haystack`.
pub fn matches_at(haystack: &GrayImage, at: Point, needle: &GrayImage) -> bool {
    assert!(
        haystack.valid_pos(at.x, at.y),
        "match position ({}, {}) outside {}x{} image",
        at.x,
        at.y,
        haystack.width(),
        haystack.height()
    );
    if !haystack.valid_rect(&Rect::at(at, needle.width(), needle.height())) {
        return false;
    }
    window_equals(&haystack.as_view(), at, &needle.as_view())
}

/// First position, in raster order, where `needle` matches `haystack`.
pub fn locate(haystack: &GrayImage, needle: &GrayImage) -> Option<Point> {
    let before = instr::snapshot();
    let found = BruteForceLocator.locate(haystack.as_view(), needle.as_view());
    let spent = instr::snapshot() - before;
    debug!(
        "locate {}x{} in {}x{}: {:?} after {} comparisons",
        needle.width(),
        needle.height(),
        haystack.width(),
        haystack.height(),
        found,
        spent.comparisons
    );
    found
}

/// Caller guarantees the needle fits at `at`.
fn window_equals(haystack: &GrayView<'_>, at: Point, needle: &GrayView<'_>) -> bool {
    let w = needle.width();
    let mut compared = 0u64;
    let mut equal = true;

    'rows: for (i, n_row) in needle.rows().enumerate() {
        let h_row = &haystack.row(at.y + i)[at.x..at.x + w];
        for (&a, &b) in h_row.iter().zip(n_row) {
            compared += 1;
            if a != b {
                equal = false;
                break 'rows;
            }
        }
    }

    instr::add_comparisons(compared);
    instr::add_pixmem(2 * compared);
    equal
}
