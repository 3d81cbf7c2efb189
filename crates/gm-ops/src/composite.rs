use gm_core::{GrayImage, GrayViewMut, Point, Rect, instr};

use crate::round_to_level;

/// Region of `canvas` that `src` covers when placed at `at`.
///
/// # Panics
/// If `src` does not fit inside `canvas` at `at`.
fn target_region<'v>(
    canvas: &'v mut GrayViewMut<'_>,
    at: Point,
    src: &GrayImage,
) -> GrayViewMut<'v> {
    let (cw, ch) = (canvas.width(), canvas.height());
    match canvas.subview_mut(Rect::at(at, src.width(), src.height())) {
        Ok(region) => region,
        Err(_) => panic!(
            "{}x{} image does not fit at ({}, {}) inside {cw}x{ch} image",
            src.width(),
            src.height(),
            at.x,
            at.y
        ),
    }
}

/// Copies `src` into `dst` with its top-left corner at `at`.
///
/// # Panics
/// If `src` does not fit inside `dst` at `at`.
pub fn paste(dst: &mut GrayImage, at: Point, src: &GrayImage) {
    let mut canvas = dst.as_view_mut();
    let mut region = target_region(&mut canvas, at, src);
    for (i, src_row) in src.as_view().rows().enumerate() {
        region.row_mut(i).copy_from_slice(src_row);
    }

    instr::add_pixmem(2 * src.data().len() as u64);
}

/// Blends `src` into `dst` at `at`:
/// `dst = round((1 - alpha) * dst + alpha * src)`, saturated to `0..=255`.
///
/// `alpha == 0.0` leaves `dst` unchanged and `alpha == 1.0` copies `src`.
///
/// # Panics
/// If `alpha` is outside `[0, 1]` or `src` does not fit inside `dst` at `at`.
pub fn blend(dst: &mut GrayImage, at: Point, src: &GrayImage, alpha: f64) {
    assert!(
        (0.0..=1.0).contains(&alpha),
        "blend alpha must be in [0, 1], got {alpha}"
    );

    let keep = 1.0 - alpha;
    let mut canvas = dst.as_view_mut();
    let mut region = target_region(&mut canvas, at, src);
    for (i, src_row) in src.as_view().rows().enumerate() {
        for (d, &s) in region.row_mut(i).iter_mut().zip(src_row) {
            *d = round_to_level(keep * f64::from(*d) + alpha * f64::from(s));
        }
    }

    instr::add_pixmem(3 * src.data().len() as u64);
}
