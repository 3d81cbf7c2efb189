use gm_core::{Error, GrayImage, Rect, instr};

/// Rotates 90 degrees counter-clockwise.
///
/// The result is `height x width`; the source top row becomes the left
/// column, read bottom-up: `out[dx, dy] = src[src.width - 1 - dy, dx]`.
pub fn rotate_ccw90(src: &GrayImage) -> Result<GrayImage, Error> {
    let (w, h) = src.dims();
    let mut out = GrayImage::new(h, w, src.maxval())?;
    if out.is_empty() {
        return Ok(out);
    }

    let src_data = src.data();
    for (dy, dst_row) in out.data_mut().chunks_exact_mut(h).enumerate() {
        let sx = w - 1 - dy;
        for (dx, d) in dst_row.iter_mut().enumerate() {
            *d = src_data[dx * w + sx];
        }
    }

    instr::add_pixmem(2 * out.data().len() as u64);
    Ok(out)
}

/// Flips left-right: `out[x, y] = src[width - 1 - x, y]`.
pub fn mirror_lr(src: &GrayImage) -> Result<GrayImage, Error> {
    let (w, h) = src.dims();
    let mut out = GrayImage::new(w, h, src.maxval())?;
    if out.is_empty() {
        return Ok(out);
    }

    for (dst_row, src_row) in out
        .data_mut()
        .chunks_exact_mut(w)
        .zip(src.data().chunks_exact(w))
    {
        for (d, &s) in dst_row.iter_mut().zip(src_row.iter().rev()) {
            *d = s;
        }
    }

    instr::add_pixmem(2 * out.data().len() as u64);
    Ok(out)
}

/// Copies the `rect` region into a new `rect.width x rect.height` image.
///
/// # Panics
/// If `rect` is not completely inside `src`.
pub fn crop(src: &GrayImage, rect: Rect) -> Result<GrayImage, Error> {
    assert!(
        src.valid_rect(&rect),
        "crop rect {rect:?} outside {}x{} image",
        src.width(),
        src.height()
    );

    let out = src.as_view().subview(rect)?.to_image()?;
    instr::add_pixmem(2 * out.data().len() as u64);
    Ok(out)
}
