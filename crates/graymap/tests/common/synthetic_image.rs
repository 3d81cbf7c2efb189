use graymap::GrayImage;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic pseudo-random samples in `0..=maxval`.
pub fn noise_u8(width: usize, height: usize, maxval: u8, seed: u32) -> GrayImage {
    let mut state = seed.max(1);
    let data = (0..width * height)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            ((state >> 8) % (u32::from(maxval) + 1)) as u8
        })
        .collect();
    GrayImage::from_vec(width, height, maxval, data).expect("valid image")
}

/// Horizontal ramp from 0 at the left edge to 255 at the right edge.
pub fn hramp_u8(width: usize, height: usize) -> GrayImage {
    let mut img = GrayImage::new(width, height, 255).expect("valid image");
    let denom = width.saturating_sub(1).max(1);
    for y in 0..height {
        for x in 0..width {
            img.set_pixel(x, y, (x * 255 / denom) as u8);
        }
    }
    img
}
