use gm_core::{GrayImage, PIX_MAX, instr};

use crate::round_to_level;

/// Photographic negative: every sample `s` becomes `255 - s`.
///
/// The ceiling is always `255`; the image maxval is not consulted.
pub fn negative(img: &mut GrayImage) {
    let data = img.data_mut();
    for px in data.iter_mut() {
        *px = PIX_MAX - *px;
    }
    instr::add_pixmem(2 * data.len() as u64);
}

/// Samples below `thr` become black (`0`), all others become `maxval`.
pub fn threshold(img: &mut GrayImage, thr: u8) {
    let white = img.maxval();
    let data = img.data_mut();
    for px in data.iter_mut() {
        *px = if *px < thr { 0 } else { white };
    }
    instr::add_pixmem(2 * data.len() as u64);
}

/// Multiplies every sample by `factor`, rounding half-up and saturating at
/// `255`. Factors above one brighten, factors below one darken.
///
/// # Panics
/// If `factor` is negative or NaN.
pub fn brighten(img: &mut GrayImage, factor: f64) {
    assert!(factor >= 0.0, "brighten factor must be >= 0, got {factor}");

    let lut: [u8; 256] = core::array::from_fn(|s| round_to_level(factor * s as f64));
    let data = img.data_mut();
    for px in data.iter_mut() {
        *px = lut[*px as usize];
    }
    instr::add_pixmem(2 * data.len() as u64);
}

#[cfg(test)]
mod tests {
    use gm_core::GrayImage;

    use crate::pointwise::{brighten, negative, threshold};

    fn ramp(width: usize, height: usize, maxval: u8) -> GrayImage {
        let data = (0..width * height).map(|i| (i * 7 % 256) as u8).collect();
        GrayImage::from_vec(width, height, maxval, data).expect("valid image")
    }

    #[test]
    fn negative_uses_255_ceiling_and_is_involution() {
        let mut img = GrayImage::from_vec(3, 1, 100, vec![0, 40, 100]).expect("valid image");
        negative(&mut img);
        assert_eq!(img.data(), &[255, 215, 155]);

        let original = ramp(5, 4, 255);
        let mut twice = original.clone();
        negative(&mut twice);
        negative(&mut twice);
        assert_eq!(twice, original);
    }

    #[test]
    fn threshold_single_bright_pixel() {
        let mut img = GrayImage::new(4, 4, 255).expect("valid image");
        img.set_pixel(1, 1, 200);
        threshold(&mut img, 100);

        for y in 0..4 {
            for x in 0..4 {
                let expected = if (x, y) == (1, 1) { 255 } else { 0 };
                assert_eq!(img.get_pixel(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn threshold_tie_maps_to_maxval() {
        let mut img = GrayImage::from_vec(3, 1, 80, vec![49, 50, 51]).expect("valid image");
        threshold(&mut img, 50);
        assert_eq!(img.data(), &[0, 80, 80]);
    }

    #[test]
    fn brighten_rounds_half_up_and_saturates() {
        let mut img = GrayImage::from_vec(4, 1, 255, vec![1, 3, 100, 200]).expect("valid image");
        brighten(&mut img, 1.5);
        assert_eq!(img.data(), &[2, 5, 150, 255]);

        let mut dark = GrayImage::from_vec(2, 1, 255, vec![5, 255]).expect("valid image");
        brighten(&mut dark, 0.0);
        assert_eq!(dark.data(), &[0, 0]);
    }

    #[test]
    fn brighten_saturates_at_255_not_maxval() {
        let mut img = GrayImage::from_vec(1, 1, 100, vec![90]).expect("valid image");
        brighten(&mut img, 2.0);
        assert_eq!(img.data(), &[180]);
    }

    #[test]
    #[should_panic(expected = "factor")]
    fn brighten_rejects_negative_factor() {
        let mut img = GrayImage::new(1, 1, 255).expect("valid image");
        brighten(&mut img, -0.5);
    }
}
