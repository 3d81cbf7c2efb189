use gm_core::{Error, GrayImage, instr};
use log::debug;

/// In-place blur strategy with a `(2*dx + 1) x (2*dy + 1)` window.
pub trait BlurFilter {
    /// Blurs `img` in place. On error the image is left untouched.
    fn blur(&mut self, img: &mut GrayImage, dx: usize, dy: usize) -> Result<(), Error>;
}

/// Direct mean filter. Keeps its scratch buffer between calls, so reusing one
/// `MeanBlur` over many same-sized images allocates only once.
#[derive(Debug, Clone, Default)]
pub struct MeanBlur {
    scratch: Vec<u8>,
}

impl MeanBlur {
    pub fn new() -> Self {
        Self {
            scratch: Vec::new(),
        }
    }

    fn ensure_scratch(&mut self, len: usize) -> Result<(), Error> {
        if self.scratch.len() == len {
            return Ok(());
        }
        self.scratch.clear();
        self.scratch
            .try_reserve_exact(len)
            .map_err(|_| Error::Allocation { requested: len })?;
        self.scratch.resize(len, 0);
        Ok(())
    }
}

impl BlurFilter for MeanBlur {
    fn blur(&mut self, img: &mut GrayImage, dx: usize, dy: usize) -> Result<(), Error> {
        let (w, h) = img.dims();
        if img.is_empty() {
            return Ok(());
        }
        self.ensure_scratch(w * h)?;

        let src = img.data();
        let mut reads = 0u64;
        for (i, out_row) in self.scratch.chunks_exact_mut(w).enumerate() {
            let y0 = i.saturating_sub(dy);
            let y1 = i.saturating_add(dy).min(h - 1);
            for (j, out) in out_row.iter_mut().enumerate() {
                let x0 = j.saturating_sub(dx);
                let x1 = j.saturating_add(dx).min(w - 1);

                let mut sum = 0u64;
                for y in y0..=y1 {
                    let row = &src[y * w..(y + 1) * w];
                    sum += row[x0..=x1].iter().map(|&v| u64::from(v)).sum::<u64>();
                }
                let count = ((x1 - x0 + 1) * (y1 - y0 + 1)) as u64;
                reads += count;
                *out = ((2 * sum + count) / (2 * count)) as u8;
            }
        }

        img.data_mut().copy_from_slice(&self.scratch);
        instr::add_pixmem(reads + 3 * (w * h) as u64);
        debug!("mean blur {w}x{h} dx={dx} dy={dy}: {reads} window reads");
        Ok(())
    }
}

/// Blurs `img` in place with a one-off [`MeanBlur`].
pub fn blur(img: &mut GrayImage, dx: usize, dy: usize) -> Result<(), Error> {
    MeanBlur::new().blur(img, dx, dy)
}

#[cfg(test)]
mod tests {
    use gm_core::GrayImage;

    use crate::{BlurFilter, MeanBlur, blur};

    fn ramp(width: usize, height: usize) -> GrayImage {
        let data = (0..width * height).map(|i| (i * 37 % 256) as u8).collect();
        GrayImage::from_vec(width, height, 255, data).expect("valid image")
    }

    #[test]
    fn zero_radius_is_identity() {
        let original = ramp(7, 5);
        let mut img = original.clone();
        blur(&mut img, 0, 0).expect("blur");
        assert_eq!(img, original);
    }

    #[test]
    fn single_pixel_window_is_clipped() {
        let mut img = GrayImage::from_vec(1, 1, 255, vec![10]).expect("valid image");
        blur(&mut img, 1, 1).expect("blur");
        assert_eq!(img.data(), &[10]);
    }

    #[test]
    fn reads_original_values_only() {
        let mut img = GrayImage::from_vec(3, 1, 255, vec![0, 0, 255]).expect("valid image");
        blur(&mut img, 1, 0).expect("blur");
        // 0/2, 255/3, 255/2 rounded half-up
        assert_eq!(img.data(), &[0, 85, 128]);
    }

    #[test]
    fn clipped_window_on_3x3() {
        let mut img = GrayImage::from_vec(
            3,
            3,
            255,
            vec![
                9, 0, 0, // row 0
                0, 0, 0, // row 1
                0, 0, 90, // row 2
            ],
        )
        .expect("valid image");
        blur(&mut img, 1, 1).expect("blur");
        assert_eq!(
            img.data(),
            &[
                2, 2, 0, // corners average 4 samples, edges 6
                2, 11, 15, //
                0, 15, 23, //
            ]
        );
    }

    #[test]
    fn vertical_only_window() {
        let mut img = GrayImage::from_vec(2, 3, 255, vec![30, 0, 0, 0, 0, 60]).expect("valid image");
        blur(&mut img, 0, 1).expect("blur");
        assert_eq!(img.data(), &[15, 0, 10, 20, 0, 30]);
    }

    #[test]
    fn huge_radius_averages_whole_image() {
        let mut img = GrayImage::from_vec(2, 2, 255, vec![1, 2, 3, 4]).expect("valid image");
        blur(&mut img, usize::MAX, usize::MAX).expect("blur");
        // 10 / 4 = 2.5 -> 3
        assert_eq!(img.data(), &[3, 3, 3, 3]);
    }

    #[test]
    fn filter_reuses_scratch_across_sizes() {
        let mut filter = MeanBlur::new();
        let mut a = ramp(4, 4);
        let mut b = ramp(3, 2);
        filter.blur(&mut a, 1, 1).expect("blur a");
        filter.blur(&mut b, 0, 0).expect("blur b");
        assert_eq!(b, ramp(3, 2));

        let mut again = ramp(4, 4);
        blur(&mut again, 1, 1).expect("blur");
        assert_eq!(a, again);
    }

    #[test]
    fn empty_image_is_noop() {
        let mut img = GrayImage::new(0, 4, 255).expect("valid image");
        blur(&mut img, 2, 2).expect("blur");
        assert!(img.is_empty());
    }
}
