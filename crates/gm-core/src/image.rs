use crate::geom::Rect;
use crate::{Error, instr};

/// Largest sample value a [`GrayImage`] can store.
pub const PIX_MAX: u8 = 255;

/// Owned 8-bit grayscale image in row-major layout.
///
/// `maxval` is the gray level rendered as pure white. Samples are created
/// zeroed; the pixel at `(x, y)` lives at `data[y * width + x]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    width: usize,
    height: usize,
    maxval: u8,
    data: Vec<u8>,
}

impl GrayImage {
    /// Creates a black `width x height` image.
    ///
    /// Storage is reserved fallibly: an oversized request yields
    /// [`Error::Allocation`] instead of aborting the process.
    ///
    /// # Panics
    /// If `maxval == 0`.
    pub fn new(width: usize, height: usize, maxval: u8) -> Result<Self, Error> {
        assert!(maxval > 0, "maxval must be in 1..=255");
        let len = width.checked_mul(height).ok_or(Error::Allocation {
            requested: usize::MAX,
        })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::Allocation { requested: len })?;
        data.resize(len, 0);

        Ok(Self {
            width,
            height,
            maxval,
            data,
        })
    }

    /// Wraps existing samples. `data.len()` must equal `width * height`.
    ///
    /// # Panics
    /// If `maxval == 0`.
    pub fn from_vec(width: usize, height: usize, maxval: u8, data: Vec<u8>) -> Result<Self, Error> {
        assert!(maxval > 0, "maxval must be in 1..=255");
        let expected = width.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            maxval,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn maxval(&self) -> u8 {
        self.maxval
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The full image area as a rectangle at the origin.
    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn valid_pos(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn valid_rect(&self, rect: &Rect) -> bool {
        rect.fits_in(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            self.valid_pos(x, y),
            "pixel ({x}, {y}) outside {}x{} image",
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Reads the level at `(x, y)`.
    ///
    /// # Panics
    /// If `(x, y)` is not a valid position.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> u8 {
        let idx = self.index(x, y);
        instr::add_pixmem(1);
        self.data[idx]
    }

    /// Writes `level` at `(x, y)`.
    ///
    /// # Panics
    /// If `(x, y)` is not a valid position.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, level: u8) {
        let idx = self.index(x, y);
        instr::add_pixmem(1);
        self.data[idx] = level;
    }

    /// Minimum and maximum gray levels, `None` for an image without pixels.
    pub fn stats(&self) -> Option<(u8, u8)> {
        let (&first, rest) = self.data.split_first()?;
        instr::add_pixmem(self.data.len() as u64);

        let mut min = first;
        let mut max = first;
        for &v in rest {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        Some((min, max))
    }

    pub fn as_view(&self) -> GrayView<'_> {
        GrayView {
            width: self.width,
            height: self.height,
            stride: self.width,
            maxval: self.maxval,
            data: &self.data,
        }
    }

    pub fn as_view_mut(&mut self) -> GrayViewMut<'_> {
        GrayViewMut {
            width: self.width,
            height: self.height,
            stride: self.width,
            data: &mut self.data,
        }
    }
}

/// Borrowed read-only grayscale view. `stride` counts samples between row
/// starts and may exceed `width`.
#[derive(Debug, Clone, Copy)]
pub struct GrayView<'a> {
    width: usize,
    height: usize,
    stride: usize,
    maxval: u8,
    data: &'a [u8],
}

impl<'a> GrayView<'a> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn maxval(&self) -> u8 {
        self.maxval
    }

    pub fn valid_pos(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn row(&self, y: usize) -> &'a [u8] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + use<'a> {
        let view = *self;
        (0..view.height).map(move |y| view.row(y))
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if !self.valid_pos(x, y) {
            return None;
        }
        self.data.get(y * self.stride + x).copied()
    }

    pub fn subview(&self, rect: Rect) -> Result<GrayView<'a>, Error> {
        if !rect.fits_in(self.width, self.height) {
            return Err(Error::OutOfBounds);
        }

        let start = rect.y * self.stride + rect.x;
        let min_len =
            min_required_len(rect.width, rect.height, self.stride).ok_or(Error::OutOfBounds)?;
        let tail = self.data.get(start..).unwrap_or(&[]);

        if tail.len() < min_len {
            return Err(Error::OutOfBounds);
        }

        Ok(GrayView {
            width: rect.width,
            height: rect.height,
            stride: self.stride,
            maxval: self.maxval,
            data: tail,
        })
    }

    pub fn is_contiguous(&self) -> bool {
        self.stride == self.width
    }

    pub fn as_contiguous_slice(&self) -> Option<&'a [u8]> {
        if !self.is_contiguous() {
            return None;
        }
        self.data.get(0..self.width * self.height)
    }

    /// Copies the view into a freshly allocated image with the same maxval.
    pub fn to_image(&self) -> Result<GrayImage, Error> {
        let mut out = GrayImage::new(self.width, self.height, self.maxval)?;
        if let Some(src) = self.as_contiguous_slice() {
            out.data_mut().copy_from_slice(src);
            return Ok(out);
        }

        let w = self.width;
        for (y, dst_row) in out.data_mut().chunks_exact_mut(w.max(1)).enumerate() {
            dst_row.copy_from_slice(self.row(y));
        }
        Ok(out)
    }
}

/// Borrowed mutable grayscale view, the write-side twin of [`GrayView`].
#[derive(Debug)]
pub struct GrayViewMut<'a> {
    width: usize,
    height: usize,
    stride: usize,
    data: &'a mut [u8],
}

impl GrayViewMut<'_> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &mut self.data[start..start + self.width]
    }

    pub fn subview_mut(&mut self, rect: Rect) -> Result<GrayViewMut<'_>, Error> {
        if !rect.fits_in(self.width, self.height) {
            return Err(Error::OutOfBounds);
        }

        let start = rect.y * self.stride + rect.x;
        let min_len =
            min_required_len(rect.width, rect.height, self.stride).ok_or(Error::OutOfBounds)?;
        let len = self.data.len();
        let tail = &mut self.data[start.min(len)..];
        if tail.len() < min_len {
            return Err(Error::OutOfBounds);
        }

        Ok(GrayViewMut {
            width: rect.width,
            height: rect.height,
            stride: self.stride,
            data: tail,
        })
    }
}

fn min_required_len(width: usize, height: usize, stride: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }

    let rows_before_last = height.checked_sub(1)?;
    let base = rows_before_last.checked_mul(stride)?;
    base.checked_add(width)
}
