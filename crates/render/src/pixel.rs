//! RGBA8 raster produced by the frame renderer.
//!
//! Row-major, four bytes per pixel, origin at the top-left. Pixel `(i, j)`
//! (column `i`, row `j`) starts at byte `4 * width * j + 4 * i`.

use fractal_core::RenderError;

/// Bytes per RGBA8 pixel.
pub const CHANNELS: usize = 4;

/// A `width x height` RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Raster {
    /// Creates a zero-filled raster.
    ///
    /// Returns `RenderError::InvalidDimensions` if either dimension is zero
    /// or if the byte length overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, RenderError> {
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .filter(|_| width > 0 && height > 0)
            .ok_or(RenderError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the row-major RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access for the renderer; one row is `width * 4` bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the raster, returning its bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of pixel `(i, j)`.
    pub fn offset(&self, i: usize, j: usize) -> usize {
        CHANNELS * self.width * j + CHANNELS * i
    }

    /// The RGBA bytes of pixel `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `(i, j)` is outside the raster.
    pub fn pixel(&self, i: usize, j: usize) -> [u8; 4] {
        assert!(i < self.width && j < self.height, "pixel ({i}, {j}) out of bounds");
        let o = self.offset(i, j);
        [self.data[o], self.data[o + 1], self.data[o + 2], self.data[o + 3]]
    }
}
