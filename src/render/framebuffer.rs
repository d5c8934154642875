//! Owned CPU-side pixel storage.
//!
//! [`PixelBuffer`] holds `width * height` RGBA pixels in row-major order with
//! the origin at the top-left corner. Every public write is bounds-checked and
//! silently ignores coordinates outside the buffer: off-screen geometry is a
//! normal occurrence, not a fault. The rasterizer uses an unchecked fast path
//! once its bounding box has already been clamped to the buffer.

use std::path::Path;

use crate::colors::Color;
use crate::error::BufferError;

pub struct PixelBuffer {
    pixels: Vec<Color>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Allocate a buffer of the given size, filled with transparent black.
    ///
    /// # Errors
    /// - [`BufferError::InvalidDimensions`] if either dimension is zero
    /// - [`BufferError::AllocationFailed`] if the pixel storage cannot be allocated
    pub fn new(width: u32, height: u32) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::InvalidDimensions { width, height });
        }

        let size = (width as usize)
            .checked_mul(height as usize)
            .ok_or(BufferError::AllocationFailed { width, height })?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(size)
            .map_err(|_| BufferError::AllocationFailed { width, height })?;
        pixels.resize(size, Color::default());

        log::info!("Created {}x{} pixel buffer", width, height);

        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// All pixels, row-major from the top-left corner.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// One row of pixels.
    ///
    /// # Panics
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[Color] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Overwrite every pixel with `color`.
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Set a pixel, ignoring coordinates outside the buffer.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.set_pixel_unchecked(x, y, color);
    }

    /// Write without the bounds check. Callers must have proven
    /// `x < width && y < height`.
    #[inline]
    pub(crate) fn set_pixel_unchecked(&mut self, x: u32, y: u32, color: Color) {
        debug_assert!(x < self.width && y < self.height);
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels[idx] = color;
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Copy the buffer into an [`image::RgbaImage`].
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let bytes: Vec<u8> = self
            .pixels
            .iter()
            .flat_map(|c| <[u8; 4]>::from(*c))
            .collect();
        // Length is width * height * 4 by construction.
        image::RgbaImage::from_raw(self.width, self.height, bytes)
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    /// Save through the `image` crate, picking the format from the extension.
    pub fn save_image<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.to_rgba_image().save(path)
    }

    /// Save as an uncompressed 24-bit bitmap.
    pub fn save_bitmap<P: AsRef<Path>>(&self, path: P) -> Result<(), crate::bitmap::BitmapError> {
        crate::bitmap::save(self, path)
    }
}
