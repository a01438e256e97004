//! RGBA pixel buffer shared by every editing operation.
//!
//! A [`PixelBuffer`] owns `width * height` RGBA samples (4 bytes per pixel,
//! row-major, top-to-bottom). Operations never resize a buffer in place: any
//! change of dimensions produces a new buffer.

use thiserror::Error;

/// Number of bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// Opaque white, used as the compositing background.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Errors raised when constructing a [`PixelBuffer`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Sample data length doesn't match the dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    PixelDataMismatch { expected: usize, actual: usize },
}

/// An in-memory RGBA8 raster image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer from caller-supplied RGBA samples.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidDimensions`] when either dimension is zero
    /// and [`BufferError::PixelDataMismatch`] when `pixels.len()` is not
    /// `width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BufferError> {
        let expected = byte_len(width, height)?;
        if pixels.len() != expected {
            return Err(BufferError::PixelDataMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a zero-filled (transparent black) buffer.
    pub fn blank(width: u32, height: u32) -> Result<Self, BufferError> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Create a buffer where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Result<Self, BufferError> {
        byte_len(width, height)?;
        Ok(Self::canvas(width, height, color))
    }

    /// Create a buffer from packed RGB data, making every pixel opaque.
    pub fn from_rgb(width: u32, height: u32, rgb: &[u8]) -> Result<Self, BufferError> {
        let len = byte_len(width, height)?;
        let expected = len / CHANNELS * 3;
        if rgb.len() != expected {
            return Err(BufferError::PixelDataMismatch {
                expected,
                actual: rgb.len(),
            });
        }
        let mut pixels = Vec::with_capacity(len);
        for px in rgb.chunks_exact(3) {
            pixels.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a buffer from dimensions already known to be valid.
    pub(crate) fn from_parts(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert!(width > 0 && height > 0, "zero-sized buffer");
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Same as [`PixelBuffer::filled`] for dimensions already known to be valid.
    pub(crate) fn canvas(width: u32, height: u32, color: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for _ in 0..width as usize * height as usize {
            pixels.extend_from_slice(&color);
        }
        Self::from_parts(width, height, pixels)
    }

    /// Create a PixelBuffer from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Result<Self, BufferError> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// Convert to an `image::RgbaImage` for resampling.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw RGBA samples in row-major order.
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the buffer, returning its raw RGBA samples.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// Read the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the buffer.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.index(x, y);
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Overwrite the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the buffer.
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, value: [u8; 4]) {
        let idx = self.index(x, y);
        self.pixels[idx..idx + CHANNELS].copy_from_slice(&value);
    }

    /// Borrow row `y` as a slice of `width * 4` bytes.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        let stride = self.stride();
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }

    pub(crate) fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.pixels[start..start + stride]
    }

    #[inline]
    pub(crate) fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} buffer",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }
}

fn byte_len(width: u32, height: u32) -> Result<usize, BufferError> {
    if width == 0 || height == 0 {
        return Err(BufferError::InvalidDimensions { width, height });
    }
    Ok(width as usize * height as usize * CHANNELS)
}
