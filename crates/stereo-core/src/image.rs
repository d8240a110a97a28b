//! RGB image buffer.
//!
//! [`Image`] is the one in-memory picture type every stage consumes and
//! produces. Pixels are 8-bit RGB, stored **row-major**, top-to-bottom:
//!
//! ```text
//! Memory: [R G B R G B R G B ...]  <- Row 0
//!         [R G B R G B R G B ...]  <- Row 1
//!         ...
//! ```
//!
//! Grayscale and RGBA sources are converted to this layout at the I/O
//! boundary, so nothing downstream branches on channel count.
//!
//! # Usage
//!
//! ```rust
//! use stereo_core::Image;
//!
//! let mut img = Image::filled(4, 2, [95, 147, 89]);
//! img.set_pixel(1, 1, [255, 0, 0]);
//! assert_eq!(img.pixel(1, 1), [255, 0, 0]);
//! assert_eq!(img.pixel(0, 0), [95, 147, 89]);
//! ```

use crate::{Error, Result};

/// Number of interleaved samples per pixel.
pub const CHANNELS: usize = 3;

/// ITU-R BT.601 luma weights (R, G, B).
pub const BT601_LUMA: [f32; 3] = [0.299, 0.587, 0.114];

/// Owned 8-bit RGB image.
///
/// Cloning copies the pixel buffer. Operations return new images instead of
/// mutating their inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Interleaved RGB samples
    data: Vec<u8>,
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
}

impl Image {
    /// Creates a black image.
    ///
    /// ```rust
    /// use stereo_core::Image;
    ///
    /// let img = Image::new(640, 480);
    /// assert_eq!(img.dimensions(), (640, 480));
    /// assert!(img.data().iter().all(|&v| v == 0));
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; sample_count(width, height)],
            width,
            height,
        }
    }

    /// Creates an image from existing interleaved RGB data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height * 3`.
    pub fn from_data(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = sample_count(width, height);
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} elements, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Wraps a buffer whose length the caller has already guaranteed.
    pub(crate) fn from_parts(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), sample_count(width, height));
        Self {
            data,
            width,
            height,
        }
    }

    /// Creates an image with every pixel set to `rgb`.
    pub fn filled(width: u32, height: u32, rgb: [u8; CHANNELS]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * CHANNELS);
        for _ in 0..pixel_count {
            data.extend_from_slice(&rgb);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Creates an image from samples on the 0..=255 scale.
    ///
    /// Each sample is clamped to `[0, 255]` and rounded to the nearest level.
    /// Used after resampling, where filter overshoot is expected.
    pub fn from_f32_rounded(width: u32, height: u32, samples: &[f32]) -> Result<Self> {
        let data = samples
            .iter()
            .map(|&v| v.clamp(0.0, 255.0).round() as u8)
            .collect();
        Self::from_data(width, height, data)
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the raw interleaved samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the raw interleaved samples mutably.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the image and returns its sample buffer.
    #[inline]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds. Use [`get_pixel`](Self::get_pixel)
    /// for a checked variant.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; CHANNELS] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Returns the pixel at `(x, y)` or [`Error::OutOfBounds`].
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<[u8; CHANNELS]> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        Ok(self.pixel(x, y))
    }

    /// Sets the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; CHANNELS]) {
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&rgb);
    }

    /// Returns one row of interleaved samples.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * CHANNELS;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Returns the samples as `f32` on the 0..=255 scale.
    pub fn to_f32(&self) -> Vec<f32> {
        self.data.iter().map(|&v| v as f32).collect()
    }

    /// Returns per-pixel BT.601 luma on the 0..=255 scale.
    pub fn to_luma(&self) -> Vec<f32> {
        self.data
            .chunks_exact(CHANNELS)
            .map(|px| {
                BT601_LUMA[0] * px[0] as f32
                    + BT601_LUMA[1] * px[1] as f32
                    + BT601_LUMA[2] * px[2] as f32
            })
            .collect()
    }

    /// Fails with [`Error::DimensionMismatch`] unless `other` has the same size.
    pub fn ensure_same_dimensions(&self, other: (u32, u32)) -> Result<()> {
        if self.dimensions() != other {
            return Err(Error::dimension_mismatch(self.dimensions(), other));
        }
        Ok(())
    }
}

#[inline]
fn sample_count(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}
