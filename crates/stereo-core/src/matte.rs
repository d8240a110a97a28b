//! Single-channel masks.
//!
//! - [`RawMask`] - 8-bit person/non-person grid as returned by a segmenter
//! - [`AlphaMatte`] - per-pixel opacity in `[0, 1]`, broadcast over RGB
//!
//! A matte is always derived from a specific image and keeps that image's
//! dimensions. Any resize of one must be mirrored on the other before they
//! are combined.

use crate::{Error, Result};

/// Sample value marking a person pixel in a [`RawMask`].
pub const MASK_PERSON: u8 = 255;

/// Samples at or above this value count as person pixels.
pub const MASK_THRESHOLD: u8 = 128;

/// Raw segmentation output: one 8-bit class-membership sample per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMask {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl RawMask {
    /// Creates a mask with no person pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Creates a mask from row-major samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height`.
    pub fn from_data(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        check_len(width, height, data.len())?;
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a mask from a boolean grid (`true` = person).
    pub fn from_bools(width: u32, height: u32, cells: &[bool]) -> Result<Self> {
        check_len(width, height, cells.len())?;
        let data = cells
            .iter()
            .map(|&p| if p { MASK_PERSON } else { 0 })
            .collect();
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the mask width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the mask height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the raw samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns `true` if the sample at `(x, y)` is a person pixel.
    #[inline]
    pub fn is_person(&self, x: u32, y: u32) -> bool {
        self.data[y as usize * self.width as usize + x as usize] >= MASK_THRESHOLD
    }

    /// Returns the mask binarized to `{0, 255}`.
    pub fn binarized(&self) -> Vec<u8> {
        self.data
            .iter()
            .map(|&v| if v >= MASK_THRESHOLD { MASK_PERSON } else { 0 })
            .collect()
    }
}

/// Per-pixel opacity in `[0, 1]`.
///
/// Construction clamps every value into range (`NaN` becomes `0.0`), so a
/// matte can never carry an out-of-range weight into compositing.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMatte {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

impl AlphaMatte {
    /// Creates a fully transparent matte.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// Creates a matte with a constant value.
    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        Self {
            data: vec![clamp_unit(value); width as usize * height as usize],
            width,
            height,
        }
    }

    /// Creates a matte from row-major values, clamping them into `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height`.
    pub fn from_data(width: u32, height: u32, mut data: Vec<f32>) -> Result<Self> {
        check_len(width, height, data.len())?;
        for v in &mut data {
            *v = clamp_unit(*v);
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the matte width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the matte height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the values in row-major order.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns the value at `(x, y)`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Quantizes to 8-bit grayscale (`round(alpha * 255)`).
    pub fn to_u8(&self) -> Vec<u8> {
        self.data.iter().map(|&a| (a * 255.0).round() as u8).collect()
    }
}

#[inline]
fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

fn check_len(width: u32, height: u32, len: usize) -> Result<()> {
    let expected = width as usize * height as usize;
    if len != expected {
        return Err(Error::invalid_dimensions(
            width,
            height,
            format!("expected {} elements, got {}", expected, len),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_mask_threshold() {
        let mask = RawMask::from_data(3, 1, vec![0, 127, 128]).unwrap();
        assert!(!mask.is_person(0, 0));
        assert!(!mask.is_person(1, 0));
        assert!(mask.is_person(2, 0));
        assert_eq!(mask.binarized(), vec![0, 0, 255]);
    }

    #[test]
    fn test_raw_mask_from_bools() {
        let mask = RawMask::from_bools(2, 1, &[true, false]).unwrap();
        assert_eq!(mask.data(), &[255, 0]);
        assert!(RawMask::from_bools(2, 2, &[true]).is_err());
    }

    #[test]
    fn test_matte_clamps() {
        let matte = AlphaMatte::from_data(4, 1, vec![-0.5, 0.25, 2.0, f32::NAN]).unwrap();
        assert_eq!(matte.data(), &[0.0, 0.25, 1.0, 0.0]);
    }

    #[test]
    fn test_matte_to_u8() {
        let matte = AlphaMatte::from_data(2, 1, vec![1.0, 0.5]).unwrap();
        assert_eq!(matte.to_u8(), vec![255, 128]);
    }
}
