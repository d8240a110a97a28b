//! Average hash: an 8x8 luma fingerprint for cheap similarity checks.
//!
//! The image is reduced to 8-bit BT.601 luma, downsampled to 8x8 with
//! Lanczos-3 and requantized to 8 bits, and each cell sets its bit when it is
//! strictly brighter than the mean of all 64 cells. Similar images differ in
//! few bits ([`AverageHash::distance`]).
//!
//! A hash with no bits set means every cell sat at or below the mean, which
//! only happens for (near) uniform content; [`AverageHash::is_flat`] reports it.

use crate::resize::{resize_f32, Filter};
use crate::{OpsError, OpsResult};
use std::fmt;
use stereo_core::Image;

/// Side length of the hash grid.
pub const HASH_SIZE: usize = 8;

/// 64-bit average hash, bit `y * 8 + x` for cell `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AverageHash(pub u64);

impl AverageHash {
    /// Hashes an image.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidDimensions`] for an empty image.
    pub fn of(image: &Image) -> OpsResult<Self> {
        if image.is_empty() {
            return Err(OpsError::InvalidDimensions(format!(
                "cannot hash a {}x{} image",
                image.width(),
                image.height()
            )));
        }
        let luma: Vec<f32> = image.to_luma().iter().map(|v| v.round()).collect();
        let cells = resize_f32(
            &luma,
            image.width() as usize,
            image.height() as usize,
            1,
            HASH_SIZE,
            HASH_SIZE,
            Filter::Lanczos3,
        )?;
        let cells: Vec<f32> = cells.iter().map(|v| v.clamp(0.0, 255.0).round()).collect();
        Ok(Self::from_cells(&cells))
    }

    /// Builds the hash from `HASH_SIZE * HASH_SIZE` cell values.
    pub fn from_cells(cells: &[f32]) -> Self {
        let mean = cells.iter().sum::<f32>() / cells.len().max(1) as f32;
        let bits = cells
            .iter()
            .take(HASH_SIZE * HASH_SIZE)
            .enumerate()
            .filter(|&(_, &v)| v > mean)
            .fold(0u64, |acc, (i, _)| acc | (1u64 << i));
        Self(bits)
    }

    /// Hamming distance to another hash.
    #[inline]
    pub fn distance(&self, other: &Self) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// `true` if no cell was above the mean (uniform content).
    #[inline]
    pub fn is_flat(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for AverageHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Image {
        let mut img = Image::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = (x * 255 / width.max(1)) as u8;
                img.set_pixel(x, y, [v, v, v]);
            }
        }
        img
    }

    #[test]
    fn test_flat_image_hashes_flat() {
        let hash = AverageHash::of(&Image::filled(40, 30, [95, 147, 89])).unwrap();
        assert!(hash.is_flat());
    }

    #[test]
    fn test_gradient_sets_right_half() {
        let hash = AverageHash::of(&gradient(64, 64)).unwrap();
        assert!(!hash.is_flat());
        // Brighter right half of each row.
        for y in 0..HASH_SIZE {
            for x in 0..HASH_SIZE {
                let bit = (hash.0 >> (y * HASH_SIZE + x)) & 1;
                assert_eq!(bit, (x >= HASH_SIZE / 2) as u64, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_distance() {
        let a = AverageHash(0b1011);
        let b = AverageHash(0b0001);
        assert_eq!(a.distance(&b), 2);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn test_same_content_same_hash() {
        let a = AverageHash::of(&gradient(50, 20)).unwrap();
        let b = AverageHash::of(&gradient(50, 20)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_image_rejected() {
        assert!(AverageHash::of(&Image::new(0, 5)).is_err());
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(AverageHash(0xff).to_string(), "00000000000000ff");
    }
}
