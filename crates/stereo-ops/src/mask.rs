//! Raw segmentation mask to alpha matte.
//!
//! The steps run in a fixed order; changing it changes the output:
//!
//! 1. binarize to `{0, 255}` and erode with a 7x7 square, once, to drop thin
//!    boundary artifacts and stray pixels
//! 2. Gaussian blur, 3x3, sigma derived from the size, to soften the edge into
//!    a ramp; the result is requantized to 8-bit levels
//! 3. divide by 255
//!
//! The matte stays single-channel; compositing broadcasts it over RGB.

use crate::filter::{convolve, erode, Border, Kernel};
use crate::OpsResult;
use stereo_core::{AlphaMatte, RawMask};
use tracing::debug;

/// Mask post-processing settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MaskCleaner {
    /// Side of the square erosion element (odd).
    pub erode_size: usize,
    /// Side of the Gaussian kernel (odd).
    pub blur_size: usize,
    /// Gaussian sigma; `<= 0` derives it from `blur_size`.
    pub blur_sigma: f32,
}

impl Default for MaskCleaner {
    fn default() -> Self {
        Self {
            erode_size: 7,
            blur_size: 3,
            blur_sigma: 0.0,
        }
    }
}

impl MaskCleaner {
    /// Turns a raw mask into a matte of the same dimensions.
    ///
    /// Only fails when `erode_size` or `blur_size` is even; the default
    /// settings always succeed.
    pub fn clean(&self, mask: &RawMask) -> OpsResult<AlphaMatte> {
        let (width, height) = mask.dimensions();
        debug!(width, height, erode = self.erode_size, blur = self.blur_size, "Cleaning mask");

        let kernel = Kernel::gaussian(self.blur_size, self.blur_sigma)?;
        let binary: Vec<f32> = mask.binarized().into_iter().map(f32::from).collect();
        let (w, h) = (width as usize, height as usize);

        let eroded = erode(&binary, w, h, 1, self.erode_size)?;
        let blurred = convolve(&eroded, w, h, 1, &kernel, Border::Reflect101)?;

        let alpha = blurred
            .into_iter()
            .map(|v| v.clamp(0.0, 255.0).round() / 255.0)
            .collect();
        Ok(AlphaMatte::from_data(width, height, alpha)?)
    }
}

/// Cleans a mask with the default settings (7x7 erosion, 3x3 blur).
///
/// ```rust
/// use stereo_core::RawMask;
/// use stereo_ops::mask::clean_mask;
///
/// let mask = RawMask::from_data(16, 16, vec![255; 256]).unwrap();
/// let matte = clean_mask(&mask).unwrap();
/// assert!(matte.data().iter().all(|&a| a == 1.0));
/// ```
pub fn clean_mask(mask: &RawMask) -> OpsResult<AlphaMatte> {
    MaskCleaner::default().clean(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square_mask(size: u32, from: u32, to: u32) -> RawMask {
        let mut data = vec![0u8; (size * size) as usize];
        for y in from..to {
            for x in from..to {
                data[(y * size + x) as usize] = 255;
            }
        }
        RawMask::from_data(size, size, data).unwrap()
    }

    #[test]
    fn test_matte_values_in_unit_range() {
        let matte = clean_mask(&square_mask(20, 4, 16)).unwrap();
        assert_eq!(matte.dimensions(), (20, 20));
        assert!(matte.data().iter().all(|&a| (0.0..=1.0).contains(&a)));
    }

    #[test]
    fn test_erosion_then_soft_edge() {
        // Square 4..16 erodes to 7..13; the blur leaves a quarter step just outside.
        let matte = clean_mask(&square_mask(20, 4, 16)).unwrap();
        assert_eq!(matte.get(10, 10), 1.0);
        assert_eq!(matte.get(4, 10), 0.0);
        assert_abs_diff_eq!(matte.get(6, 10), 64.0 / 255.0, epsilon = 1e-6);
        assert_abs_diff_eq!(matte.get(7, 10), 191.0 / 255.0, epsilon = 1e-6);
    }

    #[test]
    fn test_small_blob_removed() {
        let matte = clean_mask(&square_mask(20, 9, 12)).unwrap();
        assert!(matte.data().iter().all(|&a| a == 0.0));
    }

    #[test]
    fn test_boolean_mask_equivalent() {
        let cells: Vec<bool> = square_mask(20, 4, 16).data().iter().map(|&v| v == 255).collect();
        let from_bools = RawMask::from_bools(20, 20, &cells).unwrap();
        assert_eq!(
            clean_mask(&from_bools).unwrap(),
            clean_mask(&square_mask(20, 4, 16)).unwrap()
        );
    }

    #[test]
    fn test_even_sizes_rejected() {
        let cleaner = MaskCleaner {
            erode_size: 6,
            ..MaskCleaner::default()
        };
        assert!(cleaner.clean(&square_mask(8, 2, 6)).is_err());
    }
}
