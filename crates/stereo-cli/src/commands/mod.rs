//! CLI command implementations

pub mod anaglyph;
pub mod clean_mask;
pub mod generate;
pub mod split;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use stereo_core::{AlphaMatte, Image, RawMask};
use stereo_io::IoError;
use stereo_ops::Segmenter;

/// Load image from path
pub fn load_image(path: &Path) -> Result<Image> {
    stereo_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Load a segmentation mask from path
pub fn load_mask(path: &Path) -> Result<RawMask> {
    stereo_io::read_mask(path).with_context(|| format!("Failed to load mask: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &Image) -> Result<()> {
    stereo_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Save matte to path as 8-bit grayscale
pub fn save_matte(path: &Path, matte: &AlphaMatte) -> Result<()> {
    stereo_io::write_matte(path, matte)
        .with_context(|| format!("Failed to save: {}", path.display()))
}

/// Segmenter backed by a precomputed mask file.
///
/// The file is read on every call; the image is only used by the pipeline
/// to check the mask's size.
pub struct MaskFileSegmenter {
    path: PathBuf,
}

impl MaskFileSegmenter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Segmenter for MaskFileSegmenter {
    type Error = IoError;

    fn segment(&self, _image: &Image) -> Result<RawMask, IoError> {
        stereo_io::read_mask(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_file_segmenter_reads_mask() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        let matte = AlphaMatte::from_data(2, 2, vec![1.0, 0.0, 0.0, 1.0]).unwrap();
        stereo_io::write_matte(&path, &matte).unwrap();

        let segmenter = MaskFileSegmenter::new(&path);
        let mask = segmenter.segment(&Image::new(2, 2)).unwrap();
        assert_eq!(mask.data(), &[255, 0, 0, 255]);
    }

    #[test]
    fn test_missing_mask_file_is_error() {
        let segmenter = MaskFileSegmenter::new("/nonexistent/mask.png");
        assert!(segmenter.segment(&Image::new(1, 1)).is_err());
    }
}
