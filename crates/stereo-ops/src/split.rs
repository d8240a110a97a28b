//! Stereo background splitting.
//!
//! A background may already be a side-by-side stereo pair. The image is cut
//! at `width / 2` and the halves compared with an [`AverageHash`]: when they
//! are close, they are returned as the left and right views. Otherwise the
//! whole image becomes the left view and a slightly shrunk copy stands in for
//! the right one, which gives the eyes a small scale cue.
//!
//! A half that hashes flat has no structure to compare, so a uniform
//! background always takes the synthesized branch.

use crate::hash::AverageHash;
use crate::resize::{resize_image, scale_dimensions, Filter};
use crate::transform::crop;
use crate::{OpsError, OpsResult};
use std::fmt;
use stereo_core::{Image, CHANNELS};
use tracing::debug;

/// Which branch produced a [`SplitBackground`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitKind {
    /// The halves were similar and are used as is.
    StereoPair,
    /// Original plus a scaled copy.
    Synthesized,
}

impl fmt::Display for SplitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitKind::StereoPair => f.write_str("stereo pair"),
            SplitKind::Synthesized => f.write_str("synthesized"),
        }
    }
}

/// Left and right backgrounds. Their sizes may differ.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitBackground {
    /// Left view.
    pub left: Image,
    /// Right view.
    pub right: Image,
    /// Branch taken.
    pub kind: SplitKind,
}

/// Splitter settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StereoSplitter {
    /// Halves whose hashes differ in fewer bits than this are a stereo pair.
    pub similarity_threshold: u32,
    /// Scale of the synthesized right view.
    pub fallback_scale: f32,
}

impl Default for StereoSplitter {
    fn default() -> Self {
        Self {
            similarity_threshold: 10,
            fallback_scale: 0.99,
        }
    }
}

impl StereoSplitter {
    /// Checks the settings.
    pub fn validate(&self) -> OpsResult<()> {
        if !self.fallback_scale.is_finite() || self.fallback_scale <= 0.0 {
            return Err(OpsError::invalid_parameter(
                "fallback_scale_percent",
                (self.fallback_scale * 100.0) as i64,
                "a positive finite scale",
            ));
        }
        Ok(())
    }

    /// Splits a background into left and right views.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidDimensions`] for an empty background,
    /// [`OpsError::InvalidParameter`] for a bad `fallback_scale`.
    pub fn split(&self, background: &Image) -> OpsResult<SplitBackground> {
        self.validate()?;
        if background.is_empty() {
            return Err(OpsError::InvalidDimensions(format!(
                "background is {}x{}",
                background.width(),
                background.height()
            )));
        }

        if let Some((left, right)) = halves(background)? {
            if self.are_stereo(&left, &right)? {
                debug!(half = ?left.dimensions(), "Background is a stereo pair");
                return Ok(SplitBackground {
                    left,
                    right,
                    kind: SplitKind::StereoPair,
                });
            }
        }

        let (w, h) = scale_dimensions(background.width(), background.height(), self.fallback_scale);
        debug!(
            width = background.width(),
            height = background.height(),
            right_w = w,
            right_h = h,
            "Synthesizing right background"
        );
        let right = resize_image(background, w, h, Filter::Bicubic)?;
        Ok(SplitBackground {
            left: background.clone(),
            right,
            kind: SplitKind::Synthesized,
        })
    }

    /// `true` if the two images hash within the threshold and neither is flat.
    pub fn are_stereo(&self, left: &Image, right: &Image) -> OpsResult<bool> {
        let a = AverageHash::of(left)?;
        let b = AverageHash::of(right)?;
        if a.is_flat() || b.is_flat() {
            debug!(left = %a, right = %b, "Flat half, no similarity");
            return Ok(false);
        }
        let distance = a.distance(&b);
        debug!(left = %a, right = %b, distance, "Half hashes");
        Ok(distance < self.similarity_threshold)
    }
}

/// Cuts an image at `width / 2`. `None` below 2 pixels of width.
///
/// For odd widths the right half is one column wider.
pub fn halves(image: &Image) -> OpsResult<Option<(Image, Image)>> {
    let (w, h) = image.dimensions();
    if w < 2 || h == 0 {
        return Ok(None);
    }
    let mid = w / 2;
    let (ws, hs) = (w as usize, h as usize);
    let left = crop(image.data(), ws, hs, CHANNELS, 0, 0, mid as usize, hs)?;
    let right = crop(image.data(), ws, hs, CHANNELS, mid as usize, 0, (w - mid) as usize, hs)?;
    Ok(Some((
        Image::from_data(mid, h, left)?,
        Image::from_data(w - mid, h, right)?,
    )))
}

/// Splits with the default settings.
pub fn split_background(background: &Image) -> OpsResult<SplitBackground> {
    StereoSplitter::default().split(background)
}
