//! End-to-end stereo generation.
//!
//! [`generate`] wires the stages together:
//!
//! ```text
//! person ──segment──> RawMask ──clean──> AlphaMatte ─┐
//! background ──split──> (left, right) ───────────────┼─normalize─> scene
//!                                                    │
//! scene ──composite──> StereoPair ──encode──> anaglyph
//! ```
//!
//! The segmentation model is not part of this crate. It is passed in as a
//! [`Segmenter`].

use crate::anaglyph::encode_pair;
use crate::composite::{check_shift, composite};
use crate::mask::MaskCleaner;
use crate::normalize::{normalize, Foreground};
use crate::split::{SplitKind, StereoSplitter};
use crate::{OpsError, OpsResult};
use stereo_core::{AlphaMatte, Image, RawMask};
use tracing::{debug, info};

/// Fill color of the built-in background.
pub const DEFAULT_BACKGROUND_RGB: [u8; 3] = [95, 147, 89];

/// Side length of the built-in background.
pub const DEFAULT_BACKGROUND_SIZE: u32 = 512;

/// Person segmentation backend.
///
/// Implementations return one mask value per pixel, `>= 128` for person.
/// The mask must have the image's dimensions.
pub trait Segmenter {
    /// Backend error, reported as the source of [`OpsError::Segmentation`].
    type Error: std::error::Error + Send + Sync + 'static;

    /// Segments the person in `image`.
    fn segment(&self, image: &Image) -> Result<RawMask, Self::Error>;
}

impl<S: Segmenter + ?Sized> Segmenter for &S {
    type Error = S::Error;

    fn segment(&self, image: &Image) -> Result<RawMask, Self::Error> {
        (**self).segment(image)
    }
}

/// The built-in 512x512 background.
pub fn default_background() -> Image {
    Image::filled(DEFAULT_BACKGROUND_SIZE, DEFAULT_BACKGROUND_SIZE, DEFAULT_BACKGROUND_RGB)
}

/// Parameters of one [`generate`] call.
///
/// ```rust
/// use stereo_ops::pipeline::StereoParams;
///
/// let params = StereoParams::default().with_shift(6).with_person_size(80);
/// assert_eq!(params.shift_pixels, 6);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StereoParams {
    /// Horizontal disparity in pixels. Positive pushes the person behind the
    /// screen plane.
    pub shift_pixels: i32,
    /// Person size relative to the frame-matched size, in percent.
    pub person_size_percent: u32,
    /// Used when no background is supplied.
    #[cfg_attr(feature = "serde", serde(skip, default = "default_background"))]
    pub default_background: Image,
    /// Background splitting.
    pub splitter: StereoSplitter,
    /// Mask cleanup.
    pub cleaner: MaskCleaner,
}

impl Default for StereoParams {
    fn default() -> Self {
        Self {
            shift_pixels: 10,
            person_size_percent: 100,
            default_background: default_background(),
            splitter: StereoSplitter::default(),
            cleaner: MaskCleaner::default(),
        }
    }
}

impl StereoParams {
    /// Sets the disparity.
    pub fn with_shift(mut self, shift_pixels: i32) -> Self {
        self.shift_pixels = shift_pixels;
        self
    }

    /// Sets the person size percentage.
    pub fn with_person_size(mut self, percent: u32) -> Self {
        self.person_size_percent = percent;
        self
    }

    /// Replaces the built-in background.
    pub fn with_default_background(mut self, background: Image) -> Self {
        self.default_background = background;
        self
    }

    /// Replaces the splitter settings.
    pub fn with_splitter(mut self, splitter: StereoSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    /// Replaces the mask cleanup settings.
    pub fn with_cleaner(mut self, cleaner: MaskCleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    /// Checks everything that can be checked without pixels.
    pub fn validate(&self) -> OpsResult<()> {
        if self.person_size_percent == 0 {
            return Err(OpsError::invalid_parameter(
                "person_size_percent",
                0,
                "a positive percentage",
            ));
        }
        self.splitter.validate()?;
        for (name, size) in [
            ("erode_size", self.cleaner.erode_size),
            ("blur_size", self.cleaner.blur_size),
        ] {
            if size % 2 == 0 {
                return Err(OpsError::invalid_parameter(name, size as i64, "an odd number"));
            }
        }
        Ok(())
    }
}

/// Everything one [`generate`] call produces.
#[derive(Debug, Clone)]
pub struct StereoOutputs {
    /// Person cutout (`person * matte`) in the frame.
    pub segmentation: Image,
    /// Matte in the frame.
    pub matte: AlphaMatte,
    /// Left eye view.
    pub left_eye: Image,
    /// Right eye view.
    pub right_eye: Image,
    /// Left and right side by side.
    pub stereo_pair: Image,
    /// Red-cyan anaglyph.
    pub anaglyph: Image,
    /// How the background was split.
    pub split: SplitKind,
}

/// Runs the whole pipeline.
///
/// Checks run in this order, each before any later work: parameters, shift
/// against the background width, segmentation, shift against the final
/// frame width.
///
/// # Errors
///
/// - [`OpsError::InvalidParameter`] for bad parameters or shift
/// - [`OpsError::Segmentation`] / [`OpsError::SegmentationShape`] when the
///   backend fails or returns a mask of the wrong size
/// - [`OpsError::InvalidDimensions`] for an empty person or background
pub fn generate<S: Segmenter + ?Sized>(
    segmenter: &S,
    person: &Image,
    background: Option<&Image>,
    params: &StereoParams,
) -> OpsResult<StereoOutputs> {
    params.validate()?;
    let background = background.unwrap_or(&params.default_background);
    check_shift(params.shift_pixels, background.width())?;

    info!(
        person = ?person.dimensions(),
        background = ?background.dimensions(),
        shift = params.shift_pixels,
        size = params.person_size_percent,
        "Generating stereo view"
    );

    let mask = segmenter
        .segment(person)
        .map_err(|e| OpsError::Segmentation(Box::new(e)))?;
    if mask.dimensions() != person.dimensions() {
        return Err(OpsError::SegmentationShape {
            expected: person.dimensions(),
            actual: mask.dimensions(),
        });
    }
    let matte = params.cleaner.clean(&mask)?;

    let split = params.splitter.split(background)?;
    debug!(kind = %split.kind, left = ?split.left.dimensions(), right = ?split.right.dimensions(), "Background split");

    let scene = normalize(
        person,
        &matte,
        &split.left,
        &split.right,
        params.person_size_percent,
    )?;

    let pair = composite(
        &scene.person,
        &scene.matte,
        &scene.left,
        &scene.right,
        params.shift_pixels,
    )?;
    let anaglyph = encode_pair(&pair)?;
    let stereo_pair = pair.side_by_side();
    let foreground = Foreground::new(scene.person, scene.matte)?;
    let segmentation = foreground.cutout()?;
    let (_, matte) = foreground.into_parts();
    let (left_eye, right_eye) = pair.into_parts();

    debug!(frame = ?left_eye.dimensions(), stereo = ?stereo_pair.dimensions(), "Stereo view done");

    Ok(StereoOutputs {
        segmentation,
        matte,
        left_eye,
        right_eye,
        stereo_pair,
        anaglyph,
        split: split.kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("no model")]
    struct NoModel;

    struct Failing;

    impl Segmenter for Failing {
        type Error = NoModel;

        fn segment(&self, _: &Image) -> Result<RawMask, NoModel> {
            Err(NoModel)
        }
    }

    struct Everyone;

    impl Segmenter for Everyone {
        type Error = NoModel;

        fn segment(&self, image: &Image) -> Result<RawMask, NoModel> {
            Ok(RawMask::from_data(
                image.width(),
                image.height(),
                vec![255; image.pixel_count()],
            )
            .expect("mask size"))
        }
    }

    #[test]
    fn test_defaults() {
        let params = StereoParams::default();
        assert_eq!(params.shift_pixels, 10);
        assert_eq!(params.person_size_percent, 100);
        assert_eq!(params.default_background.dimensions(), (512, 512));
        assert_eq!(params.default_background.pixel(0, 0), [95, 147, 89]);
    }

    #[test]
    fn test_validate_rejects_zero_percent_and_even_kernels() {
        assert!(StereoParams::default().with_person_size(0).validate().is_err());
        let cleaner = MaskCleaner {
            blur_size: 4,
            ..MaskCleaner::default()
        };
        assert!(StereoParams::default().with_cleaner(cleaner).validate().is_err());
    }

    #[test]
    fn test_segmentation_error_keeps_source() {
        let person = Image::new(8, 8);
        let err = generate(&Failing, &person, None, &StereoParams::default()).unwrap_err();
        assert!(err.is_upstream());
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("no model"));
    }

    #[test]
    fn test_shift_checked_before_segmentation() {
        let bg = Image::new(4, 4);
        let params = StereoParams::default().with_shift(4);
        // Failing would report a segmentation error if it were reached.
        let err = generate(&Failing, &Image::new(8, 8), Some(&bg), &params).unwrap_err();
        assert!(matches!(err, OpsError::InvalidParameter { name: "shift_pixels", .. }));
    }

    #[test]
    fn test_default_background_used() {
        let person = Image::filled(32, 64, [250, 250, 250]);
        let out = generate(&Everyone, &person, None, &StereoParams::default()).unwrap();
        assert_eq!(out.split, SplitKind::Synthesized);
        assert_eq!(out.left_eye.dimensions(), (512, 512));
        assert_eq!(out.stereo_pair.dimensions(), (1024, 512));
    }
}
