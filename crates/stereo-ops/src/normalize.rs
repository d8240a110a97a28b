//! Geometric normalization: bring person, matte and both background halves
//! onto one pixel grid.
//!
//! The frame is the left background's size. The person goes through four
//! steps, and its matte goes through the same four with the same numbers:
//!
//! 1. [`resize_to_match_width_or_height`] against the frame
//! 2. [`scale_by_size_percent`]
//! 3. center pad up to the frame (zero fill)
//! 4. center crop down to the frame
//!
//! [`Foreground`] holds the image and matte together so a step can never be
//! applied to one and not the other.

use crate::error::ensure_dims;
use crate::resize::{resize_image, resize_matte, Filter};
use crate::transform::{center_crop, center_pad};
use crate::{OpsError, OpsResult};
use stereo_core::{AlphaMatte, Image, CHANNELS};
use tracing::debug;

/// Resampling filter for images.
pub const IMAGE_FILTER: Filter = Filter::Bicubic;

/// Resampling filter for mattes.
pub const MATTE_FILTER: Filter = Filter::Bilinear;

/// Size of `size` scaled to the frame's width when the frame is wider than
/// tall, else to its height. The other side follows the aspect ratio.
///
/// ```rust
/// use stereo_ops::normalize::match_width_or_height;
///
/// assert_eq!(match_width_or_height((100, 200), (300, 200)), (300, 600));
/// assert_eq!(match_width_or_height((100, 200), (200, 300)), (150, 300));
/// ```
pub fn match_width_or_height(size: (u32, u32), frame: (u32, u32)) -> (u32, u32) {
    let (w, h) = (size.0.max(1) as f64, size.1.max(1) as f64);
    let (fw, fh) = frame;
    if fw > fh {
        let new_h = (h * fw as f64 / w).round() as u32;
        (fw, new_h.max(1))
    } else {
        let new_w = (w * fh as f64 / h).round() as u32;
        (new_w.max(1), fh)
    }
}

/// Size of `size` scaled by `percent / 100`, truncated, at least 1.
///
/// ```rust
/// use stereo_ops::normalize::percent_dimensions;
///
/// assert_eq!(percent_dimensions((300, 600), 50), (150, 300));
/// assert_eq!(percent_dimensions((3, 3), 50), (1, 1));
/// ```
pub fn percent_dimensions(size: (u32, u32), percent: u32) -> (u32, u32) {
    let scale = |v: u32| ((v as u64 * percent as u64) / 100).clamp(1, u32::MAX as u64) as u32;
    (scale(size.0), scale(size.1))
}

/// Resizes an image so its width (landscape frame) or height (portrait or
/// square frame) equals the frame's.
pub fn resize_to_match_width_or_height(image: &Image, frame: (u32, u32)) -> OpsResult<Image> {
    let (w, h) = match_width_or_height(image.dimensions(), frame);
    resize_image(image, w, h, IMAGE_FILTER)
}

/// Scales an image by an integer percentage.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] for `percent == 0`.
pub fn scale_by_size_percent(image: &Image, percent: u32) -> OpsResult<Image> {
    check_percent(percent)?;
    let (w, h) = percent_dimensions(image.dimensions(), percent);
    resize_image(image, w, h, IMAGE_FILTER)
}

/// Zero-pads an image symmetrically up to `target_w x target_h`.
pub fn center_pad_image(image: &Image, target_w: u32, target_h: u32) -> OpsResult<Image> {
    let (data, w, h) = center_pad(
        image.data(),
        image.width() as usize,
        image.height() as usize,
        CHANNELS,
        target_h as usize,
        target_w as usize,
        0u8,
    );
    Ok(Image::from_data(w as u32, h as u32, data)?)
}

/// Zero-pads a matte symmetrically up to `target_w x target_h`.
pub fn center_pad_matte(matte: &AlphaMatte, target_w: u32, target_h: u32) -> OpsResult<AlphaMatte> {
    let (data, w, h) = center_pad(
        matte.data(),
        matte.width() as usize,
        matte.height() as usize,
        1,
        target_h as usize,
        target_w as usize,
        0.0f32,
    );
    Ok(AlphaMatte::from_data(w as u32, h as u32, data)?)
}

/// Crops an image symmetrically down to `target_w x target_h`.
pub fn center_crop_image(image: &Image, target_w: u32, target_h: u32) -> OpsResult<Image> {
    let (data, w, h) = center_crop(
        image.data(),
        image.width() as usize,
        image.height() as usize,
        CHANNELS,
        target_h as usize,
        target_w as usize,
    )?;
    Ok(Image::from_data(w as u32, h as u32, data)?)
}

/// Crops a matte symmetrically down to `target_w x target_h`.
pub fn center_crop_matte(matte: &AlphaMatte, target_w: u32, target_h: u32) -> OpsResult<AlphaMatte> {
    let (data, w, h) = center_crop(
        matte.data(),
        matte.width() as usize,
        matte.height() as usize,
        1,
        target_h as usize,
        target_w as usize,
    )?;
    Ok(AlphaMatte::from_data(w as u32, h as u32, data)?)
}

/// A person image and its matte, kept at identical dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Foreground {
    image: Image,
    matte: AlphaMatte,
}

impl Foreground {
    /// Pairs an image with its matte.
    ///
    /// # Errors
    ///
    /// [`OpsError::DimensionMismatch`] if the sizes differ.
    pub fn new(image: Image, matte: AlphaMatte) -> OpsResult<Self> {
        ensure_dims("person matte", image.dimensions(), matte.dimensions())?;
        Ok(Self { image, matte })
    }

    /// The person image.
    #[inline]
    pub fn image(&self) -> &Image {
        &self.image
    }

    /// The matte.
    #[inline]
    pub fn matte(&self) -> &AlphaMatte {
        &self.matte
    }

    /// Shared `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Splits into `(image, matte)`.
    pub fn into_parts(self) -> (Image, AlphaMatte) {
        (self.image, self.matte)
    }

    /// Resizes both, bicubic for the image and bilinear for the matte.
    pub fn resize(&self, width: u32, height: u32) -> OpsResult<Self> {
        Ok(Self {
            image: resize_image(&self.image, width, height, IMAGE_FILTER)?,
            matte: resize_matte(&self.matte, width, height, MATTE_FILTER)?,
        })
    }

    /// See [`match_width_or_height`].
    pub fn match_frame(&self, frame: (u32, u32)) -> OpsResult<Self> {
        let (w, h) = match_width_or_height(self.dimensions(), frame);
        self.resize(w, h)
    }

    /// See [`percent_dimensions`].
    pub fn scale_percent(&self, percent: u32) -> OpsResult<Self> {
        check_percent(percent)?;
        let (w, h) = percent_dimensions(self.dimensions(), percent);
        self.resize(w, h)
    }

    /// Center pads both up to the target.
    pub fn center_pad(&self, target_w: u32, target_h: u32) -> OpsResult<Self> {
        Ok(Self {
            image: center_pad_image(&self.image, target_w, target_h)?,
            matte: center_pad_matte(&self.matte, target_w, target_h)?,
        })
    }

    /// Center crops both down to the target.
    pub fn center_crop(&self, target_w: u32, target_h: u32) -> OpsResult<Self> {
        Ok(Self {
            image: center_crop_image(&self.image, target_w, target_h)?,
            matte: center_crop_matte(&self.matte, target_w, target_h)?,
        })
    }

    /// Foreground cutout: every sample multiplied by the matte, rounded.
    pub fn cutout(&self) -> OpsResult<Image> {
        let alpha = self.matte.data();
        let data = self
            .image
            .data()
            .chunks_exact(CHANNELS)
            .zip(alpha)
            .flat_map(|(px, &a)| px.iter().map(move |&v| (v as f32 * a).round() as u8))
            .collect();
        let (w, h) = self.dimensions();
        Ok(Image::from_data(w, h, data)?)
    }
}

/// Person, matte and both background halves on one grid.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedScene {
    /// Person image in the frame.
    pub person: Image,
    /// Matte in the frame.
    pub matte: AlphaMatte,
    /// Left background, defines the frame.
    pub left: Image,
    /// Right background, resized to the frame.
    pub right: Image,
}

impl NormalizedScene {
    /// Frame `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.left.dimensions()
    }
}

/// Normalizes person, matte and background halves to the left half's size.
///
/// # Errors
///
/// - [`OpsError::InvalidParameter`] for `percent == 0`
/// - [`OpsError::DimensionMismatch`] if person and matte differ
/// - [`OpsError::InvalidDimensions`] for an empty person or background
pub fn normalize(
    person: &Image,
    matte: &AlphaMatte,
    left_bg: &Image,
    right_bg: &Image,
    percent: u32,
) -> OpsResult<NormalizedScene> {
    check_percent(percent)?;
    ensure_dims("person matte", person.dimensions(), matte.dimensions())?;
    for (what, img) in [("person", person), ("left background", left_bg), ("right background", right_bg)] {
        if img.is_empty() {
            return Err(OpsError::InvalidDimensions(format!(
                "{} is {}x{}",
                what,
                img.width(),
                img.height()
            )));
        }
    }

    let frame = left_bg.dimensions();
    let (fw, fh) = frame;
    debug!(frame_w = fw, frame_h = fh, right = ?right_bg.dimensions(), person = ?person.dimensions(), percent, "Normalizing scene");

    let right = resize_image(right_bg, fw, fh, IMAGE_FILTER)?;

    let fg = Foreground::new(person.clone(), matte.clone())?.match_frame(frame)?;
    debug!(size = ?fg.dimensions(), "Person matched to frame");
    let fg = fg.scale_percent(percent)?;
    debug!(size = ?fg.dimensions(), "Person scaled");
    let fg = fg.center_pad(fw, fh)?.center_crop(fw, fh)?;

    let (person, matte) = fg.into_parts();
    Ok(NormalizedScene {
        person,
        matte,
        left: left_bg.clone(),
        right,
    })
}

fn check_percent(percent: u32) -> OpsResult<()> {
    if percent == 0 {
        return Err(OpsError::invalid_parameter(
            "person_size_percent",
            0,
            "a positive percentage",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(w: u32, h: u32) -> (Image, AlphaMatte) {
        (Image::filled(w, h, [200, 100, 50]), AlphaMatte::filled(w, h, 1.0))
    }

    #[test]
    fn test_landscape_frame_matches_width() {
        let img = Image::filled(100, 200, [1, 2, 3]);
        let out = resize_to_match_width_or_height(&img, (300, 200)).unwrap();
        assert_eq!(out.dimensions(), (300, 600));
    }

    #[test]
    fn test_square_frame_matches_height() {
        assert_eq!(match_width_or_height((100, 50), (64, 64)), (128, 64));
    }

    #[test]
    fn test_percent_truncates() {
        assert_eq!(percent_dimensions((101, 99), 50), (50, 49));
        assert_eq!(percent_dimensions((10, 10), 150), (15, 15));
        let img = scale_by_size_percent(&Image::new(40, 20), 25).unwrap();
        assert_eq!(img.dimensions(), (10, 5));
    }

    #[test]
    fn test_zero_percent_rejected() {
        let err = scale_by_size_percent(&Image::new(4, 4), 0).unwrap_err();
        assert!(matches!(err, OpsError::InvalidParameter { .. }));
    }

    #[test]
    fn test_pad_then_crop_keeps_matte_aligned() {
        let (img, matte) = person(6, 4);
        let fg = Foreground::new(img, matte).unwrap();
        let fg = fg.center_pad(10, 8).unwrap();
        assert_eq!(fg.dimensions(), (10, 8));
        assert_eq!(fg.matte().dimensions(), (10, 8));
        // Padding is 2 on every side: same cells are opaque and colored.
        for y in 0..8 {
            for x in 0..10 {
                let inside = (2..8).contains(&x) && (2..6).contains(&y);
                assert_eq!(fg.matte().get(x, y), if inside { 1.0 } else { 0.0 });
                assert_eq!(fg.image().pixel(x, y)[0], if inside { 200 } else { 0 });
            }
        }
        let fg = fg.center_crop(6, 4).unwrap();
        assert_eq!(fg.matte().data().iter().filter(|&&a| a == 1.0).count(), 24);
    }

    #[test]
    fn test_foreground_rejects_mismatch() {
        let err = Foreground::new(Image::new(4, 4), AlphaMatte::new(4, 5)).unwrap_err();
        assert!(matches!(err, OpsError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_normalize_shapes() {
        let (img, matte) = person(100, 200);
        let left = Image::filled(300, 200, [95, 147, 89]);
        let right = Image::filled(297, 198, [95, 147, 89]);
        let scene = normalize(&img, &matte, &left, &right, 100).unwrap();
        assert_eq!(scene.dimensions(), (300, 200));
        assert_eq!(scene.person.dimensions(), (300, 200));
        assert_eq!(scene.matte.dimensions(), (300, 200));
        assert_eq!(scene.right.dimensions(), (300, 200));
    }

    #[test]
    fn test_normalize_small_person_is_centered() {
        let (img, matte) = person(10, 10);
        let bg = Image::new(40, 40);
        let scene = normalize(&img, &matte, &bg, &bg, 50).unwrap();
        // Matched to 40x40, halved to 20x20, padded by 10 on each side.
        assert_eq!(scene.matte.get(9, 20), 0.0);
        assert!(scene.matte.get(10, 20) > 0.99);
        assert!(scene.matte.get(29, 20) > 0.99);
        assert_eq!(scene.matte.get(30, 20), 0.0);
    }

    #[test]
    fn test_cutout() {
        let img = Image::filled(2, 1, [200, 100, 50]);
        let matte = AlphaMatte::from_data(2, 1, vec![0.5, 0.0]).unwrap();
        let cut = Foreground::new(img, matte).unwrap().cutout().unwrap();
        assert_eq!(cut.pixel(0, 0), [100, 50, 25]);
        assert_eq!(cut.pixel(1, 0), [0, 0, 0]);
    }
}
