//! Image and matte resampling.
//!
//! # Filters
//!
//! - [`Filter::Nearest`] - No interpolation (blocky)
//! - [`Filter::Bilinear`] - Linear interpolation, used for mattes
//! - [`Filter::Bicubic`] - Mitchell-Netravali cubic, used for images
//! - [`Filter::Lanczos3`] - Sinc-based, used for hash downsampling
//!
//! # Example
//!
//! ```rust
//! use stereo_core::Image;
//! use stereo_ops::resize::{resize_image, Filter};
//!
//! let img = Image::filled(64, 32, [10, 20, 30]);
//! let half = resize_image(&img, 32, 16, Filter::Bicubic).unwrap();
//! assert_eq!(half.dimensions(), (32, 16));
//! ```

use crate::{OpsError, OpsResult};
use stereo_core::{AlphaMatte, Image, CHANNELS};
use tracing::trace;

/// Resampling filter for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Filter {
    /// Nearest-neighbor (fastest, no interpolation).
    Nearest,
    /// Bilinear interpolation (smooth, fast).
    Bilinear,
    /// Bicubic interpolation (sharper than bilinear).
    #[default]
    Bicubic,
    /// Lanczos-3 (high quality, best for downscaling).
    Lanczos3,
}

impl Filter {
    /// Returns the support radius for this filter.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Filter::Nearest => 0.5,
            Filter::Bilinear => 1.0,
            Filter::Bicubic => 2.0,
            Filter::Lanczos3 => 3.0,
        }
    }

    /// Evaluates the filter kernel at position x.
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        match self {
            Filter::Nearest => nearest_weight(x),
            Filter::Bilinear => bilinear_weight(x),
            Filter::Bicubic => bicubic_weight(x),
            Filter::Lanczos3 => lanczos_weight(x, 3.0),
        }
    }
}

#[inline]
fn nearest_weight(x: f32) -> f32 {
    if x.abs() < 0.5 { 1.0 } else { 0.0 }
}

#[inline]
fn bilinear_weight(x: f32) -> f32 {
    let ax = x.abs();
    if ax < 1.0 { 1.0 - ax } else { 0.0 }
}

/// Mitchell-Netravali with B = C = 1/3.
#[inline]
fn bicubic_weight(x: f32) -> f32 {
    const B: f32 = 1.0 / 3.0;
    const C: f32 = 1.0 / 3.0;

    let ax = x.abs();
    if ax < 1.0 {
        ((12.0 - 9.0 * B - 6.0 * C) * ax * ax * ax
            + (-18.0 + 12.0 * B + 6.0 * C) * ax * ax
            + (6.0 - 2.0 * B))
            / 6.0
    } else if ax < 2.0 {
        ((-B - 6.0 * C) * ax * ax * ax
            + (6.0 * B + 30.0 * C) * ax * ax
            + (-12.0 * B - 48.0 * C) * ax
            + (8.0 * B + 24.0 * C))
            / 6.0
    } else {
        0.0
    }
}

#[inline]
fn lanczos_weight(x: f32, a: f32) -> f32 {
    let ax = x.abs();
    if ax < 1e-8 {
        1.0
    } else if ax < a {
        let pi_x = std::f32::consts::PI * ax;
        let pi_x_a = pi_x / a;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

/// Resizes interleaved f32 samples.
///
/// Two separable passes, horizontal then vertical. Sample scale is
/// preserved, so 0..=255 data stays 0..=255 up to filter overshoot.
///
/// # Errors
///
/// [`OpsError::InvalidDimensions`] if `src` doesn't hold
/// `src_w * src_h * channels` samples or either size is zero.
///
/// ```rust
/// use stereo_ops::resize::{resize_f32, Filter};
///
/// let src = vec![0.5f32; 16 * 16 * 3];
/// let dst = resize_f32(&src, 16, 16, 3, 32, 32, Filter::Bilinear).unwrap();
/// assert_eq!(dst.len(), 32 * 32 * 3);
/// ```
pub fn resize_f32(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    dst_h: usize,
    filter: Filter,
) -> OpsResult<Vec<f32>> {
    trace!(src_w, src_h, channels, dst_w, dst_h, ?filter, "resize_f32");

    let expected = src_w * src_h * channels;
    if src.len() != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            expected,
            src.len()
        )));
    }
    if src_w == 0 || src_h == 0 {
        return Err(OpsError::InvalidDimensions(
            "source size must be > 0".into(),
        ));
    }
    if dst_w == 0 || dst_h == 0 {
        return Err(OpsError::InvalidDimensions(
            "destination size must be > 0".into(),
        ));
    }
    if (src_w, src_h) == (dst_w, dst_h) {
        return Ok(src.to_vec());
    }

    let temp = resize_horizontal(src, src_w, src_h, channels, dst_w, filter);
    Ok(resize_vertical(&temp, dst_w, src_h, channels, dst_h, filter))
}

fn resize_horizontal(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    filter: Filter,
) -> Vec<f32> {
    let mut dst = vec![0.0f32; dst_w * src_h * channels];
    let scale = src_w as f32 / dst_w as f32;
    let support = filter.support() * scale.max(1.0);
    let mut sum = vec![0.0f32; channels];

    for x in 0..dst_w {
        let center = (x as f32 + 0.5) * scale - 0.5;
        let left = ((center - support).floor() as isize).max(0) as usize;
        let right = ((center + support).ceil().max(0.0) as usize).min(src_w - 1);

        for y in 0..src_h {
            sum.iter_mut().for_each(|s| *s = 0.0);
            let mut weight_sum = 0.0f32;

            for sx in left..=right {
                let w = filter.weight((sx as f32 - center) / scale.max(1.0));
                weight_sum += w;
                let src_idx = (y * src_w + sx) * channels;
                for c in 0..channels {
                    sum[c] += src[src_idx + c] * w;
                }
            }

            let dst_idx = (y * dst_w + x) * channels;
            if weight_sum != 0.0 {
                for c in 0..channels {
                    dst[dst_idx + c] = sum[c] / weight_sum;
                }
            } else {
                // Nearest source sample when the kernel misses every tap.
                let sx = center.round().clamp(0.0, (src_w - 1) as f32) as usize;
                let src_idx = (y * src_w + sx) * channels;
                dst[dst_idx..dst_idx + channels].copy_from_slice(&src[src_idx..src_idx + channels]);
            }
        }
    }

    dst
}

fn resize_vertical(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_h: usize,
    filter: Filter,
) -> Vec<f32> {
    let mut dst = vec![0.0f32; src_w * dst_h * channels];
    let scale = src_h as f32 / dst_h as f32;
    let support = filter.support() * scale.max(1.0);
    let mut sum = vec![0.0f32; channels];

    for y in 0..dst_h {
        let center = (y as f32 + 0.5) * scale - 0.5;
        let top = ((center - support).floor() as isize).max(0) as usize;
        let bottom = ((center + support).ceil().max(0.0) as usize).min(src_h - 1);

        for x in 0..src_w {
            sum.iter_mut().for_each(|s| *s = 0.0);
            let mut weight_sum = 0.0f32;

            for sy in top..=bottom {
                let w = filter.weight((sy as f32 - center) / scale.max(1.0));
                weight_sum += w;
                let src_idx = (sy * src_w + x) * channels;
                for c in 0..channels {
                    sum[c] += src[src_idx + c] * w;
                }
            }

            let dst_idx = (y * src_w + x) * channels;
            if weight_sum != 0.0 {
                for c in 0..channels {
                    dst[dst_idx + c] = sum[c] / weight_sum;
                }
            } else {
                let sy = center.round().clamp(0.0, (src_h - 1) as f32) as usize;
                let src_idx = (sy * src_w + x) * channels;
                dst[dst_idx..dst_idx + channels].copy_from_slice(&src[src_idx..src_idx + channels]);
            }
        }
    }

    dst
}

/// Resizes an RGB image; samples are rounded and clamped back to 8 bits.
pub fn resize_image(image: &Image, width: u32, height: u32, filter: Filter) -> OpsResult<Image> {
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }
    let resized = resize_f32(
        &image.to_f32(),
        image.width() as usize,
        image.height() as usize,
        CHANNELS,
        width as usize,
        height as usize,
        filter,
    )?;
    Ok(Image::from_f32_rounded(width, height, &resized)?)
}

/// Resizes a matte; values are clamped back into `[0, 1]`.
pub fn resize_matte(
    matte: &AlphaMatte,
    width: u32,
    height: u32,
    filter: Filter,
) -> OpsResult<AlphaMatte> {
    if matte.dimensions() == (width, height) {
        return Ok(matte.clone());
    }
    let resized = resize_f32(
        matte.data(),
        matte.width() as usize,
        matte.height() as usize,
        1,
        width as usize,
        height as usize,
        filter,
    )?;
    Ok(AlphaMatte::from_data(width, height, resized)?)
}

/// Scales `(width, height)` by `factor`, rounding and keeping at least 1 pixel.
///
/// ```rust
/// use stereo_ops::resize::scale_dimensions;
///
/// assert_eq!(scale_dimensions(300, 200, 0.99), (297, 198));
/// ```
pub fn scale_dimensions(width: u32, height: u32, factor: f32) -> (u32, u32) {
    let w = ((width as f64 * factor as f64).round() as u32).max(1);
    let h = ((height as f64 * factor as f64).round() as u32).max(1);
    (w, h)
}
