//! Convolution and morphology on single- or multi-channel f32 buffers.
//!
//! - [`Kernel::gaussian`] - Gaussian kernel, sigma optionally derived from size
//! - [`convolve`] - 2D convolution with a selectable [`Border`]
//! - [`erode`] - Square-element morphological erosion
//!
//! # Example
//!
//! ```rust
//! use stereo_ops::filter::{convolve, Border, Kernel};
//!
//! let src = vec![0.5f32; 16 * 16];
//! let kernel = Kernel::gaussian(3, 0.0).unwrap();
//! let blurred = convolve(&src, 16, 16, 1, &kernel, Border::Reflect101).unwrap();
//! assert_eq!(blurred.len(), src.len());
//! ```

use crate::{OpsError, OpsResult};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// How samples outside the buffer are synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Border {
    /// Repeat the edge sample: `aaa|abcd|ddd`.
    Clamp,
    /// Mirror without repeating the edge sample: `dcb|abcd|cba`.
    #[default]
    Reflect101,
}

impl Border {
    /// Maps a possibly out-of-range index into `0..len`.
    #[inline]
    pub fn resolve(self, i: isize, len: usize) -> usize {
        let n = len as isize;
        match self {
            Border::Clamp => i.clamp(0, n - 1) as usize,
            Border::Reflect101 => {
                if len == 1 {
                    return 0;
                }
                let period = 2 * (n - 1);
                let mut i = i.rem_euclid(period);
                if i >= n {
                    i = period - i;
                }
                i as usize
            }
        }
    }
}

/// Convolution kernel for image filtering.
#[derive(Debug, Clone)]
pub struct Kernel {
    /// Kernel weights, row-major.
    pub data: Vec<f32>,
    /// Kernel width (odd).
    pub width: usize,
    /// Kernel height (odd).
    pub height: usize,
}

impl Kernel {
    /// Creates a new kernel from data.
    ///
    /// Width and height must be odd numbers.
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> OpsResult<Self> {
        if width % 2 == 0 || height % 2 == 0 {
            return Err(OpsError::invalid_parameter(
                "kernel size",
                (if width % 2 == 0 { width } else { height }) as i64,
                "an odd number",
            ));
        }
        if data.len() != width * height {
            return Err(OpsError::InvalidDimensions(format!(
                "kernel data size {} doesn't match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self { data, width, height })
    }

    /// Creates a square Gaussian kernel as the outer product of
    /// [`gaussian_1d`] with itself.
    ///
    /// A `sigma <= 0` derives sigma from `size`.
    ///
    /// ```rust
    /// use stereo_ops::filter::Kernel;
    ///
    /// let k = Kernel::gaussian(3, 0.0).unwrap();
    /// assert_eq!(k.data[4], 0.25); // 0.5 * 0.5 at the center
    /// ```
    pub fn gaussian(size: usize, sigma: f32) -> OpsResult<Self> {
        let line = gaussian_1d(size, sigma)?;
        let mut data = Vec::with_capacity(size * size);
        for wy in &line {
            for wx in &line {
                data.push(wy * wx);
            }
        }
        Ok(Self {
            data,
            width: size,
            height: size,
        })
    }

    /// Returns the kernel radius (half-size).
    #[inline]
    pub fn radius(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }
}

/// Derived sigma for a kernel of `size` taps when none is given.
#[inline]
pub fn sigma_for_size(size: usize) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1D Gaussian weights of odd length `size`.
///
/// With `sigma <= 0` and `size` in `{1, 3, 5, 7}` the binomial tables are
/// returned exactly; other sizes use [`sigma_for_size`].
pub fn gaussian_1d(size: usize, sigma: f32) -> OpsResult<Vec<f32>> {
    if size % 2 == 0 {
        return Err(OpsError::invalid_parameter(
            "gaussian size",
            size as i64,
            "an odd number",
        ));
    }

    if sigma <= 0.0 {
        let fixed: Option<&[f32]> = match size {
            1 => Some(&[1.0]),
            3 => Some(&[0.25, 0.5, 0.25]),
            5 => Some(&[0.0625, 0.25, 0.375, 0.25, 0.0625]),
            7 => Some(&[
                0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
            ]),
            _ => None,
        };
        if let Some(weights) = fixed {
            return Ok(weights.to_vec());
        }
    }

    let sigma = if sigma > 0.0 { sigma } else { sigma_for_size(size) };
    let half = (size / 2) as i32;
    let sigma2 = 2.0 * sigma * sigma;
    let mut data: Vec<f32> = (-half..=half)
        .map(|x| (-((x * x) as f32) / sigma2).exp())
        .collect();
    let sum: f32 = data.iter().sum();
    for w in &mut data {
        *w /= sum;
    }
    Ok(data)
}

/// Applies a convolution kernel.
///
/// ```rust
/// use stereo_ops::filter::{convolve, Border, Kernel};
///
/// let src = vec![0.5f32; 8 * 8 * 3];
/// let kernel = Kernel::gaussian(3, 1.0).unwrap();
/// let result = convolve(&src, 8, 8, 3, &kernel, Border::Clamp).unwrap();
/// assert_eq!(result.len(), 8 * 8 * 3);
/// ```
pub fn convolve(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &Kernel,
    border: Border,
) -> OpsResult<Vec<f32>> {
    trace!(width, height, channels, kernel_w = kernel.width, kernel_h = kernel.height, ?border, "convolve");

    check_len(src, width, height, channels)?;

    let mut dst = vec![0.0f32; src.len()];
    let (rx, ry) = kernel.radius();
    let mut sums = vec![0.0f32; channels];

    for y in 0..height {
        for x in 0..width {
            sums.iter_mut().for_each(|s| *s = 0.0);

            for ky in 0..kernel.height {
                let sy = border.resolve(y as isize + ky as isize - ry as isize, height);
                for kx in 0..kernel.width {
                    let sx = border.resolve(x as isize + kx as isize - rx as isize, width);
                    let src_idx = (sy * width + sx) * channels;
                    let kw = kernel.data[ky * kernel.width + kx];

                    for c in 0..channels {
                        sums[c] += src[src_idx + c] * kw;
                    }
                }
            }

            let dst_idx = (y * width + x) * channels;
            dst[dst_idx..dst_idx + channels].copy_from_slice(&sums);
        }
    }

    Ok(dst)
}

/// Morphological erosion with a `size x size` square structuring element.
///
/// The square element is separable, so this runs a horizontal then a
/// vertical running minimum. Samples outside the buffer never lower the
/// minimum (edge clamping), so foreground touching the border is not
/// eaten from outside.
///
/// ```rust
/// use stereo_ops::filter::erode;
///
/// let mut src = vec![1.0f32; 5 * 5];
/// src[12] = 0.0;
/// let eroded = erode(&src, 5, 5, 1, 3).unwrap();
/// assert_eq!(eroded[6], 0.0);
/// assert_eq!(eroded[0], 1.0);
/// ```
pub fn erode(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    size: usize,
) -> OpsResult<Vec<f32>> {
    trace!(width, height, channels, size, "erode");

    if size == 0 || size % 2 == 0 {
        return Err(OpsError::invalid_parameter(
            "erosion size",
            size as i64,
            "an odd number",
        ));
    }
    check_len(src, width, height, channels)?;

    let radius = (size / 2) as isize;
    let mut temp = vec![0.0f32; src.len()];

    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut val = f32::MAX;
                for k in -radius..=radius {
                    let sx = Border::Clamp.resolve(x as isize + k, width);
                    val = val.min(src[(y * width + sx) * channels + c]);
                }
                temp[(y * width + x) * channels + c] = val;
            }
        }
    }

    let mut dst = vec![0.0f32; src.len()];
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut val = f32::MAX;
                for k in -radius..=radius {
                    let sy = Border::Clamp.resolve(y as isize + k, height);
                    val = val.min(temp[(sy * width + x) * channels + c]);
                }
                dst[(y * width + x) * channels + c] = val;
            }
        }
    }

    Ok(dst)
}

fn check_len(src: &[f32], width: usize, height: usize, channels: usize) -> OpsResult<()> {
    let expected = width * height * channels;
    if src.len() != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            expected,
            src.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_border_resolve() {
        assert_eq!(Border::Clamp.resolve(-2, 5), 0);
        assert_eq!(Border::Clamp.resolve(7, 5), 4);
        assert_eq!(Border::Reflect101.resolve(-1, 5), 1);
        assert_eq!(Border::Reflect101.resolve(-2, 5), 2);
        assert_eq!(Border::Reflect101.resolve(5, 5), 3);
        assert_eq!(Border::Reflect101.resolve(2, 5), 2);
        assert_eq!(Border::Reflect101.resolve(-1, 1), 0);
    }

    #[test]
    fn test_gaussian_fixed_tables() {
        assert_eq!(gaussian_1d(3, 0.0).unwrap(), vec![0.25, 0.5, 0.25]);
        let w7 = gaussian_1d(7, 0.0).unwrap();
        assert_abs_diff_eq!(w7.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_gaussian_derived_sigma() {
        let k = gaussian_1d(9, 0.0).unwrap();
        assert_eq!(k.len(), 9);
        assert_abs_diff_eq!(k.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        assert!(k[4] > k[0]);
        assert_abs_diff_eq!(sigma_for_size(9), 1.7, epsilon = 1e-6);
    }

    #[test]
    fn test_gaussian_rejects_even() {
        assert!(gaussian_1d(4, 0.0).is_err());
        assert!(Kernel::new(vec![0.0; 4], 2, 2).is_err());
    }

    #[test]
    fn test_kernel_gaussian_sums_to_one() {
        let k = Kernel::gaussian(5, 1.5).unwrap();
        assert_eq!((k.width, k.height), (5, 5));
        assert_abs_diff_eq!(k.data.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        assert!(k.data[12] > k.data[0]);
    }

    #[test]
    fn test_convolve_constant() {
        let src = vec![0.5f32; 8 * 8 * 3];
        let kernel = Kernel::gaussian(3, 0.0).unwrap();
        let result = convolve(&src, 8, 8, 3, &kernel, Border::Reflect101).unwrap();
        for v in result {
            assert_abs_diff_eq!(v, 0.5, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_convolve_step_edge() {
        // 1x4 row: [0, 0, 255, 255], vertical taps fold back onto the row.
        let src = vec![0.0, 0.0, 255.0, 255.0];
        let kernel = Kernel::gaussian(3, 0.0).unwrap();
        let out = convolve(&src, 4, 1, 1, &kernel, Border::Reflect101).unwrap();
        assert_abs_diff_eq!(out[1], 63.75, epsilon = 1e-4);
        assert_abs_diff_eq!(out[2], 191.25, epsilon = 1e-4);
    }

    #[test]
    fn test_erode_square_element() {
        // Single dark pixel spreads to its 3x3 neighbourhood.
        let mut src = vec![1.0f32; 7 * 7];
        src[3 * 7 + 3] = 0.0;
        let out = erode(&src, 7, 7, 1, 3).unwrap();
        for y in 0..7 {
            for x in 0..7 {
                let expected = if (2..=4).contains(&x) && (2..=4).contains(&y) {
                    0.0
                } else {
                    1.0
                };
                assert_eq!(out[y * 7 + x], expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_erode_border_does_not_erode() {
        let src = vec![1.0f32; 4 * 4];
        let out = erode(&src, 4, 4, 1, 7).unwrap();
        assert!(out.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_erode_rejects_even() {
        assert!(erode(&[0.0; 4], 2, 2, 1, 2).is_err());
    }
}
