//! Geometric transforms on interleaved sample buffers.
//!
//! Every function is generic over the sample type, so the same code moves
//! 8-bit image samples and f32 matte values. That is what keeps an image and
//! its matte pixel-aligned: both go through the identical index arithmetic.
//!
//! # Operations
//!
//! - [`crop`] - Extract a region
//! - [`pad`] - Add a constant border
//! - [`center_pad`] / [`center_crop`] - Symmetric pad/crop to a target frame
//! - [`roll_horizontal`] - Circular column shift
//!
//! # Example
//!
//! ```rust
//! use stereo_ops::transform::{center_crop, center_pad};
//!
//! let src = vec![1u8; 10 * 10];
//! let (padded, w, h) = center_pad(&src, 10, 10, 1, 20, 20, 0);
//! assert_eq!((w, h), (20, 20));
//! let (cropped, w, h) = center_crop(&padded, w, h, 1, 10, 10).unwrap();
//! assert_eq!((w, h), (10, 10));
//! assert_eq!(cropped, src);
//! ```

use crate::{OpsError, OpsResult};

/// Crops a `w x h` region whose top-left corner is `(x, y)`.
///
/// ```rust
/// use stereo_ops::transform::crop;
///
/// let src = vec![0.5f32; 64 * 64 * 3];
/// let cropped = crop(&src, 64, 64, 3, 10, 10, 20, 20).unwrap();
/// assert_eq!(cropped.len(), 20 * 20 * 3);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn crop<T: Copy>(
    src: &[T],
    src_w: usize,
    src_h: usize,
    channels: usize,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
) -> OpsResult<Vec<T>> {
    if x + w > src_w || y + h > src_h {
        return Err(OpsError::InvalidDimensions(format!(
            "crop region {}x{} at ({},{}) exceeds {}x{}",
            w, h, x, y, src_w, src_h
        )));
    }

    let mut dst = Vec::with_capacity(w * h * channels);
    for row in y..(y + h) {
        let src_start = (row * src_w + x) * channels;
        dst.extend_from_slice(&src[src_start..src_start + w * channels]);
    }

    Ok(dst)
}

/// Pads with a constant border.
///
/// Returns `(data, new_width, new_height)`.
#[allow(clippy::too_many_arguments)]
pub fn pad<T: Copy>(
    src: &[T],
    width: usize,
    height: usize,
    channels: usize,
    top: usize,
    right: usize,
    bottom: usize,
    left: usize,
    fill: T,
) -> (Vec<T>, usize, usize) {
    let new_w = width + left + right;
    let new_h = height + top + bottom;
    let mut dst = vec![fill; new_w * new_h * channels];

    let row_len = width * channels;
    for y in 0..height {
        let src_start = y * row_len;
        let dst_start = ((y + top) * new_w + left) * channels;
        dst[dst_start..dst_start + row_len].copy_from_slice(&src[src_start..src_start + row_len]);
    }

    (dst, new_w, new_h)
}

/// Symmetric padding amounts to grow `size` to `target`.
///
/// Returns `(before, after)` with `before = max(0, (target - size) / 2)`
/// (integer division) and `after = max(0, target - size - before)`. The odd
/// pixel, if any, goes after. Both are zero when `size >= target`.
///
/// ```rust
/// use stereo_ops::transform::center_padding;
///
/// assert_eq!(center_padding(10, 20), (5, 5));
/// assert_eq!(center_padding(10, 21), (5, 6));
/// assert_eq!(center_padding(30, 20), (0, 0));
/// ```
#[inline]
pub fn center_padding(size: usize, target: usize) -> (usize, usize) {
    let total = target.saturating_sub(size);
    let before = total / 2;
    (before, total - before)
}

/// Start of a centered window of `target` within `size`: `size / 2 - target / 2`.
///
/// Zero when the window is not smaller than `size`.
///
/// ```rust
/// use stereo_ops::transform::center_crop_start;
///
/// assert_eq!(center_crop_start(20, 10), 5);
/// assert_eq!(center_crop_start(600, 200), 200);
/// assert_eq!(center_crop_start(7, 4), 1);
/// ```
#[inline]
pub fn center_crop_start(size: usize, target: usize) -> usize {
    if target >= size { 0 } else { size / 2 - target / 2 }
}

/// Pads symmetrically up to `target_h x target_w`, filling with `fill`.
///
/// Dimensions already at or above the target are left alone, so the result
/// may still be larger than the target; follow with [`center_crop`].
/// Returns `(data, new_width, new_height)`.
#[allow(clippy::too_many_arguments)]
pub fn center_pad<T: Copy>(
    src: &[T],
    width: usize,
    height: usize,
    channels: usize,
    target_h: usize,
    target_w: usize,
    fill: T,
) -> (Vec<T>, usize, usize) {
    let (top, bottom) = center_padding(height, target_h);
    let (left, right) = center_padding(width, target_w);
    pad(src, width, height, channels, top, right, bottom, left, fill)
}

/// Crops symmetrically down to `target_h x target_w`.
///
/// Dimensions already at or below the target are left alone.
/// Returns `(data, new_width, new_height)`.
pub fn center_crop<T: Copy>(
    src: &[T],
    width: usize,
    height: usize,
    channels: usize,
    target_h: usize,
    target_w: usize,
) -> OpsResult<(Vec<T>, usize, usize)> {
    let new_w = width.min(target_w);
    let new_h = height.min(target_h);
    let x = center_crop_start(width, target_w);
    let y = center_crop_start(height, target_h);
    let dst = crop(src, width, height, channels, x, y, new_w, new_h)?;
    Ok((dst, new_w, new_h))
}

/// Rotates columns circularly by `shift` pixels.
///
/// A positive shift moves content right: the column at `x` lands at
/// `(x + shift) mod width`. Columns leaving one edge re-enter at the other.
///
/// ```rust
/// use stereo_ops::transform::roll_horizontal;
///
/// let row = vec![1, 2, 3, 4, 5];
/// assert_eq!(roll_horizontal(&row, 5, 1, 1, 2), vec![4, 5, 1, 2, 3]);
/// assert_eq!(roll_horizontal(&row, 5, 1, 1, -1), vec![2, 3, 4, 5, 1]);
/// ```
pub fn roll_horizontal<T: Copy>(
    src: &[T],
    width: usize,
    height: usize,
    channels: usize,
    shift: i64,
) -> Vec<T> {
    if width == 0 || height == 0 {
        return src.to_vec();
    }
    let k = shift.rem_euclid(width as i64) as usize;
    if k == 0 {
        return src.to_vec();
    }

    let row_len = width * channels;
    let split = (width - k) * channels;
    let mut dst = Vec::with_capacity(src.len());
    for row in src.chunks_exact(row_len) {
        dst.extend_from_slice(&row[split..]);
        dst.extend_from_slice(&row[..split]);
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop() {
        let mut src = Vec::new();
        for y in 0..4u8 {
            for x in 0..4u8 {
                src.push(x);
                src.push(y);
            }
        }
        let cropped = crop(&src, 4, 4, 2, 1, 1, 2, 2).unwrap();
        assert_eq!(cropped, vec![1, 1, 2, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let src = vec![0u8; 4 * 4 * 3];
        assert!(crop(&src, 4, 4, 3, 3, 3, 2, 2).is_err());
    }

    #[test]
    fn test_pad() {
        let src = vec![1.0f32; 2 * 2];
        let (dst, w, h) = pad(&src, 2, 2, 1, 1, 1, 1, 1, 0.0);
        assert_eq!((w, h), (4, 4));
        assert_eq!(dst[0], 0.0);
        assert_eq!(dst[5], 1.0);
    }

    #[test]
    fn test_center_pad_10_to_20() {
        let src = vec![7u8; 10 * 10];
        let (dst, w, h) = center_pad(&src, 10, 10, 1, 20, 20, 0);
        assert_eq!((w, h), (20, 20));
        // Rows 0..5 and 15..20 are padding, same for columns.
        for y in 0..20 {
            for x in 0..20 {
                let inside = (5..15).contains(&x) && (5..15).contains(&y);
                assert_eq!(dst[y * 20 + x], if inside { 7 } else { 0 }, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_center_pad_odd_remainder_goes_last() {
        let src = vec![1u8; 2];
        let (dst, w, h) = center_pad(&src, 2, 1, 1, 1, 5, 0);
        assert_eq!((w, h), (5, 1));
        assert_eq!(dst, vec![0, 1, 1, 0, 0]);
    }

    #[test]
    fn test_center_crop_20_to_10_starts_at_5() {
        let mut src = vec![0u16; 20 * 20];
        for y in 0..20 {
            for x in 0..20 {
                src[y * 20 + x] = (y * 100 + x) as u16;
            }
        }
        let (dst, w, h) = center_crop(&src, 20, 20, 1, 10, 10).unwrap();
        assert_eq!((w, h), (10, 10));
        assert_eq!(dst[0], 505);
        assert_eq!(dst[99], 1414);
    }

    #[test]
    fn test_center_crop_only_shrinks() {
        let src = vec![3u8; 4 * 8];
        let (dst, w, h) = center_crop(&src, 4, 8, 1, 6, 10).unwrap();
        assert_eq!((w, h), (4, 6));
        assert_eq!(dst.len(), 24);
    }

    #[test]
    fn test_roll_multi_channel_rows() {
        // 3x2 image, 2 channels; each row rolls independently.
        let src = vec![
            1, 1, 2, 2, 3, 3, //
            4, 4, 5, 5, 6, 6,
        ];
        let dst = roll_horizontal(&src, 3, 2, 2, 1);
        assert_eq!(dst, vec![3, 3, 1, 1, 2, 2, 6, 6, 4, 4, 5, 5]);
    }

    #[test]
    fn test_roll_full_width_is_identity() {
        let src = vec![1, 2, 3];
        assert_eq!(roll_horizontal(&src, 3, 1, 1, 3), src);
        assert_eq!(roll_horizontal(&src, 3, 1, 1, -6), src);
    }
}
