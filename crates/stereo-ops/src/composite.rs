//! Disparity compositing.
//!
//! The foreground `person * matte` is rolled horizontally in opposite
//! directions for the two eyes and added over each eye's background, which
//! is attenuated by `1 - matte` at the *unshifted* position:
//!
//! ```text
//! left_eye  = roll(fg, +shift) + left_bg  * (1 - matte)
//! right_eye = roll(fg, -shift) + right_bg * (1 - matte)
//! ```
//!
//! A foreground column at `x` lands at `(x + shift) mod width` in the left
//! eye and `(x - shift) mod width` in the right eye. Sums are clamped to
//! `[0, 255]` and truncated to 8 bits.
//!
//! When the `parallel` feature is enabled, rows are processed with rayon.

use crate::error::ensure_dims;
use crate::{OpsError, OpsResult};
use stereo_core::{AlphaMatte, Image, StereoPair, CHANNELS};
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Inputs shared by every row.
struct Layers<'a> {
    person: &'a [u8],
    alpha: &'a [f32],
    left_bg: &'a [u8],
    right_bg: &'a [u8],
    width: usize,
    /// Shift reduced into `0..width`.
    shift: usize,
}

impl Layers<'_> {
    fn row(&self, y: usize, left_out: &mut [u8], right_out: &mut [u8]) {
        let w = self.width;
        let base = y * w;
        for x in 0..w {
            let keep = 1.0 - self.alpha[base + x];
            let from_left = (x + w - self.shift) % w;
            let from_right = (x + self.shift) % w;
            let a_left = self.alpha[base + from_left];
            let a_right = self.alpha[base + from_right];
            for c in 0..CHANNELS {
                let i = (base + x) * CHANNELS + c;
                let fg_left = self.person[(base + from_left) * CHANNELS + c] as f32 * a_left;
                let fg_right = self.person[(base + from_right) * CHANNELS + c] as f32 * a_right;
                let o = x * CHANNELS + c;
                left_out[o] = to_u8(fg_left + self.left_bg[i] as f32 * keep);
                right_out[o] = to_u8(fg_right + self.right_bg[i] as f32 * keep);
            }
        }
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

/// Composites the person over both backgrounds with a horizontal disparity.
///
/// ```rust
/// use stereo_core::{AlphaMatte, Image};
/// use stereo_ops::composite::composite;
///
/// let person = Image::filled(8, 4, [255, 255, 255]);
/// let matte = AlphaMatte::new(8, 4);
/// let bg = Image::filled(8, 4, [10, 20, 30]);
/// let pair = composite(&person, &matte, &bg, &bg, 2).unwrap();
/// assert_eq!(pair.left(), &bg);
/// ```
///
/// # Errors
///
/// - [`OpsError::DimensionMismatch`] if any input differs from `person`
/// - [`OpsError::InvalidDimensions`] for an empty frame
/// - [`OpsError::InvalidParameter`] if `|shift| >= width`
pub fn composite(
    person: &Image,
    matte: &AlphaMatte,
    left_bg: &Image,
    right_bg: &Image,
    shift: i32,
) -> OpsResult<StereoPair> {
    let dims = person.dimensions();
    ensure_dims("person matte", dims, matte.dimensions())?;
    ensure_dims("left background", dims, left_bg.dimensions())?;
    ensure_dims("right background", dims, right_bg.dimensions())?;
    if person.is_empty() {
        return Err(OpsError::InvalidDimensions(format!(
            "cannot composite a {}x{} frame",
            dims.0, dims.1
        )));
    }
    check_shift(shift, dims.0)?;

    let (w, h) = (dims.0 as usize, dims.1 as usize);
    debug!(width = w, height = h, shift, "Compositing stereo views");

    let layers = Layers {
        person: person.data(),
        alpha: matte.data(),
        left_bg: left_bg.data(),
        right_bg: right_bg.data(),
        width: w,
        shift: (shift as i64).rem_euclid(w as i64) as usize,
    };
    let mut left = vec![0u8; w * h * CHANNELS];
    let mut right = vec![0u8; w * h * CHANNELS];
    run_rows(&layers, &mut left, &mut right);

    let left = Image::from_data(dims.0, dims.1, left)?;
    let right = Image::from_data(dims.0, dims.1, right)?;
    Ok(StereoPair::new(left, right)?)
}

/// Fails unless `|shift| < width`.
pub fn check_shift(shift: i32, width: u32) -> OpsResult<()> {
    if (shift as i64).unsigned_abs() >= width as u64 {
        return Err(OpsError::invalid_parameter(
            "shift_pixels",
            shift as i64,
            format!("|shift| < frame width {}", width),
        ));
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn run_rows(layers: &Layers<'_>, left: &mut [u8], right: &mut [u8]) {
    trace!(rows = left.len() / (layers.width * CHANNELS), "composite rows (parallel)");
    let row_len = layers.width * CHANNELS;
    left.par_chunks_mut(row_len)
        .zip(right.par_chunks_mut(row_len))
        .enumerate()
        .for_each(|(y, (l, r))| layers.row(y, l, r));
}

#[cfg(not(feature = "parallel"))]
fn run_rows(layers: &Layers<'_>, left: &mut [u8], right: &mut [u8]) {
    trace!(rows = left.len() / (layers.width * CHANNELS), "composite rows");
    let row_len = layers.width * CHANNELS;
    for (y, (l, r)) in left
        .chunks_mut(row_len)
        .zip(right.chunks_mut(row_len))
        .enumerate()
    {
        layers.row(y, l, r);
    }
}
