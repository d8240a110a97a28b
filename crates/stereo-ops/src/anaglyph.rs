//! Red-cyan anaglyph encoding: red from the left eye, green and blue from the
//! right eye.

use crate::error::ensure_dims;
use crate::OpsResult;
use stereo_core::{Image, StereoPair, CHANNELS};

/// Encodes two eye views into one anaglyph.
///
/// ```rust
/// use stereo_core::Image;
/// use stereo_ops::anaglyph::encode;
///
/// let left = Image::filled(2, 2, [200, 10, 10]);
/// let right = Image::filled(2, 2, [10, 100, 150]);
/// assert_eq!(encode(&left, &right).unwrap().pixel(0, 0), [200, 100, 150]);
/// ```
///
/// # Errors
///
/// [`crate::OpsError::DimensionMismatch`] if the views differ in size.
pub fn encode(left: &Image, right: &Image) -> OpsResult<Image> {
    ensure_dims("anaglyph views", left.dimensions(), right.dimensions())?;
    let data = left
        .data()
        .chunks_exact(CHANNELS)
        .zip(right.data().chunks_exact(CHANNELS))
        .flat_map(|(l, r)| [l[0], r[1], r[2]])
        .collect();
    Ok(Image::from_data(left.width(), left.height(), data)?)
}

/// Encodes a [`StereoPair`], whose views always match.
pub fn encode_pair(pair: &StereoPair) -> OpsResult<Image> {
    encode(pair.left(), pair.right())
}
