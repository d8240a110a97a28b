//! Left/right eye views.

use crate::{Error, Image, Result};

/// Two eye views of identical dimensions.
///
/// The constructor is the only way to build a pair, so `left` and `right`
/// always share width and height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StereoPair {
    left: Image,
    right: Image,
}

impl StereoPair {
    /// Pairs two eye views.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the views differ in size.
    pub fn new(left: Image, right: Image) -> Result<Self> {
        left.ensure_same_dimensions(right.dimensions())?;
        Ok(Self { left, right })
    }

    /// Left eye view.
    #[inline]
    pub fn left(&self) -> &Image {
        &self.left
    }

    /// Right eye view.
    #[inline]
    pub fn right(&self) -> &Image {
        &self.right
    }

    /// Dimensions of one eye view.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.left.dimensions()
    }

    /// Splits the pair back into `(left, right)`.
    pub fn into_parts(self) -> (Image, Image) {
        (self.left, self.right)
    }

    /// Concatenates the views horizontally, left first.
    ///
    /// The result is `2 * width` wide and as tall as one view.
    pub fn side_by_side(&self) -> Image {
        let (w, h) = self.dimensions();
        let mut data = Vec::with_capacity(self.left.data().len() * 2);
        for y in 0..h {
            data.extend_from_slice(self.left.row(y));
            data.extend_from_slice(self.right.row(y));
        }
        Image::from_parts(w * 2, h, data)
    }
}

impl TryFrom<(Image, Image)> for StereoPair {
    type Error = Error;

    fn try_from((left, right): (Image, Image)) -> Result<Self> {
        Self::new(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_requires_same_size() {
        assert!(StereoPair::new(Image::new(4, 4), Image::new(4, 4)).is_ok());
        assert!(StereoPair::new(Image::new(4, 4), Image::new(3, 4)).is_err());
    }

    #[test]
    fn test_side_by_side() {
        let pair = StereoPair::new(
            Image::filled(3, 2, [10, 0, 0]),
            Image::filled(3, 2, [0, 20, 0]),
        )
        .unwrap();
        let sbs = pair.side_by_side();
        assert_eq!(sbs.dimensions(), (6, 2));
        assert_eq!(sbs.pixel(2, 1), [10, 0, 0]);
        assert_eq!(sbs.pixel(3, 1), [0, 20, 0]);
    }
}
