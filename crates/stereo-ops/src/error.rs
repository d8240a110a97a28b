//! Error types for stereo operations.

use thiserror::Error;

/// Boxed error returned by a segmentation backend.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for stereo operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Buffer length or size unusable for the operation.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Two buffers that must share a shape do not.
    #[error(
        "dimension mismatch in {what}: expected {}x{}, got {}x{}",
        .expected.0, .expected.1, .actual.0, .actual.1
    )]
    DimensionMismatch {
        /// Which pair of buffers disagreed.
        what: &'static str,
        /// Reference `(width, height)`.
        expected: (u32, u32),
        /// Offending `(width, height)`.
        actual: (u32, u32),
    },

    /// Parameter outside its accepted range.
    #[error("invalid parameter `{name}` = {value}: expected {valid}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: i64,
        /// Accepted range, human readable.
        valid: String,
    },

    /// The segmentation backend failed. The backend's error is the source.
    #[error("segmentation failed: {0}")]
    Segmentation(#[source] BoxedSource),

    /// The segmentation backend returned a mask of the wrong size.
    #[error(
        "segmentation returned a {}x{} mask for a {}x{} image",
        .actual.0, .actual.1, .expected.0, .expected.1
    )]
    SegmentationShape {
        /// Image `(width, height)`.
        expected: (u32, u32),
        /// Mask `(width, height)`.
        actual: (u32, u32),
    },

    /// Error from a core buffer type.
    #[error(transparent)]
    Core(#[from] stereo_core::Error),
}

impl OpsError {
    /// Creates an [`OpsError::DimensionMismatch`] error.
    #[inline]
    pub fn mismatch(what: &'static str, expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Creates an [`OpsError::InvalidParameter`] error.
    #[inline]
    pub fn invalid_parameter(name: &'static str, value: i64, valid: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            value,
            valid: valid.into(),
        }
    }

    /// Returns `true` if the error came from the segmentation backend.
    #[inline]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Segmentation(_) | Self::SegmentationShape { .. })
    }
}

/// Result type for stereo operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Fails with [`OpsError::DimensionMismatch`] unless `actual == expected`.
#[inline]
pub(crate) fn ensure_dims(
    what: &'static str,
    expected: (u32, u32),
    actual: (u32, u32),
) -> OpsResult<()> {
    if expected != actual {
        return Err(OpsError::mismatch(what, expected, actual));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message_has_both_shapes() {
        let err = OpsError::mismatch("anaglyph eyes", (300, 200), (297, 198));
        let msg = err.to_string();
        assert!(msg.contains("anaglyph eyes"));
        assert!(msg.contains("300x200"));
        assert!(msg.contains("297x198"));
    }

    #[test]
    fn test_invalid_parameter_names_range() {
        let err = OpsError::invalid_parameter("person_size_percent", 0, "> 0");
        let msg = err.to_string();
        assert!(msg.contains("person_size_percent"));
        assert!(msg.contains("> 0"));
    }

    #[test]
    fn test_upstream_errors() {
        let io = std::io::Error::other("model offline");
        assert!(OpsError::Segmentation(Box::new(io)).is_upstream());
        assert!(
            OpsError::SegmentationShape {
                expected: (2, 2),
                actual: (1, 1)
            }
            .is_upstream()
        );
        assert!(!OpsError::InvalidDimensions("x".into()).is_upstream());
    }
}
