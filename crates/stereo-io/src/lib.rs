//! # stereo-io
//!
//! PNG and JPEG files in and out of the stereo pipeline's in-memory types.
//!
//! - [`read`] / [`write`] - RGB images, format auto-detected
//! - [`read_mask`] - any supported image as a [`RawMask`] (BT.601 luma)
//! - [`write_matte`] - an [`AlphaMatte`] as 8-bit grayscale
//!
//! Reading detects the format from magic bytes and falls back to the file
//! extension; writing goes by extension only.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stereo_io::{read, read_mask, write};
//!
//! let person = read("person.jpg")?;
//! let mask = read_mask("person_mask.png")?;
//! write("copy.png", &person)?;
//! # Ok::<(), stereo_io::IoError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `png` - PNG support (default)
//! - `jpeg` - JPEG support (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod detect;
mod error;

#[cfg(feature = "png")]
pub mod png;

#[cfg(feature = "jpeg")]
pub mod jpeg;

pub use detect::Format;
pub use error::{IoError, IoResult};

use std::path::Path;
use stereo_core::{AlphaMatte, Image, RawMask};
use tracing::debug;

/// Reads an image file as RGB.
///
/// # Errors
///
/// [`IoError::UnsupportedFormat`] if the format is unknown or its feature is
/// disabled, otherwise whatever the decoder reports.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    debug!(path = %path.display(), ?format, "Reading image");

    match format {
        #[cfg(feature = "png")]
        Format::Png => png::read(path),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::read(path),

        _ => Err(unsupported(path)),
    }
}

/// Reads an image file as a segmentation mask.
///
/// Each pixel's BT.601 luma, rounded, becomes the mask value; a grayscale
/// file keeps its values.
pub fn read_mask<P: AsRef<Path>>(path: P) -> IoResult<RawMask> {
    let image = read(path)?;
    let values = image
        .to_luma()
        .into_iter()
        .map(|l| l.round().clamp(0.0, 255.0) as u8)
        .collect();
    Ok(RawMask::from_data(image.width(), image.height(), values)?)
}

/// Writes an RGB image; the format comes from the extension.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), width = image.width(), height = image.height(), "Writing image");

    match Format::from_extension(path) {
        #[cfg(feature = "png")]
        Format::Png => png::write(path, image),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::write(path, image),

        _ => Err(unsupported(path)),
    }
}

/// Writes a matte as 8-bit grayscale (`round(alpha * 255)`).
pub fn write_matte<P: AsRef<Path>>(path: P, matte: &AlphaMatte) -> IoResult<()> {
    let path = path.as_ref();
    let samples = matte.to_u8();
    debug!(path = %path.display(), width = matte.width(), height = matte.height(), "Writing matte");

    match Format::from_extension(path) {
        #[cfg(feature = "png")]
        Format::Png => png::write_gray(path, matte.width(), matte.height(), &samples),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::write_gray(path, matte.width(), matte.height(), &samples),

        _ => Err(unsupported(path)),
    }
}

fn unsupported(path: &Path) -> IoError {
    IoError::UnsupportedFormat(
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string(),
    )
}
