//! # stereo-core
//!
//! Core types for the stereo compositing pipeline.
//!
//! - [`Image`] - 8-bit RGB buffer, the one picture type every stage uses
//! - [`RawMask`] - person/non-person grid returned by a segmenter
//! - [`AlphaMatte`] - per-pixel opacity in `[0, 1]`
//! - [`StereoPair`] - left/right views guaranteed to share dimensions
//!
//! ## Crate Structure
//!
//! ```text
//! stereo-core (this crate)
//!    ^
//!    |
//!    +-- stereo-ops (mask cleanup, normalization, splitting, compositing)
//!    +-- stereo-io (PNG/JPEG decode and encode)
//!    +-- stereo-cli (command-line front end)
//! ```
//!
//! Conversions to and from file formats live in `stereo-io`; everything here
//! is plain in-memory data.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod matte;
pub mod stereo;

pub use error::{Error, Result};
pub use image::{Image, BT601_LUMA, CHANNELS};
pub use matte::{AlphaMatte, RawMask, MASK_PERSON, MASK_THRESHOLD};
pub use stereo::StereoPair;

/// Prelude module for convenient imports.
///
/// ```
/// use stereo_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::Image;
    pub use crate::matte::{AlphaMatte, RawMask};
    pub use crate::stereo::StereoPair;
}
