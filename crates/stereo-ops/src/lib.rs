//! # stereo-ops
//!
//! Stereo compositing operations: turn a person photo, a segmentation mask
//! and a background into a stereo pair and a red-cyan anaglyph.
//!
//! # Modules
//!
//! - [`mask`] - Raw mask to soft alpha matte
//! - [`normalize`] - Resize, pad and crop everything onto one grid
//! - [`split`] - Stereo background detection and synthesis
//! - [`composite`] - Disparity shift and compositing
//! - [`anaglyph`] - Red-cyan encoding
//! - [`pipeline`] - All of the above behind [`generate`]
//!
//! Lower level building blocks: [`resize`], [`filter`], [`transform`],
//! [`hash`].
//!
//! # Example
//!
//! ```rust
//! use stereo_core::{Image, RawMask};
//! use stereo_ops::{generate, Segmenter, StereoParams};
//!
//! struct Everything;
//!
//! impl Segmenter for Everything {
//!     type Error = std::convert::Infallible;
//!
//!     fn segment(&self, image: &Image) -> Result<RawMask, Self::Error> {
//!         let cells = vec![true; image.pixel_count()];
//!         Ok(RawMask::from_bools(image.width(), image.height(), &cells).unwrap())
//!     }
//! }
//!
//! let person = Image::filled(40, 80, [220, 180, 160]);
//! let background = Image::filled(120, 80, [30, 60, 90]);
//! let params = StereoParams::default().with_shift(4);
//!
//! let out = generate(&Everything, &person, Some(&background), &params).unwrap();
//! assert_eq!(out.anaglyph.dimensions(), (120, 80));
//! assert_eq!(out.stereo_pair.dimensions(), (240, 80));
//! ```
//!
//! # Features
//!
//! - `parallel` (default) - Rows of the compositor run on rayon
//! - `serde` - `Serialize`/`Deserialize` for parameter types

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod anaglyph;
pub mod composite;
pub mod filter;
pub mod hash;
pub mod mask;
pub mod normalize;
pub mod pipeline;
pub mod resize;
pub mod split;
pub mod transform;

pub use error::{BoxedSource, OpsError, OpsResult};
pub use mask::{clean_mask, MaskCleaner};
pub use pipeline::{generate, Segmenter, StereoOutputs, StereoParams};
pub use resize::Filter;
pub use split::{SplitBackground, SplitKind, StereoSplitter};
