//! Composable image preprocessing for text recognition.
//!
//! ```no_run
//! use ocr_prep::codec::{self, DecodeMode};
//! use ocr_prep::preprocessing::{binarize, grayscale, invert, normalize, upscale_to};
//!
//! # fn main() -> Result<(), ocr_prep::PreprocessError> {
//! let img = codec::decode("page.png".as_ref(), DecodeMode::Color)?;
//! let ready = (img | grayscale() | invert() | normalize() | upscale_to(1200) | binarize())
//!     .finish()?;
//! # let _ = ready;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod driver;
pub mod error;
pub mod preprocessing;
pub mod primitives;
pub mod raster;
pub mod viewer;

pub use error::{PreprocessError, SampleType};
pub use raster::Image;
