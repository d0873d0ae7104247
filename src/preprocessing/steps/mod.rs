//! Individual preprocessing steps

pub mod grayscale;
pub mod invert;
pub mod normalize;
pub mod resize;
pub mod threshold;

pub use grayscale::{grayscale, grayscale_with};
pub use invert::invert;
pub use normalize::{normalize, normalize_with};
pub use resize::{upscale_to, DEFAULT_TARGET_HEIGHT};
pub use threshold::binarize;
