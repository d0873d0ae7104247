//! Image preprocessing module for OCR enhancement
//!
//! Stages are plain `Image -> Image` transforms built by adapting
//! output-parameter primitives, composed left to right with `|`.

pub mod chain;
pub mod pipeline;
pub mod steps;
pub mod transform;

pub use chain::{apply, standard, Chain, STANDARD_TARGET_HEIGHT};
pub use pipeline::{Pipeline, PreprocessingResult, Stage, StepTiming};
pub use steps::{
    binarize, grayscale, grayscale_with, invert, normalize, normalize_with, upscale_to,
    DEFAULT_TARGET_HEIGHT,
};
pub use transform::{adapt, BoxedTransform, ImageTransform, StageOutput};
