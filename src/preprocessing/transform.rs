//! The transform capability and the primitive adapter.

use crate::error::PreprocessError;
use crate::primitives::OutputSlot;
use crate::raster::Image;
use image::DynamicImage;

/// Values a stage may return in place of an [`Image`]
pub trait StageOutput {
    fn into_stage_output(self) -> Result<Image, PreprocessError>;
}

impl StageOutput for Image {
    fn into_stage_output(self) -> Result<Image, PreprocessError> {
        Ok(self)
    }
}

impl StageOutput for DynamicImage {
    fn into_stage_output(self) -> Result<Image, PreprocessError> {
        Image::new(self)
    }
}

impl StageOutput for Result<Image, PreprocessError> {
    fn into_stage_output(self) -> Result<Image, PreprocessError> {
        self
    }
}

/// Anything callable with one [`Image`] that yields something image-like.
///
/// Implemented for every matching closure or function, so conformance is
/// checked by the compiler when a stage is chained, not at run time:
///
/// ```compile_fail
/// use ocr_prep::preprocessing::invert;
/// use ocr_prep::Image;
///
/// fn run(img: Image) {
///     // two-argument callables are not transforms
///     let _ = img | invert() | |a: Image, _b: u32| a;
/// }
/// ```
pub trait ImageTransform {
    fn apply(&self, image: Image) -> Result<Image, PreprocessError>;
}

impl<F, R> ImageTransform for F
where
    F: Fn(Image) -> R,
    R: StageOutput,
{
    fn apply(&self, image: Image) -> Result<Image, PreprocessError> {
        self(image).into_stage_output()
    }
}

/// Type-erased transform for stage lists assembled at run time
pub type BoxedTransform = Box<dyn Fn(Image) -> Result<Image, PreprocessError> + Send + Sync>;

/// Wrap an output-parameter primitive into a unary transform.
///
/// Each call allocates a fresh [`OutputSlot`], hands the input over to the
/// primitive and returns whatever it wrote. Primitive errors pass through
/// untouched; a primitive that returns without writing yields
/// [`PreprocessError::MissingOutput`].
pub fn adapt<P>(primitive: P) -> impl Fn(Image) -> Result<Image, PreprocessError> + Send + Sync
where
    P: Fn(Image, &mut OutputSlot) -> Result<(), PreprocessError> + Send + Sync,
{
    move |input: Image| {
        let mut output = OutputSlot::new();
        primitive(input, &mut output)?;
        output.into_image()
    }
}
