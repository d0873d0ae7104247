//! Left-to-right composition of transforms over an image.
//!
//! `img | a | b | c` evaluates `c(b(a(img)))`. Each step hands ownership of
//! the current image to the next transform; the first failing stage stops
//! the chain and its error is what [`Chain::finish`] returns.

use std::ops::BitOr;

use super::steps::{binarize, grayscale, invert, normalize, upscale_to};
use super::transform::ImageTransform;
use crate::error::PreprocessError;
use crate::raster::Image;

/// Target height of the standard composite
pub const STANDARD_TARGET_HEIGHT: u32 = 1200;

/// In-flight result of a chain of transforms
#[derive(Debug)]
#[must_use = "a chain does nothing useful until `.finish()` is called"]
pub struct Chain {
    state: Result<Image, PreprocessError>,
}

impl Chain {
    pub fn new(image: Image) -> Self {
        Self { state: Ok(image) }
    }

    /// Apply `transform` to the current image
    pub fn then<T: ImageTransform>(self, transform: T) -> Self {
        Self {
            state: self.state.and_then(|image| transform.apply(image)),
        }
    }

    pub fn finish(self) -> Result<Image, PreprocessError> {
        self.state
    }
}

impl From<Image> for Chain {
    fn from(image: Image) -> Self {
        Self::new(image)
    }
}

impl<T: ImageTransform> BitOr<T> for Image {
    type Output = Chain;

    fn bitor(self, transform: T) -> Chain {
        Chain::new(self).then(transform)
    }
}

impl<T: ImageTransform> BitOr<T> for Chain {
    type Output = Chain;

    fn bitor(self, transform: T) -> Chain {
        self.then(transform)
    }
}

/// Apply a single transform
pub fn apply<T: ImageTransform + ?Sized>(image: Image, transform: &T) -> Result<Image, PreprocessError> {
    transform.apply(image)
}

/// Text-extraction-ready composite:
/// grayscale, invert, normalize, upscale to 1200 rows, binarize.
pub fn standard() -> impl Fn(Image) -> Result<Image, PreprocessError> + Send + Sync {
    |image: Image| {
        (image
            | grayscale()
            | invert()
            | normalize()
            | upscale_to(STANDARD_TARGET_HEIGHT)
            | binarize())
        .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma};

    fn sample() -> Image {
        Image::new(DynamicImage::ImageLuma8(GrayImage::from_fn(4, 3, |x, y| {
            Luma([(x * 10 + y) as u8])
        })))
        .unwrap()
    }

    fn add(n: u8) -> impl Fn(Image) -> Image {
        move |img: Image| {
            let mut buf = img.into_dynamic().into_luma8();
            buf.iter_mut().for_each(|s| *s = s.wrapping_add(n));
            Image::new(DynamicImage::ImageLuma8(buf)).unwrap()
        }
    }

    fn double(img: Image) -> Image {
        let mut buf = img.into_dynamic().into_luma8();
        buf.iter_mut().for_each(|s| *s = s.wrapping_mul(2));
        Image::new(DynamicImage::ImageLuma8(buf)).unwrap()
    }

    #[test]
    fn test_empty_chain_is_identity() {
        assert_eq!(Chain::new(sample()).finish().unwrap(), sample());
    }

    #[test]
    fn test_chain_is_left_to_right() {
        // (v + 1) * 2 differs from v * 2 + 1
        let out = (sample() | add(1) | double).finish().unwrap();
        let expected = double(add(1)(sample()));
        assert_eq!(out, expected);
        assert_eq!(out.as_dynamic().to_luma8().get_pixel(0, 0).0[0], 2);
    }

    #[test]
    fn test_operator_matches_named_form() {
        let via_operator = (sample() | add(3) | double).finish().unwrap();
        let via_then = Chain::from(sample()).then(add(3)).then(double).finish().unwrap();
        let via_apply = apply(apply(sample(), &add(3)).unwrap(), &double).unwrap();
        assert_eq!(via_operator, via_then);
        assert_eq!(via_operator, via_apply);
    }

    #[test]
    fn test_failure_short_circuits() {
        let fail = |_img: Image| -> Result<Image, PreprocessError> {
            Err(PreprocessError::Internal("stage failed".to_string()))
        };
        let must_not_run = |_img: Image| -> Image { panic!("stage after a failure ran") };

        let result = (sample() | fail | must_not_run).finish();
        assert!(matches!(result, Err(PreprocessError::Internal(_))));
    }

    #[test]
    fn test_standard_is_the_explicit_chain() {
        let color = Image::new(DynamicImage::ImageRgba8(image::RgbaImage::from_fn(
            16,
            8,
            |x, _| {
                if x < 8 {
                    image::Rgba([20, 30, 40, 255])
                } else {
                    image::Rgba([230, 220, 210, 255])
                }
            },
        )))
        .unwrap();

        let composite = (color.clone() | standard()).finish().unwrap();
        let explicit = (color
            | grayscale()
            | invert()
            | normalize()
            | upscale_to(STANDARD_TARGET_HEIGHT)
            | binarize())
        .finish()
        .unwrap();

        assert_eq!(composite, explicit);
        assert_eq!(composite.rows(), STANDARD_TARGET_HEIGHT);
    }
}
