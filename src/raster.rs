//! The image value that flows through every stage.

use crate::error::{PreprocessError, SampleType};
use image::{ColorType, DynamicImage};

/// Dense 2-D raster with at least one row and one column.
///
/// Wraps [`DynamicImage`] so channel count and sample type can change between
/// stages while the non-empty invariant is checked once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    inner: DynamicImage,
}

impl Image {
    pub fn new(inner: DynamicImage) -> Result<Self, PreprocessError> {
        if inner.width() == 0 || inner.height() == 0 {
            return Err(PreprocessError::EmptyImage {
                rows: inner.height(),
                cols: inner.width(),
            });
        }
        Ok(Self { inner })
    }

    /// Row count (height)
    pub fn rows(&self) -> u32 {
        self.inner.height()
    }

    /// Column count (width)
    pub fn cols(&self) -> u32 {
        self.inner.width()
    }

    pub fn channels(&self) -> u8 {
        self.inner.color().channel_count()
    }

    pub fn sample_type(&self) -> SampleType {
        sample_type_of(self.inner.color())
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.inner
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.inner
    }
}

impl TryFrom<DynamicImage> for Image {
    type Error = PreprocessError;

    fn try_from(inner: DynamicImage) -> Result<Self, Self::Error> {
        Self::new(inner)
    }
}

fn sample_type_of(color: ColorType) -> SampleType {
    match color.bytes_per_pixel() / color.channel_count() {
        1 => SampleType::U8,
        2 => SampleType::U16,
        _ => SampleType::F32,
    }
}
