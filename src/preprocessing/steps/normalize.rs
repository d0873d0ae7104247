use crate::error::PreprocessError;
use crate::preprocessing::transform::adapt;
use crate::primitives::{self, NormType};
use crate::raster::Image;

/// Bounds of the normalized range
const RANGE_LOW: f64 = 0.0;
const RANGE_HIGH: f64 = 255.0;

/// Normalize contrast using min-max histogram stretching
/// Maps pixel values to use full 0-255 range
pub fn normalize() -> impl Fn(Image) -> Result<Image, PreprocessError> + Send + Sync {
    normalize_with(NormType::default())
}

/// Normalize into 0-255 using the given norm
pub fn normalize_with(
    norm: NormType,
) -> impl Fn(Image) -> Result<Image, PreprocessError> + Send + Sync {
    adapt(move |input, output| {
        primitives::normalize(input, output, RANGE_LOW, RANGE_HIGH, norm)
    })
}
