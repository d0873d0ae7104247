use crate::error::PreprocessError;
use crate::preprocessing::transform::adapt;
use crate::primitives;
use crate::raster::Image;

/// Bitwise complement of every sample
/// Turns dark text on a light page into light text on a dark page
pub fn invert() -> impl Fn(Image) -> Result<Image, PreprocessError> + Send + Sync {
    adapt(primitives::bitwise_not)
}
