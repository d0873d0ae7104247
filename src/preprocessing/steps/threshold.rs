use crate::error::PreprocessError;
use crate::preprocessing::transform::adapt;
use crate::primitives;
use crate::raster::Image;

/// Value written for samples above the threshold
const MAX_VALUE: u8 = 255;

/// Binarize with an automatically chosen (Otsu) global threshold
/// Requires a single-channel 8-bit input
pub fn binarize() -> impl Fn(Image) -> Result<Image, PreprocessError> + Send + Sync {
    adapt(|input, output| {
        let level = primitives::threshold(input, output, MAX_VALUE)?;
        tracing::debug!("Binarized at threshold {}", level);
        Ok(())
    })
}
