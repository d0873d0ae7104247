use crate::error::PreprocessError;
use crate::preprocessing::transform::adapt;
use crate::primitives::{self, ColorConversion};
use crate::raster::Image;

/// Convert to a single luminance channel, expecting 4-channel RGBA input
pub fn grayscale() -> impl Fn(Image) -> Result<Image, PreprocessError> + Send + Sync {
    grayscale_with(ColorConversion::default())
}

/// Convert to a single luminance channel from the layout named by `code`
pub fn grayscale_with(
    code: ColorConversion,
) -> impl Fn(Image) -> Result<Image, PreprocessError> + Send + Sync {
    adapt(move |input, output| primitives::cvt_color(input, output, code))
}
