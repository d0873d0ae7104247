use crate::error::PreprocessError;
use crate::preprocessing::transform::adapt;
use crate::primitives;
use crate::raster::Image;

/// Default target height in pixels
pub const DEFAULT_TARGET_HEIGHT: u32 = 100;

/// Upscale so the image is at least `target_height` rows tall
///
/// Both axes are scaled by `target_height / rows` with cubic interpolation.
/// Images already at or above the target pass through untouched; this never
/// downscales.
pub fn upscale_to(
    target_height: u32,
) -> impl Fn(Image) -> Result<Image, PreprocessError> + Send + Sync {
    adapt(move |input, output| {
        if input.rows() >= target_height {
            output.put(input);
            return Ok(());
        }

        let scale = target_height as f64 / input.rows() as f64;
        tracing::debug!(
            "Upscaling {}x{} by {:.3} to reach {} rows",
            input.cols(),
            input.rows(),
            scale,
            target_height
        );
        primitives::resize(input, output, scale, scale)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma};

    fn gradient(width: u32, height: u32) -> Image {
        Image::new(DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
            Luma([((x + y) % 256) as u8])
        })))
        .unwrap()
    }

    #[test]
    fn test_upscale_small_image_to_target() {
        let result = upscale_to(DEFAULT_TARGET_HEIGHT)(gradient(30, 20)).unwrap();
        assert_eq!(result.rows(), 100);
        assert_eq!(result.cols(), 150);
    }

    #[test]
    fn test_upscale_preserves_aspect_ratio() {
        let result = upscale_to(1200)(gradient(80, 50)).unwrap();
        assert_eq!(result.rows(), 1200);
        assert_eq!(result.cols(), 80 * 24);
    }

    #[test]
    fn test_tall_image_passes_through() {
        let img = gradient(40, 150);
        let result = upscale_to(100)(img.clone()).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_exact_height_passes_through() {
        let img = gradient(40, 100);
        assert_eq!(upscale_to(100)(img.clone()).unwrap(), img);
    }

    #[test]
    fn test_oversized_target_is_rejected() {
        // 3 columns scaled by 4e9 no longer fit in a u32 width
        let result = upscale_to(4_000_000_000)(gradient(3, 1));
        assert!(matches!(result, Err(PreprocessError::InvalidParameter(_))));
    }
}
