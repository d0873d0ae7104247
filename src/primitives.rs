//! Primitive image operations with an output-parameter calling convention.
//!
//! Every primitive takes ownership of its source image and writes its result
//! into a caller-supplied [`OutputSlot`]. The preprocessing stages never call
//! these directly; they go through [`adapt`](crate::preprocessing::adapt),
//! which turns each primitive into a plain `Image -> Image` transform.

use crate::error::PreprocessError;
use crate::raster::Image;
use image::imageops::FilterType;
use image::{DynamicImage, ImageBuffer, Luma, Pixel};
use imageproc::contrast::otsu_level;
use std::ops::Not;

/// ITU-R BT.601 luma weights
const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// Destination a primitive writes its result into
#[derive(Debug, Default)]
pub struct OutputSlot {
    image: Option<Image>,
}

impl OutputSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, image: Image) {
        self.image = Some(image);
    }

    /// Validate and store a raw buffer
    pub fn put_dynamic(&mut self, image: DynamicImage) -> Result<(), PreprocessError> {
        self.put(Image::new(image)?);
        Ok(())
    }

    pub fn is_filled(&self) -> bool {
        self.image.is_some()
    }

    /// Take the written image; an unfilled slot is an error, never an empty image
    pub fn into_image(self) -> Result<Image, PreprocessError> {
        self.image.ok_or(PreprocessError::MissingOutput)
    }
}

/// Color-to-gray conversion codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorConversion {
    #[default]
    Rgba2Gray,
    Bgra2Gray,
    Rgb2Gray,
    Bgr2Gray,
}

impl ColorConversion {
    /// Channel count the conversion expects on its input
    pub fn source_channels(self) -> u8 {
        match self {
            Self::Rgba2Gray | Self::Bgra2Gray => 4,
            Self::Rgb2Gray | Self::Bgr2Gray => 3,
        }
    }

    /// Indices of the red, green and blue samples within a pixel
    fn rgb_order(self) -> [usize; 3] {
        match self {
            Self::Rgba2Gray | Self::Rgb2Gray => [0, 1, 2],
            Self::Bgra2Gray | Self::Bgr2Gray => [2, 1, 0],
        }
    }
}

/// Norm used by [`normalize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormType {
    #[default]
    MinMax,
    Inf,
    L1,
    L2,
}

/// Cubic resampling kernel used by [`resize`]
const CUBIC: FilterType = FilterType::CatmullRom;

/// Convert a 3- or 4-channel image to a single luminance channel
pub fn cvt_color(
    src: Image,
    dst: &mut OutputSlot,
    code: ColorConversion,
) -> Result<(), PreprocessError> {
    const OP: &str = "cvt_color";

    let expected = code.source_channels();
    if src.channels() != expected {
        return Err(PreprocessError::ChannelMismatch {
            op: OP,
            expected,
            actual: src.channels(),
        });
    }

    let sample_type = src.sample_type();
    let (width, height) = (src.cols(), src.rows());
    let channels = expected as usize;
    let order = code.rgb_order();

    let gray = match src.into_dynamic() {
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageLuma8(luma_buffer(
            width,
            height,
            luminance(&buf, channels, order, saturate_u8),
        )?),
        DynamicImage::ImageRgba8(buf) => DynamicImage::ImageLuma8(luma_buffer(
            width,
            height,
            luminance(&buf, channels, order, saturate_u8),
        )?),
        DynamicImage::ImageRgb16(buf) => DynamicImage::ImageLuma16(luma_buffer(
            width,
            height,
            luminance(&buf, channels, order, saturate_u16),
        )?),
        DynamicImage::ImageRgba16(buf) => DynamicImage::ImageLuma16(luma_buffer(
            width,
            height,
            luminance(&buf, channels, order, saturate_u16),
        )?),
        _ => {
            return Err(PreprocessError::UnsupportedSampleType {
                op: OP,
                sample_type,
            })
        }
    };

    dst.put_dynamic(gray)
}

/// Complement every sample of every channel
pub fn bitwise_not(src: Image, dst: &mut OutputSlot) -> Result<(), PreprocessError> {
    let sample_type = src.sample_type();

    // The source is owned here, so its storage is reused for the output.
    let inverted = match src.into_dynamic() {
        DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(complement(buf)),
        DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLumaA8(complement(buf)),
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(complement(buf)),
        DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(complement(buf)),
        DynamicImage::ImageLuma16(buf) => DynamicImage::ImageLuma16(complement(buf)),
        DynamicImage::ImageLumaA16(buf) => DynamicImage::ImageLumaA16(complement(buf)),
        DynamicImage::ImageRgb16(buf) => DynamicImage::ImageRgb16(complement(buf)),
        DynamicImage::ImageRgba16(buf) => DynamicImage::ImageRgba16(complement(buf)),
        _ => {
            return Err(PreprocessError::UnsupportedSampleType {
                op: "bitwise_not",
                sample_type,
            })
        }
    };

    dst.put_dynamic(inverted)
}

/// Rescale sample values into `[alpha, beta]` according to `norm`
///
/// `MinMax` maps the global minimum (over all channels) to `alpha` and the
/// maximum to `beta`; a uniform image maps entirely to `alpha`. The other
/// norms scale samples so the chosen norm of the result equals `beta`.
pub fn normalize(
    src: Image,
    dst: &mut OutputSlot,
    alpha: f64,
    beta: f64,
    norm: NormType,
) -> Result<(), PreprocessError> {
    let sample_type = src.sample_type();

    let normalized = match src.into_dynamic() {
        DynamicImage::ImageLuma8(buf) => {
            DynamicImage::ImageLuma8(stretch(buf, alpha, beta, norm, saturate_u8))
        }
        DynamicImage::ImageLumaA8(buf) => {
            DynamicImage::ImageLumaA8(stretch(buf, alpha, beta, norm, saturate_u8))
        }
        DynamicImage::ImageRgb8(buf) => {
            DynamicImage::ImageRgb8(stretch(buf, alpha, beta, norm, saturate_u8))
        }
        DynamicImage::ImageRgba8(buf) => {
            DynamicImage::ImageRgba8(stretch(buf, alpha, beta, norm, saturate_u8))
        }
        DynamicImage::ImageLuma16(buf) => {
            DynamicImage::ImageLuma16(stretch(buf, alpha, beta, norm, saturate_u16))
        }
        DynamicImage::ImageLumaA16(buf) => {
            DynamicImage::ImageLumaA16(stretch(buf, alpha, beta, norm, saturate_u16))
        }
        DynamicImage::ImageRgb16(buf) => {
            DynamicImage::ImageRgb16(stretch(buf, alpha, beta, norm, saturate_u16))
        }
        DynamicImage::ImageRgba16(buf) => {
            DynamicImage::ImageRgba16(stretch(buf, alpha, beta, norm, saturate_u16))
        }
        DynamicImage::ImageRgb32F(buf) => {
            DynamicImage::ImageRgb32F(stretch(buf, alpha, beta, norm, saturate_f32))
        }
        DynamicImage::ImageRgba32F(buf) => {
            DynamicImage::ImageRgba32F(stretch(buf, alpha, beta, norm, saturate_f32))
        }
        _ => {
            return Err(PreprocessError::UnsupportedSampleType {
                op: "normalize",
                sample_type,
            })
        }
    };

    dst.put_dynamic(normalized)
}

/// Resize by independent horizontal and vertical factors with cubic interpolation
pub fn resize(src: Image, dst: &mut OutputSlot, fx: f64, fy: f64) -> Result<(), PreprocessError> {
    if !(fx.is_finite() && fy.is_finite() && fx > 0.0 && fy > 0.0) {
        return Err(PreprocessError::InvalidParameter(format!(
            "resize: scale factors must be positive, got {}x{}",
            fx, fy
        )));
    }

    let cols = scaled_len(src.cols(), fx)?;
    let rows = scaled_len(src.rows(), fy)?;

    let resized = src.as_dynamic().resize_exact(cols, rows, CUBIC);
    dst.put_dynamic(resized)
}

/// Map a single-channel 8-bit image to `{0, maxval}` around its Otsu level
///
/// Samples above the level become `maxval`. Returns the level that was applied.
pub fn threshold(src: Image, dst: &mut OutputSlot, maxval: u8) -> Result<u8, PreprocessError> {
    const OP: &str = "threshold";

    if src.channels() != 1 {
        return Err(PreprocessError::ChannelMismatch {
            op: OP,
            expected: 1,
            actual: src.channels(),
        });
    }

    let sample_type = src.sample_type();
    let mut gray = match src.into_dynamic() {
        DynamicImage::ImageLuma8(buf) => buf,
        _ => {
            return Err(PreprocessError::UnsupportedSampleType {
                op: OP,
                sample_type,
            })
        }
    };

    let level = otsu_level(&gray);
    for sample in gray.iter_mut() {
        *sample = if *sample > level { maxval } else { 0 };
    }

    dst.put_dynamic(DynamicImage::ImageLuma8(gray))?;
    Ok(level)
}

fn scaled_len(len: u32, factor: f64) -> Result<u32, PreprocessError> {
    let scaled = (len as f64 * factor).round();
    if scaled > u32::MAX as f64 {
        return Err(PreprocessError::InvalidParameter(format!(
            "resize: {} scaled by {} exceeds the maximum dimension",
            len, factor
        )));
    }
    Ok((scaled as u32).max(1))
}

fn luminance<S>(samples: &[S], channels: usize, order: [usize; 3], saturate: fn(f64) -> S) -> Vec<S>
where
    S: Copy + Into<f64>,
{
    samples
        .chunks_exact(channels)
        .map(|px| {
            let r: f64 = px[order[0]].into();
            let g: f64 = px[order[1]].into();
            let b: f64 = px[order[2]].into();
            saturate(LUMA_R * r + LUMA_G * g + LUMA_B * b)
        })
        .collect()
}

fn luma_buffer<S>(
    width: u32,
    height: u32,
    data: Vec<S>,
) -> Result<ImageBuffer<Luma<S>, Vec<S>>, PreprocessError>
where
    Luma<S>: Pixel<Subpixel = S>,
{
    ImageBuffer::from_raw(width, height, data)
        .ok_or_else(|| PreprocessError::Internal("luminance buffer size mismatch".to_string()))
}

fn complement<P>(mut buffer: ImageBuffer<P, Vec<P::Subpixel>>) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel,
    P::Subpixel: Not<Output = P::Subpixel>,
{
    for sample in buffer.iter_mut() {
        *sample = !*sample;
    }
    buffer
}

fn stretch<P>(
    mut buffer: ImageBuffer<P, Vec<P::Subpixel>>,
    alpha: f64,
    beta: f64,
    norm: NormType,
    saturate: fn(f64) -> P::Subpixel,
) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel,
    P::Subpixel: Into<f64>,
{
    let (scale, shift) = norm_coefficients(
        buffer.iter().map(|&s| Into::<f64>::into(s)),
        alpha,
        beta,
        norm,
    );

    for sample in buffer.iter_mut() {
        let value: f64 = (*sample).into();
        *sample = saturate(value * scale + shift);
    }
    buffer
}

/// Affine `(scale, shift)` taking source samples to the normalized range
fn norm_coefficients(
    samples: impl Iterator<Item = f64>,
    alpha: f64,
    beta: f64,
    norm: NormType,
) -> (f64, f64) {
    match norm {
        NormType::MinMax => {
            let (min, max) = samples.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
            if max - min > f64::EPSILON {
                let scale = (beta - alpha) / (max - min);
                (scale, alpha - min * scale)
            } else {
                (0.0, alpha)
            }
        }
        NormType::Inf => scale_to(samples.fold(0.0, |acc, v| acc.max(v.abs())), beta),
        NormType::L1 => scale_to(samples.map(f64::abs).sum(), beta),
        NormType::L2 => scale_to(samples.map(|v| v * v).sum::<f64>().sqrt(), beta),
    }
}

fn scale_to(norm: f64, target: f64) -> (f64, f64) {
    if norm > f64::EPSILON {
        (target / norm, 0.0)
    } else {
        (0.0, 0.0)
    }
}

fn saturate_u8(v: f64) -> u8 {
    v.round().clamp(0.0, u8::MAX as f64) as u8
}

fn saturate_u16(v: f64) -> u16 {
    v.round().clamp(0.0, u16::MAX as f64) as u16
}

fn saturate_f32(v: f64) -> f32 {
    v as f32
}
