//! Decode/encode collaborator backed by the `image` crate.

use crate::error::PreprocessError;
use crate::raster::Image;
use clap::ValueEnum;
use std::path::Path;

/// How decoded pixels are laid out before entering the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DecodeMode {
    /// Keep whatever layout the file stores
    Unchanged,
    /// 4-channel 8-bit RGBA
    #[default]
    Color,
    /// Single-channel 8-bit
    Grayscale,
}

/// Read an image file from disk
pub fn decode(path: &Path, mode: DecodeMode) -> Result<Image, PreprocessError> {
    let img = image::open(path).map_err(|e| PreprocessError::Decode {
        path: path.to_path_buf(),
        source: e,
    })?;

    let img = match mode {
        DecodeMode::Unchanged => img,
        DecodeMode::Color => image::DynamicImage::ImageRgba8(img.into_rgba8()),
        DecodeMode::Grayscale => image::DynamicImage::ImageLuma8(img.into_luma8()),
    };

    tracing::debug!(
        "Decoded {} ({}x{}, {} channel(s))",
        path.display(),
        img.width(),
        img.height(),
        img.color().channel_count()
    );

    Image::new(img).map_err(|e| match e {
        PreprocessError::EmptyImage { .. } => PreprocessError::DecodedEmpty {
            path: path.to_path_buf(),
        },
        other => other,
    })
}

/// Write an image; the format follows the file extension
pub fn encode(image: &Image, path: &Path) -> Result<(), PreprocessError> {
    image
        .as_dynamic()
        .save(path)
        .map_err(|e| PreprocessError::Encode {
            path: path.to_path_buf(),
            source: e,
        })
}
