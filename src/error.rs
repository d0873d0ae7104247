use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Per-sample storage type of an [`Image`](crate::raster::Image)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SampleType {
    U8,
    U16,
    F32,
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleType::U8 => "u8",
            SampleType::U16 => "u16",
            SampleType::F32 => "f32",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("Could not read image at: {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Could not read image at: {}: decoded image is empty", path.display())]
    DecodedEmpty { path: PathBuf },

    #[error("Could not write image to: {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image is empty ({cols}x{rows})")]
    EmptyImage { rows: u32, cols: u32 },

    #[error("{op}: expected {expected} channel(s), got {actual}")]
    ChannelMismatch {
        op: &'static str,
        expected: u8,
        actual: u8,
    },

    #[error("{op}: unsupported sample type {sample_type}")]
    UnsupportedSampleType {
        op: &'static str,
        sample_type: SampleType,
    },

    #[error("Primitive returned without writing its output")]
    MissingOutput,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid stage: {0}")]
    InvalidStage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PreprocessError {
    /// Stable identifier used in machine-readable reports
    pub fn code(&self) -> &'static str {
        match self {
            PreprocessError::Decode { .. } => "DECODE_ERROR",
            PreprocessError::DecodedEmpty { .. } => "DECODE_EMPTY",
            PreprocessError::Encode { .. } => "ENCODE_ERROR",
            PreprocessError::EmptyImage { .. } => "EMPTY_IMAGE",
            PreprocessError::ChannelMismatch { .. } => "CHANNEL_MISMATCH",
            PreprocessError::UnsupportedSampleType { .. } => "UNSUPPORTED_SAMPLE_TYPE",
            PreprocessError::MissingOutput => "MISSING_OUTPUT",
            PreprocessError::InvalidParameter(_) => "INVALID_PARAMETER",
            PreprocessError::InvalidStage(_) => "INVALID_STAGE",
            PreprocessError::Io(_) => "IO_ERROR",
            PreprocessError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Input could not be turned into a usable image
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            PreprocessError::Decode { .. } | PreprocessError::DecodedEmpty { .. }
        )
    }
}

#[derive(Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub code: String,
}

impl From<&PreprocessError> for ErrorReport {
    fn from(err: &PreprocessError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code().to_string(),
        }
    }
}
