use crate::codec::DecodeMode;
use crate::preprocessing::{Pipeline, Stage};
use clap::Parser;
use std::path::PathBuf;

/// Input image read when no path is configured
pub const DEFAULT_INPUT: &str = "data/sample.png";

#[derive(Parser, Debug)]
#[command(name = "ocr-prep")]
#[command(about = "Prepare an image for text recognition")]
#[command(version)]
pub struct Args {
    /// Image to preprocess
    #[arg(long, env = "OCR_PREP_INPUT", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Pixel layout to decode into before the first stage
    #[arg(long, env = "OCR_PREP_DECODE", value_enum, default_value_t = DecodeMode::Color)]
    pub decode: DecodeMode,

    /// Comma-separated stages, e.g. "grayscale,invert,normalize,upscale:1200,binarize"
    #[arg(
        long,
        env = "OCR_PREP_STAGES",
        value_delimiter = ',',
        default_values_t = Pipeline::standard().stages().to_vec()
    )]
    pub stages: Vec<Stage>,

    /// Save the result to this path (format from extension)
    #[arg(long, env = "OCR_PREP_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Do not display the result
    #[arg(long)]
    pub no_display: bool,

    /// Display the result without waiting for a key press
    #[arg(long)]
    pub no_wait: bool,

    /// Print a JSON timing report to stdout
    #[arg(long)]
    pub report: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

/// How the driver presents its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Show and wait for acknowledgement
    Interactive,
    /// Show without blocking
    NoWait,
    Disabled,
}

/// Run configuration, fixed before the pipeline starts
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub decode: DecodeMode,
    pub stages: Vec<Stage>,
    pub output: Option<PathBuf>,
    pub display: DisplayMode,
    pub report: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let display = if args.no_display {
            DisplayMode::Disabled
        } else if args.no_wait {
            DisplayMode::NoWait
        } else {
            DisplayMode::Interactive
        };

        Self {
            input: args.input,
            decode: args.decode,
            stages: args.stages,
            output: args.output,
            display,
            report: args.report,
        }
    }
}
