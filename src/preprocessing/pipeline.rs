use crate::error::PreprocessError;
use crate::primitives::{ColorConversion, NormType};
use crate::raster::Image;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use super::chain::{apply, STANDARD_TARGET_HEIGHT};
use super::steps;
use super::transform::BoxedTransform;

/// A named, parameterized preprocessing stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Grayscale(ColorConversion),
    Invert,
    Normalize(NormType),
    UpscaleTo(u32),
    Binarize,
}

impl Stage {
    /// Stage name as used in timing reports
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grayscale(_) => "grayscale",
            Self::Invert => "invert",
            Self::Normalize(_) => "normalize",
            Self::UpscaleTo(_) => "upscale",
            Self::Binarize => "binarize",
        }
    }

    /// Build the transform this stage describes
    pub fn transform(&self) -> BoxedTransform {
        match *self {
            Self::Grayscale(code) => Box::new(steps::grayscale_with(code)),
            Self::Invert => Box::new(steps::invert()),
            Self::Normalize(norm) => Box::new(steps::normalize_with(norm)),
            Self::UpscaleTo(height) => Box::new(steps::upscale_to(height)),
            Self::Binarize => Box::new(steps::binarize()),
        }
    }
}

impl FromStr for Stage {
    type Err = PreprocessError;

    /// Parse `name[:arg]`, e.g. `grayscale:bgra`, `normalize:l2`, `upscale:1200`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim().to_lowercase();
        let (name, arg) = match spec.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (spec.as_str(), None),
        };
        let invalid = || PreprocessError::InvalidStage(s.to_string());

        match (name, arg) {
            ("grayscale", None) => Ok(Self::Grayscale(ColorConversion::default())),
            ("grayscale", Some(code)) => match code {
                "rgba" => Ok(Self::Grayscale(ColorConversion::Rgba2Gray)),
                "bgra" => Ok(Self::Grayscale(ColorConversion::Bgra2Gray)),
                "rgb" => Ok(Self::Grayscale(ColorConversion::Rgb2Gray)),
                "bgr" => Ok(Self::Grayscale(ColorConversion::Bgr2Gray)),
                _ => Err(invalid()),
            },
            ("invert", None) => Ok(Self::Invert),
            ("normalize", None) => Ok(Self::Normalize(NormType::default())),
            ("normalize", Some(norm)) => match norm {
                "minmax" => Ok(Self::Normalize(NormType::MinMax)),
                "inf" => Ok(Self::Normalize(NormType::Inf)),
                "l1" => Ok(Self::Normalize(NormType::L1)),
                "l2" => Ok(Self::Normalize(NormType::L2)),
                _ => Err(invalid()),
            },
            ("upscale", None) => Ok(Self::UpscaleTo(steps::DEFAULT_TARGET_HEIGHT)),
            ("upscale", Some(height)) => match height.parse::<u32>() {
                Ok(h) if h > 0 => Ok(Self::UpscaleTo(h)),
                _ => Err(invalid()),
            },
            ("binarize", None) => Ok(Self::Binarize),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grayscale(code) => {
                let code = match code {
                    ColorConversion::Rgba2Gray => "rgba",
                    ColorConversion::Bgra2Gray => "bgra",
                    ColorConversion::Rgb2Gray => "rgb",
                    ColorConversion::Bgr2Gray => "bgr",
                };
                write!(f, "grayscale:{}", code)
            }
            Self::Normalize(norm) => {
                let norm = match norm {
                    NormType::MinMax => "minmax",
                    NormType::Inf => "inf",
                    NormType::L1 => "l1",
                    NormType::L2 => "l2",
                };
                write!(f, "normalize:{}", norm)
            }
            Self::UpscaleTo(height) => write!(f, "upscale:{}", height),
            other => f.write_str(other.name()),
        }
    }
}

/// Timing information for a single preprocessing step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of preprocessing including timing stats
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessingResult {
    /// Preprocessed image (not serialized)
    #[serde(skip)]
    pub image: Image,
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// Ordered list of stages run one after another over an image
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// The five stages of the standard composite
    pub fn standard() -> Self {
        Self::new(vec![
            Stage::Grayscale(ColorConversion::default()),
            Stage::Invert,
            Stage::Normalize(NormType::default()),
            Stage::UpscaleTo(STANDARD_TARGET_HEIGHT),
            Stage::Binarize,
        ])
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Process an image through every stage in order
    pub fn process(&self, image: Image) -> Result<PreprocessingResult, PreprocessError> {
        let start = Instant::now();
        let mut steps_timing = Vec::with_capacity(self.stages.len());

        let mut img = image;
        for stage in &self.stages {
            img = self.run_step(stage, img, &mut steps_timing)?;
        }

        Ok(PreprocessingResult {
            image: img,
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: steps_timing,
        })
    }

    fn run_step(
        &self,
        stage: &Stage,
        img: Image,
        timings: &mut Vec<StepTiming>,
    ) -> Result<Image, PreprocessError> {
        let step_start = Instant::now();
        let result = apply(img, &stage.transform()).map_err(|e| {
            tracing::warn!("Stage {} failed: {}", stage, e);
            e
        })?;
        let time_ms = step_start.elapsed().as_millis() as u64;

        tracing::debug!(
            "{} -> {}x{}, {} channel(s) in {}ms",
            stage,
            result.cols(),
            result.rows(),
            result.channels(),
            time_ms
        );
        timings.push(StepTiming {
            name: stage.name().to_string(),
            time_ms,
        });
        Ok(result)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::standard;
    use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

    fn page() -> Image {
        Image::new(DynamicImage::ImageRgba8(RgbaImage::from_fn(40, 20, |x, y| {
            if (8..32).contains(&x) && (8..12).contains(&y) {
                Rgba([15, 15, 15, 255])
            } else {
                Rgba([235, 235, 230, 255])
            }
        })))
        .unwrap()
    }

    #[test]
    fn test_parse_stage_names() {
        assert_eq!(
            "grayscale".parse::<Stage>().unwrap(),
            Stage::Grayscale(ColorConversion::Rgba2Gray)
        );
        assert_eq!(
            "Grayscale:BGR".parse::<Stage>().unwrap(),
            Stage::Grayscale(ColorConversion::Bgr2Gray)
        );
        assert_eq!(
            "normalize:l2".parse::<Stage>().unwrap(),
            Stage::Normalize(NormType::L2)
        );
        assert_eq!("upscale".parse::<Stage>().unwrap(), Stage::UpscaleTo(100));
        assert_eq!(" upscale:1200 ".parse::<Stage>().unwrap(), Stage::UpscaleTo(1200));
        assert_eq!("binarize".parse::<Stage>().unwrap(), Stage::Binarize);
    }

    #[test]
    fn test_parse_rejects_unknown_stages() {
        for bad in ["sharpen", "upscale:0", "upscale:tall", "invert:1", "grayscale:hsv"] {
            assert!(
                matches!(bad.parse::<Stage>(), Err(PreprocessError::InvalidStage(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let stages = [
            Stage::Grayscale(ColorConversion::Bgra2Gray),
            Stage::Invert,
            Stage::Normalize(NormType::Inf),
            Stage::UpscaleTo(640),
            Stage::Binarize,
        ];
        for stage in stages {
            let parsed: Stage = stage.to_string().parse().unwrap();
            assert_eq!(parsed, stage);
        }
    }

    #[test]
    fn test_standard_pipeline_matches_composite() {
        let result = Pipeline::standard().process(page()).unwrap();
        let composite = standard()(page()).unwrap();
        assert_eq!(result.image, composite);
    }

    #[test]
    fn test_process_records_each_step() {
        let result = Pipeline::standard().process(page()).unwrap();
        let names: Vec<&str> = result.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["grayscale", "invert", "normalize", "upscale", "binarize"]
        );
    }

    #[test]
    fn test_empty_pipeline_returns_input() {
        let result = Pipeline::new(vec![]).process(page()).unwrap();
        assert_eq!(result.image, page());
        assert!(result.steps.is_empty());
    }

    #[test]
    fn test_stage_error_stops_pipeline() {
        let gray = Image::new(DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([1]))))
            .unwrap();
        let err = Pipeline::standard().process(gray).unwrap_err();
        assert!(matches!(err, PreprocessError::ChannelMismatch { .. }));
    }

    #[test]
    fn test_report_serializes_without_image() {
        let result = Pipeline::new(vec![Stage::Invert]).process(page()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("image").is_none());
        assert_eq!(json["steps"][0]["name"], "invert");
    }
}
