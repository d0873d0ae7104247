use crate::codec;
use crate::config::{Config, DisplayMode};
use crate::error::PreprocessError;
use crate::preprocessing::{Pipeline, PreprocessingResult};
use crate::viewer::{FileViewer, NullViewer, Viewer};

/// Window title for the displayed result
const DISPLAY_TITLE: &str = "Image";

/// Pick the viewer matching the configured display mode
pub fn viewer_for(mode: DisplayMode) -> Box<dyn Viewer> {
    match mode {
        DisplayMode::Interactive => Box::new(FileViewer::new(true)),
        DisplayMode::NoWait => Box::new(FileViewer::new(false)),
        DisplayMode::Disabled => Box::new(NullViewer),
    }
}

/// Decode the configured input, run the stages once and present the result
///
/// A decode failure returns before any stage runs.
pub fn run(config: &Config, viewer: &mut dyn Viewer) -> Result<PreprocessingResult, PreprocessError> {
    let image = codec::decode(&config.input, config.decode)?;
    tracing::info!(
        "Loaded {} ({}x{}, {} channel(s))",
        config.input.display(),
        image.cols(),
        image.rows(),
        image.channels()
    );

    let pipeline = Pipeline::new(config.stages.clone());
    let result = pipeline.process(image)?;
    tracing::info!(
        "Preprocessing completed in {}ms ({} stage(s)), output {}x{}",
        result.total_time_ms,
        result.steps.len(),
        result.image.cols(),
        result.image.rows()
    );

    if let Some(output) = &config.output {
        codec::encode(&result.image, output)?;
        tracing::info!("Saved result to {}", output.display());
    }

    viewer.show(DISPLAY_TITLE, &result.image)?;
    viewer.wait_key()?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodeMode;
    use crate::raster::Image;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::path::PathBuf;

    #[derive(Default)]
    struct RecordingViewer {
        shown: Vec<(String, u32, u32)>,
        waits: usize,
    }

    impl Viewer for RecordingViewer {
        fn show(&mut self, title: &str, image: &Image) -> Result<(), PreprocessError> {
            self.shown
                .push((title.to_string(), image.cols(), image.rows()));
            Ok(())
        }

        fn wait_key(&mut self) -> Result<(), PreprocessError> {
            self.waits += 1;
            Ok(())
        }
    }

    fn config(input: PathBuf, output: Option<PathBuf>) -> Config {
        Config {
            input,
            decode: DecodeMode::Color,
            stages: Pipeline::standard().stages().to_vec(),
            output,
            display: DisplayMode::Disabled,
            report: false,
        }
    }

    #[test]
    fn test_missing_input_never_reaches_viewer() {
        let mut viewer = RecordingViewer::default();
        let err = run(&config(PathBuf::from("/nonexistent/page.png"), None), &mut viewer)
            .unwrap_err();

        assert!(err.is_decode_failure());
        assert!(viewer.shown.is_empty());
        assert_eq!(viewer.waits, 0);
    }

    #[test]
    fn test_run_shows_and_saves_result() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.png");
        let output = dir.path().join("out.png");
        let page = RgbImage::from_fn(30, 24, |x, _| {
            if x % 6 < 2 {
                Rgb([10, 10, 10])
            } else {
                Rgb([240, 240, 240])
            }
        });
        DynamicImage::ImageRgb8(page).save(&input).unwrap();

        let mut viewer = RecordingViewer::default();
        let result = run(&config(input, Some(output.clone())), &mut viewer).unwrap();

        assert_eq!(result.image.rows(), 1200);
        assert_eq!(result.image.cols(), 1500);
        assert_eq!(viewer.shown, vec![("Image".to_string(), 1500, 1200)]);
        assert_eq!(viewer.waits, 1);

        let saved = codec::decode(&output, DecodeMode::Unchanged).unwrap();
        assert_eq!(saved, result.image);
    }
}
