//! Display collaborator used by the driver after the pipeline has run.

use crate::codec;
use crate::error::PreprocessError;
use crate::raster::Image;
use std::io::BufRead;
use std::path::PathBuf;

/// Shows a result and blocks until the user acknowledges it
pub trait Viewer {
    fn show(&mut self, title: &str, image: &Image) -> Result<(), PreprocessError>;

    fn wait_key(&mut self) -> Result<(), PreprocessError>;
}

/// Writes each shown image to a PNG preview and waits for Enter on stdin
#[derive(Debug)]
pub struct FileViewer {
    wait: bool,
    shown: Vec<PathBuf>,
}

impl FileViewer {
    pub fn new(wait: bool) -> Self {
        Self {
            wait,
            shown: Vec::new(),
        }
    }

    /// Preview files written so far
    pub fn shown(&self) -> &[PathBuf] {
        &self.shown
    }
}

impl Viewer for FileViewer {
    fn show(&mut self, title: &str, image: &Image) -> Result<(), PreprocessError> {
        let prefix: String = title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();

        let file = tempfile::Builder::new()
            .prefix(&format!("{}-", prefix))
            .suffix(".png")
            .tempfile()?;
        let (_, path) = file
            .keep()
            .map_err(|e| PreprocessError::Internal(format!("Failed to keep preview file: {}", e)))?;

        codec::encode(image, &path)?;
        tracing::info!(
            "{}: {}x{} preview written to {}",
            title,
            image.cols(),
            image.rows(),
            path.display()
        );
        self.shown.push(path);
        Ok(())
    }

    fn wait_key(&mut self) -> Result<(), PreprocessError> {
        if !self.wait {
            return Ok(());
        }

        eprintln!("Press Enter to exit...");
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(())
    }
}

/// Viewer for non-interactive runs; shows nothing and never blocks
#[derive(Debug, Default)]
pub struct NullViewer;

impl Viewer for NullViewer {
    fn show(&mut self, title: &str, _image: &Image) -> Result<(), PreprocessError> {
        tracing::debug!("Display disabled, skipping {}", title);
        Ok(())
    }

    fn wait_key(&mut self) -> Result<(), PreprocessError> {
        Ok(())
    }
}
