use anyhow::Result;
use std::path::PathBuf;

use crate::annotate::Annotator;
use crate::detection::Detector;
use crate::display::{Preview, PreviewImage};
use crate::models::{Detection, Frame};

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Directory annotated frames are written to
    pub output_dir: PathBuf,
}

/// Result of running one frame through the pipeline
#[derive(Debug, Clone)]
pub struct ProcessedFrame {
    pub detections: Vec<Detection>,
    pub frame: Frame,
    pub preview: PreviewImage,
}

/// Detect, annotate and render, one frame at a time.
///
/// Runs to completion on the caller's thread.
pub struct Pipeline {
    detector: Box<dyn Detector>,
    annotator: Annotator,
    preview: Preview,
    verbose: bool,
    debug: Option<DebugConfig>,
    frames_processed: u64,
}

impl Pipeline {
    pub fn new(detector: Box<dyn Detector>) -> Self {
        Self {
            detector,
            annotator: Annotator::default(),
            preview: Preview::default(),
            verbose: false,
            debug: None,
            frames_processed: 0,
        }
    }

    pub fn with_annotator(mut self, annotator: Annotator) -> Self {
        self.annotator = annotator;
        self
    }

    pub fn with_preview(mut self, preview: Preview) -> Self {
        self.preview = preview;
        self
    }

    /// Log every detection at info level instead of debug
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.debug = Some(DebugConfig { output_dir });

        Ok(self)
    }

    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Run detection on `frame`, draw the results onto it and render a preview
    pub fn process(&mut self, mut frame: Frame) -> Result<ProcessedFrame> {
        let detections = self.detector.detect(&frame)?;
        self.annotator.annotate(&mut frame, &detections);
        self.frames_processed += 1;

        if self.verbose {
            log::info!(
                "Frame {}: {} detections from {}",
                self.frames_processed,
                detections.len(),
                self.detector.name()
            );
            for det in &detections {
                log::info!(
                    "  {} at ({:.0}, {:.0})-({:.0}, {:.0})",
                    det.caption(),
                    det.bbox.xmin,
                    det.bbox.ymin,
                    det.bbox.xmax,
                    det.bbox.ymax
                );
            }
        } else {
            log::debug!("Frame {}: {} detections", self.frames_processed, detections.len());
        }

        self.save_debug_output(&frame)?;

        let preview = self.preview.render(&frame);
        Ok(ProcessedFrame {
            detections,
            frame,
            preview,
        })
    }

    /// Save the annotated frame when a debug directory is configured
    fn save_debug_output(&self, frame: &Frame) -> Result<()> {
        if let Some(debug_config) = &self.debug {
            let filename = format!("{:05}.png", self.frames_processed);
            let output_path = debug_config.output_dir.join(&filename);
            frame
                .save(&output_path)
                .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;

            log::debug!("Debug: saved {}", output_path.display());
        }

        Ok(())
    }
}
