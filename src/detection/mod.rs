pub mod classes;
pub mod postprocess;
pub mod preprocessing;
pub mod yolov5;

use anyhow::Result;

use crate::models::{Detection, Frame};

pub use postprocess::PostprocessParams;
pub use yolov5::{YoloV5, YoloV5Config};

/// Anything that turns one frame into a list of detections.
///
/// The detector is loaded once and reused for every frame.
pub trait Detector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>>;

    /// Human-readable name for this detector (used in verbose output)
    fn name(&self) -> &str;
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>> {
        (**self).detect(frame)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
