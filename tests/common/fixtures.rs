use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use image::{ImageBuffer, Rgb};
use tempfile::NamedTempFile;
use yolo_preview::{
    BoundingBox, CaptureOrigin, Detection, Detector, Frame, FrameSource, Pipeline, Preview,
    SourceError, SourceOpener, StillImage,
};

/// Creates a 100x100 black test image and returns the temp file.
/// The file will be automatically cleaned up when dropped.
pub fn create_test_image() -> NamedTempFile {
    let img = ImageBuffer::from_fn(100, 100, |_, _| Rgb([0u8, 0u8, 0u8]));
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// A detection of a person at (10,10)-(50,50) with confidence 0.87
pub fn person_detection() -> Detection {
    Detection::new(BoundingBox::new(10.0, 10.0, 50.0, 50.0), 0, "person", 0.87)
}

/// Returns the same detections for every frame and counts calls
pub struct FixedDetector {
    pub detections: Vec<Detection>,
    pub calls: Rc<RefCell<usize>>,
}

impl FixedDetector {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self {
            detections,
            calls: Rc::new(RefCell::new(0)),
        }
    }
}

impl Detector for FixedDetector {
    fn detect(&mut self, _frame: &Frame) -> anyhow::Result<Vec<Detection>> {
        *self.calls.borrow_mut() += 1;
        Ok(self.detections.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Always fails inference
pub struct FailingDetector;

impl Detector for FailingDetector {
    fn detect(&mut self, _frame: &Frame) -> anyhow::Result<Vec<Detection>> {
        Err(anyhow::anyhow!("inference backend unavailable"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Shared pipeline with a preview the same size as the 100x100 test frames
pub fn shared_pipeline(detector: impl Detector + 'static) -> Rc<RefCell<Pipeline>> {
    Rc::new(RefCell::new(
        Pipeline::new(Box::new(detector)).with_preview(Preview::new(100, 100)),
    ))
}

/// One scripted poll result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Frame,
    Fail,
}

/// Counts sessions opened and released by a `ScriptedOpener`
#[derive(Debug, Default)]
pub struct SessionLog {
    pub opened: Vec<CaptureOrigin>,
    pub released: Vec<CaptureOrigin>,
}

impl SessionLog {
    pub fn live(&self) -> usize {
        self.opened.len() - self.released.len()
    }
}

/// Yields its steps in order, then end-of-stream. Records its release on drop.
pub struct ScriptedSource {
    origin: CaptureOrigin,
    steps: VecDeque<Step>,
    log: Rc<RefCell<SessionLog>>,
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        match self.steps.pop_front() {
            Some(Step::Frame) => Ok(Some(Frame::new(100, 100))),
            Some(Step::Fail) => Err(SourceError::OpenCv("device unplugged".to_string())),
            None => Ok(None),
        }
    }

    fn describe(&self) -> String {
        format!("scripted {}", self.origin)
    }
}

impl Drop for ScriptedSource {
    fn drop(&mut self) {
        self.log.borrow_mut().released.push(self.origin.clone());
    }
}

/// Hands out scripted captures; still images are read from disk as usual.
/// Origins listed in `unavailable` fail to open.
pub struct ScriptedOpener {
    pub steps: Vec<Step>,
    pub unavailable: Vec<CaptureOrigin>,
    pub log: Rc<RefCell<SessionLog>>,
}

impl ScriptedOpener {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            unavailable: Vec::new(),
            log: Rc::new(RefCell::new(SessionLog::default())),
        }
    }

    /// A capture that yields `n` frames and then ends
    pub fn frames(n: usize) -> Self {
        Self::new(vec![Step::Frame; n])
    }
}

impl SourceOpener for ScriptedOpener {
    fn open_image(&self, path: &Path) -> Result<Box<dyn FrameSource>, SourceError> {
        Ok(Box::new(StillImage::open(path)?))
    }

    fn open_capture(&self, origin: &CaptureOrigin) -> Result<Box<dyn FrameSource>, SourceError> {
        if self.unavailable.contains(origin) {
            return Err(SourceError::CaptureOpen {
                origin: origin.clone(),
            });
        }
        self.log.borrow_mut().opened.push(origin.clone());
        Ok(Box::new(ScriptedSource {
            origin: origin.clone(),
            steps: self.steps.iter().copied().collect(),
            log: Rc::clone(&self.log),
        }))
    }
}
