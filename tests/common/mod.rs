mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from yolo_preview for tests
pub use yolo_preview::{
    BoundingBox, CaptureOrigin, Detection, Detector, Frame, FrameSource, Notice, Pipeline, Preview,
    Shell, ShellState, SourceError, SourceOpener, StillImage,
};
