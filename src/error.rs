//! Error types for frame acquisition

use std::path::PathBuf;
use thiserror::Error;

use crate::source::CaptureOrigin;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Cannot read image: {}", path.display())]
    UnreadableImage { path: PathBuf },

    #[error("Cannot open capture source: {origin}")]
    CaptureOpen { origin: CaptureOrigin },

    #[error("OpenCV error: {0}")]
    OpenCv(String),

    #[error("Frame conversion error: {0}")]
    Conversion(String),
}

impl SourceError {
    /// Message shown to the user in the blocking notification
    pub fn user_message(&self) -> &'static str {
        match self {
            SourceError::UnreadableImage { .. } => "Cannot read image.",
            SourceError::CaptureOpen { origin: CaptureOrigin::File(_) } => "Cannot open video file.",
            SourceError::CaptureOpen { origin: CaptureOrigin::Camera(_) } => "Cannot access webcam.",
            SourceError::OpenCv(_) | SourceError::Conversion(_) => "Cannot read frame.",
        }
    }
}

impl From<opencv::Error> for SourceError {
    fn from(err: opencv::Error) -> Self {
        SourceError::OpenCv(err.message)
    }
}
