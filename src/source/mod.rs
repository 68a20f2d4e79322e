//! Frame sources.
//!
//! A source yields the next image to process:
//! - a still image file, yielded exactly once
//! - a video file, one frame per poll
//! - a camera device, one frame per poll
//!
//! `Ok(None)` is end-of-stream, a normal terminal condition rather than an error.

pub mod capture;
pub mod still;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::models::Frame;

pub use capture::CaptureSession;
pub use still::StillImage;

/// Anything that can produce frames on demand
pub trait FrameSource {
    /// Next decoded frame, or `None` once the source is exhausted
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;

    /// Human-readable description (used in logs)
    fn describe(&self) -> String;
}

/// Where a capture session reads from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOrigin {
    File(PathBuf),
    Camera(i32),
}

impl fmt::Display for CaptureOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureOrigin::File(path) => write!(f, "file {}", path.display()),
            CaptureOrigin::Camera(index) => write!(f, "camera {}", index),
        }
    }
}

/// Opens frame sources. The shell only talks to this trait, so tests can
/// hand it scripted sources instead of real files and devices.
pub trait SourceOpener {
    fn open_image(&self, path: &Path) -> Result<Box<dyn FrameSource>, SourceError>;

    fn open_capture(&self, origin: &CaptureOrigin) -> Result<Box<dyn FrameSource>, SourceError>;
}

/// Opens real files and devices (image crate for stills, OpenCV for captures)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl SourceOpener for SystemOpener {
    fn open_image(&self, path: &Path) -> Result<Box<dyn FrameSource>, SourceError> {
        Ok(Box::new(StillImage::open(path)?))
    }

    fn open_capture(&self, origin: &CaptureOrigin) -> Result<Box<dyn FrameSource>, SourceError> {
        Ok(Box::new(CaptureSession::open(origin.clone())?))
    }
}
