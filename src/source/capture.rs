//! Video file and camera capture through OpenCV.

use opencv::{
    core::{Mat, CV_8U},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};

use crate::error::SourceError;
use crate::models::Frame;
use crate::source::{CaptureOrigin, FrameSource};

/// An open handle to a video file or camera device.
///
/// The handle is released when the session is dropped.
pub struct CaptureSession {
    origin: CaptureOrigin,
    capture: VideoCapture,
    frames_read: u64,
}

impl CaptureSession {
    /// Open `origin`. Fails with `CaptureOpen` if OpenCV cannot open it.
    pub fn open(origin: CaptureOrigin) -> Result<Self, SourceError> {
        let capture = match &origin {
            CaptureOrigin::File(path) => {
                VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)
            }
            CaptureOrigin::Camera(index) => VideoCapture::new(*index, videoio::CAP_ANY),
        };

        let capture = match capture {
            Ok(capture) => capture,
            Err(e) => {
                log::debug!("VideoCapture for {} failed: {}", origin, e.message);
                return Err(SourceError::CaptureOpen { origin });
            }
        };

        if !capture.is_opened().unwrap_or(false) {
            return Err(SourceError::CaptureOpen { origin });
        }

        log::info!("Capture session opened on {}", origin);
        Ok(Self {
            origin,
            capture,
            frames_read: 0,
        })
    }
}

impl FrameSource for CaptureSession {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        let mut mat = Mat::default();
        let grabbed = self.capture.read(&mut mat)?;
        if !grabbed || mat.empty() {
            return Ok(None);
        }

        let frame = mat_to_frame(&mat)?;
        self.frames_read += 1;
        Ok(Some(frame))
    }

    fn describe(&self) -> String {
        self.origin.to_string()
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            log::warn!("Failed to release {}: {}", self.origin, e.message);
        }
        log::info!(
            "Capture session on {} released after {} frames",
            self.origin,
            self.frames_read
        );
    }
}

/// OpenCV colour conversion code that turns a Mat with `channels` channels
/// (OpenCV's BGR ordering) into packed RGB
pub fn rgb_conversion_code(channels: i32) -> Option<i32> {
    match channels {
        1 => Some(imgproc::COLOR_GRAY2RGB),
        3 => Some(imgproc::COLOR_BGR2RGB),
        4 => Some(imgproc::COLOR_BGRA2RGB),
        _ => None,
    }
}

/// Copy an 8-bit OpenCV Mat into an RGB frame
pub fn mat_to_frame(mat: &Mat) -> Result<Frame, SourceError> {
    if mat.depth() != CV_8U {
        return Err(SourceError::Conversion(format!(
            "unsupported Mat depth {}",
            mat.depth()
        )));
    }

    let channels = mat.channels();
    let code = rgb_conversion_code(channels)
        .ok_or_else(|| SourceError::Conversion(format!("unsupported channel count {}", channels)))?;

    let mut rgb = Mat::default();
    imgproc::cvt_color(mat, &mut rgb, code, 0)?;

    let width = u32::try_from(rgb.cols())
        .map_err(|_| SourceError::Conversion("negative width".to_string()))?;
    let height = u32::try_from(rgb.rows())
        .map_err(|_| SourceError::Conversion("negative height".to_string()))?;

    // try_clone always yields a continuous copy
    let rgb = if rgb.is_continuous() { rgb } else { rgb.try_clone()? };
    let pixels = rgb.data_bytes()?.to_vec();

    Frame::from_raw(width, height, pixels)
        .ok_or_else(|| SourceError::Conversion("pixel buffer does not match Mat size".to_string()))
}
