use image::ImageReader;
use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::models::Frame;
use crate::source::FrameSource;

/// A decoded image file, yielded once
pub struct StillImage {
    path: PathBuf,
    frame: Option<Frame>,
}

impl StillImage {
    /// Decode the image at `path`
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let unreadable = || SourceError::UnreadableImage {
            path: path.to_path_buf(),
        };

        let img = ImageReader::open(path)
            .map_err(|e| {
                log::debug!("open {} failed: {}", path.display(), e);
                unreadable()
            })?
            .with_guessed_format()
            .map_err(|_| unreadable())?
            .decode()
            .map_err(|e| {
                log::debug!("decode {} failed: {}", path.display(), e);
                unreadable()
            })?;

        Ok(Self::from_frame(path, img.into_rgb8()))
    }

    /// Wrap an already decoded frame
    pub fn from_frame(path: &Path, frame: Frame) -> Self {
        Self {
            path: path.to_path_buf(),
            frame: Some(frame),
        }
    }
}

impl FrameSource for StillImage {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        Ok(self.frame.take())
    }

    fn describe(&self) -> String {
        format!("image {}", self.path.display())
    }
}
