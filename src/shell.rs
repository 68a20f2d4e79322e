//! The application's state machine, independent of any GUI toolkit.
//!
//! States are `Idle` and `Streaming`. Every operation runs to completion on
//! the caller's thread and reports what the window should show next.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::display::PreviewImage;
use crate::error::SourceError;
use crate::pipeline::Pipeline;
use crate::source::{CaptureOrigin, FrameSource, SourceOpener};

/// A blocking notification for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

/// What the window should do after a shell operation
#[derive(Debug, Clone, Default)]
pub struct ShellOutcome {
    /// New image for the preview area
    pub preview: Option<PreviewImage>,
    /// Notification to show, at most one per operation
    pub notice: Option<Notice>,
}

impl ShellOutcome {
    fn preview(preview: PreviewImage) -> Self {
        Self {
            preview: Some(preview),
            notice: None,
        }
    }

    fn notice(notice: Notice) -> Self {
        Self {
            preview: None,
            notice: Some(notice),
        }
    }
}

pub enum ShellState {
    Idle,
    Streaming {
        source: Box<dyn FrameSource>,
        origin: CaptureOrigin,
    },
}

/// Owns the active capture session (if any) and drives the pipeline
pub struct Shell<O: SourceOpener> {
    pipeline: Rc<RefCell<Pipeline>>,
    opener: O,
    state: ShellState,
}

impl<O: SourceOpener> Shell<O> {
    pub fn new(pipeline: Rc<RefCell<Pipeline>>, opener: O) -> Self {
        Self {
            pipeline,
            opener,
            state: ShellState::Idle,
        }
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.state, ShellState::Streaming { .. })
    }

    /// Stop is only offered while a stream is active
    pub fn stop_enabled(&self) -> bool {
        self.is_streaming()
    }

    pub fn streaming_origin(&self) -> Option<&CaptureOrigin> {
        match &self.state {
            ShellState::Streaming { origin, .. } => Some(origin),
            ShellState::Idle => None,
        }
    }

    /// Detect on a single image. Does not change the streaming state.
    pub fn upload_image(&mut self, path: &Path) -> ShellOutcome {
        let frame = match self.opener.open_image(path).and_then(|mut source| source.next_frame()) {
            Ok(Some(frame)) => frame,
            Ok(None) => return unreadable(SourceError::UnreadableImage { path: path.to_path_buf() }),
            Err(e) => return unreadable(e),
        };

        log::info!("Running detection on {}", path.display());
        match self.process(frame) {
            Ok(preview) => ShellOutcome::preview(preview),
            Err(notice) => ShellOutcome::notice(notice),
        }
    }

    /// Open a video file or camera and start streaming from it.
    ///
    /// An already active stream is stopped and released first.
    pub fn start_stream(&mut self, origin: CaptureOrigin) -> ShellOutcome {
        if let ShellState::Streaming { origin: active, .. } = &self.state {
            log::info!("Stopping {} before opening {}", active, origin);
            self.stop();
        }

        match self.opener.open_capture(&origin) {
            Ok(source) => {
                log::info!("Streaming from {}", source.describe());
                self.state = ShellState::Streaming { source, origin };
                ShellOutcome::default()
            }
            Err(e) => unreadable(e),
        }
    }

    /// Poll the active stream once. A no-op while idle.
    pub fn tick(&mut self) -> ShellOutcome {
        let ShellState::Streaming { source, origin } = &mut self.state else {
            return ShellOutcome::default();
        };

        let polled = source.next_frame();
        let origin = origin.clone();

        match polled {
            Ok(Some(frame)) => match self.process(frame) {
                Ok(preview) => ShellOutcome::preview(preview),
                Err(notice) => {
                    self.stop();
                    ShellOutcome::notice(notice)
                }
            },
            Ok(None) => {
                log::info!("End of stream on {}", origin);
                self.stop();
                ShellOutcome::default()
            }
            Err(e) => {
                log::warn!("Reading from {} failed: {}", origin, e);
                self.stop();
                ShellOutcome::notice(Notice::error(e.user_message()))
            }
        }
    }

    /// Release the active stream, if any. Idempotent.
    pub fn stop(&mut self) {
        if let ShellState::Streaming { origin, .. } = std::mem::replace(&mut self.state, ShellState::Idle) {
            log::info!("Stopped streaming from {}", origin);
        }
    }

    fn process(&mut self, frame: crate::models::Frame) -> Result<PreviewImage, Notice> {
        match self.pipeline.borrow_mut().process(frame) {
            Ok(processed) => Ok(processed.preview),
            Err(e) => {
                log::warn!("Detection failed: {:#}", e);
                Err(Notice::error("Detection failed."))
            }
        }
    }
}

fn unreadable(err: SourceError) -> ShellOutcome {
    log::warn!("{}", err);
    ShellOutcome::notice(Notice::error(err.user_message()))
}
