pub mod annotate;
pub mod config;
pub mod detection;
pub mod display;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod shell;
pub mod source;

pub use annotate::{Annotator, Painter, PixelRect};
pub use config::{Cli, Settings};
pub use detection::{Detector, YoloV5, YoloV5Config};
pub use display::{Preview, PreviewImage};
pub use error::SourceError;
pub use models::{BoundingBox, Detection, Frame};
pub use pipeline::{Pipeline, ProcessedFrame};
pub use shell::{Notice, Shell, ShellOutcome, ShellState};
pub use source::{CaptureOrigin, CaptureSession, FrameSource, SourceOpener, StillImage, SystemOpener};

#[cfg(feature = "gui")]
pub mod gui;
