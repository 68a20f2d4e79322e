use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Message {
    UploadImage,
    UploadVideo,
    StartWebcam,
    Stop,
    ImagePicked(Option<PathBuf>),
    VideoPicked(Option<PathBuf>),
    /// Fired by the polling timer while streaming
    Tick,
    NoticeDismissed,
}
