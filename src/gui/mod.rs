mod app;
mod message;
mod widgets;

pub use app::{DetectorApp, run};
pub use message::Message;
