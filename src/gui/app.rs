use std::cell::RefCell;
use std::rc::Rc;

use iced::widget::{column, container, image};
use iced::{Element, Size, Subscription, Task};
use rfd::{AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageLevel};

use super::Message;
use super::widgets::{controls, preview_panel};
use crate::config::Settings;
use crate::pipeline::Pipeline;
use crate::shell::{Notice, Shell, ShellOutcome};
use crate::source::{CaptureOrigin, SystemOpener};

const WINDOW_TITLE: &str = "Integrated Recognition & Detection using CNN (YOLOv5)";

pub struct DetectorApp {
    shell: Shell<SystemOpener>,
    settings: Settings,
    preview: Option<image::Handle>,
}

impl DetectorApp {
    pub fn new(pipeline: Rc<RefCell<Pipeline>>, settings: Settings) -> Self {
        Self {
            shell: Shell::new(pipeline, SystemOpener),
            settings,
            preview: None,
        }
    }

    pub fn title(&self) -> String {
        WINDOW_TITLE.to_string()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UploadImage => Task::perform(
                AsyncFileDialog::new()
                    .set_title("Select Image")
                    .add_filter("Image Files", &["jpg", "jpeg", "png"])
                    .pick_file(),
                |handle| Message::ImagePicked(handle.map(|data| data.path().to_path_buf())),
            ),
            Message::UploadVideo => Task::perform(
                AsyncFileDialog::new()
                    .set_title("Select Video")
                    .add_filter("Video Files", &["mp4", "avi", "mov"])
                    .pick_file(),
                |handle| Message::VideoPicked(handle.map(|data| data.path().to_path_buf())),
            ),
            Message::ImagePicked(Some(path)) => {
                let outcome = self.shell.upload_image(&path);
                self.apply(outcome)
            }
            Message::VideoPicked(Some(path)) => self.start(CaptureOrigin::File(path)),
            Message::ImagePicked(None) | Message::VideoPicked(None) => Task::none(),
            Message::StartWebcam => self.start(CaptureOrigin::Camera(self.settings.camera_index)),
            Message::Tick => {
                let outcome = self.shell.tick();
                self.apply(outcome)
            }
            Message::Stop => {
                self.shell.stop();
                Task::none()
            }
            Message::NoticeDismissed => Task::none(),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let stop = self.shell.stop_enabled().then_some(Message::Stop);
        let content = column![
            controls(Message::UploadImage, Message::UploadVideo, Message::StartWebcam, stop),
            preview_panel(self.preview.as_ref()),
        ]
        .spacing(20)
        .padding(20);

        container(content)
            .center_x(iced::Length::Fill)
            .center_y(iced::Length::Fill)
            .into()
    }

    /// One repeating timer while streaming, nothing otherwise
    pub fn subscription(&self) -> Subscription<Message> {
        if self.shell.is_streaming() {
            iced::time::every(self.settings.tick_interval).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    fn start(&mut self, origin: CaptureOrigin) -> Task<Message> {
        let outcome = self.shell.start_stream(origin);
        self.apply(outcome)
    }

    fn apply(&mut self, outcome: ShellOutcome) -> Task<Message> {
        if let Some(preview) = outcome.preview {
            self.preview = Some(image::Handle::from_rgba(preview.width, preview.height, preview.rgba));
        }
        match outcome.notice {
            Some(notice) => show_notice(notice),
            None => Task::none(),
        }
    }
}

fn show_notice(notice: Notice) -> Task<Message> {
    Task::perform(
        AsyncMessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(notice.title.as_str())
            .set_description(notice.message.as_str())
            .set_buttons(MessageButtons::Ok)
            .show(),
        |_| Message::NoticeDismissed,
    )
}

/// Open the main window and run the event loop until it closes.
///
/// All messages, including timer ticks, are handled one at a time on this thread.
pub fn run(settings: Settings, pipeline: Rc<RefCell<Pipeline>>) -> iced::Result {
    iced::application(
        move || DetectorApp::new(Rc::clone(&pipeline), settings.clone()),
        DetectorApp::update,
        DetectorApp::view,
    )
    .title(DetectorApp::title)
    .subscription(DetectorApp::subscription)
    .window_size(Size::new(1000.0, 700.0))
    .run()
}
