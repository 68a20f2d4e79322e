use iced::{
    Alignment::Center,
    Color, Element, Length, Theme, border,
    widget::{button, container, container::Style, image, row, text},
};
use iced_widget::container::bordered_box;

use crate::display::{PREVIEW_HEIGHT, PREVIEW_WIDTH};

/// Dark panel with a gray border, like an empty monitor
fn preview_style(theme: &Theme) -> Style {
    bordered_box(theme)
        .background(Color::from_rgb8(0x20, 0x20, 0x20))
        .border(border::width(2).color(Color::from_rgb8(0x80, 0x80, 0x80)))
}

/// Fixed-size area showing the latest annotated frame
pub fn preview_panel<'a, Message>(handle: Option<&image::Handle>) -> Element<'a, Message>
where
    Message: 'a,
{
    let content: Element<'a, Message> = match handle {
        Some(handle) => image(handle.clone()).into(),
        None => text("Detection Preview").color(Color::WHITE).into(),
    };

    container(content)
        .width(Length::Fixed(PREVIEW_WIDTH as f32))
        .height(Length::Fixed(PREVIEW_HEIGHT as f32))
        .align_x(Center)
        .align_y(Center)
        .style(preview_style)
        .into()
}

/// The four action buttons. Stop is only clickable while `stop` is `Some`.
pub fn controls<'a, Message>(
    upload_image: Message,
    upload_video: Message,
    webcam: Message,
    stop: Option<Message>,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    row![
        button("Upload Image").on_press(upload_image),
        button("Upload Video").on_press(upload_video),
        button("Webcam Feed").on_press(webcam),
        button("Stop").on_press_maybe(stop),
    ]
    .spacing(20)
    .into()
}
