//! Turning annotated frames into something the window can show.

use image::imageops::{self, FilterType};
use image::DynamicImage;

use crate::models::Frame;

/// Fixed size of the preview area, in logical pixels
pub const PREVIEW_WIDTH: u32 = 960;
pub const PREVIEW_HEIGHT: u32 = 600;

/// RGBA pixels scaled to fit the preview area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Largest size with the aspect ratio of `size` that fits inside `bounds`.
/// Never returns zero in either axis.
pub fn fit_within(size: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (w, h) = (size.0.max(1) as f64, size.1.max(1) as f64);
    let (max_w, max_h) = (bounds.0.max(1) as f64, bounds.1.max(1) as f64);
    let scale = (max_w / w).min(max_h / h);
    (
        ((w * scale).round() as u32).clamp(1, bounds.0.max(1)),
        ((h * scale).round() as u32).clamp(1, bounds.1.max(1)),
    )
}

/// Scales frames into the fixed preview area
#[derive(Debug, Clone, Copy)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
}

impl Preview {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn render(&self, frame: &Frame) -> PreviewImage {
        let (width, height) = fit_within(frame.dimensions(), (self.width, self.height));
        let scaled = if (width, height) == frame.dimensions() {
            frame.clone()
        } else {
            imageops::resize(frame, width, height, FilterType::Triangle)
        };
        let rgba = DynamicImage::ImageRgb8(scaled).into_rgba8();

        PreviewImage {
            width,
            height,
            rgba: rgba.into_raw(),
        }
    }
}

impl Default for Preview {
    fn default() -> Self {
        Self::new(PREVIEW_WIDTH, PREVIEW_HEIGHT)
    }
}
