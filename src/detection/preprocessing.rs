use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::models::{BoundingBox, Frame};

/// Gray used to pad the letterboxed input
pub const LETTERBOX_FILL: u8 = 114;

/// How a frame was fitted into the square model input.
///
/// `pad_x`/`pad_y` are the whole-pixel offsets the resized frame is pasted at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
}

impl Letterbox {
    /// Compute the resize ratio and padding that fit `width` x `height`
    /// into a `size` x `size` square without distortion
    pub fn fit(width: u32, height: u32, size: u32) -> Self {
        let scale = (size as f32 / width.max(1) as f32).min(size as f32 / height.max(1) as f32);
        let (new_w, new_h) = Self::scaled_dims(width, height, scale);
        Self {
            scale,
            pad_x: Self::offset(size.saturating_sub(new_w)),
            pad_y: Self::offset(size.saturating_sub(new_h)),
        }
    }

    /// Left/top share of `padding`, rounded down on exact halves
    fn offset(padding: u32) -> f32 {
        (padding as f32 / 2.0 - 0.1).round().max(0.0)
    }

    fn scaled_dims(width: u32, height: u32, scale: f32) -> (u32, u32) {
        (
            ((width as f32 * scale).round() as u32).max(1),
            ((height as f32 * scale).round() as u32).max(1),
        )
    }

    /// Map a box from model-input space back to the original frame
    pub fn unmap(&self, bbox: &BoundingBox) -> BoundingBox {
        BoundingBox {
            xmin: (bbox.xmin - self.pad_x) / self.scale,
            ymin: (bbox.ymin - self.pad_y) / self.scale,
            xmax: (bbox.xmax - self.pad_x) / self.scale,
            ymax: (bbox.ymax - self.pad_y) / self.scale,
        }
    }
}

/// Resize `frame` into a gray-padded `size` x `size` canvas
pub fn letterbox(frame: &Frame, size: u32) -> (RgbImage, Letterbox) {
    let (width, height) = frame.dimensions();
    let lb = Letterbox::fit(width, height, size);
    let (new_w, new_h) = Letterbox::scaled_dims(width, height, lb.scale);

    let resized = imageops::resize(frame, new_w, new_h, FilterType::Triangle);
    let mut canvas = RgbImage::from_pixel(size, size, Rgb([LETTERBOX_FILL; 3]));
    imageops::overlay(&mut canvas, &resized, lb.pad_x as i64, lb.pad_y as i64);

    (canvas, lb)
}

/// Planar NCHW float data in `[0, 1]`, ready for a `[1, 3, H, W]` tensor
pub fn to_nchw(img: &RgbImage) -> Vec<f32> {
    let size = (img.width() * img.height()) as usize;
    let raw = img.as_raw();
    let mut tensor_data = vec![0f32; 3 * size];

    for idx in 0..size {
        tensor_data[idx] = raw[idx * 3] as f32 / 255.0;
        tensor_data[size + idx] = raw[idx * 3 + 1] as f32 / 255.0;
        tensor_data[2 * size + idx] = raw[idx * 3 + 2] as f32 / 255.0;
    }

    tensor_data
}
