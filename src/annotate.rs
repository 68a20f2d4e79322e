//! Drawing detections onto frames.

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::Rgb;
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::Path;

use crate::models::{Detection, Frame};

pub const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const LABEL_COLOR: Rgb<u8> = Rgb([0, 255, 255]);
pub const BOX_THICKNESS: u32 = 2;
/// Gap between the label baseline and the top edge of the box
pub const LABEL_OFFSET: i32 = 10;
pub const TEXT_SCALE: f32 = 20.0;

/// DejaVu Sans, used when no font is configured
static BUNDLED_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

/// Integer box corners, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    /// Float corners truncated towards zero; out-of-range values saturate
    pub fn from_detection(det: &Detection) -> Self {
        Self {
            left: det.bbox.xmin as i32,
            top: det.bbox.ymin as i32,
            right: det.bbox.xmax as i32,
            bottom: det.bbox.ymax as i32,
        }
    }

    /// Clamp every edge into `[-margin, limit + margin]`, so edges outside the
    /// frame stay outside and the rest keep their exact position
    pub fn clamp_to(&self, width: u32, height: u32, margin: u32) -> Self {
        let margin = margin.min(i32::MAX as u32 / 4) as i32;
        let max_x = (width.min(i32::MAX as u32 / 2) as i32).saturating_add(margin);
        let max_y = (height.min(i32::MAX as u32 / 2) as i32).saturating_add(margin);
        Self {
            left: self.left.clamp(-margin, max_x),
            top: self.top.clamp(-margin, max_y),
            right: self.right.clamp(-margin, max_x),
            bottom: self.bottom.clamp(-margin, max_y),
        }
    }
}

/// Drawing primitives the annotator needs
pub trait Painter {
    fn rectangle(&mut self, rect: PixelRect, color: Rgb<u8>, thickness: u32);

    /// Draw `text` with its baseline starting at `anchor`
    fn label(&mut self, anchor: (i32, i32), text: &str, color: Rgb<u8>);
}

/// Paints straight into an RGB frame
pub struct ImagePainter<'a> {
    image: &'a mut Frame,
    font: Option<&'a FontVec>,
    scale: PxScale,
}

impl<'a> ImagePainter<'a> {
    pub fn new(image: &'a mut Frame, font: Option<&'a FontVec>, scale: f32) -> Self {
        Self {
            image,
            font,
            scale: PxScale::from(scale),
        }
    }
}

impl Painter for ImagePainter<'_> {
    fn rectangle(&mut self, rect: PixelRect, color: Rgb<u8>, thickness: u32) {
        let (frame_w, frame_h) = self.image.dimensions();
        let thickness = thickness.min(frame_w.max(frame_h).saturating_add(1));
        let rect = rect.clamp_to(frame_w, frame_h, thickness);

        for inset in 0..thickness as i32 {
            let width = rect.right - rect.left - 2 * inset + 1;
            let height = rect.bottom - rect.top - 2 * inset + 1;
            if width <= 0 || height <= 0 {
                break;
            }
            let r = Rect::at(rect.left + inset, rect.top + inset).of_size(width as u32, height as u32);
            draw_hollow_rect_mut(self.image, r, color);
        }
    }

    fn label(&mut self, anchor: (i32, i32), text: &str, color: Rgb<u8>) {
        let Some(font) = self.font else {
            return;
        };
        let (frame_w, frame_h) = self.image.dimensions();
        let (_, text_height) = text_size(self.scale, font, text);
        let max_x = frame_w.min(i32::MAX as u32 / 2) as i32;
        let max_y = frame_h.min(i32::MAX as u32 / 2) as i32;
        let x = anchor.0.clamp(0, max_x);
        let y = anchor
            .1
            .saturating_sub(text_height.min(i32::MAX as u32) as i32)
            .clamp(0, max_y);
        draw_text_mut(self.image, color, x, y, self.scale, font, text);
    }
}

/// Draws each detection's box and caption
pub struct Annotator {
    font: Option<FontVec>,
    pub box_color: Rgb<u8>,
    pub label_color: Rgb<u8>,
    pub thickness: u32,
    pub text_scale: f32,
}

impl Annotator {
    pub fn new(font: Option<FontVec>) -> Self {
        Self {
            font,
            box_color: BOX_COLOR,
            label_color: LABEL_COLOR,
            thickness: BOX_THICKNESS,
            text_scale: TEXT_SCALE,
        }
    }

    /// Build an annotator with the configured font, or the bundled one.
    ///
    /// A configured font that cannot be read or parsed is an error.
    pub fn with_font_path(font_path: Option<&Path>) -> Result<Self> {
        match font_path {
            Some(path) => Ok(Self::new(Some(load_font(path)?))),
            None => Ok(Self::default()),
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw every detection onto `frame` in place. The frame keeps its size.
    pub fn annotate(&self, frame: &mut Frame, detections: &[Detection]) {
        let mut painter = ImagePainter::new(frame, self.font.as_ref(), self.text_scale);
        self.paint(&mut painter, detections);
    }

    /// Issue one rectangle and one label per detection, in list order
    pub fn paint<P: Painter>(&self, painter: &mut P, detections: &[Detection]) {
        for det in detections {
            let rect = PixelRect::from_detection(det);
            painter.rectangle(rect, self.box_color, self.thickness);
            painter.label(
                (rect.left, rect.top.saturating_sub(LABEL_OFFSET)),
                &det.caption(),
                self.label_color,
            );
        }
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(bundled_font())
    }
}

/// Read and parse a TrueType/OpenType font file
pub fn load_font(path: &Path) -> Result<FontVec> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read font {}", path.display()))?;
    let font = FontVec::try_from_vec(bytes).with_context(|| format!("invalid font file {}", path.display()))?;
    log::debug!("Using font {}", path.display());
    Ok(font)
}

fn bundled_font() -> Option<FontVec> {
    match FontVec::try_from_vec(BUNDLED_FONT.to_vec()) {
        Ok(font) => Some(font),
        Err(e) => {
            log::error!("Bundled font is corrupt, labels will not be drawn: {}", e);
            None
        }
    }
}
