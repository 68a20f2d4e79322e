//! YOLOv5 exported to ONNX, executed with ONNX Runtime.

use anyhow::{Context, Result, bail};
use ort::session::Session;
use ort::value::Tensor;
use std::path::{Path, PathBuf};

use crate::detection::classes::class_label;
use crate::detection::postprocess::{PostprocessParams, decode_rows, non_maximum_suppression};
use crate::detection::preprocessing::{letterbox, to_nchw};
use crate::detection::Detector;
use crate::models::{Detection, Frame};

/// Input tensor name used by the YOLOv5 ONNX export
const INPUT_NAME: &str = "images";

/// Everything needed to load the model once at startup
#[derive(Debug, Clone)]
pub struct YoloV5Config {
    pub model_path: PathBuf,
    pub class_names: Vec<String>,
    pub input_size: u32,
    pub params: PostprocessParams,
}

/// An onnxruntime session plus the model's pre/post-processing
pub struct YoloV5 {
    session: Session,
    class_names: Vec<String>,
    input_size: u32,
    params: PostprocessParams,
    model_name: String,
}

impl YoloV5 {
    pub fn load(config: YoloV5Config) -> Result<Self> {
        let session = Session::builder()
            .context("failed to create ORT session builder")?
            .commit_from_file(&config.model_path)
            .with_context(|| format!("failed to load YOLOv5 model from {}", config.model_path.display()))?;

        Ok(Self {
            session,
            class_names: config.class_names,
            input_size: config.input_size,
            params: config.params,
            model_name: model_name(&config.model_path),
        })
    }
}

fn model_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "yolov5".to_string())
}

impl Detector for YoloV5 {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>> {
        let size = self.input_size as usize;
        let (input_image, lb) = letterbox(frame, self.input_size);
        let input = Tensor::from_array(([1usize, 3, size, size], to_nchw(&input_image).into_boxed_slice()))
            .context("failed to create YOLOv5 input tensor")?;

        let outputs = self
            .session
            .run(ort::inputs![INPUT_NAME => input])
            .context("YOLOv5 inference failed")?;

        let output = outputs
            .iter()
            .next()
            .context("YOLOv5 produced no outputs")?
            .1;
        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .context("failed to extract YOLOv5 output tensor")?;

        // [1, N, 5 + classes]
        if shape.len() != 3 {
            bail!("unexpected YOLOv5 output shape {:?}", &shape[..]);
        }
        let row_len = shape[2] as usize;

        let candidates = decode_rows(data, row_len, self.params.conf_threshold);
        let kept = non_maximum_suppression(candidates, self.params.iou_threshold, self.params.max_detections);

        let (width, height) = frame.dimensions();
        Ok(kept
            .into_iter()
            .map(|c| {
                Detection::new(
                    lb.unmap(&c.bbox).clamp_to(width, height),
                    c.class_id,
                    class_label(&self.class_names, c.class_id),
                    c.score,
                )
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}
