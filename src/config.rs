//! Command line and config file settings.
//!
//! Precedence: command line flag, then config file value, then default.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::detection::classes::{coco_class_names, read_classes_txt_file};
use crate::detection::{PostprocessParams, YoloV5Config};

const DEFAULT_MODEL_PATH: &str = "models/yolov5s.onnx";
const DEFAULT_CAMERA_INDEX: i32 = 0;
const DEFAULT_TICK_MS: u64 = 30;
const DEFAULT_INPUT_SIZE: u32 = 640;

#[derive(Parser, Debug, Default)]
#[command(name = "yolo-preview")]
#[command(about = "Run YOLOv5 object detection on images, videos and webcam feeds")]
pub struct Cli {
    /// Path to the YOLOv5 ONNX model
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Class names file, one name per line (defaults to COCO)
    #[arg(long, value_name = "PATH")]
    pub classes: Option<PathBuf>,

    /// TrueType font used for labels
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Camera device index for the webcam feed
    #[arg(long, value_name = "INDEX")]
    pub camera: Option<i32>,

    /// Interval between video/webcam polls in milliseconds
    #[arg(long, value_name = "MS")]
    pub tick_ms: Option<u64>,

    /// Minimum detection confidence
    #[arg(long, value_name = "F")]
    pub conf: Option<f32>,

    /// IoU threshold for non maximum suppression
    #[arg(long, value_name = "F")]
    pub iou: Option<f32>,

    /// TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Save every annotated frame to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    pub debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    model: Option<PathBuf>,
    classes: Option<PathBuf>,
    font: Option<PathBuf>,
    camera: Option<i32>,
    tick_ms: Option<u64>,
    conf_threshold: Option<f32>,
    iou_threshold: Option<f32>,
    max_detections: Option<usize>,
    input_size: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub model_path: PathBuf,
    pub classes_path: Option<PathBuf>,
    pub font_path: Option<PathBuf>,
    pub camera_index: i32,
    pub tick_interval: Duration,
    pub params: PostprocessParams,
    pub input_size: u32,
    pub debug_out: Option<PathBuf>,
    pub verbose: bool,
}

impl Settings {
    /// Merge the command line with the optional config file and validate
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let file = match cli.config.as_deref() {
            Some(path) => read_config_file(path)?,
            None => SettingsFile::default(),
        };

        let defaults = PostprocessParams::default();
        let settings = Self {
            model_path: cli
                .model
                .or(file.model)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            classes_path: cli.classes.or(file.classes),
            font_path: cli.font.or(file.font),
            camera_index: cli.camera.or(file.camera).unwrap_or(DEFAULT_CAMERA_INDEX),
            tick_interval: Duration::from_millis(cli.tick_ms.or(file.tick_ms).unwrap_or(DEFAULT_TICK_MS)),
            params: PostprocessParams {
                conf_threshold: cli.conf.or(file.conf_threshold).unwrap_or(defaults.conf_threshold),
                iou_threshold: cli.iou.or(file.iou_threshold).unwrap_or(defaults.iou_threshold),
                max_detections: file.max_detections.unwrap_or(defaults.max_detections),
            },
            input_size: file.input_size.unwrap_or(DEFAULT_INPUT_SIZE),
            debug_out: cli.debug_out,
            verbose: cli.verbose,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.params.conf_threshold) {
            return Err(anyhow!("confidence threshold must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.params.iou_threshold) {
            return Err(anyhow!("IoU threshold must be within [0, 1]"));
        }
        if self.params.max_detections == 0 {
            return Err(anyhow!("max_detections must be at least 1"));
        }
        if self.tick_interval.is_zero() {
            return Err(anyhow!("tick interval must be at least 1 ms"));
        }
        if self.input_size == 0 || self.input_size % 32 != 0 {
            return Err(anyhow!("input size must be a positive multiple of 32"));
        }
        if !self.model_path.is_file() {
            return Err(anyhow!(
                "Model path does not exist, or cannot be read: {}",
                self.model_path.display()
            ));
        }
        if let Some(font) = &self.font_path {
            if !font.is_file() {
                return Err(anyhow!(
                    "Font path does not exist, or cannot be read: {}",
                    font.display()
                ));
            }
        }
        Ok(())
    }

    /// Class names from the configured file, or the built-in COCO list
    pub fn class_names(&self) -> Result<Vec<String>> {
        match &self.classes_path {
            Some(path) => read_classes_txt_file(path)
                .with_context(|| format!("failed to read classes file {}", path.display())),
            None => Ok(coco_class_names()),
        }
    }

    pub fn yolo_config(&self) -> Result<YoloV5Config> {
        Ok(YoloV5Config {
            model_path: self.model_path.clone(),
            class_names: self.class_names()?,
            input_size: self.input_size,
            params: self.params,
        })
    }
}

fn read_config_file(path: &Path) -> Result<SettingsFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse config file {}", path.display()))
}
