use clap::Parser;
use std::cell::RefCell;
use std::rc::Rc;

use yolo_preview::{Annotator, Cli, Pipeline, Settings, YoloV5};

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let settings = Settings::from_cli(args)?;

    log::info!("Loading YOLOv5 model...");
    let detector = YoloV5::load(settings.yolo_config()?)?;
    log::info!("Model loaded successfully!");

    let mut pipeline = Pipeline::new(Box::new(detector))
        .with_annotator(Annotator::with_font_path(settings.font_path.as_deref())?)
        .with_verbose(settings.verbose);

    if let Some(debug_dir) = settings.debug_out.clone() {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    // Initialized once here, shared with the window, dropped when the event loop exits
    let pipeline = Rc::new(RefCell::new(pipeline));

    yolo_preview::gui::run(settings, pipeline)
        .map_err(|e| anyhow::anyhow!("GUI error: {}", e))?;

    Ok(())
}
