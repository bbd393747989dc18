//! Iris CLI — render a layer stack document over an image.
//!
//! Loads the source image and stack document, renders once through the
//! latest-wins scheduler, and writes the result plus optional extras
//! (mask overlay, histogram).

mod config;
mod image_io;
mod stack_file;

use clap::Parser;
use iris_core::pipeline::{Frame, RenderScheduler, mask_overlay};
use iris_core::scopes::histogram;
use tracing_subscriber::EnvFilter;

use crate::config::{Args, DEFAULT_LOG_FILTER, LOG_ENV};
use crate::image_io::ImageIoError;
use crate::stack_file::{StackDocument, StackFileError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Image(#[from] ImageIoError),
    #[error(transparent)]
    Stack(#[from] StackFileError),
    #[error("failed to start render thread: {0}")]
    Spawn(std::io::Error),
    #[error("render thread panicked")]
    Join,
    #[error("render result was superseded")]
    Superseded,
    #[error("no mask layer with id '{0}'")]
    UnknownMaskLayer(String),
    #[error("failed to encode histogram: {0}")]
    Histogram(serde_json::Error),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), CliError> {
    let source = image_io::load_image(&args.input)?;
    let doc = StackDocument::load(&args.stack)?;
    let masks = doc.mask_stack();
    let options = args.render_options();

    if let Some(id) = &args.overlay {
        let layer = masks
            .get(id)
            .ok_or_else(|| CliError::UnknownMaskLayer(id.clone()))?;
        let overlay = mask_overlay(&source, &layer.mask);
        if let Some(path) = &args.overlay_output {
            image_io::save_image(path, overlay)?;
        }
    }

    let scheduler = RenderScheduler::new(source);
    let (_, handle) = scheduler
        .spawn(doc.layers, masks.layers().to_vec(), options)
        .map_err(CliError::Spawn)?;
    let frame = handle
        .join()
        .map_err(|_| CliError::Join)?
        .ok_or(CliError::Superseded)?;

    if let Frame::Fallback(_) = &frame {
        tracing::warn!("render failed, writing the unmodified source image");
    }
    let output = frame.into_raster();

    if args.histogram {
        let data = histogram::compute(&output);
        let json = serde_json::to_string(&data).map_err(CliError::Histogram)?;
        println!("{json}");
    }

    image_io::save_image(&args.output, output)?;
    Ok(())
}

fn main() {
    init_tracing();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        tracing::error!("{e}");
        eprintln!("iris-cli: {e}");
        std::process::exit(1);
    }
}
