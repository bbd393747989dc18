//! Command-line configuration for the renderer.

use std::path::PathBuf;

use clap::Parser;
use iris_core::RenderOptions;

/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "IRIS_LOG";
/// Filter used when `IRIS_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Render a layer stack document over an image.
#[derive(Debug, Clone, Parser)]
#[command(name = "iris-cli", version, about)]
pub struct Args {
    /// Source image (PNG, JPEG, TIFF, ...).
    #[arg(long, short)]
    pub input: PathBuf,

    /// JSON stack document with `layers` and `maskLayers`.
    #[arg(long, short)]
    pub stack: PathBuf,

    /// Where to write the rendered image. The format follows the extension.
    #[arg(long, short)]
    pub output: PathBuf,

    /// Id of a mask layer whose preview overlay should be exported.
    #[arg(long, requires = "overlay_output")]
    pub overlay: Option<String>,

    /// Where to write the mask overlay image.
    #[arg(long, requires = "overlay")]
    pub overlay_output: Option<PathBuf>,

    /// Print the histogram of the rendered image as JSON on stdout.
    #[arg(long)]
    pub histogram: bool,

    /// Layer treated as selected in the editor.
    #[arg(long)]
    pub selected_layer: Option<String>,

    /// Draw the mask-view overlay of the selected selection layer.
    #[arg(long)]
    pub show_mask_overlay: bool,

    /// Fixed seed for film grain. Falls back to `IRIS_GRAIN_SEED`.
    #[arg(long)]
    pub grain_seed: Option<u64>,
}

impl Args {
    /// Render options from the flags, layered over the environment.
    pub fn render_options(&self) -> RenderOptions {
        let mut options = RenderOptions::from_env().with_mask_overlay(self.show_mask_overlay);
        if let Some(id) = &self.selected_layer {
            options = options.with_selected_layer(id.clone());
        }
        if let Some(seed) = self.grain_seed {
            options = options.with_grain_seed(seed);
        }
        options
    }
}
