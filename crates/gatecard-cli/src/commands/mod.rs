//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use console::style;
use tracing::{debug, warn};

use gatecard_core::models::config::GatecardConfig;
use gatecard_core::{ImageFilter, PureOcrEngine, ScorecardPipeline};

/// Load the config file given on the command line, else the default config
/// file if one exists, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<GatecardConfig> {
    if let Some(path) = config_path {
        return Ok(GatecardConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(GatecardConfig::from_file(&default_path)?)
    } else {
        Ok(GatecardConfig::default())
    }
}

/// Resolve a `--filter` value. Unknown names fall back to the original image.
pub fn resolve_filter(name: Option<&str>, configured: ImageFilter) -> ImageFilter {
    let Some(name) = name else {
        return configured;
    };

    match name.parse() {
        Ok(filter) => filter,
        Err(e) => {
            warn!("{}", e);
            eprintln!(
                "{} Invalid filter '{}' selected, using the original image",
                style("!").yellow(),
                name
            );
            ImageFilter::None
        }
    }
}

/// Apply a `--model-dir` override.
pub fn apply_model_dir(config: &mut GatecardConfig, model_dir: Option<PathBuf>) {
    if let Some(dir) = model_dir {
        config.models.model_dir = dir;
    }
}

/// Build the pipeline, loading OCR models only when images will be read.
pub fn build_pipeline(config: &GatecardConfig, needs_ocr: bool) -> ScorecardPipeline {
    let pipeline = ScorecardPipeline::new(config);
    if !needs_ocr {
        return pipeline;
    }

    if !config.models.is_available() {
        warn!(
            "OCR models not found in {}, image files cannot be read",
            config.models.model_dir.display()
        );
        return pipeline;
    }

    match PureOcrEngine::from_config(&config.models, config.ocr.clone()) {
        Ok(engine) => pipeline.with_ocr(Box::new(engine)),
        Err(e) => {
            warn!("Failed to load OCR models: {}", e);
            pipeline
        }
    }
}
