//! Batch command - extract many scorecards into one spreadsheet.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error};

use gatecard_core::pipeline::is_allowed_file;
use gatecard_core::{DocumentKind, SpreadsheetEmitter, SpreadsheetFormat};

use super::{apply_model_dir, build_pipeline, load_config, resolve_filter};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for the spreadsheet and processed images
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Spreadsheet file name (extension follows --format)
    #[arg(long)]
    file_name: Option<String>,

    /// Spreadsheet format
    #[arg(short, long, value_enum)]
    format: Option<SheetFormat>,

    /// Image filter applied before OCR (gray, blur, sharpen, resize)
    #[arg(long)]
    filter: Option<String>,

    /// Save filtered images as processed_<name> in the output directory
    #[arg(long)]
    keep_processed: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SheetFormat {
    /// Excel workbook
    Xlsx,
    /// Comma-separated values
    Csv,
}

impl From<SheetFormat> for SpreadsheetFormat {
    fn from(format: SheetFormat) -> Self {
        match format {
            SheetFormat::Xlsx => SpreadsheetFormat::Xlsx,
            SheetFormat::Csv => SpreadsheetFormat::Csv,
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    config.preprocess.filter = resolve_filter(args.filter.as_deref(), config.preprocess.filter);
    config.preprocess.keep_processed |= args.keep_processed;
    apply_model_dir(&mut config, args.model_dir.clone());
    if let Some(dir) = &args.output_dir {
        config.output.output_dir = dir.clone();
    }
    if let Some(name) = &args.file_name {
        config.output.file_name = name.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format.into();
    }

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_allowed_file)
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let needs_ocr = files
        .iter()
        .any(|p| DocumentKind::from_path(p) == Some(DocumentKind::Image));
    let pipeline = build_pipeline(&config, needs_ocr);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let batch = pipeline.process_batch(&files, args.continue_on_error, |path, outcome| {
        match outcome {
            Ok(document) => {
                for warning in &document.warnings {
                    pb.suspend(|| {
                        eprintln!("{} {}: {}", style("!").yellow(), document.filename, warning)
                    });
                }
                debug!(
                    "{} processed in {}ms",
                    document.filename, document.processing_time_ms
                );
            }
            Err(e) if !args.continue_on_error => {
                error!("Failed to process {}: {}", path.display(), e);
            }
            Err(_) => {}
        }
        pb.inc(1);
    });

    let batch = match batch {
        Ok(batch) => batch,
        Err(e) => {
            pb.abandon();
            anyhow::bail!("Processing failed: {}", e);
        }
    };
    pb.finish_and_clear();

    let records = batch.records();
    let emitter = SpreadsheetEmitter::from_config(&config.output);
    let written = emitter.emit(&records)?;

    println!(
        "{} Spreadsheet written to {}",
        style("✓").green(),
        written.display()
    );

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        files.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(batch.documents.len()).green(),
        style(batch.failures.len()).red()
    );

    if !batch.failures.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for (path, message) in &batch.failures {
            println!("  - {}: {}", path.display(), message);
        }
    }

    Ok(())
}
