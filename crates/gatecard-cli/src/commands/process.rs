//! Process command - extract fields from a single scorecard file.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use gatecard_core::spreadsheet::HEADERS;
use gatecard_core::{DocumentKind, ProcessedDocument, ScorecardFields, SourceType, SpreadsheetEmitter};

use super::{apply_model_dir, build_pipeline, load_config, resolve_filter};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Image filter applied before OCR (gray, blur, sharpen, resize)
    #[arg(long)]
    filter: Option<String>,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Print the text the fields were read from
    #[arg(long)]
    show_text: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, same columns as the batch spreadsheet
    Csv,
    /// Plain text summary
    Text,
    /// Single-row XLSX workbook, written to --output
    Xlsx,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    filename: &'a str,
    source_type: SourceType,
    fields: &'a ScorecardFields,
    warnings: &'a [String],
    processing_time_ms: u64,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    if matches!(args.format, OutputFormat::Xlsx) && args.output.is_none() {
        anyhow::bail!("XLSX output needs a file, pass --output <path>");
    }

    let mut config = load_config(config_path)?;
    config.preprocess.filter = resolve_filter(args.filter.as_deref(), config.preprocess.filter);
    apply_model_dir(&mut config, args.model_dir.clone());

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let kind = DocumentKind::from_path(&args.input).ok_or_else(|| {
        anyhow::anyhow!(
            "Unsupported file format: {} (expected png, jpg, jpeg, gif or pdf)",
            args.input.display()
        )
    })?;

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(match kind {
        DocumentKind::Pdf => "Extracting PDF text...",
        DocumentKind::Image => "Running OCR...",
    });

    let pipeline = build_pipeline(&config, kind == DocumentKind::Image);
    let document = pipeline.process_file(&args.input);
    pb.finish_and_clear();
    let document = document?;

    for warning in &document.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    let output = render_document(&document, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", String::from_utf8_lossy(&output));
    }

    if args.show_text {
        println!();
        println!("{}", style("Extracted text:").bold());
        println!("{}", document.raw_text);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn render_document(document: &ProcessedDocument, format: OutputFormat) -> anyhow::Result<Vec<u8>> {
    let records = std::slice::from_ref(&document.fields);

    Ok(match format {
        OutputFormat::Json => serde_json::to_vec_pretty(&JsonOutput {
            filename: &document.filename,
            source_type: document.source_type,
            fields: &document.fields,
            warnings: &document.warnings,
            processing_time_ms: document.processing_time_ms,
        })?,
        OutputFormat::Csv => SpreadsheetEmitter::to_csv_string(records)?.into_bytes(),
        OutputFormat::Text => format_text(document).into_bytes(),
        OutputFormat::Xlsx => SpreadsheetEmitter::to_xlsx_bytes(records)?,
    })
}

fn format_text(document: &ProcessedDocument) -> String {
    let fields = &document.fields;
    let values = gatecard_core::SpreadsheetRow::from(fields).to_strings();

    let mut output = format!("Scorecard: {}\n\n", document.filename);
    for (header, value) in HEADERS.iter().zip(&values) {
        let value = if value.is_empty() { "-" } else { value.as_str() };
        output.push_str(&format!("  {:<28} {}\n", header, value));
    }

    if !fields.additional_info.is_empty() {
        output.push_str(&format!("\n  {:<28} {}\n", "Additional Info", fields.additional_info));
    }

    let missing = fields.missing_fields();
    if !missing.is_empty() {
        output.push_str(&format!("\nMissing: {}\n", missing.join(", ")));
    }

    output
}
