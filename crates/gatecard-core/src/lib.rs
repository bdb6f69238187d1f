//! Core library for GATE scorecard processing.
//!
//! This crate provides:
//! - PDF text extraction
//! - OCR over scanned scorecard images, with optional image filters
//! - Line-positional scorecard field extraction, including roll number
//!   recovery from the source filename
//! - Spreadsheet output (XLSX or CSV) for batches of scorecards

pub mod error;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod scorecard;
pub mod spreadsheet;

pub use error::{GatecardError, Result};
pub use models::config::GatecardConfig;
pub use models::scorecard::{ScorecardFields, SourceType};
pub use ocr::{ImageFilter, ImagePreprocessor, OcrBackend, OcrResult, TextBox};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use pdf::{PdfExtractor, PdfProcessor, PdfType};
pub use pipeline::{BatchResult, DocumentKind, ProcessedDocument, ScorecardPipeline};
pub use scorecard::{extract, ExtractionResult, LinePositionalParser, ScorecardExtractor, ScorecardParser};
pub use spreadsheet::{SpreadsheetEmitter, SpreadsheetFormat, SpreadsheetRow};
