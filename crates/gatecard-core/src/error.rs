//! Error types for the gatecard-core library.
//!
//! Field extraction itself never fails; these errors cover the collaborators
//! around it (document loading, OCR, filters, spreadsheet output).

use thiserror::Error;

/// Main error type for the gatecard library.
#[derive(Error, Debug)]
pub enum GatecardError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Image filter error.
    #[error("preprocessing error: {0}")]
    Preprocess(#[from] PreprocessError),

    /// Spreadsheet output error.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] SpreadsheetError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File extension is not one of the accepted formats.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// No OCR backend is configured for image input.
    #[error("no OCR engine available: {0}")]
    Unavailable(String),
}

/// Errors related to image filters.
#[derive(Error, Debug)]
pub enum PreprocessError {
    /// Filter name is not one of `gray`, `blur`, `sharpen`, `resize`, `none`.
    #[error("unknown image filter: {0}")]
    UnknownFilter(String),

    /// Invalid filter parameter.
    #[error("invalid filter parameter: {0}")]
    InvalidParameter(String),
}

/// Errors related to writing the spreadsheet.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// XLSX writer failure.
    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// CSV writer failure.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// I/O failure while creating the output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the gatecard library.
pub type Result<T> = std::result::Result<T, GatecardError>;
