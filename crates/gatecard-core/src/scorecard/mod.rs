//! Scorecard field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, LinePositionalParser, ScorecardParser};

use crate::models::scorecard::ScorecardFields;

/// Trait for scorecard field extractors.
///
/// Extraction never fails: text that does not match the expected layout
/// produces empty fields.
pub trait ScorecardExtractor {
    /// Extract fields from raw document text and the name of the source file.
    fn extract(&self, raw_text: &str, filename_hint: &str) -> ScorecardFields;

    /// Extract fields from text that already ends with the filename line.
    fn extract_from_text(&self, text: &str) -> ScorecardFields;
}

/// Append the filename to raw text as its final line.
pub fn combine_with_filename(raw_text: &str, filename_hint: &str) -> String {
    format!("{}\n{}", raw_text, filename_hint)
}

/// Extract fields with the default line-positional parser.
pub fn extract(raw_text: &str, filename_hint: &str) -> ScorecardFields {
    LinePositionalParser::new().extract(raw_text, filename_hint)
}
