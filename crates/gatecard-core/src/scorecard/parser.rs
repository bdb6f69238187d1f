//! Line-positional scorecard parser.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::scorecard::ScorecardFields;

use super::rules::{
    is_digits, parse_decimal, parse_integer, recover_roll_no, split_lines, LineField, MIN_POSITIONAL_LINES,
};
use super::{combine_with_filename, ScorecardExtractor};

/// Result of scorecard extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted fields.
    pub fields: ScorecardFields,
    /// Combined text the fields were read from.
    pub raw_text: String,
    /// Number of lines in the combined text.
    pub line_count: usize,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for scorecard parsing.
pub trait ScorecardParser {
    /// Parse a scorecard from combined text (raw text with the filename as
    /// the last line).
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Parser reading fields from fixed line offsets.
///
/// The layout is the one produced by OCR or PDF text extraction of a GATE
/// scorecard: registration number, paper, name and rank on the first lines,
/// score and marks on lines 8 and 9, date on line 12. The roll number comes
/// from the last line, which callers fill with the source filename.
#[derive(Debug, Clone, Default)]
pub struct LinePositionalParser;

impl LinePositionalParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }

    fn read_positional(
        &self,
        lines: &[&str],
        fields: &mut ScorecardFields,
        warnings: &mut Vec<String>,
    ) {
        for field in LineField::ALL {
            let Some(line) = field.line(lines) else {
                continue;
            };

            match field {
                LineField::RegisterNo => fields.register_no = line.to_string(),
                LineField::TestPaper => fields.test_paper = line.to_string(),
                LineField::Name => fields.name = line.to_string(),
                LineField::AllIndiaRank => fields.all_india_rank = parse_integer(line),
                LineField::AdditionalInfo => fields.additional_info = line.to_string(),
                LineField::Score => fields.score = parse_integer(line),
                LineField::MarksOutOf100 => fields.marks_out_of_100 = parse_decimal(line),
                LineField::Date => fields.date = line.to_string(),
            }

            if field.is_numeric() && !line.is_empty() && !is_digits(line) {
                warnings.push(format!(
                    "Line {} is not a whole number, {} left empty: {:?}",
                    field.line_index(),
                    field.name(),
                    line
                ));
            }
        }

        if fields.date.is_empty() && lines.len() <= LineField::Date.line_index() {
            warnings.push("Document too short for a date line".to_string());
        }
    }
}

impl ScorecardParser for LinePositionalParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();
        let mut fields = ScorecardFields::new();

        let lines = split_lines(text);
        debug!("Parsing scorecard from {} lines", lines.len());

        if lines.len() >= MIN_POSITIONAL_LINES {
            self.read_positional(&lines, &mut fields, &mut warnings);
        } else {
            warnings.push(format!(
                "Only {} lines, positional fields need at least {}",
                lines.len(),
                MIN_POSITIONAL_LINES
            ));
        }

        fields.roll_no = lines.last().map(|l| recover_roll_no(l)).unwrap_or_default();
        if fields.roll_no.is_empty() {
            warnings.push("No roll number delimiter in last line".to_string());
        }

        info!(
            "Extracted scorecard for {:?} (roll no {:?}, {} fields missing)",
            fields.name,
            fields.roll_no,
            fields.missing_fields().len()
        );

        ExtractionResult {
            fields,
            raw_text: text.to_string(),
            line_count: lines.len(),
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl ScorecardExtractor for LinePositionalParser {
    fn extract(&self, raw_text: &str, filename_hint: &str) -> ScorecardFields {
        self.extract_from_text(&combine_with_filename(raw_text, filename_hint))
    }

    fn extract_from_text(&self, text: &str) -> ScorecardFields {
        self.parse(text).fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn scorecard_text() -> String {
        [
            "REG123",
            "CS",
            "Jane Doe",
            "42",
            "GEN - Qualified",
            "Name of Candidate",
            "Registration Number",
            "GATE Score",
            "550",
            "85",
            "Marks out of 100",
            "Qualifying Marks",
            "March 16, 2024",
        ]
        .join("\n")
    }

    #[test]
    fn test_parse_full_scorecard() {
        let parser = LinePositionalParser::new();
        let fields = parser.extract(&scorecard_text(), "GATE_Scorecard-cs24s12345678.pdf");

        assert_eq!(
            fields,
            ScorecardFields {
                name: "Jane Doe".to_string(),
                register_no: "REG123".to_string(),
                test_paper: "CS".to_string(),
                all_india_rank: Some(42),
                additional_info: "GEN - Qualified".to_string(),
                score: Some(550),
                marks_out_of_100: Some(Decimal::from(85)),
                date: "March 16, 2024".to_string(),
                roll_no: "CS24S12345".to_string(),
            }
        );
    }

    #[test]
    fn test_fields_are_trimmed() {
        let text = scorecard_text().replace("Jane Doe", "   Jane Doe\t");
        let fields = LinePositionalParser::new().extract(&text, "x-1");
        assert_eq!(fields.name, "Jane Doe");
    }

    #[test]
    fn test_short_document_keeps_only_roll_no() {
        let parser = LinePositionalParser::new();
        let result = parser.parse("REG123\nCS\nJane Doe\nscan-ab12cd34ef56.png");

        assert_eq!(result.line_count, 4);
        assert_eq!(
            result.fields,
            ScorecardFields {
                roll_no: "AB12CD34EF".to_string(),
                ..Default::default()
            }
        );
        assert!(result.warnings[0].starts_with("Only 4 lines"));
    }

    #[test]
    fn test_eleven_lines_is_too_short() {
        let text = vec!["7"; 10].join("\n");
        let fields = LinePositionalParser::new().extract(&text, "card-x");

        assert!(fields.register_no.is_empty());
        assert_eq!(fields.score, None);
        assert_eq!(fields.roll_no, "X");
    }

    #[test]
    fn test_twelve_lines_leaves_date_empty() {
        let lines: Vec<String> = (0..11).map(|i| i.to_string()).collect();
        let result = LinePositionalParser::new().parse(&format!("{}\nscan-a", lines.join("\n")));

        assert_eq!(result.line_count, 12);
        assert_eq!(result.fields.register_no, "0");
        assert_eq!(result.fields.score, Some(8));
        assert_eq!(result.fields.marks_out_of_100, Some(Decimal::from(9)));
        assert_eq!(result.fields.date, "");
        assert_eq!(result.fields.roll_no, "A");
    }

    #[test]
    fn test_non_numeric_lines_left_empty() {
        let text = scorecard_text()
            .replace("\n42\n", "\nAIR 42\n")
            .replace("\n550\n", "\n550*\n")
            .replace("\n85\n", "\n85.5\n");
        let result = LinePositionalParser::new().parse(&text);

        assert_eq!(result.fields.all_india_rank, None);
        assert_eq!(result.fields.score, None);
        assert_eq!(result.fields.marks_out_of_100, None);
        assert_eq!(result.fields.name, "Jane Doe");
        assert_eq!(
            result
                .warnings
                .iter()
                .filter(|w| w.contains("not a whole number"))
                .count(),
            3
        );
    }

    #[test]
    fn test_text_lines_skip_digit_guard() {
        let result = LinePositionalParser::new().parse(&combine_with_filename(
            &scorecard_text(),
            "card-cs24s1.pdf",
        ));
        assert!(!result.warnings.iter().any(|w| w.contains("not a whole number")));
        assert_eq!(result.fields.additional_info, "GEN - Qualified");
    }

    #[test]
    fn test_roll_no_uses_last_line_only() {
        let text = "a-first\nb-second\nNODASHHERE";
        let fields = LinePositionalParser::new().extract_from_text(text);
        assert_eq!(fields.roll_no, "");
    }

    #[test]
    fn test_empty_input() {
        let result = LinePositionalParser::new().parse("");

        assert_eq!(result.line_count, 0);
        assert!(result.fields.is_empty());
    }

    #[test]
    fn test_extract_is_idempotent() {
        let parser = LinePositionalParser::new();
        let first = parser.extract(&scorecard_text(), "card-cs24");
        let second = parser.extract(&scorecard_text(), "card-cs24");
        assert_eq!(first, second);
    }

    #[test]
    fn test_filename_is_appended_as_last_line() {
        let parser = LinePositionalParser::new();
        let combined = format!("{}\n{}", scorecard_text(), "file-zz99");

        assert_eq!(
            parser.extract(&scorecard_text(), "file-zz99"),
            parser.extract_from_text(&combined)
        );
    }
}
