//! GATE scorecard data models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fields recovered from a single scorecard document.
///
/// Every field is always present. Text fields use the empty string and
/// numeric fields use `None` when the extractor could not determine them,
/// so serialized output always carries all keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorecardFields {
    /// Candidate name.
    pub name: String,

    /// Registration number.
    pub register_no: String,

    /// Test paper (subject) code, e.g. `CS`.
    pub test_paper: String,

    /// All India Rank.
    pub all_india_rank: Option<u64>,

    /// Free-form extra information (category, qualifying status).
    pub additional_info: String,

    /// Normalized GATE score.
    pub score: Option<u64>,

    /// Marks out of 100.
    pub marks_out_of_100: Option<Decimal>,

    /// Date as printed on the scorecard. Not parsed.
    pub date: String,

    /// Roll number recovered from the filename line.
    pub roll_no: String,
}

impl ScorecardFields {
    /// Create a record with every field empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.missing_fields().len() == FIELD_NAMES.len()
    }

    /// Names of the fields that hold no value.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let present = [
            !self.name.is_empty(),
            !self.register_no.is_empty(),
            !self.test_paper.is_empty(),
            self.all_india_rank.is_some(),
            !self.additional_info.is_empty(),
            self.score.is_some(),
            self.marks_out_of_100.is_some(),
            !self.date.is_empty(),
            !self.roll_no.is_empty(),
        ];

        FIELD_NAMES
            .iter()
            .zip(present)
            .filter(|(_, present)| !present)
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Serialized field names, in declaration order.
pub const FIELD_NAMES: [&str; 9] = [
    "name",
    "register_no",
    "test_paper",
    "all_india_rank",
    "additional_info",
    "score",
    "marks_out_of_100",
    "date",
    "roll_no",
];

/// Where the text of a document came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Embedded PDF text.
    Pdf,
    /// OCR over an image file.
    Image,
    /// Text handed in directly.
    #[default]
    Text,
}
