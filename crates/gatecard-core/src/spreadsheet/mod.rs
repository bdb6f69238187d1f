//! Tabular output of extracted scorecards.

mod emitter;

pub use emitter::SpreadsheetEmitter;

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::scorecard::ScorecardFields;

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "GATE Scorecard Data";

/// Column titles, in output order.
pub const HEADERS: [&str; 8] = [
    "Name of Candidates",
    "Register Number",
    "GATE Score",
    "ALL INDIA Rank",
    "Test Paper",
    "Date",
    "Marks out of 100",
    "Roll No",
];

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpreadsheetFormat {
    /// Excel workbook.
    #[default]
    Xlsx,
    /// Comma-separated values.
    Csv,
}

impl SpreadsheetFormat {
    /// Every supported format.
    pub const ALL: [SpreadsheetFormat; 2] = [SpreadsheetFormat::Xlsx, SpreadsheetFormat::Csv];

    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            SpreadsheetFormat::Xlsx => "xlsx",
            SpreadsheetFormat::Csv => "csv",
        }
    }
}

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Integer(u64),
    Decimal(Decimal),
    Empty,
}

impl Cell {
    fn text(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Integer(n) => write!(f, "{}", n),
            Cell::Decimal(d) => write!(f, "{}", d),
            Cell::Empty => Ok(()),
        }
    }
}

/// One data row, in the order of [`HEADERS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetRow(pub [Cell; 8]);

impl SpreadsheetRow {
    pub fn cells(&self) -> &[Cell; 8] {
        &self.0
    }

    /// Cell values rendered as text, empty cells as `""`.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(Cell::to_string).collect()
    }
}

impl From<&ScorecardFields> for SpreadsheetRow {
    fn from(fields: &ScorecardFields) -> Self {
        SpreadsheetRow([
            Cell::text(&fields.name),
            Cell::text(&fields.register_no),
            fields.score.map_or(Cell::Empty, Cell::Integer),
            fields.all_india_rank.map_or(Cell::Empty, Cell::Integer),
            Cell::text(&fields.test_paper),
            Cell::text(&fields.date),
            fields.marks_out_of_100.map_or(Cell::Empty, Cell::Decimal),
            Cell::text(&fields.roll_no),
        ])
    }
}
