//! Spreadsheet writer for batches of extracted scorecards.

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Formula, Workbook};
use tracing::{debug, info};

use crate::error::SpreadsheetError;
use crate::models::config::OutputConfig;
use crate::models::scorecard::ScorecardFields;

use super::{Cell, SpreadsheetFormat, SpreadsheetRow, HEADERS, SHEET_NAME};

/// Result type for spreadsheet operations.
pub type Result<T> = std::result::Result<T, SpreadsheetError>;

/// Writes one header row and one row per scorecard to a single file.
///
/// The destination is overwritten on every call. Concurrent emitters writing
/// the same path are not coordinated; the last one to finish wins.
#[derive(Debug, Clone)]
pub struct SpreadsheetEmitter {
    output_path: PathBuf,
    format: SpreadsheetFormat,
}

impl SpreadsheetEmitter {
    /// Create an emitter writing an XLSX workbook to `output_path`.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            format: SpreadsheetFormat::Xlsx,
        }
    }

    /// Create an emitter from output configuration.
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.spreadsheet_path()).with_format(config.format)
    }

    /// Set the output format.
    pub fn with_format(mut self, format: SpreadsheetFormat) -> Self {
        self.format = format;
        self
    }

    /// Destination path.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Output format.
    pub fn format(&self) -> SpreadsheetFormat {
        self.format
    }

    /// Build rows for `records`, one per record, in order.
    pub fn rows(records: &[ScorecardFields]) -> Vec<SpreadsheetRow> {
        records.iter().map(SpreadsheetRow::from).collect()
    }

    /// Write `records` to the destination and return its path.
    ///
    /// An empty batch produces a header-only file.
    pub fn emit(&self, records: &[ScorecardFields]) -> Result<PathBuf> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let rows = Self::rows(records);
        match self.format {
            SpreadsheetFormat::Xlsx => {
                let mut workbook = build_workbook(&rows)?;
                workbook.save(&self.output_path)?;
            }
            SpreadsheetFormat::Csv => write_csv(&self.output_path, &rows)?,
        }

        info!(
            "Wrote {} scorecard rows to {}",
            rows.len(),
            self.output_path.display()
        );
        Ok(self.output_path.clone())
    }

    /// Render `records` as an in-memory XLSX workbook.
    pub fn to_xlsx_bytes(records: &[ScorecardFields]) -> Result<Vec<u8>> {
        let mut workbook = build_workbook(&Self::rows(records))?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Render `records` as CSV text.
    pub fn to_csv_string(records: &[ScorecardFields]) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        write_records(&mut wtr, &Self::rows(records))?;
        let data = wtr
            .into_inner()
            .map_err(|e| SpreadsheetError::Io(e.into_error()))?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }
}

/// Formula evaluating to the empty string. Excel does not store blank text.
const EMPTY_TEXT: &str = "=\"\"";

fn build_workbook(rows: &[SpreadsheetRow]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;
    // Empty fields become empty-text cells so an all-empty row is still stored
    worksheet.set_formula_result_default("");

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let row_num = (i + 1) as u32;
        for (col, cell) in row.cells().iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(value) => {
                    worksheet.write_string(row_num, col, value)?;
                }
                Cell::Integer(value) => {
                    worksheet.write_number(row_num, col, *value as f64)?;
                }
                Cell::Decimal(value) => {
                    worksheet.write_number(row_num, col, value.to_f64().unwrap_or_default())?;
                }
                Cell::Empty => {
                    worksheet.write_formula(row_num, col, Formula::new(EMPTY_TEXT))?;
                }
            }
        }
    }

    debug!("Built workbook with {} data rows", rows.len());
    Ok(workbook)
}

fn write_csv(path: &Path, rows: &[SpreadsheetRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    write_records(&mut wtr, rows)
}

fn write_records<W: std::io::Write>(wtr: &mut csv::Writer<W>, rows: &[SpreadsheetRow]) -> Result<()> {
    wtr.write_record(HEADERS)?;
    for row in rows {
        wtr.write_record(row.to_strings())?;
    }
    wtr.flush()?;
    Ok(())
}
