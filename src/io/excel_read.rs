use std::path::PathBuf;

use calamine::{open_workbook, DataType, Reader, Xlsx};
use chrono::NaiveDate;
use tracing::warn;

use crate::error::{ConsolidateError, Result};
use crate::model::{AcronymRule, LogRow};
use crate::pipeline::SpreadsheetSource;

/// Spreadsheet source backed by the shared meeting-log workbook. One
/// sheet carries the log itself (date, hours, details columns under a
/// header row), a second one carries the acronym mapping (short form,
/// full form) in row order.
pub struct XlsxMeetingLog {
    path: PathBuf,
    log_sheet: String,
    acronym_sheet: String,
}

impl XlsxMeetingLog {
    pub fn new(
        path: impl Into<PathBuf>,
        log_sheet: impl Into<String>,
        acronym_sheet: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            log_sheet: log_sheet.into(),
            acronym_sheet: acronym_sheet.into(),
        }
    }
}

impl SpreadsheetSource for XlsxMeetingLog {
    fn log_rows(&self) -> Result<Vec<LogRow>> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)?;
        let range = required_sheet(&mut workbook, &self.log_sheet)?;

        let mut rows = Vec::new();
        for (idx, row) in range.rows().skip(1).enumerate() {
            if row_is_blank(row) {
                continue;
            }
            match parse_log_row(row) {
                Some(parsed) => rows.push(parsed),
                None => {
                    // Header offset plus one-based numbering.
                    warn!(
                        sheet = %self.log_sheet,
                        row = idx + 2,
                        "skipping malformed meeting-log row"
                    );
                }
            }
        }
        Ok(rows)
    }

    fn acronym_rules(&self) -> Result<Vec<AcronymRule>> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)?;
        let range = required_sheet(&mut workbook, &self.acronym_sheet)?;

        let mut rules = Vec::new();
        for (idx, row) in range.rows().skip(1).enumerate() {
            let short = row.first().map(cell_text).unwrap_or_default();
            let long = row.get(1).map(cell_text).unwrap_or_default();
            if short.trim().is_empty() && long.trim().is_empty() {
                continue;
            }
            if short.trim().is_empty() || long.trim().is_empty() {
                warn!(
                    sheet = %self.acronym_sheet,
                    row = idx + 2,
                    "skipping incomplete acronym mapping row"
                );
                continue;
            }
            rules.push(AcronymRule::new(short.trim(), long.trim())?);
        }
        Ok(rules)
    }
}

fn required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    match workbook.worksheet_range(name) {
        Some(range) => Ok(range?),
        None => Err(ConsolidateError::InvalidWorkbook(format!(
            "workbook has no sheet named '{name}'"
        ))),
    }
}

fn parse_log_row(row: &[DataType]) -> Option<LogRow> {
    let date = cell_to_date(row.first()?)?;
    let hours = cell_to_hours(row.get(1)?)?;
    let details = row.get(2).map(cell_text).unwrap_or_default();
    if hours < 0.0 || details.trim().is_empty() {
        return None;
    }
    Some(LogRow {
        date,
        hours,
        details: details.trim().to_string(),
    })
}

/// Extracts the calendar date from a log cell, discarding any
/// time-of-day component. Accepts native Excel date cells as well as
/// `2025-08-26` / `08/26/2025` strings.
fn cell_to_date(cell: &DataType) -> Option<NaiveDate> {
    if let Some(datetime) = cell.as_datetime() {
        return Some(datetime.date());
    }
    if let DataType::String(value) = cell {
        let trimmed = value.trim();
        return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y"))
            .ok();
    }
    None
}

fn cell_to_hours(cell: &DataType) -> Option<f64> {
    match cell {
        DataType::Float(value) => Some(*value),
        DataType::Int(value) => Some(*value as f64),
        DataType::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

/// Coerces a cell into its text content; empty cells yield an empty
/// string so callers can treat absence and blankness uniformly.
fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::String(value) => value.clone(),
        DataType::Bool(value) => value.to_string(),
        DataType::Int(value) => value.to_string(),
        DataType::Float(value) => value.to_string(),
        other => other.to_string(),
    }
}

fn row_is_blank(row: &[DataType]) -> bool {
    row.iter().all(|cell| cell_text(cell).trim().is_empty())
}
