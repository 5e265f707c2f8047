//! Row selection for both sources. Filtering only removes rows; the
//! relative order of the survivors is always preserved.

use crate::model::{DateWindow, EventRow, LogRow};

/// How event titles are matched against the configured keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleMatch {
    /// Trimmed title must equal the keyword exactly.
    Exact,
    /// Title must contain the keyword, case-insensitively.
    Contains,
}

/// Keeps event rows whose title matches the configured keyword.
pub fn filter_events(rows: Vec<EventRow>, keyword: &str, mode: TitleMatch) -> Vec<EventRow> {
    let needle = keyword.to_lowercase();
    rows.into_iter()
        .filter(|row| match mode {
            TitleMatch::Exact => row.title.trim() == keyword,
            TitleMatch::Contains => row.title.to_lowercase().contains(&needle),
        })
        .collect()
}

/// Keeps log rows dated inside the window whose details mention the
/// subject by name (case-insensitive substring).
pub fn filter_log_rows(rows: Vec<LogRow>, window: &DateWindow, subject_name: &str) -> Vec<LogRow> {
    let needle = subject_name.to_lowercase();
    rows.into_iter()
        .filter(|row| window.contains(row.date) && row.details.to_lowercase().contains(&needle))
        .collect()
}
