use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::error::{ConsolidateError, Result};
use crate::model::{DateWindow, EventRow};
use crate::pipeline::EventSource;

/// Event source backed by a JSON calendar export: an array of objects
/// with `title`, `start`, `end`, and optional `body` fields. Rows whose
/// start date falls outside the window are discarded here so the engine
/// only ever sees the requested range.
pub struct JsonEventFeed {
    path: PathBuf,
}

impl JsonEventFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventSource for JsonEventFeed {
    fn fetch(&self, window: &DateWindow) -> Result<Vec<EventRow>> {
        if !self.path.exists() {
            return Err(ConsolidateError::MissingInput(self.path.clone()));
        }
        let data = fs::read_to_string(&self.path)?;
        let raw: Vec<serde_json::Value> = serde_json::from_str(&data)?;

        // Rows are deserialized one by one so a single malformed entry
        // does not abort the batch.
        let mut rows = Vec::with_capacity(raw.len());
        for (idx, value) in raw.into_iter().enumerate() {
            match serde_json::from_value::<EventRow>(value) {
                Ok(row) => rows.push(row),
                Err(error) => {
                    warn!(entry = idx, %error, "skipping malformed event feed entry");
                }
            }
        }

        Ok(rows
            .into_iter()
            .filter(|row| window.contains(row.start.date_naive()))
            .collect())
    }
}

/// Convenience for tests and embedding: an in-memory event list.
pub struct StaticEventFeed {
    rows: Vec<EventRow>,
}

impl StaticEventFeed {
    pub fn new(rows: Vec<EventRow>) -> Self {
        Self { rows }
    }
}

impl EventSource for StaticEventFeed {
    fn fetch(&self, window: &DateWindow) -> Result<Vec<EventRow>> {
        Ok(self
            .rows
            .iter()
            .filter(|row| window.contains(row.start.date_naive()))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn reads_and_windows_a_json_export() {
        let dir = tempdir().expect("temporary directory");
        let path = dir.path().join("events.json");
        let json = serde_json::json!([
            {
                "title": "Grid Timesheet Entry",
                "start": "2025-08-25T13:00:00Z",
                "end": "2025-08-25T15:00:00Z",
                "body": "Agenda"
            },
            {
                "title": "Grid Timesheet Entry",
                "start": "2025-09-10T13:00:00Z",
                "end": "2025-09-10T14:00:00Z"
            }
        ]);
        fs::write(&path, serde_json::to_string_pretty(&json).unwrap())
            .expect("events written");

        let window = DateWindow {
            start: NaiveDate::from_ymd_opt(2025, 8, 25).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 8, 30).unwrap(),
        };
        let rows = JsonEventFeed::new(&path).fetch(&window).expect("fetched");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].body, "Agenda");
    }

    #[test]
    fn malformed_rows_are_skipped_without_failing_the_fetch() {
        let dir = tempdir().expect("temporary directory");
        let path = dir.path().join("events.json");
        let json = serde_json::json!([
            {
                "title": "Grid Timesheet Entry",
                "start": "2025-08-25T13:00:00Z",
                "end": "2025-08-25T15:00:00Z"
            },
            {
                "title": "Grid Timesheet Entry",
                "end": "2025-08-26T14:00:00Z"
            },
            {
                "title": "Grid Timesheet Entry",
                "start": "2025-08-27T09:00:00Z",
                "end": "2025-08-27T10:00:00Z"
            }
        ]);
        fs::write(&path, serde_json::to_string_pretty(&json).unwrap())
            .expect("events written");

        let window = DateWindow {
            start: NaiveDate::from_ymd_opt(2025, 8, 25).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 8, 30).unwrap(),
        };
        let rows = JsonEventFeed::new(&path).fetch(&window).expect("fetched");

        assert_eq!(rows.len(), 2, "the entry without a start is skipped");
        assert_eq!(
            rows[0].start.date_naive(),
            NaiveDate::from_ymd_opt(2025, 8, 25).unwrap()
        );
        assert_eq!(
            rows[1].start.date_naive(),
            NaiveDate::from_ymd_opt(2025, 8, 27).unwrap()
        );
    }

    #[test]
    fn missing_export_is_reported_as_missing_input() {
        let window = DateWindow {
            start: NaiveDate::from_ymd_opt(2025, 8, 25).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 8, 30).unwrap(),
        };
        let error = JsonEventFeed::new("/nonexistent/events.json")
            .fetch(&window)
            .expect_err("fetch must fail");
        assert!(matches!(error, ConsolidateError::MissingInput(_)));
    }
}
