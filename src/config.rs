use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConsolidateError, Result};
use crate::filter::TitleMatch;
use crate::merge::FieldDefaults;
use crate::model::DateWindow;

/// Run configuration, loaded from a JSON file and passed explicitly into
/// the pipeline. Nothing in the engine reads ambient global state.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Subject identity and the defaults filled into unset fields.
    pub defaults: FieldDefaults,
    /// Title/keyword that marks a calendar event as a timesheet entry.
    pub event_keyword: String,
    /// When true, the trimmed event title must equal the keyword exactly;
    /// otherwise a case-insensitive containment check is used.
    #[serde(default)]
    pub strict_title_match: bool,
    /// Inclusive reporting window applied to both sources.
    pub window: DateWindow,
    /// Boilerplate sentence appended to every event-derived description.
    #[serde(default)]
    pub static_suffix: String,
    /// Location of the shared meeting log workbook.
    pub spreadsheet: SpreadsheetConfig,
    /// Location of the calendar export consumed by the event feed.
    pub event_feed: PathBuf,
    /// Destination path for the exported CSV.
    pub output: PathBuf,
}

/// Workbook location and the sheets read from it.
#[derive(Debug, Clone, Deserialize)]
pub struct SpreadsheetConfig {
    pub path: PathBuf,
    #[serde(default = "default_log_sheet")]
    pub log_sheet: String,
    #[serde(default = "default_acronym_sheet")]
    pub acronym_sheet: String,
}

fn default_log_sheet() -> String {
    "MeetingLog".to_string()
}

fn default_acronym_sheet() -> String {
    "Acronyms".to_string()
}

impl RunConfig {
    /// Loads the configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConsolidateError::MissingInput(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Title matching mode derived from the strictness flag.
    pub fn title_match(&self) -> TitleMatch {
        if self.strict_title_match {
            TitleMatch::Exact
        } else {
            TitleMatch::Contains
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn parses_a_full_config_document() {
        let json = serde_json::json!({
            "defaults": {
                "subject_name": "Maria Velez",
                "identifier": "CG11",
                "position": "Industry SME",
                "project_id": "14F000000000",
                "task_code": "A3403",
                "site": "OffIsland"
            },
            "event_keyword": "Grid Timesheet Entry",
            "strict_title_match": true,
            "window": { "start": "2025-08-25", "end": "2025-08-30" },
            "static_suffix": "Worked with the client team.",
            "spreadsheet": { "path": "log.xlsx" },
            "event_feed": "events.json",
            "output": "timesheet.csv"
        });

        let config: RunConfig =
            serde_json::from_value(json).expect("config parsed");

        assert_eq!(config.defaults.identifier, "CG11");
        assert_eq!(config.title_match(), TitleMatch::Exact);
        assert_eq!(
            config.window.start,
            NaiveDate::from_ymd_opt(2025, 8, 25).unwrap()
        );
        assert_eq!(config.spreadsheet.log_sheet, "MeetingLog");
        assert_eq!(config.spreadsheet.acronym_sheet, "Acronyms");
    }

    #[test]
    fn missing_config_file_is_reported() {
        let error = RunConfig::load(Path::new("/nonexistent/config.json"))
            .expect_err("load must fail");
        assert!(matches!(error, ConsolidateError::MissingInput(_)));
    }
}
