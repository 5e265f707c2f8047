use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One appointment entry from the calendar/event feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    /// Title/subject line of the appointment.
    pub title: String,
    /// Start instant of the appointment.
    pub start: DateTime<Utc>,
    /// End instant of the appointment.
    pub end: DateTime<Utc>,
    /// Body content, markup or plain text.
    #[serde(default)]
    pub body: String,
}

/// One entry from the spreadsheet-based shared meeting log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    /// Meeting date; any time-of-day component has already been discarded.
    pub date: NaiveDate,
    /// Hours as recorded in the log, taken verbatim.
    pub hours: f64,
    /// Combined descriptive cell listing attendees and topic.
    pub details: String,
}

/// Raw source row feeding the schema aligner, tagged by source kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRow {
    Event(EventRow),
    Log(LogRow),
}

/// Unified timesheet row before default-fill. Identity fields that the
/// source did not populate stay `None` until the merger resolves them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DraftRecord {
    pub subject_name: Option<String>,
    pub identifier: Option<String>,
    pub position: Option<String>,
    pub project_id: Option<String>,
    pub task_code: Option<String>,
    pub site: Option<String>,
    pub date: NaiveDate,
    pub hours: f64,
    pub task_description: Option<String>,
}

/// Fully resolved timesheet row as it appears in the exported dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimesheetRecord {
    pub subject_name: String,
    pub identifier: String,
    pub position: String,
    pub project_id: String,
    pub task_code: String,
    pub site: String,
    pub date: NaiveDate,
    pub hours: f64,
    pub task_description: String,
}

/// Inclusive reporting window used to filter both sources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Returns true when `date` falls inside the window, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A single acronym expansion rule: short form, full form, and the
/// boundary pattern used to locate standalone occurrences of the short
/// form. The pattern set is fixed: a space, period, comma, or hyphen
/// before the acronym and a space, period, comma, semicolon, or hyphen
/// after it, with the surrounding punctuation preserved on substitution.
#[derive(Debug, Clone)]
pub struct AcronymRule {
    short: String,
    long: String,
    pattern: Regex,
}

impl AcronymRule {
    /// Builds a rule for the given short/full pair. Fails only when the
    /// escaped short form does not compile into a pattern.
    pub fn new(short: impl Into<String>, long: impl Into<String>) -> Result<Self> {
        let short = short.into();
        let long = long.into();
        let pattern = Regex::new(&format!(
            "(?P<lead>[ .,-])(?P<acr>{})(?P<tail>[ .,;-])",
            regex::escape(&short)
        ))?;
        Ok(Self {
            short,
            long,
            pattern,
        })
    }

    pub fn short(&self) -> &str {
        &self.short
    }

    pub fn long(&self) -> &str {
        &self.long
    }

    pub(crate) fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Literal already-expanded occurrences that must be left untouched:
    /// `short (long)` and `long (short)`.
    pub(crate) fn protected_forms(&self) -> [String; 2] {
        [
            format!("{} ({})", self.short, self.long),
            format!("{} ({})", self.long, self.short),
        ]
    }
}

impl PartialEq for AcronymRule {
    fn eq(&self, other: &Self) -> bool {
        self.short == other.short && self.long == other.long
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_bounds_are_inclusive() {
        let window = DateWindow {
            start: NaiveDate::from_ymd_opt(2025, 8, 25).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 8, 30).unwrap(),
        };

        assert!(window.contains(NaiveDate::from_ymd_opt(2025, 8, 25).unwrap()));
        assert!(window.contains(NaiveDate::from_ymd_opt(2025, 8, 30).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2025, 8, 31).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2025, 8, 24).unwrap()));
    }

    #[test]
    fn acronym_rule_escapes_the_short_form() {
        let rule = AcronymRule::new("C++", "C plus plus").expect("rule built");
        assert!(rule.pattern().is_match(" C++ "));
        assert!(!rule.pattern().is_match(" Cxx "));
    }
}
