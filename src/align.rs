//! Maps raw source rows onto the unified timesheet schema. Fields the
//! source cannot supply are left unset for the merger's default-fill.

use regex::Regex;

use crate::error::Result;
use crate::model::{AcronymRule, DraftRecord, EventRow, LogRow, SourceRow};
use crate::normalize;

/// Description used when an event arrives without body content.
const EMPTY_BODY_FALLBACK: &str = "No agenda provided";

/// Aligns candidate rows from either source onto [`DraftRecord`]s.
pub struct SchemaAligner {
    static_suffix: String,
    acronym_rules: Vec<AcronymRule>,
    subject_fragment: Regex,
}

impl SchemaAligner {
    /// Builds an aligner for one run.
    ///
    /// `static_suffix` is appended to every event-derived description.
    /// `subject_name` drives the attendee-fragment removal on log rows:
    /// the shared log lists all attendees, and the subject must not see
    /// themself listed, so `"<subject_name> ... ;"` is stripped from the
    /// details cell.
    pub fn new(
        subject_name: &str,
        static_suffix: impl Into<String>,
        acronym_rules: Vec<AcronymRule>,
    ) -> Result<Self> {
        let subject_fragment = Regex::new(&format!("{}[^;]*;?", regex::escape(subject_name)))?;
        Ok(Self {
            static_suffix: static_suffix.into(),
            acronym_rules,
            subject_fragment,
        })
    }

    /// Maps a tagged source row onto the unified schema.
    pub fn align(&self, row: SourceRow) -> DraftRecord {
        match row {
            SourceRow::Event(event) => self.align_event(event),
            SourceRow::Log(log) => self.align_log(log),
        }
    }

    /// Event rows: date from the start instant, hours from the interval
    /// duration, description from the normalized body plus the static
    /// suffix.
    pub fn align_event(&self, event: EventRow) -> DraftRecord {
        let duration = event.end.signed_duration_since(event.start);
        let hours = round2((duration.num_seconds() as f64 / 3600.0).max(0.0));

        let body = if event.body.trim().is_empty() {
            EMPTY_BODY_FALLBACK.to_string()
        } else {
            event.body
        };
        let mut description = normalize::normalize(&body);
        description = normalize::expand(&description, &self.acronym_rules);
        description = normalize::ensure_terminated(&description);
        if !self.static_suffix.is_empty() {
            if description.is_empty() {
                description = self.static_suffix.clone();
            } else {
                description = format!("{description} {}", self.static_suffix);
            }
        }

        DraftRecord {
            date: event.start.date_naive(),
            hours,
            task_description: non_empty(description),
            ..DraftRecord::default()
        }
    }

    /// Log rows: date and hours verbatim, description from the combined
    /// details cell with the subject's own name-and-role fragment removed.
    pub fn align_log(&self, log: LogRow) -> DraftRecord {
        let without_subject = self.subject_fragment.replace_all(&log.details, "");
        let description = without_subject
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        DraftRecord {
            date: log.date,
            hours: log.hours,
            task_description: non_empty(description),
            ..DraftRecord::default()
        }
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Rounds to two fraction digits, matching the destination format.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    fn aligner() -> SchemaAligner {
        let rules = vec![AcronymRule::new("AMI", "Advanced Metering Infrastructure")
            .expect("rule built")];
        SchemaAligner::new("Maria Velez", "Worked with the client team.", rules)
            .expect("aligner built")
    }

    #[test]
    fn event_alignment_derives_date_hours_and_description() {
        let record = aligner().align_event(EventRow {
            title: "Grid Timesheet Entry".to_string(),
            start: Utc.with_ymd_and_hms(2025, 8, 25, 13, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 8, 25, 14, 30, 0).unwrap(),
            body: "<p>Review AMI rollout</p>".to_string(),
        });

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 8, 25).unwrap());
        assert_eq!(record.hours, 1.5);
        assert_eq!(
            record.task_description.as_deref(),
            Some("Review Advanced Metering Infrastructure rollout. Worked with the client team.")
        );
        assert_eq!(record.identifier, None);
        assert_eq!(record.site, None);
    }

    #[test]
    fn event_hours_round_to_two_places() {
        let record = aligner().align_event(EventRow {
            title: "t".to_string(),
            start: Utc.with_ymd_and_hms(2025, 8, 25, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 8, 25, 9, 50, 0).unwrap(),
            body: "standup".to_string(),
        });
        assert_eq!(record.hours, 0.83);
    }

    #[test]
    fn inverted_interval_clamps_hours_to_zero() {
        let record = aligner().align_event(EventRow {
            title: "t".to_string(),
            start: Utc.with_ymd_and_hms(2025, 8, 25, 11, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 8, 25, 9, 30, 0).unwrap(),
            body: "rescheduled".to_string(),
        });
        assert_eq!(record.hours, 0.0);
    }

    #[test]
    fn empty_body_falls_back_to_placeholder() {
        let record = aligner().align_event(EventRow {
            title: "t".to_string(),
            start: Utc.with_ymd_and_hms(2025, 8, 25, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 8, 25, 10, 0, 0).unwrap(),
            body: "   ".to_string(),
        });
        assert_eq!(
            record.task_description.as_deref(),
            Some("No agenda provided. Worked with the client team.")
        );
    }

    #[test]
    fn log_alignment_strips_subject_fragment() {
        let record = aligner().align_log(LogRow {
            date: NaiveDate::from_ymd_opt(2025, 8, 26).unwrap(),
            hours: 2.5,
            details: "Outage review; Maria Velez - SME; J. Doe - PM".to_string(),
        });

        assert_eq!(record.hours, 2.5);
        assert_eq!(
            record.task_description.as_deref(),
            Some("Outage review; J. Doe - PM")
        );
    }

    #[test]
    fn log_row_reduced_to_nothing_yields_no_description() {
        let record = aligner().align_log(LogRow {
            date: NaiveDate::from_ymd_opt(2025, 8, 26).unwrap(),
            hours: 1.0,
            details: "Maria Velez - SME;".to_string(),
        });
        assert_eq!(record.task_description, None);
    }
}
