//! Run orchestration: fetch, filter, align, merge. The pipeline is
//! strictly sequential and reports its terminal condition to the caller
//! instead of exiting the process.

use tracing::{info, instrument, warn};

use crate::align::SchemaAligner;
use crate::config::RunConfig;
use crate::error::Result;
use crate::filter::{self, TitleMatch};
use crate::merge::{self, FieldDefaults};
use crate::model::{AcronymRule, DateWindow, DraftRecord, EventRow, LogRow, SourceRow, TimesheetRecord};

/// Safety cap on event rows considered per run.
const MAX_EVENT_ROWS: usize = 100;

/// Supplies raw event rows for a reporting window. Transport and
/// authentication live behind this trait.
pub trait EventSource {
    fn fetch(&self, window: &DateWindow) -> Result<Vec<EventRow>>;
}

/// Supplies raw meeting-log rows and the acronym mapping.
pub trait SpreadsheetSource {
    fn log_rows(&self) -> Result<Vec<LogRow>>;
    fn acronym_rules(&self) -> Result<Vec<AcronymRule>>;
}

/// Terminal condition of one consolidation run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The run produced the ordered record set.
    Records(Vec<TimesheetRecord>),
    /// No event rows survived the title filter; nothing was written.
    EmptyEventSource,
    /// The meeting log was unreadable or held no rows; nothing was written.
    MissingOrEmptySpreadsheet,
}

/// Orchestrates one consolidation run over the two sources.
pub struct ConsolidationPipeline {
    window: DateWindow,
    event_keyword: String,
    title_match: TitleMatch,
    static_suffix: String,
    defaults: FieldDefaults,
}

impl ConsolidationPipeline {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            window: config.window,
            event_keyword: config.event_keyword.clone(),
            title_match: config.title_match(),
            static_suffix: config.static_suffix.clone(),
            defaults: config.defaults.clone(),
        }
    }

    /// Runs the pipeline to completion. The empty-events check happens
    /// before the spreadsheet is touched; event alignment happens after
    /// the spreadsheet load because the acronym mapping lives there.
    #[instrument(level = "info", skip_all, fields(start = %self.window.start, end = %self.window.end))]
    pub fn run(
        &self,
        events: &dyn EventSource,
        spreadsheet: &dyn SpreadsheetSource,
    ) -> Result<RunOutcome> {
        let mut raw_events = events.fetch(&self.window)?;
        if raw_events.len() > MAX_EVENT_ROWS {
            warn!(
                fetched = raw_events.len(),
                cap = MAX_EVENT_ROWS,
                "event feed exceeded the per-run cap; ignoring the excess"
            );
            raw_events.truncate(MAX_EVENT_ROWS);
        }
        info!(event_count = raw_events.len(), "fetched event rows");

        let qualifying =
            filter::filter_events(raw_events, &self.event_keyword, self.title_match);
        if qualifying.is_empty() {
            return Ok(RunOutcome::EmptyEventSource);
        }
        info!(event_count = qualifying.len(), "events matched the keyword");

        let log_rows = match spreadsheet.log_rows() {
            Ok(rows) if rows.is_empty() => return Ok(RunOutcome::MissingOrEmptySpreadsheet),
            Ok(rows) => rows,
            Err(error) => {
                warn!(%error, "meeting log could not be read");
                return Ok(RunOutcome::MissingOrEmptySpreadsheet);
            }
        };
        let acronym_rules = match spreadsheet.acronym_rules() {
            Ok(rules) => rules,
            Err(error) => {
                warn!(%error, "acronym sheet could not be read");
                return Ok(RunOutcome::MissingOrEmptySpreadsheet);
            }
        };
        info!(
            log_count = log_rows.len(),
            rule_count = acronym_rules.len(),
            "loaded the meeting log"
        );

        let aligner = SchemaAligner::new(
            &self.defaults.subject_name,
            self.static_suffix.clone(),
            acronym_rules,
        )?;

        let aligned_events: Vec<DraftRecord> = qualifying
            .into_iter()
            .map(|row| aligner.align(SourceRow::Event(row)))
            .collect();

        let matching_logs =
            filter::filter_log_rows(log_rows, &self.window, &self.defaults.subject_name);
        let aligned_logs: Vec<DraftRecord> = matching_logs
            .into_iter()
            .map(|row| aligner.align(SourceRow::Log(row)))
            .collect();

        let records = merge::merge(vec![aligned_events, aligned_logs], &self.defaults);
        info!(record_count = records.len(), "consolidation complete");
        Ok(RunOutcome::Records(records))
    }
}
