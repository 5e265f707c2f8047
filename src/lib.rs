//! Core library for the timesheet-tools command line application.
//!
//! The library consolidates work-time records from two heterogeneous
//! sources — a calendar/event feed and a spreadsheet-based shared meeting
//! log — into a single normalized timesheet dataset ready for CSV export.
//! The modules are structured to keep responsibilities narrow and
//! composable: text cleanup lives in [`normalize`], row selection in
//! [`filter`], source-to-schema mapping in [`align`], record merging in
//! [`merge`], and the run orchestration in [`pipeline`]. IO adapters for
//! the spreadsheet, the event feed, and the CSV destination live under
//! [`io`].

pub mod align;
pub mod config;
pub mod error;
pub mod filter;
pub mod io;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod pipeline;

pub use error::{ConsolidateError, Result};
pub use pipeline::{ConsolidationPipeline, EventSource, RunOutcome, SpreadsheetSource};
