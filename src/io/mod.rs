//! IO adapters: the spreadsheet reader, the event feed, and the CSV
//! destination. Everything here is thin glue around the engine.

pub mod csv_write;
pub mod event_feed;
pub mod excel_read;
