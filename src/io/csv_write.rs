use std::fs::OpenOptions;
use std::path::Path;

use tracing::info;

use crate::error::{ConsolidateError, Result};
use crate::model::TimesheetRecord;

/// Column order of the exported timesheet.
pub const HEADERS: [&str; 9] = [
    "Name",
    "Identifier",
    "Position",
    "Date",
    "Site",
    "Hours",
    "PROJECT_ID",
    "Task Code",
    "Task Description",
];

/// Writes the ordered record set to `path`, one row per record.
///
/// The destination is probed for a concurrent lock before the writer is
/// constructed, so a locked file never receives partial output.
pub fn write_csv(path: &Path, records: &[TimesheetRecord]) -> Result<()> {
    probe_destination(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADERS)?;
    for record in records {
        let date = record.date.format("%Y-%m-%d").to_string();
        let hours = format!("{:.2}", record.hours);
        writer.write_record([
            record.subject_name.as_str(),
            record.identifier.as_str(),
            record.position.as_str(),
            date.as_str(),
            record.site.as_str(),
            hours.as_str(),
            record.project_id.as_str(),
            record.task_code.as_str(),
            record.task_description.as_str(),
        ])?;
    }
    writer.flush()?;
    info!(record_count = records.len(), output = %path.display(), "CSV written");
    Ok(())
}

/// Refuses destinations currently held open for writing by another
/// process. On platforms without mandatory file locks this is a
/// best-effort probe: an existing file that cannot be opened for writing
/// is treated as locked.
fn probe_destination(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    match OpenOptions::new().write(true).open(path) {
        Ok(_) => Ok(()),
        Err(_) => Err(ConsolidateError::DestinationLocked(path.to_path_buf())),
    }
}
