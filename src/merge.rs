//! Merges aligned record sets into the final ordered dataset.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{DraftRecord, TimesheetRecord};

/// Configured defaults for the identity fields. Applied only where the
/// source left a field unset; present values are never overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefaults {
    pub subject_name: String,
    pub identifier: String,
    pub position: String,
    pub project_id: String,
    pub task_code: String,
    pub site: String,
}

/// Fills unset identity fields from the configured defaults. Idempotent:
/// a second pass over the same record changes nothing. Date, hours, and
/// the task description are never touched.
pub fn fill_defaults(record: &mut DraftRecord, defaults: &FieldDefaults) {
    record
        .subject_name
        .get_or_insert_with(|| defaults.subject_name.clone());
    record
        .identifier
        .get_or_insert_with(|| defaults.identifier.clone());
    record
        .position
        .get_or_insert_with(|| defaults.position.clone());
    record
        .project_id
        .get_or_insert_with(|| defaults.project_id.clone());
    record
        .task_code
        .get_or_insert_with(|| defaults.task_code.clone());
    record.site.get_or_insert_with(|| defaults.site.clone());
}

/// Concatenates the aligned sets, resolves defaults, drops records with
/// no usable description, and imposes a stable ascending date order.
pub fn merge(sets: Vec<Vec<DraftRecord>>, defaults: &FieldDefaults) -> Vec<TimesheetRecord> {
    let mut drafts: Vec<DraftRecord> = sets.into_iter().flatten().collect();

    for draft in &mut drafts {
        fill_defaults(draft, defaults);
    }

    let before = drafts.len();
    drafts.retain(|draft| {
        draft
            .task_description
            .as_deref()
            .map_or(false, |text| !text.trim().is_empty())
    });
    if drafts.len() < before {
        debug!(dropped = before - drafts.len(), "dropped records without descriptions");
    }

    // Vec::sort_by is stable, so equal dates keep their relative order.
    drafts.sort_by(|lhs, rhs| lhs.date.cmp(&rhs.date));

    drafts.into_iter().map(resolve).collect()
}

fn resolve(draft: DraftRecord) -> TimesheetRecord {
    TimesheetRecord {
        subject_name: draft.subject_name.unwrap_or_default(),
        identifier: draft.identifier.unwrap_or_default(),
        position: draft.position.unwrap_or_default(),
        project_id: draft.project_id.unwrap_or_default(),
        task_code: draft.task_code.unwrap_or_default(),
        site: draft.site.unwrap_or_default(),
        date: draft.date,
        hours: draft.hours,
        task_description: draft.task_description.unwrap_or_default(),
    }
}
