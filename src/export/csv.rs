//! CSV Export functionality
//!
//! One row per revision; `old` and `new` stay JSON text as in the table.

use std::io::Write;

use serde::Serialize;

use crate::error::{RevisionError, RevisionResult};
use crate::models::Revision;
use crate::storage::RevisionStore;

#[derive(Serialize)]
struct CsvRow<'a> {
    id: u64,
    action: &'a str,
    table_name: &'a str,
    row_id: u64,
    old: String,
    new: String,
    user: &'a str,
    ip: &'a str,
    ip_forwarded: &'a str,
    created_at: String,
}

impl<'a> CsvRow<'a> {
    fn new(revision: &'a Revision) -> RevisionResult<Self> {
        Ok(Self {
            id: revision.id(),
            action: revision.action().as_str(),
            table_name: revision.table_name(),
            row_id: revision.row_id(),
            old: serde_json::to_string(revision.old_values())?,
            new: serde_json::to_string(revision.new_values())?,
            user: revision.user().unwrap_or_default(),
            ip: revision.ip().unwrap_or_default(),
            ip_forwarded: revision.ip_forwarded().unwrap_or_default(),
            created_at: revision.created_at().to_rfc3339(),
        })
    }
}

/// Export a revisions table to CSV
pub fn export_revisions_csv<W: Write>(
    store: &dyn RevisionStore,
    table: &str,
    writer: W,
) -> RevisionResult<()> {
    let revisions = store.all(table)?;
    let mut wtr = csv::Writer::from_writer(writer);

    for revision in &revisions {
        wtr.serialize(CsvRow::new(revision)?)
            .map_err(|e| RevisionError::Export(e.to_string()))?;
    }

    // An empty table still gets its header
    if revisions.is_empty() {
        wtr.write_record([
            "id",
            "action",
            "table_name",
            "row_id",
            "old",
            "new",
            "user",
            "ip",
            "ip_forwarded",
            "created_at",
        ])
        .map_err(|e| RevisionError::Export(e.to_string()))?;
    }

    wtr.flush()
        .map_err(|e| RevisionError::Export(e.to_string()))?;
    Ok(())
}
