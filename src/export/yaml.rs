//! YAML Export functionality
//!
//! Same content as the JSON export, for reading by people.

use std::io::Write;

use crate::error::{RevisionError, RevisionResult};
use crate::export::json::RevisionExport;
use crate::storage::RevisionStore;

/// Export a revisions table to YAML
pub fn export_revisions_yaml<W: Write>(
    store: &dyn RevisionStore,
    table: &str,
    writer: &mut W,
) -> RevisionResult<()> {
    let export = RevisionExport::from_store(store, table)?;

    let export_err = |e: std::io::Error| RevisionError::Export(e.to_string());
    writeln!(writer, "# Revisions Export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(
        writer,
        "# Table: {} (connection {})",
        export.table, export.connection
    )
    .map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| RevisionError::Export(e.to_string()))?;

    Ok(())
}
