//! JSON Export functionality
//!
//! Exports a revisions table to JSON with schema versioning.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RevisionError, RevisionResult};
use crate::models::Revision;
use crate::storage::RevisionStore;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A revisions table dump
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Connection the revisions were read from
    pub connection: String,

    /// Revisions table name
    pub table: String,

    /// Revisions in insertion order
    pub revisions: Vec<Revision>,
}

impl RevisionExport {
    /// Read the whole `table` from `store`
    pub fn from_store(store: &dyn RevisionStore, table: &str) -> RevisionResult<Self> {
        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            connection: store.name().to_string(),
            table: table.to_string(),
            revisions: store.all(table)?,
        })
    }
}

/// Export a revisions table to JSON
pub fn export_revisions_json<W: Write>(
    store: &dyn RevisionStore,
    table: &str,
    writer: &mut W,
    pretty: bool,
) -> RevisionResult<()> {
    let export = RevisionExport::from_store(store, table)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| RevisionError::Export(e.to_string()))
}
