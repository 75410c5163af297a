//! `table`: write the revisions table migration

use std::path::PathBuf;

use chrono::Utc;

use super::Workspace;
use crate::error::{RevisionError, RevisionResult};
use crate::storage::schema::{migration_file_name, migration_sql};

/// Write the migration for the configured revisions table
///
/// Without `output` the file goes to the migrations directory under a
/// timestamped name. Returns the written path.
pub fn handle_table_command(workspace: &Workspace, output: Option<PathBuf>) -> RevisionResult<PathBuf> {
    let table = &workspace.settings.table;
    let sql = migration_sql(table)?;

    let path = match output {
        Some(path) => path,
        None => workspace
            .paths
            .migrations_dir()
            .join(migration_file_name(table, Utc::now())),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            RevisionError::Io(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }
    std::fs::write(&path, sql)
        .map_err(|e| RevisionError::Io(format!("Failed to write {}: {}", path.display(), e)))?;

    println!("Migration created: {}", path.display());
    Ok(path)
}
