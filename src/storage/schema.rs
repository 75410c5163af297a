//! SQL schema for the revisions table
//!
//! The JSON-lines stores don't need it, but hosts keeping revisions in a SQL
//! database create the table from this migration.

use chrono::{DateTime, Utc};

use crate::error::RevisionResult;

use super::store::validate_table_name;

/// `CREATE TABLE` statement plus indexes for a revisions table
pub fn migration_sql(table: &str) -> RevisionResult<String> {
    validate_table_name(table)?;

    Ok(format!(
        "CREATE TABLE {table} (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    action VARCHAR(255) NOT NULL,
    table_name VARCHAR(255) NOT NULL,
    row_id BIGINT UNSIGNED NOT NULL,
    old TEXT NULL,
    new TEXT NULL,
    user VARCHAR(255) NULL,
    ip VARCHAR(255) NULL,
    ip_forwarded VARCHAR(255) NULL,
    created_at TIMESTAMP NOT NULL
);

CREATE INDEX {table}_action_index ON {table} (action);
CREATE INDEX {table}_table_name_row_id_index ON {table} (table_name, row_id);
"
    ))
}

/// File name for a migration written at `now`
pub fn migration_file_name(table: &str, now: DateTime<Utc>) -> String {
    format!("{}_create_{}_table.sql", now.format("%Y_%m_%d_%H%M%S"), table)
}
