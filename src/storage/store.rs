//! The revision store contract
//!
//! A store plays the part of a database connection: it holds any number of
//! revisions tables and only ever appends to them.

use crate::error::{RevisionError, RevisionResult};
use crate::models::{NewRevision, Revision, RowId};

/// Append-only storage for revisions tables
pub trait RevisionStore: Send + Sync {
    /// Connection name, for diagnostics
    fn name(&self) -> &str;

    /// Insert a revision into `table`, assigning the next id
    fn insert(&self, table: &str, revision: NewRevision) -> RevisionResult<Revision>;

    /// Every revision of `table` in insertion order
    fn all(&self, table: &str) -> RevisionResult<Vec<Revision>>;

    /// Look up one revision by id
    fn find(&self, table: &str, id: u64) -> RevisionResult<Option<Revision>> {
        Ok(self.all(table)?.into_iter().find(|r| r.id() == id))
    }

    /// History of one tracked row, newest first
    fn for_row(&self, table: &str, table_name: &str, row_id: RowId) -> RevisionResult<Vec<Revision>> {
        let revisions = self
            .all(table)?
            .into_iter()
            .filter(|r| r.table_name() == table_name && r.row_id() == row_id)
            .collect();
        Ok(ordered(revisions))
    }

    /// Everything a given user did, newest first
    fn by_user(&self, table: &str, user: &str) -> RevisionResult<Vec<Revision>> {
        let revisions = self
            .all(table)?
            .into_iter()
            .filter(|r| r.user() == Some(user))
            .collect();
        Ok(ordered(revisions))
    }
}

/// Sort newest first: by timestamp, then by id for revisions sharing one
pub fn ordered(mut revisions: Vec<Revision>) -> Vec<Revision> {
    revisions.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.id().cmp(&a.id()))
    });
    revisions
}

/// Revisions table names map onto files, so keep them to `[A-Za-z0-9_]`
pub fn validate_table_name(table: &str) -> RevisionResult<()> {
    if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(RevisionError::invalid_argument(format!(
            "revisions table name '{}' must be non-empty and contain only letters, digits and underscores",
            table
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, RevisionData};
    use chrono::{TimeZone, Utc};

    fn revision(id: u64, second: u32) -> Revision {
        NewRevision::new(Action::Updated, "posts", 1, RevisionData::new(), RevisionData::new())
            .at(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, second).unwrap())
            .into_revision(id)
    }

    #[test]
    fn test_ordered_newest_first_then_highest_id() {
        let sorted = ordered(vec![revision(1, 0), revision(3, 5), revision(2, 5)]);
        let ids: Vec<u64> = sorted.iter().map(Revision::id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_validate_table_name() {
        assert!(validate_table_name("revisions").is_ok());
        assert!(validate_table_name("audit_log_2").is_ok());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("../etc").unwrap_err().is_invalid_argument());
    }
}
