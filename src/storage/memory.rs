//! In-process revision store

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{RevisionError, RevisionResult};
use crate::models::{NewRevision, Revision};

use super::store::{validate_table_name, RevisionStore};

/// Keeps revisions tables in memory; nothing survives the process
pub struct MemoryStore {
    name: String,
    tables: RwLock<HashMap<String, Vec<Revision>>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Number of revisions in `table`
    pub fn count(&self, table: &str) -> RevisionResult<usize> {
        let tables = self.tables.read().map_err(|e| {
            RevisionError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(tables.get(table).map_or(0, Vec::len))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("memory")
    }
}

impl RevisionStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn insert(&self, table: &str, revision: NewRevision) -> RevisionResult<Revision> {
        validate_table_name(table)?;

        let mut tables = self.tables.write().map_err(|e| {
            RevisionError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let rows = tables.entry(table.to_string()).or_default();
        let id = rows.last().map_or(1, |last| last.id() + 1);
        let revision = revision.into_revision(id);
        rows.push(revision.clone());

        Ok(revision)
    }

    fn all(&self, table: &str) -> RevisionResult<Vec<Revision>> {
        let tables = self.tables.read().map_err(|e| {
            RevisionError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(tables.get(table).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, RevisionData};

    fn new_revision(row_id: u64, user: Option<&str>) -> NewRevision {
        NewRevision::new(Action::Created, "posts", row_id, RevisionData::new(), RevisionData::new())
            .by(user.map(String::from))
    }

    #[test]
    fn test_insert_assigns_incrementing_ids_per_table() {
        let store = MemoryStore::default();
        assert_eq!(store.insert("revisions", new_revision(1, None)).unwrap().id(), 1);
        assert_eq!(store.insert("revisions", new_revision(2, None)).unwrap().id(), 2);
        assert_eq!(store.insert("other", new_revision(1, None)).unwrap().id(), 1);
        assert_eq!(store.count("revisions").unwrap(), 2);
    }

    #[test]
    fn test_for_row_and_by_user() {
        let store = MemoryStore::default();
        store.insert("revisions", new_revision(1, Some("john"))).unwrap();
        store.insert("revisions", new_revision(2, Some("jane"))).unwrap();
        store.insert("revisions", new_revision(1, Some("jane"))).unwrap();

        let history = store.for_row("revisions", "posts", 1).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id(), 3);

        let by_jane = store.by_user("revisions", "jane").unwrap();
        assert_eq!(by_jane.len(), 2);
        assert!(store.find("revisions", 2).unwrap().is_some());
        assert!(store.find("revisions", 9).unwrap().is_none());
    }

    #[test]
    fn test_rejects_bad_table_name() {
        let store = MemoryStore::default();
        assert!(store.insert("bad name", new_revision(1, None)).is_err());
    }
}
