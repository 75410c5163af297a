//! JSON-lines revision store
//!
//! Each revisions table is one append-only file `<dir>/<table>.jsonl` where
//! every line is a complete revision row. Lines are flushed as they are
//! written, so a crash loses at most the revision being written.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::trace;

use crate::error::{RevisionError, RevisionResult};
use crate::models::{NewRevision, Revision};

use super::file_io::{append_json_line, read_json_lines};
use super::store::{validate_table_name, RevisionStore};

/// Revision store backed by a directory of `.jsonl` files
pub struct JsonlStore {
    name: String,
    dir: PathBuf,
    /// Held while reading the last id and appending
    write_lock: Mutex<()>,
}

impl JsonlStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(name: impl Into<String>, dir: impl Into<PathBuf>) -> RevisionResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            RevisionError::Storage(format!(
                "Failed to create store directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        Ok(Self {
            name: name.into(),
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Directory holding the table files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `table`
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.jsonl", table))
    }
}

impl RevisionStore for JsonlStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn insert(&self, table: &str, revision: NewRevision) -> RevisionResult<Revision> {
        validate_table_name(table)?;

        let _guard = self.write_lock.lock().map_err(|e| {
            RevisionError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        // Other stores may append to the same file
        let last = self.all(table)?.iter().map(Revision::id).max().unwrap_or(0);

        let revision = revision.into_revision(last + 1);
        let path = self.table_path(table);
        append_json_line(&path, &revision)?;

        trace!(store = %self.name, path = %path.display(), id = revision.id(), "appended revision");
        Ok(revision)
    }

    fn all(&self, table: &str) -> RevisionResult<Vec<Revision>> {
        validate_table_name(table)?;
        read_json_lines(self.table_path(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, RevisionData};
    use tempfile::TempDir;

    fn create_test_store() -> (JsonlStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonlStore::open("default", temp_dir.path().join("data")).unwrap();
        (store, temp_dir)
    }

    fn new_revision(row_id: u64) -> NewRevision {
        let new: RevisionData = [("title".to_string(), format!("Post {}", row_id))]
            .into_iter()
            .collect();
        NewRevision::new(Action::Created, "posts", row_id, RevisionData::new(), new)
    }

    #[test]
    fn test_insert_and_read() {
        let (store, _temp) = create_test_store();

        let revision = store.insert("revisions", new_revision(1)).unwrap();
        assert_eq!(revision.id(), 1);
        assert!(store.table_path("revisions").exists());

        let all = store.all("revisions").unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].new_value("title"), Some("Post 1"));
    }

    #[test]
    fn test_empty_table() {
        let (store, _temp) = create_test_store();
        assert!(store.all("revisions").unwrap().is_empty());
    }

    #[test]
    fn test_ids_continue_after_reopen() {
        let (store, temp) = create_test_store();
        store.insert("revisions", new_revision(1)).unwrap();
        store.insert("revisions", new_revision(2)).unwrap();

        // Simulate a restart
        let reopened = JsonlStore::open("default", temp.path().join("data")).unwrap();
        let revision = reopened.insert("revisions", new_revision(3)).unwrap();
        assert_eq!(revision.id(), 3);
        assert_eq!(reopened.all("revisions").unwrap().len(), 3);
    }

    #[test]
    fn test_stores_sharing_a_directory_never_reuse_ids() {
        let (store, temp) = create_test_store();
        let alias = JsonlStore::open("archive", temp.path().join("data")).unwrap();

        let ids = [
            store.insert("revisions", new_revision(1)).unwrap().id(),
            alias.insert("revisions", new_revision(2)).unwrap().id(),
            store.insert("revisions", new_revision(3)).unwrap().id(),
        ];

        assert_eq!(ids, [1, 2, 3]);
        assert_eq!(store.find("revisions", 3).unwrap().unwrap().row_id(), 3);
    }

    #[test]
    fn test_tables_are_separate_files() {
        let (store, _temp) = create_test_store();
        store.insert("revisions", new_revision(1)).unwrap();
        store.insert("archive", new_revision(1)).unwrap();

        assert_eq!(store.all("revisions").unwrap().len(), 1);
        assert_eq!(store.all("archive").unwrap().len(), 1);
        assert_eq!(store.find("archive", 1).unwrap().unwrap().row_id(), 1);
    }

    #[test]
    fn test_rejects_path_like_table() {
        let (store, _temp) = create_test_store();
        assert!(store.insert("../escape", new_revision(1)).is_err());
        assert!(store.all("a/b").is_err());
    }
}
