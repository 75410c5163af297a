//! Reading an entity's revision history

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::RevisionResult;
use crate::models::Revision;
use crate::presenter::Presenter;
use crate::storage::RevisionStore;

use super::Revisionable;

/// A history item: the bare revision, or a presenter when the entity
/// configured one
#[derive(Debug)]
pub enum HistoryEntry {
    Plain(Revision),
    Presented(Box<Presenter>),
}

impl HistoryEntry {
    pub fn revision(&self) -> &Revision {
        match self {
            HistoryEntry::Plain(revision) => revision,
            HistoryEntry::Presented(presenter) => presenter.revision(),
        }
    }

    pub fn presenter(&self) -> Option<&Presenter> {
        match self {
            HistoryEntry::Plain(_) => None,
            HistoryEntry::Presented(presenter) => Some(presenter.as_ref()),
        }
    }

    pub fn into_revision(self) -> Revision {
        match self {
            HistoryEntry::Plain(revision) => revision,
            HistoryEntry::Presented(presenter) => presenter.into_revision(),
        }
    }
}

/// Revisions of one entity, newest first
pub struct History<'a, E: ?Sized> {
    store: Arc<dyn RevisionStore>,
    table: String,
    entity: &'a E,
}

impl<'a, E: Revisionable + ?Sized> History<'a, E> {
    /// History of `entity` as kept in the revisions `table` of `store`
    pub fn new(store: Arc<dyn RevisionStore>, table: impl Into<String>, entity: &'a E) -> Self {
        Self {
            store,
            table: table.into(),
            entity,
        }
    }

    /// Unwrapped revisions, newest first
    pub fn raw(&self) -> RevisionResult<Vec<Revision>> {
        self.store
            .for_row(&self.table, self.entity.table(), self.entity.key())
    }

    pub fn revisions(&self) -> RevisionResult<Vec<HistoryEntry>> {
        Ok(self.raw()?.into_iter().map(|r| self.wrap(r)).collect())
    }

    pub fn latest(&self) -> RevisionResult<Option<HistoryEntry>> {
        Ok(self.raw()?.into_iter().next().map(|r| self.wrap(r)))
    }

    pub fn oldest(&self) -> RevisionResult<Option<HistoryEntry>> {
        Ok(self.raw()?.into_iter().last().map(|r| self.wrap(r)))
    }

    /// The revision in effect at `at`: the newest one not after it
    pub fn snapshot(&self, at: DateTime<Utc>) -> RevisionResult<Option<HistoryEntry>> {
        Ok(self
            .raw()?
            .into_iter()
            .find(|r| r.created_at() <= at)
            .map(|r| self.wrap(r)))
    }

    /// The revision `step` places back from the latest (0 is the latest)
    pub fn step(&self, step: usize) -> RevisionResult<Option<HistoryEntry>> {
        Ok(self.raw()?.into_iter().nth(step).map(|r| self.wrap(r)))
    }

    pub fn count(&self) -> RevisionResult<usize> {
        Ok(self.raw()?.len())
    }

    /// Whether any revision exists, optionally only counting those up to `at`
    pub fn has_history(&self, at: Option<DateTime<Utc>>) -> RevisionResult<bool> {
        let revisions = self.raw()?;
        Ok(match at {
            Some(at) => revisions.iter().any(|r| r.created_at() <= at),
            None => !revisions.is_empty(),
        })
    }

    /// Present `revision` the way this entity is configured to
    pub fn wrap(&self, revision: Revision) -> HistoryEntry {
        match self.entity.revision_state().presenter() {
            Some(config) => HistoryEntry::Presented(Box::new(
                Presenter::new(revision, self.entity.to_record(), config.clone())
                    .with_history(Arc::clone(&self.store), self.table.clone()),
            )),
            None => HistoryEntry::Plain(revision),
        }
    }
}

/// Every revision performed by `user`, newest first
pub fn actions_by(store: &dyn RevisionStore, table: &str, user: &str) -> RevisionResult<Vec<Revision>> {
    store.by_user(table, user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, NewRevision, Record, RevisionData};
    use crate::presenter::PresenterConfig;
    use crate::revisionable::RevisionState;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, d, 0, 0, 0).unwrap()
    }

    fn store_with_history() -> Arc<dyn RevisionStore> {
        let store: Arc<dyn RevisionStore> = Arc::new(MemoryStore::default());
        for (action, d, user) in [
            (Action::Created, 1, "john"),
            (Action::Updated, 3, "jane"),
            (Action::Updated, 5, "john"),
        ] {
            let new: RevisionData = [("title".to_string(), format!("v{}", d))]
                .into_iter()
                .collect();
            store
                .insert(
                    "revisions",
                    NewRevision::new(action, "posts", 1, RevisionData::new(), new)
                        .by(Some(user.to_string()))
                        .at(day(d)),
                )
                .unwrap();
        }
        store
            .insert(
                "revisions",
                NewRevision::new(Action::Created, "posts", 2, RevisionData::new(), RevisionData::new())
                    .at(day(2)),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_revisions_newest_first() {
        let post = Record::new("posts", 1);
        let history = History::new(store_with_history(), "revisions", &post);

        let ids: Vec<u64> = history
            .revisions()
            .unwrap()
            .iter()
            .map(|e| e.revision().id())
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(history.count().unwrap(), 3);
        assert_eq!(history.latest().unwrap().unwrap().revision().id(), 3);
        assert_eq!(history.oldest().unwrap().unwrap().revision().id(), 1);
    }

    #[test]
    fn test_snapshot() {
        let post = Record::new("posts", 1);
        let history = History::new(store_with_history(), "revisions", &post);

        let snapshot = history.snapshot(day(4)).unwrap().unwrap();
        assert_eq!(snapshot.revision().new_value("title"), Some("v3"));
        assert_eq!(
            history.snapshot(day(3)).unwrap().unwrap().revision().id(),
            2
        );
        assert!(history.snapshot(Utc.with_ymd_and_hms(2019, 12, 31, 0, 0, 0).unwrap())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_step() {
        let post = Record::new("posts", 1);
        let history = History::new(store_with_history(), "revisions", &post);

        assert_eq!(history.step(0).unwrap().unwrap().revision().id(), 3);
        assert_eq!(history.step(2).unwrap().unwrap().revision().id(), 1);
        assert!(history.step(3).unwrap().is_none());
    }

    #[test]
    fn test_has_history() {
        let store = store_with_history();
        let post = Record::new("posts", 1);
        let history = History::new(Arc::clone(&store), "revisions", &post);
        assert!(history.has_history(None).unwrap());
        assert!(history.has_history(Some(day(1))).unwrap());
        assert!(!history
            .has_history(Some(Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap()))
            .unwrap());

        let fresh = Record::new("posts", 99);
        assert!(!History::new(store, "revisions", &fresh).has_history(None).unwrap());
    }

    #[test]
    fn test_wrap_uses_presenter_when_configured() {
        let store = store_with_history();
        let plain = Record::new("posts", 1);
        let entry = History::new(Arc::clone(&store), "revisions", &plain)
            .latest()
            .unwrap()
            .unwrap();
        assert!(matches!(entry, HistoryEntry::Plain(_)));

        let presented = Record::new("posts", 1).with_revisioning(
            RevisionState::new()
                .with_presenter(PresenterConfig::new().action_label(Action::Updated, "edited")),
        );
        let entry = History::new(store, "revisions", &presented)
            .latest()
            .unwrap()
            .unwrap();
        assert_eq!(entry.presenter().unwrap().action(), "edited");
        assert_eq!(entry.into_revision().id(), 3);
    }

    #[test]
    fn test_actions_by() {
        let store = store_with_history();
        let actions = actions_by(store.as_ref(), "revisions", "john").unwrap();
        let ids: Vec<u64> = actions.iter().map(Revision::id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert!(actions_by(store.as_ref(), "revisions", "nobody").unwrap().is_empty());
    }
}
