//! Resolving presented fields through relations
//!
//! A pass-through maps a presented field to a dotted path such as
//! `category.name`. The walk starts at the entity as it looked in the
//! revision and follows one hop per segment.

use chrono::{DateTime, Utc};

use crate::models::{AttributeValue, Record, Revision};

/// Loads an entity's relations for pass-through walks
pub trait RelationLoader: Send + Sync {
    /// The record `relation` points at, if any
    fn load(&self, record: &Record, relation: &str) -> Option<Related>;
}

/// A loaded relation
#[derive(Debug, Clone)]
pub enum Related {
    /// An entity without history
    Model(Record),
    /// An entity whose changes are revisioned
    Revisionable(Record),
}

/// Where a walk currently stands
#[derive(Debug, Clone)]
pub enum Target {
    Model(Record),
    Revisionable(Record),
    Revision(Revision),
    Value(AttributeValue),
}

impl Target {
    /// The resolved scalar, if the walk ended on one
    pub fn into_value(self) -> Option<String> {
        match self {
            Target::Value(value) => Some(value.to_string()),
            _ => None,
        }
    }
}

/// Context one walk runs in
pub(crate) struct Walk<'a> {
    /// Timestamp of the presented revision
    pub at: DateTime<Utc>,
    pub relations: Option<&'a dyn RelationLoader>,
    /// Snapshot lookup for related revisionable entities
    pub snapshot: &'a dyn Fn(&Record, DateTime<Utc>) -> Option<Revision>,
}

impl Walk<'_> {
    pub fn resolve(&self, start: Target, path: &str) -> Option<Target> {
        let mut target = start;
        for segment in path.split('.') {
            target = match target {
                Target::Revisionable(record) => self.through_revisionable(&record, segment),
                Target::Revision(revision) => through_revision(&revision, segment),
                Target::Model(record) => self.through_model(&record, segment),
                Target::Value(_) => None,
            }?;

            if matches!(&target, Target::Value(value) if value.is_blank()) {
                return None;
            }
        }
        Some(target)
    }

    fn through_revisionable(&self, record: &Record, segment: &str) -> Option<Target> {
        // Entity didn't exist yet when the revision was made
        if record.created_at().is_some_and(|created| created > self.at) {
            return None;
        }

        if let Some(value) = record.get(segment) {
            return Some(Target::Value(value.clone()));
        }

        match self.relations?.load(record, segment)? {
            Related::Revisionable(related) => Some(match (self.snapshot)(&related, self.at) {
                Some(revision) => Target::Revision(revision),
                None => Target::Revisionable(related),
            }),
            Related::Model(related) => Some(Target::Model(related)),
        }
    }

    fn through_model(&self, record: &Record, segment: &str) -> Option<Target> {
        if let Some(value) = record.get(segment) {
            return Some(Target::Value(value.clone()));
        }

        match self.relations?.load(record, segment)? {
            Related::Revisionable(related) => Some(Target::Revisionable(related)),
            Related::Model(related) => Some(Target::Model(related)),
        }
    }
}

fn through_revision(revision: &Revision, segment: &str) -> Option<Target> {
    if !revision.action().carries_new_values() {
        return None;
    }
    revision
        .new_value(segment)
        .map(|value| Target::Value(AttributeValue::Text(value.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, NewRevision, RevisionData};
    use chrono::TimeZone;

    struct Categories;

    impl RelationLoader for Categories {
        fn load(&self, _record: &Record, relation: &str) -> Option<Related> {
            match relation {
                "category" => Some(Related::Model(
                    Record::new("categories", 3).with_attribute("name", "News"),
                )),
                "author" => Some(Related::Revisionable(
                    Record::new("users", 9).with_attribute("name", "John"),
                )),
                _ => None,
            }
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 6, 1, 12, 0, 0).unwrap()
    }

    fn no_snapshot(_: &Record, _: DateTime<Utc>) -> Option<Revision> {
        None
    }

    fn post() -> Target {
        Target::Revisionable(Record::new("posts", 1).with_attribute("title", "Hi"))
    }

    #[test]
    fn test_plain_attribute() {
        let walk = Walk {
            at: at(),
            relations: None,
            snapshot: &no_snapshot,
        };
        let value = walk.resolve(post(), "title").and_then(Target::into_value);
        assert_eq!(value.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_through_model_relation() {
        let walk = Walk {
            at: at(),
            relations: Some(&Categories),
            snapshot: &no_snapshot,
        };
        let value = walk.resolve(post(), "category.name").and_then(Target::into_value);
        assert_eq!(value.as_deref(), Some("News"));
        assert!(walk.resolve(post(), "missing.name").is_none());
    }

    #[test]
    fn test_related_revisionable_uses_snapshot() {
        let snapshot = |_: &Record, _: DateTime<Utc>| {
            let new: RevisionData = [("name".to_string(), "Johnny".to_string())]
                .into_iter()
                .collect();
            Some(NewRevision::new(Action::Updated, "users", 9, RevisionData::new(), new).into_revision(4))
        };
        let walk = Walk {
            at: at(),
            relations: Some(&Categories),
            snapshot: &snapshot,
        };
        let value = walk.resolve(post(), "author.name").and_then(Target::into_value);
        assert_eq!(value.as_deref(), Some("Johnny"));
    }

    #[test]
    fn test_related_revisionable_without_history_is_itself() {
        let walk = Walk {
            at: at(),
            relations: Some(&Categories),
            snapshot: &no_snapshot,
        };
        let value = walk.resolve(post(), "author.name").and_then(Target::into_value);
        assert_eq!(value.as_deref(), Some("John"));
    }

    #[test]
    fn test_deleted_snapshot_yields_nothing() {
        let snapshot = |_: &Record, _: DateTime<Utc>| {
            Some(
                NewRevision::new(Action::Deleted, "users", 9, RevisionData::new(), RevisionData::new())
                    .into_revision(5),
            )
        };
        let walk = Walk {
            at: at(),
            relations: Some(&Categories),
            snapshot: &snapshot,
        };
        assert!(walk.resolve(post(), "author.name").is_none());
    }

    #[test]
    fn test_entity_created_after_revision_yields_nothing() {
        let walk = Walk {
            at: at(),
            relations: None,
            snapshot: &no_snapshot,
        };
        let later = Target::Revisionable(
            Record::new("posts", 1)
                .with_attribute("title", "Hi")
                .with_attribute("created_at", Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()),
        );
        assert!(walk.resolve(later, "title").is_none());
    }

    #[test]
    fn test_scalar_cannot_be_traversed_and_blank_is_absent() {
        let walk = Walk {
            at: at(),
            relations: None,
            snapshot: &no_snapshot,
        };
        assert!(walk.resolve(post(), "title.length").is_none());

        let blank = Target::Model(Record::new("posts", 1).with_attribute("title", ""));
        assert!(walk.resolve(blank, "title").is_none());
    }
}
