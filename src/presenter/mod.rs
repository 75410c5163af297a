//! Presenting revisions
//!
//! A [`Presenter`] decorates one revision with the entity it belongs to:
//! translated action names, field labels, values resolved through relations
//! and an HTML rendering of the diff.

mod pass_through;
mod template;

pub use pass_through::{RelationLoader, Related, Target};
pub use template::{escape_html, DiffTemplates};

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{RevisionError, RevisionResult};
use crate::models::{Action, FieldChange, Record, Revision, RevisionData};
use crate::revisionable::Revisionable;
use crate::storage::RevisionStore;

use pass_through::Walk;

/// How an entity's revisions are presented
#[derive(Clone, Default)]
pub struct PresenterConfig {
    labels: BTreeMap<String, String>,
    pass_through: BTreeMap<String, String>,
    actions: BTreeMap<Action, String>,
    templates: DiffTemplates,
    relations: Option<Arc<dyn RelationLoader>>,
}

impl PresenterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Human-readable name for a field
    pub fn label(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(field.into(), label.into());
        self
    }

    /// Present `field` as the value found at `path` (e.g. `category.name`)
    pub fn pass_through(mut self, field: impl Into<String>, path: impl Into<String>) -> Self {
        self.pass_through.insert(field.into(), path.into());
        self
    }

    /// Wording used for an action
    pub fn action_label(mut self, action: Action, label: impl Into<String>) -> Self {
        self.actions.insert(action, label.into());
        self
    }

    pub fn with_templates(mut self, templates: DiffTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_relations(mut self, relations: Arc<dyn RelationLoader>) -> Self {
        self.relations = Some(relations);
        self
    }

    pub fn templates(&self) -> &DiffTemplates {
        &self.templates
    }
}

impl fmt::Debug for PresenterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresenterConfig")
            .field("labels", &self.labels)
            .field("pass_through", &self.pass_through)
            .field("actions", &self.actions)
            .field("templates", &self.templates)
            .field("relations", &self.relations.is_some())
            .finish()
    }
}

/// Which side of a revision to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Old,
    New,
}

/// One revision decorated for display
pub struct Presenter {
    revision: Revision,
    revisioned: Record,
    config: PresenterConfig,
    history: Option<(Arc<dyn RevisionStore>, String)>,
    old_version: OnceCell<Record>,
    new_version: OnceCell<Record>,
}

impl Presenter {
    pub fn new(revision: Revision, revisioned: Record, config: PresenterConfig) -> Self {
        Self {
            revision,
            revisioned,
            config,
            history: None,
            old_version: OnceCell::new(),
            new_version: OnceCell::new(),
        }
    }

    /// Build from a raw revision row
    ///
    /// Anything but a JSON object describing a revision is rejected.
    pub fn from_value(
        value: serde_json::Value,
        revisioned: Record,
        config: PresenterConfig,
    ) -> RevisionResult<Self> {
        if !value.is_object() {
            return Err(RevisionError::invalid_argument(
                "Presenter must be constructed with a revision object",
            ));
        }

        let revision: Revision = serde_json::from_value(value).map_err(|e| {
            RevisionError::invalid_argument(format!("Invalid revision row: {}", e))
        })?;
        Ok(Self::new(revision, revisioned, config))
    }

    /// Present every revision with the same entity and configuration
    pub fn make_many<E: Revisionable + ?Sized>(
        revisions: Vec<Revision>,
        revisioned: &E,
        config: &PresenterConfig,
    ) -> Vec<Self> {
        let record = revisioned.to_record();
        revisions
            .into_iter()
            .map(|revision| Self::new(revision, record.clone(), config.clone()))
            .collect()
    }

    /// Look up related revisionable entities' snapshots in this store
    pub fn with_history(mut self, store: Arc<dyn RevisionStore>, table: impl Into<String>) -> Self {
        self.history = Some((store, table.into()));
        self
    }

    pub fn revision(&self) -> &Revision {
        &self.revision
    }

    pub fn into_revision(self) -> Revision {
        self.revision
    }

    /// The entity the revision belongs to
    pub fn revisioned(&self) -> &Record {
        &self.revisioned
    }

    pub fn id(&self) -> u64 {
        self.revision.id()
    }

    pub fn user(&self) -> Option<&str> {
        self.revision.user()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.revision.created_at()
    }

    /// Action name, translated when a wording was configured
    pub fn action(&self) -> &str {
        let action = self.revision.action();
        self.config
            .actions
            .get(&action)
            .map(String::as_str)
            .unwrap_or_else(|| action.as_str())
    }

    /// Label for a field, the field name itself by default
    pub fn label<'a>(&'a self, field: &'a str) -> &'a str {
        self.config
            .labels
            .get(field)
            .map(String::as_str)
            .unwrap_or(field)
    }

    pub fn old_value(&self, field: &str) -> Option<String> {
        self.value(Version::Old, field)
    }

    pub fn new_value(&self, field: &str) -> Option<String> {
        self.value(Version::New, field)
    }

    /// Value of `field` on one side, resolved through its pass-through
    /// path when one is configured
    pub fn value(&self, version: Version, field: &str) -> Option<String> {
        match self.config.pass_through.get(field) {
            Some(path) => self.pass_through(version, path).and_then(Target::into_value),
            None => {
                let data = self.data(version);
                data.get(field).cloned()
            }
        }
    }

    /// Walk a dotted path starting at the entity as of this revision
    pub fn pass_through(&self, version: Version, path: &str) -> Option<Target> {
        let snapshot = |record: &Record, at: DateTime<Utc>| self.snapshot_of(record, at);
        let walk = Walk {
            at: self.revision.created_at(),
            relations: self.config.relations.as_deref(),
            snapshot: &snapshot,
        };
        walk.resolve(Target::Revisionable(self.version(version).clone()), path)
    }

    /// Changed fields with their stored old and new values
    pub fn diff(&self) -> BTreeMap<String, FieldChange> {
        self.revision.diff()
    }

    /// Render the diff through the configured templates
    pub fn render_diff(&self) -> String {
        let rows: Vec<(&str, String, String)> = self
            .revision
            .updated()
            .into_iter()
            .map(|field| {
                (
                    self.label(field),
                    self.old_value(field).unwrap_or_default(),
                    self.new_value(field).unwrap_or_default(),
                )
            })
            .collect();

        self.config.templates.render(
            rows.iter()
                .map(|(label, old, new)| (*label, old.as_str(), new.as_str())),
        )
    }

    fn data(&self, version: Version) -> &RevisionData {
        match version {
            Version::Old => self.revision.old_values(),
            Version::New => self.revision.new_values(),
        }
    }

    /// The entity rebuilt from one side of the revision
    fn version(&self, version: Version) -> &Record {
        let cell = match version {
            Version::Old => &self.old_version,
            Version::New => &self.new_version,
        };
        cell.get_or_init(|| {
            Record::from_revision_data(
                self.revisioned.table(),
                self.revisioned.key(),
                self.data(version),
                self.revisioned.revision_state().clone(),
            )
        })
    }

    fn snapshot_of(&self, record: &Record, at: DateTime<Utc>) -> Option<Revision> {
        let (store, table) = self.history.as_ref()?;
        store
            .for_row(table, record.table(), record.key())
            .ok()?
            .into_iter()
            .find(|revision| revision.created_at() <= at)
    }
}

impl fmt::Display for Presenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_diff())
    }
}

impl fmt::Debug for Presenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presenter")
            .field("revision", &self.revision)
            .field("revisioned", &(self.revisioned.table(), self.revisioned.key()))
            .field("config", &self.config)
            .finish()
    }
}
