//! Revisionable capability for tracked entities
//!
//! An entity becomes revisionable by implementing [`Revisionable`]: it hands
//! out its table, key and the two attribute snapshots (as loaded and as they
//! are now), plus a [`RevisionState`] it embeds. Everything else (field
//! selection, stringification, diffing, the on/off switch) comes from the
//! provided methods.
//!
//! # Example
//!
//! ```rust,ignore
//! use revisionable::models::Record;
//! use revisionable::revisionable::Revisionable;
//!
//! let mut post = Record::new("posts", 1)
//!     .with_attribute("title", "Hello")
//!     .synced();
//! post.set("title", "Hello, world");
//!
//! assert_eq!(post.diff()["title"].new.as_deref(), Some("Hello, world"));
//! ```

mod history;

pub use history::{actions_by, History, HistoryEntry};

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{
    diff_assoc, Action, Attributes, FieldChange, Record, RevisionData, RowId, DEFAULT_DATE_FORMAT,
};
use crate::presenter::PresenterConfig;

/// Attributes excluded from revisioning when no allow-list is given
pub const DEFAULT_NON_REVISIONABLE: [&str; 3] = ["created_at", "updated_at", "deleted_at"];

/// Per-instance revisioning configuration and switch
///
/// Entity types embed one of these and expose it through
/// [`Revisionable::revision_state`].
#[derive(Debug, Clone)]
pub struct RevisionState {
    revisionable: BTreeSet<String>,
    non_revisionable: BTreeSet<String>,
    enabled: bool,
    events: BTreeSet<Action>,
    connection: Option<String>,
    date_format: String,
    presenter: Option<PresenterConfig>,
}

impl Default for RevisionState {
    fn default() -> Self {
        Self {
            revisionable: BTreeSet::new(),
            non_revisionable: DEFAULT_NON_REVISIONABLE
                .iter()
                .map(|s| s.to_string())
                .collect(),
            enabled: true,
            events: Action::ALL.into_iter().collect(),
            connection: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            presenter: None,
        }
    }
}

impl RevisionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track only these attributes
    pub fn with_revisionable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.revisionable = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the deny-list used when no allow-list is set
    pub fn with_non_revisionable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.non_revisionable = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict which lifecycle events produce revisions
    pub fn with_events<I: IntoIterator<Item = Action>>(mut self, events: I) -> Self {
        self.events = events.into_iter().collect();
        self
    }

    /// Write this entity's revisions through a named connection
    pub fn on_connection(mut self, name: impl Into<String>) -> Self {
        self.connection = Some(name.into());
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Present this entity's history through a [`Presenter`](crate::presenter::Presenter)
    pub fn with_presenter(mut self, config: PresenterConfig) -> Self {
        self.presenter = Some(config);
        self
    }

    pub fn revisionable(&self) -> &BTreeSet<String> {
        &self.revisionable
    }

    pub fn non_revisionable(&self) -> &BTreeSet<String> {
        &self.non_revisionable
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn tracks(&self, action: Action) -> bool {
        self.events.contains(&action)
    }

    pub fn connection(&self) -> Option<&str> {
        self.connection.as_deref()
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn presenter(&self) -> Option<&PresenterConfig> {
        self.presenter.as_ref()
    }

    /// Pick the attributes eligible for revisioning
    ///
    /// A non-empty allow-list wins; otherwise everything but the deny-list.
    pub fn select(&self, values: &Attributes) -> Attributes {
        values
            .iter()
            .filter(|(key, _)| {
                if self.revisionable.is_empty() {
                    !self.non_revisionable.contains(*key)
                } else {
                    self.revisionable.contains(*key)
                }
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Stringify every value for storage
    pub fn prepare(&self, values: &Attributes) -> RevisionData {
        values
            .iter()
            .map(|(key, value)| (key.clone(), value.to_revision_string(&self.date_format)))
            .collect()
    }
}

/// An entity whose attribute changes are tracked
pub trait Revisionable {
    /// Table the entity is stored in
    fn table(&self) -> &str;

    /// Primary key of the entity
    fn key(&self) -> RowId;

    /// Attributes as they were loaded / last saved
    fn original_attributes(&self) -> &Attributes;

    /// Attributes as they are now
    fn current_attributes(&self) -> &Attributes;

    fn revision_state(&self) -> &RevisionState;

    fn revision_state_mut(&mut self) -> &mut RevisionState;

    /// Allow-list; empty means "use the deny-list"
    fn revisionable(&self) -> &BTreeSet<String> {
        self.revision_state().revisionable()
    }

    /// Deny-list, timestamps by default
    fn non_revisionable(&self) -> &BTreeSet<String> {
        self.revision_state().non_revisionable()
    }

    fn revisionable_items(&self, values: &Attributes) -> Attributes {
        self.revision_state().select(values)
    }

    /// Revisionable attributes before the mutation, stringified
    fn old_attributes(&self) -> RevisionData {
        let state = self.revision_state();
        state.prepare(&state.select(self.original_attributes()))
    }

    /// Revisionable attributes after the mutation, stringified
    fn new_attributes(&self) -> RevisionData {
        let state = self.revision_state();
        state.prepare(&state.select(self.current_attributes()))
    }

    /// Old/new pairs of the revisionable attributes that changed
    fn diff(&self) -> BTreeMap<String, FieldChange> {
        let old = self.old_attributes();
        let new = self.new_attributes();
        diff_assoc(&new, &old)
            .into_iter()
            .map(|(key, value)| {
                let change = FieldChange {
                    old: old.get(&key).cloned(),
                    new: Some(value),
                };
                (key, change)
            })
            .collect()
    }

    fn is_revisioned(&self) -> bool {
        self.revision_state().is_enabled()
    }

    fn enable_revisioning(&mut self) {
        self.revision_state_mut().set_enabled(true);
    }

    fn disable_revisioning(&mut self) {
        self.revision_state_mut().set_enabled(false);
    }

    /// Whether this lifecycle event should produce a revision
    fn tracks(&self, action: Action) -> bool {
        self.revision_state().tracks(action)
    }

    /// Connection name overriding the logger's default, if any
    fn revisionable_connection(&self) -> Option<&str> {
        self.revision_state().connection()
    }

    /// Detached copy of the entity, used by presenters
    fn to_record(&self) -> Record {
        Record::from_parts(
            self.table(),
            self.key(),
            self.original_attributes().clone(),
            self.current_attributes().clone(),
            self.revision_state().clone(),
        )
    }
}
