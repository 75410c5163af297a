//! Generic revisionable entity
//!
//! `Record` is a table row held as two attribute maps: the values as loaded
//! (`original`) and the values as they are now. Hosts that don't want to
//! implement [`Revisionable`] on their own types can keep their rows in a
//! `Record`; presenters also use it to rebuild an entity as it looked at the
//! time of a revision.

use chrono::{DateTime, Utc};

use super::attributes::{AttributeValue, Attributes, RevisionData};
use super::revision::RowId;
use crate::revisionable::{RevisionState, Revisionable};

/// A row of some table, with its original and current attributes
#[derive(Debug, Clone)]
pub struct Record {
    table: String,
    key: RowId,
    original: Attributes,
    attributes: Attributes,
    revisioning: RevisionState,
}

impl Record {
    /// Create an empty record with default revisioning
    pub fn new(table: impl Into<String>, key: RowId) -> Self {
        Self::from_parts(
            table,
            key,
            Attributes::new(),
            Attributes::new(),
            RevisionState::default(),
        )
    }

    pub fn from_parts(
        table: impl Into<String>,
        key: RowId,
        original: Attributes,
        attributes: Attributes,
        revisioning: RevisionState,
    ) -> Self {
        Self {
            table: table.into(),
            key,
            original,
            attributes,
            revisioning,
        }
    }

    /// Rebuild a record from a stored revision mapping
    ///
    /// Both snapshots hold the raw string values.
    pub fn from_revision_data(
        table: impl Into<String>,
        key: RowId,
        data: &RevisionData,
        revisioning: RevisionState,
    ) -> Self {
        let attributes: Attributes = data
            .iter()
            .map(|(k, v)| (k.clone(), AttributeValue::Text(v.clone())))
            .collect();
        Self::from_parts(table, key, attributes.clone(), attributes, revisioning)
    }

    /// Set a current attribute (builder form)
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_revisioning(mut self, revisioning: RevisionState) -> Self {
        self.revisioning = revisioning;
        self
    }

    /// Mark the current attributes as persisted (builder form)
    pub fn synced(mut self) -> Self {
        self.sync_original();
        self
    }

    /// Set a current attribute
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Current value of an attribute
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Mark the current attributes as persisted
    pub fn sync_original(&mut self) {
        self.original = self.attributes.clone();
    }

    /// Whether any attribute differs from its persisted value
    pub fn is_dirty(&self) -> bool {
        self.original != self.attributes
    }

    /// When the row was created, read from its `created_at` attribute
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.attributes
            .get("created_at")
            .and_then(AttributeValue::as_datetime)
    }
}

impl Revisionable for Record {
    fn table(&self) -> &str {
        &self.table
    }

    fn key(&self) -> RowId {
        self.key
    }

    fn original_attributes(&self) -> &Attributes {
        &self.original
    }

    fn current_attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn revision_state(&self) -> &RevisionState {
        &self.revisioning
    }

    fn revision_state_mut(&mut self) -> &mut RevisionState {
        &mut self.revisioning
    }
}
