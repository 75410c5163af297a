//! Revision record data structures
//!
//! A revision is the persisted row describing one tracked mutation: which
//! action happened to which row of which table, the before/after attribute
//! mappings, who did it and from where.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::action::Action;
use super::attributes::{diff_assoc, RevisionData};

/// Identifier of a tracked row
pub type RowId = u64;

/// Before/after values of a single changed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: Option<String>,
    pub new: Option<String>,
}

/// A revision about to be inserted; the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewRevision {
    pub action: Action,
    pub table_name: String,
    pub row_id: RowId,
    pub old: RevisionData,
    pub new: RevisionData,
    pub user: Option<String>,
    pub ip: Option<String>,
    pub ip_forwarded: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewRevision {
    /// Create a revision payload timestamped now, without request metadata
    pub fn new(
        action: Action,
        table_name: impl Into<String>,
        row_id: RowId,
        old: RevisionData,
        new: RevisionData,
    ) -> Self {
        Self {
            action,
            table_name: table_name.into(),
            row_id,
            old,
            new,
            user: None,
            ip: None,
            ip_forwarded: None,
            created_at: Utc::now(),
        }
    }

    /// Set the acting user
    pub fn by(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    /// Override the timestamp
    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Freeze into a stored revision with the given id
    pub fn into_revision(self, id: u64) -> Revision {
        Revision {
            id,
            action: self.action,
            table_name: self.table_name,
            row_id: self.row_id,
            old: self.old,
            new: self.new,
            user: self.user,
            ip: self.ip,
            ip_forwarded: self.ip_forwarded,
            created_at: self.created_at,
        }
    }
}

/// A persisted revision
///
/// Revisions are read-only: fields are only reachable through getters and
/// no store offers an update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    id: u64,
    action: Action,
    table_name: String,
    row_id: RowId,
    /// JSON-encoded mapping in its persisted form
    #[serde(with = "json_text", default)]
    old: RevisionData,
    /// JSON-encoded mapping in its persisted form
    #[serde(with = "json_text", default)]
    new: RevisionData,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    ip: Option<String>,
    #[serde(default)]
    ip_forwarded: Option<String>,
    created_at: DateTime<Utc>,
}

impl Revision {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn row_id(&self) -> RowId {
        self.row_id
    }

    /// Decoded `old` mapping
    pub fn old_values(&self) -> &RevisionData {
        &self.old
    }

    /// Decoded `new` mapping
    pub fn new_values(&self) -> &RevisionData {
        &self.new
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn ip(&self) -> Option<&str> {
        self.ip.as_deref()
    }

    pub fn ip_forwarded(&self) -> Option<&str> {
        self.ip_forwarded.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Single value from the `old` mapping
    pub fn old_value(&self, key: &str) -> Option<&str> {
        self.old.get(key).map(String::as_str)
    }

    /// Single value from the `new` mapping
    pub fn new_value(&self, key: &str) -> Option<&str> {
        self.new.get(key).map(String::as_str)
    }

    /// Keys whose value changed (or appeared) in this revision
    pub fn updated(&self) -> Vec<&str> {
        self.new
            .iter()
            .filter(|(key, value)| self.old.get(*key) != Some(*value))
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Whether the given field changed in this revision
    pub fn is_updated(&self, key: &str) -> bool {
        self.updated().contains(&key)
    }

    /// Old/new pairs for every changed field
    pub fn diff(&self) -> BTreeMap<String, FieldChange> {
        diff_assoc(&self.new, &self.old)
            .into_keys()
            .map(|key| {
                let change = FieldChange {
                    old: self.old_value(&key).map(String::from),
                    new: self.new_value(&key).map(String::from),
                };
                (key, change)
            })
            .collect()
    }

    /// Format the revision as a one-line summary
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] #{} {} {}#{}",
            self.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.id,
            self.action,
            self.table_name,
            self.row_id
        );

        if let Some(user) = &self.user {
            output.push_str(&format!(" by {}", user));
        }

        output
    }
}

/// Serde adapter storing a mapping as JSON text, the way the `old` / `new`
/// columns hold it
mod json_text {
    use std::collections::BTreeMap;

    use serde::{de, Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use crate::models::attributes::RevisionData;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Encoded(String),
        Mapping(BTreeMap<String, Value>),
    }

    pub fn serialize<S: Serializer>(data: &RevisionData, serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = serde_json::to_string(data).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RevisionData, D::Error> {
        let mapping = match Option::<Stored>::deserialize(deserializer)? {
            None => return Ok(RevisionData::new()),
            Some(Stored::Mapping(mapping)) => mapping,
            Some(Stored::Encoded(text)) => {
                let text = text.trim();
                // Legacy rows encode an empty mapping as `[]`.
                if text.is_empty() || text == "null" || text == "[]" {
                    return Ok(RevisionData::new());
                }
                serde_json::from_str::<BTreeMap<String, Value>>(text).map_err(de::Error::custom)?
            }
        };

        Ok(mapping
            .into_iter()
            .map(|(key, value)| (key, flatten(value)))
            .collect())
    }

    fn flatten(value: Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => "0".to_string(),
            Value::String(s) => s,
            other => other.to_string(),
        }
    }
}
