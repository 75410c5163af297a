//! Revision actions
//!
//! The four entity lifecycle transitions that produce a revision. The same
//! enum doubles as the event type handed to the listener.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RevisionError;

/// Types of lifecycle transitions that can be revisioned
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Entity was created
    #[serde(alias = "create")]
    Created,
    /// Entity was updated
    #[serde(alias = "update")]
    Updated,
    /// Entity was deleted
    #[serde(alias = "delete")]
    Deleted,
    /// Soft-deleted entity was restored
    #[serde(alias = "restore")]
    Restored,
}

impl Action {
    /// Every action, in lifecycle order
    pub const ALL: [Action; 4] = [
        Action::Created,
        Action::Updated,
        Action::Deleted,
        Action::Restored,
    ];

    /// The tag stored in the `action` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Created => "created",
            Action::Updated => "updated",
            Action::Deleted => "deleted",
            Action::Restored => "restored",
        }
    }

    /// Whether revisions with this action carry a `new` snapshot
    pub fn carries_new_values(&self) -> bool {
        matches!(self, Action::Created | Action::Updated)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = RevisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Early versions stored present-tense tags.
        match s.trim().to_lowercase().as_str() {
            "created" | "create" => Ok(Action::Created),
            "updated" | "update" => Ok(Action::Updated),
            "deleted" | "delete" => Ok(Action::Deleted),
            "restored" | "restore" => Ok(Action::Restored),
            other => Err(RevisionError::invalid_argument(format!(
                "unknown revision action '{}'",
                other
            ))),
        }
    }
}
