//! Core data models for revision tracking
//!
//! This module contains the data structures shared by every other layer:
//! revision actions, attribute snapshots, the persisted revision record and
//! a generic revisionable row.

pub mod action;
pub mod attributes;
pub mod record;
pub mod revision;

pub use action::Action;
pub use attributes::{
    diff_assoc, parse_timestamp, AttributeValue, Attributes, RevisionData, DEFAULT_DATE_FORMAT,
};
pub use record::Record;
pub use revision::{FieldChange, NewRevision, Revision, RowId};
