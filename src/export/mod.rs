//! Export module
//!
//! Dumps a revisions table in several formats:
//! - CSV: one row per revision (spreadsheet-compatible)
//! - JSON: machine-readable, with schema version
//! - YAML: human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::export_revisions_csv;
pub use json::{export_revisions_json, RevisionExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_revisions_yaml;
