//! Revision tracking settings
//!
//! Everything here is read from `config.json`; every field has a serde
//! default so partial files keep working across versions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::RevisionPaths;
use crate::error::{RevisionError, RevisionResult};
use crate::models::DEFAULT_DATE_FORMAT;
use crate::presenter::DiffTemplates;
use crate::storage::write_json_atomic;
use crate::user::UserProviderKind;

/// Output templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TemplateSettings {
    #[serde(default)]
    pub diff: DiffTemplates,
}

/// Settings for revision tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Name of the revisions table
    #[serde(default = "default_table")]
    pub table: String,

    /// Connection used when an entity names none
    #[serde(default = "default_connection")]
    pub connection: String,

    /// Extra connections: name to store directory
    #[serde(default)]
    pub connections: BTreeMap<String, PathBuf>,

    /// Which authentication back end identifies the acting user
    ///
    /// Informational for hosts that wire an adapter from settings. The
    /// `revisions` binary ignores it: it takes `--user`, else the
    /// environment session (`REVISIONABLE_SESSION_<FIELD>`).
    #[serde(default)]
    pub user_provider: UserProviderKind,

    /// Property of the authenticated user stored as the revision's user
    #[serde(default = "default_user_field")]
    pub user_field: Option<String>,

    /// Format for date values in revisions (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub templates: TemplateSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_table() -> String {
    "revisions".to_string()
}

fn default_connection() -> String {
    "default".to_string()
}

fn default_user_field() -> Option<String> {
    Some("id".to_string())
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            table: default_table(),
            connection: default_connection(),
            connections: BTreeMap::new(),
            user_provider: UserProviderKind::default(),
            user_field: default_user_field(),
            date_format: default_date_format(),
            templates: TemplateSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &RevisionPaths) -> RevisionResult<Self> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| RevisionError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| RevisionError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &RevisionPaths) -> RevisionResult<()> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Directory backing a connection
    ///
    /// Connections not listed in `connections` live under the data directory.
    pub fn connection_dir(&self, paths: &RevisionPaths, name: &str) -> PathBuf {
        match self.connections.get(name) {
            Some(dir) => paths.resolve(dir),
            None => paths.connection_dir(name),
        }
    }
}
