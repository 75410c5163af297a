//! Path management
//!
//! ## Path Resolution Order
//!
//! 1. `REVISIONABLE_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory for `revisionable`
//!    (`~/.config/revisionable` on Linux, `%APPDATA%\revisionable` on Windows)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{RevisionError, RevisionResult};

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "REVISIONABLE_DATA_DIR";

/// Manages all paths used by the revision tooling
#[derive(Debug, Clone)]
pub struct RevisionPaths {
    base_dir: PathBuf,
}

impl RevisionPaths {
    /// Resolve the base directory from the environment or the platform default
    pub fn new() -> RevisionResult<Self> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding one subdirectory per connection
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Default directory of a named connection
    pub fn connection_dir(&self, name: &str) -> PathBuf {
        self.data_dir().join(name)
    }

    /// Where the `table` command writes migrations
    pub fn migrations_dir(&self) -> PathBuf {
        self.base_dir.join("migrations")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Resolve a configured path; relative paths are taken from the base directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> RevisionResult<()> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| RevisionError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| RevisionError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Whether `init` has been run (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> RevisionResult<PathBuf> {
    ProjectDirs::from("", "", "revisionable")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            RevisionError::Config(format!(
                "Could not determine a configuration directory; set {}",
                DATA_DIR_ENV
            ))
        })
}
