//! Storage initialization
//!
//! Handles first-run setup: directories, a default `config.json` and the
//! default connection's store directory.

use tracing::info;

use crate::config::{RevisionPaths, Settings};
use crate::error::{RevisionError, RevisionResult};

/// Initialize storage for a fresh installation
///
/// Existing settings are kept; returns the settings in effect.
pub fn initialize_storage(paths: &RevisionPaths) -> RevisionResult<Settings> {
    paths.ensure_directories()?;

    let settings = Settings::load_or_create(paths)?;
    if !paths.is_initialized() {
        settings.save(paths)?;
        info!(path = %paths.settings_file().display(), "wrote default settings");
    }

    for name in std::iter::once(&settings.connection).chain(settings.connections.keys()) {
        let dir = settings.connection_dir(paths, name);
        std::fs::create_dir_all(&dir).map_err(|e| {
            RevisionError::Io(format!(
                "Failed to create connection directory {}: {}",
                dir.display(),
                e
            ))
        })?;
    }

    Ok(settings)
}
