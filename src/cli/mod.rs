//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the library.

pub mod export;
pub mod history;
pub mod log;
pub mod table;

pub use export::{handle_export_command, ExportFormat};
pub use history::{handle_history_command, HistoryCommands};
pub use log::{handle_log_command, LogArgs};
pub use table::handle_table_command;

use crate::config::{RevisionPaths, Settings};
use crate::error::RevisionResult;
use crate::storage::Connections;

/// Everything a command needs: paths, settings and the opened stores
pub struct Workspace {
    pub paths: RevisionPaths,
    pub settings: Settings,
    pub connections: Connections,
}

impl Workspace {
    /// Load settings and open the configured connections
    pub fn open(paths: RevisionPaths) -> RevisionResult<Self> {
        let settings = Settings::load_or_create(&paths)?;
        let connections = Connections::from_settings(&paths, &settings)?;

        Ok(Self {
            paths,
            settings,
            connections,
        })
    }
}
