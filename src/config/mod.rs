//! Configuration module
//!
//! This module provides configuration management including:
//! - Base directory resolution
//! - Settings persistence (`config.json`)

pub mod paths;
pub mod settings;

pub use paths::RevisionPaths;
pub use settings::{Settings, TemplateSettings};
