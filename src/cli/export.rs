//! CLI command for data export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::ValueEnum;

use super::Workspace;
use crate::error::{RevisionError, RevisionResult};
use crate::export::{csv, json, yaml};

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV, one row per revision
    Csv,
    /// JSON with schema version
    Json,
    /// YAML, human-readable
    Yaml,
}

/// Handle `export`: dump the revisions table to a file or stdout
pub fn handle_export_command(
    workspace: &Workspace,
    connection: Option<&str>,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> RevisionResult<()> {
    let store = workspace.connections.resolve(connection)?;
    let table = &workspace.settings.table;

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                RevisionError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    match format {
        ExportFormat::Csv => csv::export_revisions_csv(store.as_ref(), table, &mut writer)?,
        ExportFormat::Json => {
            json::export_revisions_json(store.as_ref(), table, &mut writer, true)?;
            writeln!(writer).map_err(|e| RevisionError::Export(e.to_string()))?;
        }
        ExportFormat::Yaml => yaml::export_revisions_yaml(store.as_ref(), table, &mut writer)?,
    }

    writer
        .flush()
        .map_err(|e| RevisionError::Export(e.to_string()))?;

    if let Some(path) = output {
        eprintln!("Revisions exported to: {}", path.display());
    }
    Ok(())
}
