//! File I/O utilities
//!
//! Atomic whole-file JSON writes for settings, and append-only JSON
//! lines for revision tables.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::RevisionError;

/// Write JSON to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), RevisionError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            RevisionError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| RevisionError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| RevisionError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| RevisionError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| RevisionError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        RevisionError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Append one value as a JSON line, flushing immediately
pub fn append_json_line<T, P>(path: P, value: &T) -> Result<(), RevisionError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| RevisionError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let json = serde_json::to_string(value)
        .map_err(|e| RevisionError::Json(format!("Failed to serialize entry: {}", e)))?;

    writeln!(file, "{}", json)
        .map_err(|e| RevisionError::Storage(format!("Failed to write entry: {}", e)))?;

    file.flush()
        .map_err(|e| RevisionError::Storage(format!("Failed to flush {}: {}", path.display(), e)))?;

    Ok(())
}

/// Read every JSON line of a file, oldest first
///
/// A missing file reads as empty; blank lines are skipped.
pub fn read_json_lines<T, P>(path: P) -> Result<Vec<T>, RevisionError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)
        .map_err(|e| RevisionError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    let mut entries = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            RevisionError::Storage(format!(
                "Failed to read {} line {}: {}",
                path.display(),
                line_num + 1,
                e
            ))
        })?;

        if line.trim().is_empty() {
            continue;
        }

        let entry: T = serde_json::from_str(&line).map_err(|e| {
            RevisionError::Json(format!(
                "Failed to parse {} line {}: {}",
                path.display(),
                line_num + 1,
                e
            ))
        })?;

        entries.push(entry);
    }

    Ok(entries)
}
