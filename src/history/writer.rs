use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use super::types::*;

/// Error types for rename log operations
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("Failed to write rename log: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to serialize rename log: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Failed to read rename log: {0}")]
    ReadError(String),

    #[error("Rename log version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },
}

/// Location of the rename log for a directory
pub fn log_path(directory: &Path) -> PathBuf {
    directory.join(LOG_FILE_NAME)
}

/// Persist a rename log into `directory`, replacing any previous one
pub fn write_log(entries: &[RenameLogEntry], directory: &Path) -> Result<PathBuf, LogError> {
    let log = RenameLogFile {
        version: LOG_VERSION.to_string(),
        executed_at: Utc::now(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        directory: directory.to_path_buf(),
        entries: entries.to_vec(),
    };

    let path = log_path(directory);
    write_to_path(&log, &path)?;
    Ok(path)
}

/// Delete the rename log of a directory
pub fn remove_log(directory: &Path) -> Result<(), LogError> {
    let path = log_path(directory);
    fs::remove_file(&path)?;
    debug!("Removed rename log {:?}", path);
    Ok(())
}

fn write_to_path(log: &RenameLogFile, path: &Path) -> Result<(), LogError> {
    let temp_path = path.with_file_name(format!("{}.tmp", LOG_FILE_NAME));

    {
        let file = File::create(&temp_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, log)?;
    }

    // Replaces an existing log in one step
    fs::rename(&temp_path, path)?;

    info!(entries = log.entries.len(), "Rename log written to: {:?}", path);

    Ok(())
}
