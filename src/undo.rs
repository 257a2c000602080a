use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::history::{
    log_path, read_log, remove_log, LogError, RenameLog, RenameLogEntry, RenameWarning,
};
use crate::progress::Progress;
use crate::rename::detect_collisions;

#[derive(Debug, thiserror::Error)]
pub enum UndoError {
    #[error("Directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("The directory {0} does not contain a rename log")]
    NoRenameLog(PathBuf),

    #[error("The rename log {0} does not contain any entries")]
    EmptyLog(PathBuf),

    #[error(transparent)]
    Log(#[from] LogError),

    #[error("Failed to restore '{from}' to '{to}': {source}")]
    RenameError {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct UndoOptions {
    pub dry_run: bool,
}

/// Result of an undo
#[derive(Debug)]
pub struct UndoResult {
    pub directory: PathBuf,
    /// The reversed log: current names become originals and vice versa
    pub entries: RenameLog,
    /// Number of files restored (or that would be, in dry-run)
    pub restored: usize,
    pub dry_run: bool,
    pub log_removed: bool,
}

/// Restore the files listed in the rename log of `directory` to their
/// original names, last rename first, then delete the log. The returned log
/// keeps the batch order of the rename log.
///
/// Files that vanished, or whose original name is taken by another file, are
/// skipped with a warning on their entry.
pub fn undo(
    directory: &Path,
    options: &UndoOptions,
    progress: &mut Progress,
) -> Result<UndoResult, UndoError> {
    if !directory.exists() {
        return Err(UndoError::DirectoryNotFound(directory.to_path_buf()));
    }
    if !directory.is_dir() {
        return Err(UndoError::NotADirectory(directory.to_path_buf()));
    }

    let path = log_path(directory);
    if !path.exists() {
        return Err(UndoError::NoRenameLog(directory.to_path_buf()));
    }

    info!("Loading rename log from: {:?}", path);
    let log = read_log(&path)?;
    if log.entries.is_empty() {
        return Err(UndoError::EmptyLog(path));
    }

    info!(
        "Rename log contains {} entries from {}",
        log.entries.len(),
        log.executed_at
    );

    progress.undo_start(log.entries.len(), directory);

    let total = log.entries.len();
    let mut restored = 0;
    let mut entries = Vec::with_capacity(total);

    // Last rename first, so a name freed during the batch is free again when
    // its previous owner is restored
    for (step, entry) in log.entries.iter().rev().enumerate() {
        let reversed = restore_entry(entry, directory, options.dry_run, progress)?;
        if reversed.warnings.is_empty() {
            restored += 1;
            progress.undo_progress(
                step + 1,
                total,
                &reversed.original_file_name,
                &reversed.new_file_name,
            );
        }
        entries.push(reversed);
    }
    entries.reverse();

    detect_collisions(&mut entries);

    let mut log_removed = false;
    if !options.dry_run {
        match remove_log(directory) {
            Ok(()) => log_removed = true,
            Err(e) => {
                warn!("Could not remove rename log {:?}: {}", path, e);
                progress.warn(&format!("Could not remove rename log: {}", e));
            }
        }
    }

    progress.undo_complete(restored, options.dry_run);

    Ok(UndoResult {
        directory: directory.to_path_buf(),
        entries,
        restored,
        dry_run: options.dry_run,
        log_removed,
    })
}

fn restore_entry(
    entry: &RenameLogEntry,
    directory: &Path,
    dry_run: bool,
    progress: &mut Progress,
) -> Result<RenameLogEntry, UndoError> {
    let mut reversed = entry.reversed();
    let current_path = directory.join(&entry.new_file_name);
    let restore_path = directory.join(&entry.original_file_name);

    debug!(
        "Checking restore: {} -> {}",
        entry.new_file_name, entry.original_file_name
    );

    if current_path.symlink_metadata().is_err() {
        let warning = RenameWarning::FileDoesNotExist(entry.new_file_name.clone());
        warn!("{}", warning.describe(&reversed));
        progress.warn(&warning.describe(&reversed));
        reversed.warnings.push(warning);
        return Ok(reversed);
    }

    if entry.new_file_name == entry.original_file_name {
        return Ok(reversed);
    }

    if restore_path.symlink_metadata().is_ok() {
        let warning = RenameWarning::TargetExists(entry.original_file_name.clone());
        warn!("{}", warning.describe(&reversed));
        progress.warn(&warning.describe(&reversed));
        reversed.warnings.push(warning);
        return Ok(reversed);
    }

    if !dry_run {
        fs::rename(&current_path, &restore_path).map_err(|e| UndoError::RenameError {
            from: entry.new_file_name.clone(),
            to: entry.original_file_name.clone(),
            source: e,
        })?;
        info!(
            "Restored: {} -> {}",
            entry.new_file_name, entry.original_file_name
        );
    }

    Ok(reversed)
}
