use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::history::{write_log, RenameLogEntry};
use crate::progress::Progress;
use crate::property::Property;
use crate::scanner::InputBatch;
use crate::template::Token;

use super::name_builder::plan_names;
use super::types::{RenameError, RenameFailure, RenameOptions, RenameResult};

/// Name every file of the batch, then either preview or apply the renames and
/// persist the log into the batch directory.
///
/// Applying is best-effort: the first failure stops the batch, files renamed
/// before it stay renamed, and the log of that prefix is persisted.
pub fn rename_all(
    properties: &[Property],
    tokens: &[Token],
    batch: &InputBatch,
    options: &RenameOptions,
    progress: &mut Progress,
) -> Result<RenameResult, RenameFailure> {
    let names = batch.names();
    let entries = plan_names(properties, tokens, &names);

    info!(
        files = entries.len(),
        collisions = entries.iter().filter(|e| e.has_collisions()).count(),
        "Names generated"
    );

    progress.rename_start(entries.len(), options.dry_run);

    if !options.dry_run {
        if let Err((applied, error)) = apply_renames(&entries, &batch.directory, progress) {
            let completed = applied_prefix(&entries, applied);
            let log_path = persist_prefix(&completed, &batch.directory, progress);
            return Err(RenameFailure {
                completed,
                log_path,
                error,
            });
        }
    }

    let log_path = if options.should_persist() {
        match write_log(&entries, &batch.directory) {
            Ok(path) => {
                progress.log_written(&path);
                Some(path)
            }
            Err(e) => {
                return Err(RenameFailure {
                    completed: if options.dry_run { Vec::new() } else { entries },
                    log_path: None,
                    error: e.into(),
                })
            }
        }
    } else {
        None
    };

    progress.rename_complete(entries.len(), options.dry_run);

    Ok(RenameResult {
        directory: batch.directory.clone(),
        entries,
        dry_run: options.dry_run,
        log_path,
    })
}

/// Rename files in batch order. On failure returns how many entries were
/// applied along with the error.
pub fn apply_renames(
    entries: &[RenameLogEntry],
    directory: &Path,
    progress: &mut Progress,
) -> Result<(), (usize, RenameError)> {
    let total = entries.len();

    for (idx, entry) in entries.iter().enumerate() {
        apply_one(entry, directory).map_err(|e| (idx, e))?;
        progress.rename_progress(idx + 1, total, &entry.original_file_name, &entry.new_file_name);
    }

    Ok(())
}

fn apply_one(entry: &RenameLogEntry, directory: &Path) -> Result<(), RenameError> {
    let from = &entry.original_file_name;
    let to = &entry.new_file_name;

    if !is_valid_target(to) {
        return Err(RenameError::InvalidTargetName {
            from: from.clone(),
            to: to.clone(),
        });
    }

    if from == to {
        debug!("Name unchanged, skipping: {}", from);
        return Ok(());
    }

    let source_path = directory.join(from);
    let destination_path = directory.join(to);

    // The check and the rename are not atomic; another process may still win the race
    if destination_path.symlink_metadata().is_ok() {
        return Err(RenameError::DestinationExists {
            from: from.clone(),
            to: to.clone(),
        });
    }

    fs::rename(&source_path, &destination_path).map_err(|e| RenameError::FilesystemError {
        from: from.clone(),
        to: to.clone(),
        source: e,
    })?;

    info!("Renamed: {} -> {}", from, to);
    Ok(())
}

/// New names must stay in the batch directory
fn is_valid_target(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains(std::path::MAIN_SEPARATOR)
}

/// The first `applied` entries, with collision lists restricted to that prefix
/// so every index in the persisted log points inside it
fn applied_prefix(entries: &[RenameLogEntry], applied: usize) -> Vec<RenameLogEntry> {
    let mut prefix = entries[..applied].to_vec();
    for entry in &mut prefix {
        entry.collisions.retain(|&idx| idx < applied);
        if entry.collisions.len() < 2 {
            entry.collisions.clear();
        }
    }
    prefix
}

fn persist_prefix(
    completed: &[RenameLogEntry],
    directory: &Path,
    progress: &mut Progress,
) -> Option<PathBuf> {
    if completed.is_empty() {
        warn!("No file was renamed, rename log left untouched");
        return None;
    }

    match write_log(completed, directory) {
        Ok(path) => {
            progress.log_written(&path);
            Some(path)
        }
        Err(e) => {
            error!("Could not write rename log after rename error: {}", e);
            progress.warn(&format!("Could not write rename log: {}", e));
            None
        }
    }
}
