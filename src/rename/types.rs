use std::path::PathBuf;

use thiserror::Error;

use crate::history::{LogError, RenameLog};

/// Errors that stop a batch while renames are being applied
#[derive(Error, Debug)]
pub enum RenameError {
    #[error("Invalid target name '{to}' for '{from}'")]
    InvalidTargetName { from: String, to: String },

    #[error("Cannot rename '{from}': destination '{to}' already exists")]
    DestinationExists { from: String, to: String },

    #[error("Failed to rename '{from}' to '{to}': {source}")]
    FilesystemError {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Log(#[from] LogError),
}

/// A batch that stopped part-way. Files renamed before the failure stay renamed.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct RenameFailure {
    /// Entries that were applied before the failure
    pub completed: RenameLog,
    /// Where the log of the completed prefix was saved, if it was
    pub log_path: Option<PathBuf>,
    #[source]
    pub error: RenameError,
}

/// Options for a rename batch
#[derive(Debug, Clone, Default)]
pub struct RenameOptions {
    /// Compute and report without touching the filesystem
    pub dry_run: bool,
    /// Also persist the log in dry-run mode
    pub persist_log: bool,
}

impl RenameOptions {
    pub fn should_persist(&self) -> bool {
        !self.dry_run || self.persist_log
    }
}

/// Result of a rename batch
#[derive(Debug, Clone)]
pub struct RenameResult {
    pub directory: PathBuf,
    pub entries: RenameLog,
    pub dry_run: bool,
    pub log_path: Option<PathBuf>,
}

impl RenameResult {
    pub fn warning_count(&self) -> usize {
        self.entries.iter().map(|e| e.warnings.len()).sum()
    }

    pub fn collision_count(&self) -> usize {
        self.entries.iter().filter(|e| e.has_collisions()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{RenameLogEntry, RenameWarning};

    #[test]
    fn test_should_persist() {
        let options = RenameOptions::default();
        assert!(options.should_persist());

        let options = RenameOptions {
            dry_run: true,
            persist_log: false,
        };
        assert!(!options.should_persist());

        let options = RenameOptions {
            dry_run: true,
            persist_log: true,
        };
        assert!(options.should_persist());
    }

    #[test]
    fn test_rename_result_counts() {
        let mut first = RenameLogEntry::new("a", "x");
        first
            .warnings
            .push(RenameWarning::PropertyValueEmpty("$t".to_string()));
        first.collisions = vec![0, 1];
        let mut second = RenameLogEntry::new("b", "x");
        second.collisions = vec![0, 1];

        let result = RenameResult {
            directory: PathBuf::from("/videos"),
            entries: vec![first, second, RenameLogEntry::new("c", "y")],
            dry_run: true,
            log_path: None,
        };

        assert_eq!(result.len(), 3);
        assert!(!result.is_empty());
        assert_eq!(result.warning_count(), 1);
        assert_eq!(result.collision_count(), 2);
    }

    #[test]
    fn test_failure_displays_underlying_error() {
        let failure = RenameFailure {
            completed: Vec::new(),
            log_path: None,
            error: RenameError::DestinationExists {
                from: "a".to_string(),
                to: "b".to_string(),
            },
        };
        assert_eq!(
            failure.to_string(),
            "Cannot rename 'a': destination 'b' already exists"
        );
    }
}
