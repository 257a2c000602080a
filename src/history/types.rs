use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const LOG_VERSION: &str = "1.0";

/// Name of the rename log written next to the renamed files
pub const LOG_FILE_NAME: &str = ".raf";

/// Index-aligned with the input file list of the batch that produced it
pub type RenameLog = Vec<RenameLogEntry>;

/// Issue found while generating or restoring a single name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RenameWarning {
    /// The property was declared but extracted nothing from the file name
    PropertyValueEmpty(String),
    /// The template asks for a property that was never declared
    PropertyMissing(String),
    /// The file recorded in the log is no longer on disk
    FileDoesNotExist(String),
    /// Another file already uses the name a file should be restored to
    TargetExists(String),
}

impl RenameWarning {
    pub fn describe(&self, entry: &RenameLogEntry) -> String {
        match self {
            RenameWarning::PropertyValueEmpty(name) => format!(
                "Could not extract property {} from original file name: {}",
                name, entry.original_file_name
            ),
            RenameWarning::PropertyMissing(name) => format!(
                "Output file name asks for property {} which is not declared",
                name
            ),
            RenameWarning::FileDoesNotExist(name) => {
                format!("File {} from the rename log was not found", name)
            }
            RenameWarning::TargetExists(name) => format!(
                "Another file is already using the name {}, {} was left untouched",
                name, entry.original_file_name
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameLogEntry {
    pub original_file_name: String,
    pub new_file_name: String,

    #[serde(default)]
    pub warnings: Vec<RenameWarning>,

    /// Batch indices computing the same new name, this entry included.
    /// Empty when the name is unique.
    #[serde(default)]
    pub collisions: Vec<usize>,
}

impl RenameLogEntry {
    pub fn new(original_file_name: impl Into<String>, new_file_name: impl Into<String>) -> Self {
        Self {
            original_file_name: original_file_name.into(),
            new_file_name: new_file_name.into(),
            warnings: Vec::new(),
            collisions: Vec::new(),
        }
    }

    pub fn has_collisions(&self) -> bool {
        !self.collisions.is_empty()
    }

    /// Entry describing the opposite rename
    pub fn reversed(&self) -> Self {
        Self::new(self.new_file_name.clone(), self.original_file_name.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameLogFile {
    /// Schema version for compatibility
    pub version: String,

    /// When the batch was executed
    pub executed_at: DateTime<Utc>,

    /// Tool version that created this log
    pub tool_version: String,

    /// Directory containing the renamed files
    pub directory: PathBuf,

    pub entries: RenameLog,
}
