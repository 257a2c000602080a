pub mod cli;
pub mod error;
pub mod formatter;
pub mod history;
pub mod logging;
pub mod output;
pub mod progress;
pub mod property;
pub mod rename;
pub mod scanner;
pub mod template;
pub mod undo;

pub use error::{AppError, ExitCode};
pub use formatter::{apply_pipeline, Formatter, RenamerState};
pub use history::{read_log, write_log, RenameLog, RenameLogEntry, RenameWarning, LOG_FILE_NAME};
pub use property::{extract_values, parse_property, Property, PropertyError, VariableMap};
pub use rename::{rename_all, RenameError, RenameFailure, RenameOptions, RenameResult};
pub use scanner::{resolve_inputs, InputBatch, InputFile, ScannerError};
pub use template::{parse_template, template_stats, TemplateError, Token, TokenKind};
pub use undo::{undo, UndoError, UndoOptions, UndoResult};
