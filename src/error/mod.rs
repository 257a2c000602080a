mod codes;

pub use codes::ExitCode;

use crate::history::LogError;
use crate::property::PropertyError;
use crate::rename::{RenameError, RenameFailure};
use crate::scanner::ScannerError;
use crate::template::TemplateError;
use crate::undo::UndoError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Output template must be a valid string and cannot be empty")]
    EmptyTemplate,

    #[error("Invalid output template: {source}")]
    InvalidTemplate {
        template: String,
        #[source]
        source: TemplateError,
    },

    #[error("Invalid property: {source}")]
    InvalidProperty {
        declaration: String,
        #[source]
        source: PropertyError,
    },

    #[error("No input files")]
    NoInputFiles,

    #[error("File name is not valid UTF-8: {path}")]
    InvalidFileName { path: PathBuf },

    #[error("Input files are spread over several directories")]
    MixedDirectories { expected: PathBuf, found: PathBuf },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("No rename log found in {path}")]
    NoRenameLog { path: PathBuf },

    #[error("Rename log is empty: {path}")]
    EmptyRenameLog { path: PathBuf },

    #[error("Rename log error: {message}")]
    LogError {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Rename stopped: {source}")]
    BatchStopped {
        completed: usize,
        log_path: Option<PathBuf>,
        #[source]
        source: RenameError,
    },

    #[error("Restore failed: {from} -> {to}")]
    RestoreFailed {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::EmptyTemplate => ExitCode::InvalidArguments,
            AppError::InvalidTemplate { .. } => ExitCode::InvalidTemplate,
            AppError::InvalidProperty { .. } => ExitCode::InvalidProperty,
            AppError::NoInputFiles => ExitCode::InvalidArguments,
            AppError::InvalidFileName { .. } => ExitCode::InvalidArguments,
            AppError::MixedDirectories { .. } => ExitCode::InvalidArguments,
            AppError::DirectoryNotFound { .. } => ExitCode::DirectoryNotFound,
            AppError::NotADirectory { .. } => ExitCode::DirectoryNotFound,
            AppError::NoRenameLog { .. } => ExitCode::NoRenameLog,
            AppError::EmptyRenameLog { .. } => ExitCode::NoRenameLog,
            AppError::LogError { .. } => ExitCode::LogError,
            AppError::BatchStopped {
                source: RenameError::Log(_),
                ..
            } => ExitCode::LogError,
            AppError::BatchStopped { .. } => ExitCode::RenameError,
            AppError::RestoreFailed { .. } => ExitCode::RenameError,
            AppError::Other(_) => ExitCode::GeneralError,
        }
    }

    pub fn detailed_message(&self) -> String {
        match self {
            AppError::EmptyTemplate => String::from(
                "The output template cannot be empty.\n\n\
                 Pass one with -o, for example: -o 'episode $cnt[%02]$ext'",
            ),

            AppError::InvalidTemplate { template, source } => {
                format!(
                    "Could not parse the output template:\n  {}\n\n{}\n\n\
                     Formatters are written after a property in square brackets:\n\
                     \x20 %<char><length>   pad, e.g. $cnt[%03]\n\
                     \x20 ><start>:<end>    slice, e.g. $title[>:10]\n\
                     \x20 /find/replace/    regex replace, e.g. $title[/\\./ /]\n\
                     Use \\ to write a literal $, [ or ].",
                    template, source
                )
            }

            AppError::InvalidProperty {
                declaration,
                source,
            } => {
                format!(
                    "Invalid property declaration:\n  {}\n\n{}\n\n\
                     Properties are declared as name=regex, for example:\n\
                     \x20 -p \"title=Video\\ \\d+\\ \\-\\ ([A-Za-z0-9\\ ]+)_\"",
                    declaration, source
                )
            }

            AppError::NoInputFiles => String::from(
                "No input files were given.\n\n\
                 Pass the files to rename after the options.",
            ),

            AppError::InvalidFileName { path } => {
                format!(
                    "The file name is not valid UTF-8:\n  {}\n\n\
                     Templates and properties work on text, rename this file by hand first.",
                    path.display()
                )
            }

            AppError::MixedDirectories { expected, found } => {
                format!(
                    "All input files must live in the same directory:\n\
                     \x20 {}\n\
                     \x20 {}\n\n\
                     Run a separate batch for each directory.",
                    expected.display(),
                    found.display()
                )
            }

            AppError::DirectoryNotFound { path } => {
                format!(
                    "The specified directory does not exist:\n  {}\n\n\
                     Please verify the path and try again.",
                    path.display()
                )
            }

            AppError::NotADirectory { path } => {
                format!(
                    "The specified path is not a directory:\n  {}\n\n\
                     The undo command receives the path to a directory containing a .raf file.",
                    path.display()
                )
            }

            AppError::NoRenameLog { path } => {
                format!(
                    "The directory does not contain a rename log (.raf):\n  {}\n\n\
                     Nothing to undo.",
                    path.display()
                )
            }

            AppError::EmptyRenameLog { path } => {
                format!(
                    "The rename log does not contain any entries:\n  {}\n\n\
                     Nothing to undo.",
                    path.display()
                )
            }

            AppError::LogError { path, message } => {
                let path_info = path
                    .as_ref()
                    .map(|p| format!("File: {}\n", p.display()))
                    .unwrap_or_default();

                format!(
                    "Rename log error:\n  {}\n{}\n\
                     Ensure the .raf file exists and is valid JSON.",
                    message, path_info
                )
            }

            AppError::BatchStopped {
                completed,
                log_path,
                source,
            } => {
                let mut msg = format!(
                    "Rename stopped:\n  {}\n\n\
                     {} files were renamed before the failure and keep their new names.\n",
                    source, completed
                );
                if let Some(path) = log_path {
                    msg.push_str(&format!(
                        "Their rename log was saved to {}; run `raf undo` on that directory to restore them.\n",
                        path.display()
                    ));
                }
                msg
            }

            AppError::RestoreFailed { from, to, source } => {
                format!(
                    "Failed to restore file:\n\
                     From: {}\n\
                     To:   {}\n\
                     Error: {}\n\n\
                     The rename log was kept; fix the problem and run undo again.",
                    from, to, source
                )
            }

            AppError::Other(message) => message.clone(),
        }
    }
}

impl From<ScannerError> for AppError {
    fn from(err: ScannerError) -> Self {
        match err {
            ScannerError::NoInputFiles => AppError::NoInputFiles,
            ScannerError::NoFileName(path) => {
                AppError::Other(format!("Path has no file name: {}", path.display()))
            }
            ScannerError::NonUtf8Name(path) => AppError::InvalidFileName { path },
            ScannerError::MixedDirectories { expected, found } => {
                AppError::MixedDirectories { expected, found }
            }
            ScannerError::DirectoryNotFound(path) => AppError::DirectoryNotFound { path },
            ScannerError::IoError(e) => AppError::Other(format!("I/O error: {}", e)),
        }
    }
}

impl From<LogError> for AppError {
    fn from(err: LogError) -> Self {
        AppError::LogError {
            path: None,
            message: err.to_string(),
        }
    }
}

impl From<RenameFailure> for AppError {
    fn from(failure: RenameFailure) -> Self {
        AppError::BatchStopped {
            completed: failure.completed.len(),
            log_path: failure.log_path,
            source: failure.error,
        }
    }
}

impl From<UndoError> for AppError {
    fn from(err: UndoError) -> Self {
        match err {
            UndoError::DirectoryNotFound(path) => AppError::DirectoryNotFound { path },
            UndoError::NotADirectory(path) => AppError::NotADirectory { path },
            UndoError::NoRenameLog(path) => AppError::NoRenameLog { path },
            UndoError::EmptyLog(path) => AppError::EmptyRenameLog { path },
            UndoError::Log(e) => e.into(),
            UndoError::RenameError { from, to, source } => {
                AppError::RestoreFailed { from, to, source }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let err = AppError::DirectoryNotFound {
            path: PathBuf::from("/test"),
        };
        assert_eq!(err.exit_code(), ExitCode::DirectoryNotFound);

        let err = AppError::InvalidTemplate {
            template: "$cnt[+1]".to_string(),
            source: TemplateError::UnknownFormatter {
                kind: '+',
                position: 5,
            },
        };
        assert_eq!(err.exit_code(), ExitCode::InvalidTemplate);

        let err = AppError::EmptyTemplate;
        assert_eq!(err.exit_code(), ExitCode::InvalidArguments);
    }

    #[test]
    fn test_batch_stopped_exit_codes() {
        let err: AppError = RenameFailure {
            completed: Vec::new(),
            log_path: None,
            error: RenameError::DestinationExists {
                from: "a".to_string(),
                to: "b".to_string(),
            },
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::RenameError);

        let err = AppError::BatchStopped {
            completed: 0,
            log_path: None,
            source: RenameError::Log(LogError::ReadError("broken".to_string())),
        };
        assert_eq!(err.exit_code(), ExitCode::LogError);
    }

    #[test]
    fn test_detailed_message_includes_context() {
        let err = AppError::InvalidProperty {
            declaration: "title".to_string(),
            source: PropertyError::InvalidSyntax("title".to_string()),
        };

        let msg = err.detailed_message();
        assert!(msg.contains("title"));
        assert!(msg.contains("name=regex"));
    }

    #[test]
    fn test_batch_stopped_mentions_log() {
        let err = AppError::BatchStopped {
            completed: 2,
            log_path: Some(PathBuf::from("/videos/.raf")),
            source: RenameError::DestinationExists {
                from: "a".to_string(),
                to: "b".to_string(),
            },
        };

        let msg = err.detailed_message();
        assert!(msg.contains("2 files were renamed"));
        assert!(msg.contains("/videos/.raf"));
    }

    #[test]
    fn test_scanner_error_conversion() {
        let app_err: AppError = ScannerError::DirectoryNotFound(PathBuf::from("/missing")).into();
        assert_eq!(app_err.exit_code(), ExitCode::DirectoryNotFound);

        let app_err: AppError = ScannerError::NoInputFiles.into();
        assert_eq!(app_err.exit_code(), ExitCode::InvalidArguments);

        let app_err: AppError = ScannerError::NonUtf8Name(PathBuf::from("/clip.mkv")).into();
        assert_eq!(app_err.exit_code(), ExitCode::InvalidArguments);
    }

    #[test]
    fn test_undo_error_conversion() {
        let app_err: AppError = UndoError::NoRenameLog(PathBuf::from("/videos")).into();
        assert_eq!(app_err.exit_code(), ExitCode::NoRenameLog);

        let app_err: AppError = UndoError::NotADirectory(PathBuf::from("/file")).into();
        assert_eq!(app_err.exit_code(), ExitCode::DirectoryNotFound);
    }
}
