use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("No input files")]
    NoInputFiles,

    #[error("Path has no file name: {0}")]
    NoFileName(PathBuf),

    #[error("File name is not valid UTF-8: {0}")]
    NonUtf8Name(PathBuf),

    #[error("Input files must share a directory: found {found} besides {expected}")]
    MixedDirectories { expected: PathBuf, found: PathBuf },

    #[error("Directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to resolve path: {0}")]
    IoError(#[from] std::io::Error),
}

/// One file of the batch, in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    pub path: PathBuf,
}

impl InputFile {
    pub fn new(name: String, path: PathBuf) -> Self {
        Self { name, path }
    }
}

/// The files to rename and the directory they all live in
#[derive(Debug, Clone)]
pub struct InputBatch {
    pub directory: PathBuf,
    pub files: Vec<InputFile>,
}

impl InputBatch {
    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Resolve the expanded argument list into a batch. Order is preserved since it
/// drives `$cnt`.
pub fn resolve_inputs(paths: &[PathBuf]) -> Result<InputBatch, ScannerError> {
    if paths.is_empty() {
        return Err(ScannerError::NoInputFiles);
    }

    let cwd = std::env::current_dir()?;
    let mut directory: Option<PathBuf> = None;
    let mut files = Vec::with_capacity(paths.len());

    for raw in paths {
        let path = absolute(&cwd, raw);
        trace!(path = ?path, "Resolving input");

        let name = match path.file_name() {
            Some(n) => n
                .to_str()
                .ok_or_else(|| ScannerError::NonUtf8Name(raw.clone()))?
                .to_string(),
            None => return Err(ScannerError::NoFileName(raw.clone())),
        };
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();

        match &directory {
            Some(expected) if *expected != parent => {
                return Err(ScannerError::MixedDirectories {
                    expected: expected.clone(),
                    found: parent,
                });
            }
            Some(_) => {}
            None => directory = Some(parent),
        }

        if !path.exists() {
            warn!("Input file {:?} does not exist", path);
        }

        files.push(InputFile::new(name, path));
    }

    let directory = directory.unwrap_or(cwd);
    if !directory.is_dir() {
        return Err(ScannerError::DirectoryNotFound(directory));
    }

    debug!(count = files.len(), directory = ?directory, "Inputs resolved");

    Ok(InputBatch { directory, files })
}

/// Make a path absolute without touching the filesystem, dropping `.` components
fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
