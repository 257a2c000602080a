use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::types::*;
use super::writer::LogError;

/// Read and parse a rename log file
pub fn read_log(path: &Path) -> Result<RenameLogFile, LogError> {
    let file =
        File::open(path).map_err(|e| LogError::ReadError(format!("Cannot open file: {}", e)))?;

    let reader = BufReader::new(file);
    let log: RenameLogFile = serde_json::from_reader(reader)
        .map_err(|e| LogError::ReadError(format!("Invalid JSON: {}", e)))?;

    if log.version != LOG_VERSION {
        return Err(LogError::VersionMismatch {
            expected: LOG_VERSION.to_string(),
            found: log.version,
        });
    }

    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::write_log;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_log_round_trip() {
        let dir = tempdir().unwrap();
        let mut entry = RenameLogEntry::new("a.mkv", "b.avi");
        entry
            .warnings
            .push(RenameWarning::PropertyMissing("$year".to_string()));
        let path = write_log(&[entry.clone()], dir.path()).unwrap();

        let loaded = read_log(&path).unwrap();

        assert_eq!(loaded.version, LOG_VERSION);
        assert_eq!(loaded.entries, vec![entry]);
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = read_log(Path::new("/nonexistent/.raf"));
        assert!(matches!(result, Err(LogError::ReadError(_))));
    }

    #[test]
    fn test_read_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".raf");

        fs::write(&path, "not valid json {{{").unwrap();

        let result = read_log(&path);
        assert!(matches!(result, Err(LogError::ReadError(_))));
    }

    #[test]
    fn test_version_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".raf");

        let bad_json = r#"{
            "version": "99.0",
            "executed_at": "2026-01-01T00:00:00Z",
            "tool_version": "0.1.0",
            "directory": "/test",
            "entries": []
        }"#;
        fs::write(&path, bad_json).unwrap();

        let result = read_log(&path);
        assert!(matches!(result, Err(LogError::VersionMismatch { .. })));
    }
}
