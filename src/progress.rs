//! Progress output for user-facing status updates.
//!
//! The engine reports through this type rather than printing directly. In verbose
//! mode output is suppressed since tracing handles everything.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

/// Progress reporter for user-facing output
pub struct Progress {
    writer: Box<dyn Write>,
    /// When true, all output is suppressed (verbose mode uses tracing instead)
    silent: bool,
    colors_enabled: bool,
}

/// Check if we should use colors in output
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    io::stderr().is_terminal()
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    /// Create a new progress reporter writing to stderr
    pub fn new() -> Self {
        Self::new_with_ui(false, should_use_colors())
    }

    /// When verbose=true, output is suppressed (tracing handles it)
    pub fn new_with_ui(verbose: bool, colors_enabled: bool) -> Self {
        Self {
            writer: Box::new(io::stderr()),
            silent: verbose,
            colors_enabled,
        }
    }

    /// Create a progress reporter with a custom writer (for testing)
    #[cfg(test)]
    pub fn with_writer(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            silent: false,
            colors_enabled: false,
        }
    }

    pub fn silent() -> Self {
        Self {
            writer: Box::new(io::sink()),
            silent: true,
            colors_enabled: false,
        }
    }

    pub fn rename_start(&mut self, total: usize, dry_run: bool) {
        if self.silent {
            return;
        }
        let verb = if dry_run { "Previewing" } else { "Renaming" };
        let msg = format!("{} {} files", verb, total);
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{}", msg.bold());
        } else {
            let _ = writeln!(self.writer, "{}", msg);
        }
    }

    /// Report progress on a single rename
    pub fn rename_progress(&mut self, current: usize, total: usize, from: &str, to: &str) {
        self.step(current, total, from, to);
    }

    pub fn rename_complete(&mut self, count: usize, dry_run: bool) {
        if self.silent || dry_run {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{} {}",
                "✓".green().bold(),
                format!("{} files renamed", count).green()
            );
        } else {
            let _ = writeln!(self.writer, "Rename complete. {} files renamed.", count);
        }
    }

    /// Report a non-fatal problem
    pub fn warn(&mut self, message: &str) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{} {}", "!".yellow().bold(), message.yellow());
        } else {
            let _ = writeln!(self.writer, "Warning: {}", message);
        }
    }

    pub fn log_written(&mut self, path: &Path) {
        if self.silent {
            return;
        }
        let msg = format!("Rename log saved to: {}", path.display());
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{}", msg.dimmed());
        } else {
            let _ = writeln!(self.writer, "{}", msg);
        }
    }

    pub fn undo_start(&mut self, total: usize, directory: &Path) {
        if self.silent {
            return;
        }
        let msg = format!(
            "Restoring {} files in {}",
            total,
            directory.display()
        );
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{}", msg.bold());
        } else {
            let _ = writeln!(self.writer, "{}", msg);
        }
    }

    /// Report progress on a single restore
    pub fn undo_progress(&mut self, current: usize, total: usize, from: &str, to: &str) {
        self.step(current, total, from, to);
    }

    pub fn undo_complete(&mut self, count: usize, dry_run: bool) {
        if self.silent {
            return;
        }
        if dry_run {
            let msg = format!("Dry run complete. {} files would be restored.", count);
            if self.colors_enabled {
                let _ = writeln!(self.writer, "{}", msg.dimmed());
            } else {
                let _ = writeln!(self.writer, "{}", msg);
            }
        } else if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{} {}",
                "✓".green().bold(),
                format!("{} files restored", count).green()
            );
        } else {
            let _ = writeln!(self.writer, "Undo complete. {} files restored.", count);
        }
    }

    fn step(&mut self, current: usize, total: usize, from: &str, to: &str) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let counter = format!("[{}/{}]", current, total);
            let _ = writeln!(
                self.writer,
                "{} {} {} {}",
                counter.cyan(),
                from.dimmed(),
                "→".cyan(),
                to
            );
        } else {
            let _ = writeln!(self.writer, "[{}/{}] {} -> {}", current, total, from, to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_progress() -> (Progress, std::sync::Arc<std::sync::Mutex<Vec<u8>>>) {
        let buffer = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let writer = TestWriter(buffer.clone());
        let progress = Progress::with_writer(Box::new(writer));
        (progress, buffer)
    }

    struct TestWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn output(buffer: &std::sync::Arc<std::sync::Mutex<Vec<u8>>>) -> String {
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn test_rename_progress() {
        let (mut progress, buffer) = create_test_progress();

        progress.rename_progress(1, 3, "1 - Home.mkv", "test - Home.avi");
        progress.rename_progress(2, 3, "2 - Chapel.mkv", "test - Chapel.avi");

        let output = output(&buffer);
        assert!(output.contains("[1/3] 1 - Home.mkv -> test - Home.avi"));
        assert!(output.contains("[2/3]"));
    }

    #[test]
    fn test_warn_output() {
        let (mut progress, buffer) = create_test_progress();

        progress.warn("something odd");

        assert!(output(&buffer).contains("Warning: something odd"));
    }

    #[test]
    fn test_rename_complete_silent_in_dry_run() {
        let (mut progress, buffer) = create_test_progress();

        progress.rename_complete(3, true);
        assert!(output(&buffer).is_empty());

        progress.rename_complete(3, false);
        assert!(output(&buffer).contains("3 files renamed"));
    }

    #[test]
    fn test_undo_complete_dry_run() {
        let (mut progress, buffer) = create_test_progress();

        progress.undo_complete(2, true);

        assert!(output(&buffer).contains("2 files would be restored"));
    }

    #[test]
    fn test_silent_progress() {
        let mut progress = Progress::silent();
        progress.rename_start(2, false);
        progress.warn("ignored");
    }
}
