use crate::history::RenameLogEntry;
use crate::rename::RenameResult;
use crate::undo::UndoResult;
use std::io::{self, Write};

/// Display dry run results in a formatted output
pub fn display_dry_run(result: &RenameResult, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "========================================")?;
    writeln!(writer, "              DRY RUN")?;
    writeln!(writer, "========================================")?;
    writeln!(writer)?;
    writeln!(writer, "Directory: {}", result.directory.display())?;
    writeln!(writer, "Files:     {}", result.entries.len())?;
    writeln!(writer)?;

    if result.entries.is_empty() {
        writeln!(writer, "No files to rename.")?;
        return Ok(());
    }

    writeln!(writer, "Planned changes:")?;
    writeln!(writer)?;

    for entry in &result.entries {
        writeln!(
            writer,
            "  File {} -> {}",
            entry.original_file_name, entry.new_file_name
        )?;
        for warning in &entry.warnings {
            writeln!(writer, "     [!] {}", warning.describe(entry))?;
        }
    }
    writeln!(writer)?;

    write_collisions(&result.entries, "would be renamed", writer)?;

    writeln!(writer, "----------------------------------------")?;
    writeln!(writer, "Summary:")?;
    writeln!(writer, "  {} files would be renamed", result.entries.len())?;

    let warnings = result.warning_count();
    if warnings > 0 {
        writeln!(writer, "  {} warnings", warnings)?;
    }
    let collisions = result.collision_count();
    if collisions > 0 {
        writeln!(writer, "  {} files share their new name with another", collisions)?;
    }

    if let Some(path) = &result.log_path {
        writeln!(writer, "  Rename log saved to {}", path.display())?;
    }

    writeln!(writer)?;
    writeln!(writer, "Run without --dry to apply these changes.")?;

    Ok(())
}

/// One new file name per line, for scripting
pub fn display_new_names(entries: &[RenameLogEntry], writer: &mut impl Write) -> io::Result<()> {
    for entry in entries {
        writeln!(writer, "{}", entry.new_file_name)?;
    }
    Ok(())
}

/// Warnings of every entry followed by one line per collision group
pub fn display_warnings(entries: &[RenameLogEntry], writer: &mut impl Write) -> io::Result<()> {
    for entry in entries {
        for warning in &entry.warnings {
            writeln!(writer, "WARNING: {}", warning.describe(entry))?;
        }
    }
    write_collisions(entries, "was renamed", writer)
}

/// Display undo results
pub fn display_undo_result(result: &UndoResult, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer)?;
    if result.dry_run {
        writeln!(writer, "Dry run: {} files would be restored.", result.restored)?;
    } else {
        writeln!(writer, "Restored {} files.", result.restored)?;
    }

    let skipped = result.entries.len() - result.restored;
    if skipped > 0 {
        writeln!(writer, "  {} files were skipped:", skipped)?;
        for entry in result.entries.iter().filter(|e| !e.warnings.is_empty()) {
            for warning in &entry.warnings {
                writeln!(writer, "    - {}", warning.describe(entry))?;
            }
        }
    }

    Ok(())
}

fn write_collisions(
    entries: &[RenameLogEntry],
    verb: &str,
    writer: &mut impl Write,
) -> io::Result<()> {
    let mut printed = vec![false; entries.len()];

    for (idx, entry) in entries.iter().enumerate() {
        if printed[idx] || !entry.has_collisions() {
            continue;
        }

        let others: Vec<&str> = entry
            .collisions
            .iter()
            .filter(|&&other| other != idx)
            .filter_map(|&other| entries.get(other))
            .map(|e| e.original_file_name.as_str())
            .collect();

        writeln!(
            writer,
            "[ERROR] File {} {} to {} and would collide with: {}",
            entry.original_file_name,
            verb,
            entry.new_file_name,
            others.join(", ")
        )?;

        for &member in &entry.collisions {
            if let Some(flag) = printed.get_mut(member) {
                *flag = true;
            }
        }
    }

    Ok(())
}
