use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "raf")]
#[command(author, version, long_about = None)]
#[command(
    about = "Rename multiple files in a single pass using properties extracted from their names"
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Extract a property from the original file names: -p "title=Video\ \d+\ \-\ ([A-Za-z0-9\ ]+)_".
    /// When the regex has groups only the last group is kept, otherwise the whole match
    #[arg(short, long = "prop", value_name = "NAME=REGEX")]
    pub props: Vec<String>,

    /// Pattern for the new names. Reference properties with $name and the built-in
    /// $cnt, $ext and $fname; attach formatters in brackets: $cnt[%03]
    #[arg(short, long, value_name = "TEMPLATE")]
    pub output: Option<String>,

    /// Print the renames that would happen without touching the filesystem
    #[arg(short, long)]
    pub dry: bool,

    /// Write the rename log even in dry-run mode
    #[arg(long)]
    pub save_log: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Files to rename, all in the same directory
    pub files: Vec<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Restore the files renamed by the last batch in a directory
    Undo {
        /// Directory containing the .raf rename log
        directory: PathBuf,

        /// Show what would be restored without renaming anything
        #[arg(short, long)]
        dry: bool,
    },
}
