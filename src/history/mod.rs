mod reader;
mod types;
mod writer;

pub use reader::read_log;
pub use types::*;
pub use writer::{log_path, remove_log, write_log, LogError};
