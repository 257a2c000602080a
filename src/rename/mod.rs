mod apply;
mod name_builder;
mod types;

pub use apply::{apply_renames, rename_all};
pub use name_builder::{detect_collisions, generate_name, plan_names, NameBuildResult};
pub use types::{RenameError, RenameFailure, RenameOptions, RenameResult};
