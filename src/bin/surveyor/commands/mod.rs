//! Command implementations

use std::path::PathBuf;

pub mod backend;
pub mod check;
pub mod completions;
pub mod survey;

/// Options shared by every subcommand.
pub struct GlobalArgs {
    pub verbose: bool,
    pub definitions_dir: Option<PathBuf>,
}
