//! Command implementations for caseforge.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Each command renders its output to a string first so the
//! rendering can be tested without capturing stdout.

mod check;
mod count;
mod expand;
mod tree;

use crate::cli::{Command, TargetArgs};
use caseforge::config::LibraryDocument;
use caseforge::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Expand(args) => expand::cmd_expand(args),
        Command::Count(args) => count::cmd_count(args),
        Command::Tree(args) => tree::cmd_tree(args),
        Command::Check(args) => check::cmd_check(args),
    }
}

/// Load the library named by `target`, failing early when no config can be
/// selected from it.
fn load_target(target: &TargetArgs) -> Result<LibraryDocument> {
    let document = LibraryDocument::load(&target.library)?;
    document.select(target.config.as_deref())?;
    Ok(document)
}
