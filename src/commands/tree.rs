//! Implementation of the `caseforge tree` command.

use super::load_target;
use crate::cli::TargetArgs;
use caseforge::config::LibraryDocument;
use caseforge::error::Result;
use caseforge::tree::build_tree;

/// Execute the `caseforge tree` command.
pub fn cmd_tree(args: TargetArgs) -> Result<()> {
    let document = load_target(&args)?;
    println!("{}", render_tree(&document, args.config.as_deref())?);
    Ok(())
}

/// The selected config's expansion tree as a boolean expression.
///
/// Pool properties show up with all their values here, as declared.
pub(crate) fn render_tree(document: &LibraryDocument, config: Option<&str>) -> Result<String> {
    let config = document.select(config)?;
    let tree = build_tree(config, &document.library)?;
    Ok(tree.expression())
}
