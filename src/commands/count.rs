//! Implementation of the `caseforge count` command.

use super::load_target;
use crate::cli::TargetArgs;
use caseforge::config::LibraryDocument;
use caseforge::error::Result;
use caseforge::expand::ExpansionPlan;

/// Execute the `caseforge count` command.
pub fn cmd_count(args: TargetArgs) -> Result<()> {
    let document = load_target(&args)?;
    print!("{}", render_count(&document, args.config.as_deref())?);
    Ok(())
}

/// Upper bound and actual case count for the selected config.
///
/// The two differ when correlations, overrides or duplicate cases prune the
/// cartesian product.
pub(crate) fn render_count(document: &LibraryDocument, config: Option<&str>) -> Result<String> {
    let config = document.select(config)?;
    let plan = ExpansionPlan::prepare(config, &document.library)?;
    let upper_bound = plan.tree()?.case_count_upper_bound();
    let cases = plan.expand()?.len();

    let mut output = format!("Config:      {}\n", config.name);
    output.push_str(&format!("Upper bound: {}\n", upper_bound));
    output.push_str(&format!("Cases:       {}\n", cases));
    if !plan.pools().is_empty() {
        output.push_str(&format!("Pools:       {}\n", plan.pools().len()));
    }
    Ok(output)
}
