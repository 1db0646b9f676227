//! Implementation of the `caseforge expand` command.

use super::load_target;
use crate::cli::{ExpandArgs, OutputFormat};
use caseforge::case::{Case, CaseProperty};
use caseforge::config::LibraryDocument;
use caseforge::error::{ExpansionError, Result};
use caseforge::expand::expand;
use tracing::info;

/// Execute the `caseforge expand` command.
pub fn cmd_expand(args: ExpandArgs) -> Result<()> {
    let document = load_target(&args.target)?;
    let output = render_expansion(&document, args.target.config.as_deref(), args.format)?;
    print!("{}", output);
    Ok(())
}

/// Expand the selected config and render its cases in `format`.
pub(crate) fn render_expansion(
    document: &LibraryDocument,
    config: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let config = document.select(config)?;
    let cases = expand(config, &document.library)?;
    info!(config = %config.name, cases = cases.len(), "expanded config");

    match format {
        OutputFormat::Text => Ok(lines(&cases, |case| case.to_string())),
        OutputFormat::Grid => Ok(lines(&cases, |case| case.to_grid(","))),
        OutputFormat::Json => to_json(&cases),
        OutputFormat::Trace => {
            let traced: Vec<&[CaseProperty]> = cases.iter().map(Case::properties).collect();
            to_json(&traced)
        }
    }
}

fn lines(cases: &[Case], render: impl Fn(&Case) -> String) -> String {
    cases.iter().map(|case| render(case) + "\n").collect()
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|e| ExpansionError::UserError(format!("failed to serialize cases: {}", e)))?;
    json.push('\n');
    Ok(json)
}
