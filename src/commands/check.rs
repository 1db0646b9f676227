//! Implementation of the `caseforge check` command.
//!
//! Expands every config in a library so broken imports, empty properties and
//! cycles are found before a large expansion is attempted.

use crate::cli::CheckArgs;
use caseforge::config::LibraryDocument;
use caseforge::error::{ExpansionError, Result};
use caseforge::expand::expand;
use tracing::debug;

/// Outcome of expanding one config.
#[derive(Debug)]
pub(crate) struct CheckReport {
    pub config: String,
    pub outcome: Result<usize>,
}

/// Execute the `caseforge check` command.
pub fn cmd_check(args: CheckArgs) -> Result<()> {
    let document = LibraryDocument::load(&args.library)?;
    let reports = check_library(&document);

    for report in &reports {
        match &report.outcome {
            Ok(cases) => println!("  ok    {} ({} cases)", report.config, cases),
            Err(err) => println!("  FAIL  {}: {}", report.config, err),
        }
    }

    let failed = reports.iter().filter(|r| r.outcome.is_err()).count();
    println!();
    println!("{} configs checked, {} failed", reports.len(), failed);

    if failed > 0 {
        return Err(ExpansionError::UserError(format!(
            "{} of {} configs failed to expand",
            failed,
            reports.len()
        )));
    }
    Ok(())
}

/// Expand each config of the library, in declaration order.
pub(crate) fn check_library(document: &LibraryDocument) -> Vec<CheckReport> {
    document
        .library
        .configs()
        .iter()
        .map(|config| {
            let outcome = expand(config, &document.library).map(|cases| cases.len());
            debug!(config = %config.name, ok = outcome.is_ok(), "checked config");
            CheckReport {
                config: config.name.clone(),
                outcome,
            }
        })
        .collect()
}
