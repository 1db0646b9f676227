//! CLI argument parsing for caseforge.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Caseforge: combinatorial test-case generation from composable configs.
///
/// A config library is a YAML file of named configs:
/// - Each property lists one or more candidate values
/// - Properties named IMPORT or IMPORT.<name> splice in other configs
/// - Correlated properties move in lockstep; pool properties rotate
#[derive(Parser, Debug)]
#[command(name = "caseforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands for caseforge.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Expand a config into its test cases.
    ///
    /// Prints one case per line, or the whole set as JSON.
    Expand(ExpandArgs),

    /// Count the cases a config produces.
    ///
    /// Reports the upper bound of the expansion tree next to the number of
    /// cases left after correlation, overrides and deduplication.
    Count(TargetArgs),

    /// Show the expansion tree of a config as a boolean expression.
    Tree(TargetArgs),

    /// Build and expand every config in a library.
    ///
    /// Reports each config that fails; exits non-zero if any did.
    Check(CheckArgs),
}

/// Output formats for the `expand` command.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `p:name(value)` pairs, one case per line.
    #[default]
    Text,
    /// Values only, comma separated, ordered by property name.
    Grid,
    /// A JSON array of name to value objects.
    Json,
    /// A JSON array with correlation and origin details per property.
    Trace,
}

/// Config library file and the config to work on.
#[derive(Parser, Debug)]
pub struct TargetArgs {
    /// Path to the config library (YAML).
    pub library: PathBuf,

    /// Config to expand. Defaults to `settings.default_config`.
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Arguments for the `expand` command.
#[derive(Parser, Debug)]
pub struct ExpandArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the config library (YAML).
    pub library: PathBuf,
}
