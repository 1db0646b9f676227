//! Error types for caseforge.
//!
//! Uses thiserror for derive macros. Every variant names the config or property
//! that caused it so a failing expansion can be traced back to its input.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for config loading, tree building and case expansion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpansionError {
    /// An import names a config that does not exist in the library.
    #[error(
        "config '{config}' (imported by '{referenced_by}') does not exist in the config library. Check the spelling or add the config."
    )]
    Resolution {
        config: String,
        referenced_by: String,
    },

    /// The library holds more than one config with the looked-up name.
    #[error(
        "the config library holds {count} configs named '{config}'. Rename all but one of them."
    )]
    AmbiguousReference { config: String, count: usize },

    /// A config cannot be expanded as written.
    #[error("invalid config '{config}': {reason}")]
    Structural { config: String, reason: String },

    /// A case was asked for a property it does not carry.
    #[error("property '{0}' is not present in this case")]
    PropertyNotFound(String),

    /// Bad arguments, unreadable files or malformed documents.
    #[error("{0}")]
    UserError(String),
}

impl ExpansionError {
    /// Shorthand for a structural error.
    pub fn structural(config: impl Into<String>, reason: impl Into<String>) -> Self {
        ExpansionError::Structural {
            config: config.into(),
            reason: reason.into(),
        }
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExpansionError::Resolution { .. } => exit_codes::RESOLUTION_FAILURE,
            ExpansionError::AmbiguousReference { .. } => exit_codes::RESOLUTION_FAILURE,
            ExpansionError::Structural { .. } => exit_codes::STRUCTURE_FAILURE,
            ExpansionError::PropertyNotFound(_) => exit_codes::USER_ERROR,
            ExpansionError::UserError(_) => exit_codes::USER_ERROR,
        }
    }
}

/// Result type alias for caseforge operations.
pub type Result<T> = std::result::Result<T, ExpansionError>;
