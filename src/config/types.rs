//! Config types and defaults for caseforge.
//!
//! This module defines the property enums, the import marker and the
//! document-level settings used by the Config and ConfigLibrary structs.

use crate::error::{ExpansionError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Default pattern for import property names: `IMPORT` or `IMPORT.<anything>`.
pub const DEFAULT_IMPORT_PATTERN: &str = r"^IMPORT(\..*)?$";

static DEFAULT_IMPORT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_IMPORT_PATTERN).expect("default import pattern compiles"));

/// How a property takes part in case generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionKind {
    /// Every value produces its own case (cartesian expansion, default).
    #[default]
    Expansive,
    /// Values are handed out round-robin across the generated cases.
    Pool,
}

impl ExpansionKind {
    pub fn is_expansive(&self) -> bool {
        matches!(self, Self::Expansive)
    }
}

/// Whether a property holds literal values or names of configs to import.
///
/// Decided once, when the property is constructed or loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// Values are candidate values for the property.
    #[default]
    Literal,
    /// Values are names of configs in the library.
    Import,
}

/// Compiled matcher that decides which property names mark imports.
#[derive(Debug, Clone)]
pub struct ImportMarker {
    regex: Regex,
}

impl ImportMarker {
    /// Compile an import marker from a regex pattern.
    ///
    /// # Returns
    ///
    /// * `Ok(ImportMarker)` - Successfully compiled pattern
    /// * `Err(ExpansionError::UserError)` - The pattern is not a valid regex
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            ExpansionError::UserError(format!(
                "invalid import_pattern '{}' - {}\n\
                 Fix: correct the pattern in the library settings or remove it to use '{}'.",
                pattern, e, DEFAULT_IMPORT_PATTERN
            ))
        })?;
        Ok(Self { regex })
    }

    /// The source pattern of this marker.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Classify a property by its name.
    pub fn classify(&self, property_name: &str) -> PropertyKind {
        if self.regex.is_match(property_name) {
            PropertyKind::Import
        } else {
            PropertyKind::Literal
        }
    }
}

impl Default for ImportMarker {
    fn default() -> Self {
        Self {
            regex: DEFAULT_IMPORT_REGEX.clone(),
        }
    }
}

/// Document-level settings of a config library file.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Regex deciding which property names are imports.
    #[serde(default = "default_import_pattern")]
    pub import_pattern: String,

    /// Config expanded by the CLI when `--config` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_config: Option<String>,
}

fn default_import_pattern() -> String {
    DEFAULT_IMPORT_PATTERN.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            import_pattern: default_import_pattern(),
            default_config: None,
        }
    }
}

impl Settings {
    /// Compile the configured import pattern.
    pub fn import_marker(&self) -> Result<ImportMarker> {
        ImportMarker::new(&self.import_pattern)
    }
}
