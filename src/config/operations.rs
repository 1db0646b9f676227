//! Library document loading, validation, and serialization.

use super::library::ConfigLibrary;
use super::model::{Config, ConfigProperty, LibraryDocument};
use super::types::{ExpansionKind, ImportMarker, Settings};
use crate::error::{ExpansionError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// On-disk shape of a library document.
#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    configs: Vec<RawConfig>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    name: String,
    #[serde(default)]
    properties: Vec<RawProperty>,
}

#[derive(Debug, Deserialize)]
struct RawProperty {
    name: String,
    #[serde(default)]
    values: RawValues,
    #[serde(default)]
    correlation: Option<String>,
    #[serde(default)]
    expansion: ExpansionKind,
    /// Explicit override of the import marker.
    #[serde(default)]
    import: Option<bool>,
}

/// `values: x` and `values: [x, y]` are both accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValues {
    One(RawScalar),
    Many(Vec<RawScalar>),
}

impl Default for RawValues {
    fn default() -> Self {
        RawValues::Many(Vec::new())
    }
}

/// YAML scalars are read as text, so `values: [1, 2]` needs no quoting.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Text(String),
    Number(serde_yaml::Number),
    Flag(bool),
}

impl RawScalar {
    fn into_text(self) -> String {
        match self {
            RawScalar::Text(s) => s,
            RawScalar::Number(n) => n.to_string(),
            RawScalar::Flag(b) => b.to_string(),
        }
    }
}

impl RawProperty {
    fn into_property(self, marker: &ImportMarker) -> ConfigProperty {
        let values: Vec<String> = match self.values {
            RawValues::One(value) => vec![value.into_text()],
            RawValues::Many(values) => values.into_iter().map(RawScalar::into_text).collect(),
        };

        let mut property = match self.import {
            Some(true) => ConfigProperty::import(self.name, values),
            Some(false) => ConfigProperty::literal(self.name, values),
            None => ConfigProperty::classified(self.name, values, marker),
        };
        property.correlation_key = self.correlation;
        property.expansion = self.expansion;
        property
    }
}

/// Serialized shape, mirroring `RawDocument`.
#[derive(Serialize)]
struct DocumentOut<'a> {
    settings: &'a Settings,
    configs: &'a [Config],
}

impl LibraryDocument {
    /// Create a document with default settings.
    pub fn new(library: ConfigLibrary) -> Self {
        Self {
            settings: Settings::default(),
            library,
        }
    }

    /// Load a library document from a YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the library YAML file
    ///
    /// # Returns
    ///
    /// * `Ok(LibraryDocument)` - Successfully loaded and validated document
    /// * `Err(ExpansionError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ExpansionError::UserError(format!(
                "failed to read config library '{}': {}",
                path.display(),
                e
            ))
        })?;

        let document = Self::from_yaml(&content)?;
        debug!(
            path = %path.display(),
            configs = document.library.len(),
            "loaded config library"
        );
        Ok(document)
    }

    /// Parse a library document from a YAML string.
    ///
    /// Property kinds are decided here, once, with the document's import pattern.
    /// Unknown fields are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw: RawDocument = serde_yaml::from_str(yaml).map_err(|e| {
            ExpansionError::UserError(format!("failed to parse config library YAML: {}", e))
        })?;

        let marker = raw.settings.import_marker()?;
        let library = raw
            .configs
            .into_iter()
            .map(|config| {
                let properties = config
                    .properties
                    .into_iter()
                    .map(|p| p.into_property(&marker))
                    .collect();
                Config::with_properties(config.name, properties)
            })
            .collect();

        let document = Self {
            settings: raw.settings,
            library,
        };
        document.validate()?;
        Ok(document)
    }

    /// Serialize the document to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        let out = DocumentOut {
            settings: &self.settings,
            configs: self.library.configs(),
        };
        serde_yaml::to_string(&out).map_err(|e| {
            ExpansionError::UserError(format!("failed to serialize config library to YAML: {}", e))
        })
    }

    /// Validate the document and return an error on invalid content.
    ///
    /// Validation rules:
    /// - `import_pattern` must be a valid regex
    /// - config names and property names must be non-empty
    /// - `default_config`, when set, must name a config in the library
    ///
    /// Duplicate config names and empty value lists are not rejected here; they
    /// fail when the affected config is expanded.
    pub fn validate(&self) -> Result<()> {
        self.settings.import_marker()?;

        for config in self.library.configs() {
            if config.name.trim().is_empty() {
                return Err(ExpansionError::UserError(
                    "config library validation failed: every config needs a non-empty name"
                        .to_string(),
                ));
            }
            if let Some(property) = config.properties.iter().find(|p| p.name.trim().is_empty()) {
                return Err(ExpansionError::UserError(format!(
                    "config library validation failed: config '{}' has a property with an empty name (values: {:?})",
                    config.name, property.values
                )));
            }
        }

        if let Some(name) = &self.settings.default_config
            && self.library.get(name).is_none()
        {
            return Err(ExpansionError::UserError(format!(
                "config library validation failed: default_config '{}' is not defined. Available configs: {}",
                name,
                self.library.names().join(", ")
            )));
        }

        Ok(())
    }

    /// Pick the config to expand: the explicit name, else `default_config`.
    pub fn select(&self, name: Option<&str>) -> Result<&Config> {
        let name = name
            .or(self.settings.default_config.as_deref())
            .ok_or_else(|| {
                ExpansionError::UserError(
                    "no config selected. Pass --config <NAME> or set settings.default_config."
                        .to_string(),
                )
            })?;
        self.library.resolve(name, "<command line>")
    }
}
