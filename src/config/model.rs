//! Config and ConfigProperty definitions.

use super::library::ConfigLibrary;
use super::types::{ExpansionKind, ImportMarker, PropertyKind, Settings};
use serde::Serialize;

/// A named property holding one or more candidate values.
///
/// For import properties the values are names of other configs in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigProperty {
    /// Property name, also the name the value carries in generated cases.
    pub name: String,

    /// Candidate values in declared order. The position of a value is its value index.
    pub values: Vec<String>,

    /// Properties sharing a correlation key only combine values of equal index.
    #[serde(rename = "correlation", skip_serializing_if = "Option::is_none")]
    pub correlation_key: Option<String>,

    /// Expansive (cartesian) or pool (round-robin).
    #[serde(skip_serializing_if = "ExpansionKind::is_expansive")]
    pub expansion: ExpansionKind,

    /// Literal values or config imports.
    #[serde(
        rename = "import",
        serialize_with = "serialize_kind",
        skip_serializing_if = "is_literal"
    )]
    pub kind: PropertyKind,
}

fn is_literal(kind: &PropertyKind) -> bool {
    *kind == PropertyKind::Literal
}

fn serialize_kind<S: serde::Serializer>(
    kind: &PropertyKind,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_bool(*kind == PropertyKind::Import)
}

impl ConfigProperty {
    /// Create a property, classifying it with the default import marker.
    ///
    /// A property named `IMPORT` or `IMPORT.<anything>` becomes an import.
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::classified(name, values, &ImportMarker::default())
    }

    /// Create a property, classifying it with the given import marker.
    pub fn classified(
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
        marker: &ImportMarker,
    ) -> Self {
        let name = name.into();
        let kind = marker.classify(&name);
        Self::with_kind(name, values, kind)
    }

    /// Create a literal property regardless of its name.
    pub fn literal(name: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::with_kind(name, values, PropertyKind::Literal)
    }

    /// Create an import property whose values name configs in the library.
    pub fn import(name: impl Into<String>, configs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::with_kind(name, configs, PropertyKind::Import)
    }

    fn with_kind(
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
        kind: PropertyKind,
    ) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            correlation_key: None,
            expansion: ExpansionKind::Expansive,
            kind,
        }
    }

    /// Set the correlation key.
    pub fn with_correlation(mut self, key: impl Into<String>) -> Self {
        self.correlation_key = Some(key.into());
        self
    }

    /// Mark the property as a pool.
    pub fn pooled(mut self) -> Self {
        self.expansion = ExpansionKind::Pool;
        self
    }

    pub fn is_import(&self) -> bool {
        self.kind == PropertyKind::Import
    }

    pub fn is_pool(&self) -> bool {
        self.expansion == ExpansionKind::Pool
    }
}

/// A named, ordered collection of properties. The unit of import.
///
/// Property order matters: when two properties (directly or through imports)
/// share a name, the later one wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub name: String,
    pub properties: Vec<ConfigProperty>,
}

impl Config {
    /// Create an empty config.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Create a config from already built properties.
    pub fn with_properties(name: impl Into<String>, properties: Vec<ConfigProperty>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    /// Add a property, classified by name with the default import marker.
    pub fn property(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.properties.push(ConfigProperty::new(name, values));
        self
    }

    /// Add a property carrying a correlation key.
    pub fn correlated_property(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
        correlation_key: impl Into<String>,
    ) -> Self {
        self.properties
            .push(ConfigProperty::new(name, values).with_correlation(correlation_key));
        self
    }

    /// Add a pool property.
    pub fn pool_property(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.properties.push(ConfigProperty::literal(name, values).pooled());
        self
    }

    /// Add an import property naming configs in the library.
    pub fn import(
        mut self,
        name: impl Into<String>,
        configs: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.properties.push(ConfigProperty::import(name, configs));
        self
    }

    /// Add an already built property.
    pub fn with(mut self, property: ConfigProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Import properties in declaration order.
    pub fn imports(&self) -> impl Iterator<Item = &ConfigProperty> {
        self.properties.iter().filter(|p| p.is_import())
    }
}

/// A config library file: settings plus the configs it defines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryDocument {
    pub settings: Settings,
    pub library: ConfigLibrary,
}
