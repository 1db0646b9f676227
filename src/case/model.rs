//! Case and CaseProperty definitions.

use super::correlation::CorrelationPath;
use crate::config::ExpansionKind;
use crate::error::{ExpansionError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One resolved property of a case, with the bookkeeping of how it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseProperty {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_key: Option<String>,
    /// Expansive values, or a pool placeholder/assignment.
    pub expansion: ExpansionKind,
    /// Position of the property within its config.
    pub property_index: usize,
    /// Position of the value within the property's declared values.
    pub value_index: usize,
    pub correlation_path: CorrelationPath,
    /// Tree path, `:root/property:value/...`.
    pub origin_path: String,
    /// Configs passed through, root first.
    pub origin_config_path: Vec<String>,
}

impl CaseProperty {
    /// Create a property with empty tracking information.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            correlation_key: None,
            expansion: ExpansionKind::Expansive,
            property_index: 0,
            value_index: 0,
            correlation_path: CorrelationPath::new(),
            origin_path: String::new(),
            origin_config_path: Vec::new(),
        }
    }

    /// The `name:value` pair identifying this property within a case.
    pub fn fingerprint(&self) -> String {
        format!("{}:{}", self.name, self.value)
    }

    pub fn is_pool(&self) -> bool {
        self.expansion == ExpansionKind::Pool
    }
}

/// One fully resolved combination: at most one value per property name.
///
/// Two cases are equal when their fingerprints are equal, regardless of
/// property order or tracking information.
#[derive(Debug, Clone, Default)]
pub struct Case {
    properties: Vec<CaseProperty>,
}

impl Case {
    pub fn new(properties: Vec<CaseProperty>) -> Self {
        Self { properties }
    }

    /// A case with a single property.
    pub fn single(property: CaseProperty) -> Self {
        Self {
            properties: vec![property],
        }
    }

    pub fn properties(&self) -> &[CaseProperty] {
        &self.properties
    }

    pub(crate) fn properties_mut(&mut self) -> &mut Vec<CaseProperty> {
        &mut self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Value of a property.
    ///
    /// # Returns
    ///
    /// * `Ok(&str)` - The property's value
    /// * `Err(ExpansionError::PropertyNotFound)` - The case has no such property
    pub fn get(&self, name: &str) -> Result<&str> {
        self.value(name)
            .ok_or_else(|| ExpansionError::PropertyNotFound(name.to_string()))
    }

    /// Value of a property, or `None` when absent.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.property(name).map(|p| p.value.as_str())
    }

    /// Full property record, or `None` when absent.
    pub fn property(&self, name: &str) -> Option<&CaseProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Sorted `name:value` pairs joined by `|`. Identifies the case for
    /// deduplication and equality.
    pub fn fingerprint(&self) -> String {
        let mut parts: Vec<String> = self.properties.iter().map(|p| p.fingerprint()).collect();
        parts.sort();
        parts.join("|")
    }

    /// Merge two cases; properties of `overlay` win over same-named ones here.
    pub fn overlay(&self, overlay: &Case) -> Case {
        let mut properties = overlay.properties.clone();
        properties.extend(
            self.properties
                .iter()
                .filter(|p| !overlay.contains(&p.name))
                .cloned(),
        );
        Case { properties }
    }

    /// Sorted name -> value view, the shape written as JSON.
    pub fn to_map(&self) -> BTreeMap<&str, &str> {
        self.properties
            .iter()
            .map(|p| (p.name.as_str(), p.value.as_str()))
            .collect()
    }

    /// Values only, ordered by property name.
    pub fn to_grid(&self, separator: &str) -> String {
        self.to_map()
            .into_values()
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl PartialEq for Case {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint() == other.fingerprint()
    }
}

impl Eq for Case {}

impl Hash for Case {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint().hash(state);
    }
}

impl fmt::Display for Case {
    /// Renders `p:name(value)` per property, ordered by name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .to_map()
            .into_iter()
            .map(|(name, value)| format!("p:{}({})", name, value))
            .collect();
        write!(f, "{}", rendered.join(" "))
    }
}

impl Serialize for Case {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}
