//! Conversion of a config and its library into an expansion tree.

use super::node::{PropertyNode, ValueNode};
use crate::config::{Config, ConfigLibrary, ConfigProperty};
use crate::error::{ExpansionError, Result};
use tracing::trace;

/// Build the expansion tree for `config`, resolving imports in `library`.
///
/// # Returns
///
/// * `Ok(ValueNode)` - Root node standing for `config`
/// * `Err(ExpansionError::Resolution)` - An import names a config missing from the library
/// * `Err(ExpansionError::AmbiguousReference)` - An import names a duplicated config
/// * `Err(ExpansionError::Structural)` - A property has no values, or imports form a cycle
pub fn build_tree(config: &Config, library: &ConfigLibrary) -> Result<ValueNode> {
    TreeBuilder::new(library).build(config)
}

/// Recursive tree construction with the chain of configs currently being imported.
pub struct TreeBuilder<'a> {
    library: &'a ConfigLibrary,
    /// Root first, then every import on the way down to the current config.
    chain: Vec<String>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(library: &'a ConfigLibrary) -> Self {
        Self {
            library,
            chain: Vec::new(),
        }
    }

    pub fn build(mut self, config: &Config) -> Result<ValueNode> {
        self.chain.push(config.name.clone());
        let properties = self.property_nodes(config)?;
        self.chain.pop();
        Ok(ValueNode::root(config.name.clone(), properties))
    }

    fn property_nodes(&mut self, config: &Config) -> Result<Vec<PropertyNode>> {
        config
            .properties
            .iter()
            .enumerate()
            .map(|(index, property)| self.property_node(config, property, index))
            .collect()
    }

    fn property_node(
        &mut self,
        config: &Config,
        property: &ConfigProperty,
        index: usize,
    ) -> Result<PropertyNode> {
        if property.values.is_empty() {
            return Err(ExpansionError::structural(
                &config.name,
                format!("property '{}' must have at least one value", property.name),
            ));
        }

        let mut node = PropertyNode::new(&property.name, index).with_expansion(property.expansion);
        if let Some(key) = &property.correlation_key {
            node = node.with_correlation(key);
        }

        for (value_index, value) in property.values.iter().enumerate() {
            let value_node = if property.is_import() {
                self.reference_node(config, value, value_index)?
            } else {
                ValueNode::leaf(value, value_index)
            };
            node.push(value_node);
        }

        Ok(node)
    }

    fn reference_node(&mut self, config: &Config, name: &str, index: usize) -> Result<ValueNode> {
        let imported = self.library.resolve(name, &config.name)?;

        // The root may share its name with a library config, so only the
        // imported part of the chain counts towards a cycle.
        if self.chain.iter().skip(1).any(|c| c == &imported.name) {
            let mut cycle = self.chain.clone();
            cycle.push(imported.name.clone());
            return Err(ExpansionError::structural(
                &imported.name,
                format!("import cycle detected: {}", cycle.join(" -> ")),
            ));
        }

        trace!(from = %config.name, import = %imported.name, depth = self.chain.len(), "importing config");
        self.chain.push(imported.name.clone());
        let properties = self.property_nodes(imported);
        self.chain.pop();

        Ok(ValueNode::reference(imported.name.clone(), index, properties?))
    }
}
