//! Node types of the expansion tree.
//!
//! The tree alternates between value nodes and property nodes. The root is a
//! value node standing for the top config; an import value is a reference node
//! whose children are the imported config's property nodes.

use crate::config::ExpansionKind;

/// Whether a value node is a terminal value or stands in for an imported config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Literal,
    Reference,
}

/// A property of a config: one child value node per candidate value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyNode {
    pub name: String,
    pub correlation_key: Option<String>,
    pub expansion: ExpansionKind,
    /// Position among the owning config's properties.
    pub index: usize,
    pub values: Vec<ValueNode>,
}

impl PropertyNode {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            correlation_key: None,
            expansion: ExpansionKind::Expansive,
            index,
            values: Vec::new(),
        }
    }

    pub fn with_correlation(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        for value in &mut self.values {
            value.correlation_key = Some(key.clone());
        }
        self.correlation_key = Some(key);
        self
    }

    pub fn with_expansion(mut self, expansion: ExpansionKind) -> Self {
        self.expansion = expansion;
        self
    }

    /// Append a terminal value; its index is its position among the values.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        let node = ValueNode::leaf(value, self.values.len());
        self.push(node);
        self
    }

    /// Append a value node, inheriting this property's correlation key.
    pub fn push(&mut self, mut value: ValueNode) {
        value.correlation_key = self.correlation_key.clone();
        self.values.push(value);
    }

    /// Upper bound of the cases this property contributes: the sum over its values.
    pub fn case_count_upper_bound(&self) -> u64 {
        self.values
            .iter()
            .map(ValueNode::case_count_upper_bound)
            .fold(0u64, u64::saturating_add)
    }

    /// `(name:v1 OR name:v2 OR (...))`; an imported config with several
    /// properties is parenthesised as one alternative.
    pub fn expression(&self) -> String {
        let alternatives: Vec<String> = self
            .values
            .iter()
            .map(|value| match value.kind {
                ValueKind::Literal => format!("{}:{}", self.name, value.value),
                ValueKind::Reference if value.properties.len() > 1 => {
                    format!("({})", value.expression())
                }
                ValueKind::Reference => value.expression(),
            })
            .collect();
        format!("({})", alternatives.join(" OR "))
    }
}

/// A candidate value, or a reference standing in for an imported config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueNode {
    /// The literal value, or the name of the referenced config.
    pub value: String,
    /// Position among the owning property's values.
    pub index: usize,
    /// Inherited from the owning property.
    pub correlation_key: Option<String>,
    pub kind: ValueKind,
    /// Property nodes of the referenced config; empty for literals.
    pub properties: Vec<PropertyNode>,
}

impl ValueNode {
    pub fn leaf(value: impl Into<String>, index: usize) -> Self {
        Self {
            value: value.into(),
            index,
            correlation_key: None,
            kind: ValueKind::Literal,
            properties: Vec::new(),
        }
    }

    pub fn reference(config: impl Into<String>, index: usize, properties: Vec<PropertyNode>) -> Self {
        Self {
            value: config.into(),
            index,
            correlation_key: None,
            kind: ValueKind::Reference,
            properties,
        }
    }

    /// Root node for a top-level config.
    pub fn root(config: impl Into<String>, properties: Vec<PropertyNode>) -> Self {
        Self::reference(config, 0, properties)
    }

    pub fn with_property(mut self, property: PropertyNode) -> Self {
        self.properties.push(property);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == ValueKind::Literal
    }

    /// Upper bound of the cases this node produces: 1 for a literal, the
    /// product over its properties for a reference.
    ///
    /// Exact when no correlations, overrides or duplicate cases prune the result.
    pub fn case_count_upper_bound(&self) -> u64 {
        match self.kind {
            ValueKind::Literal => 1,
            ValueKind::Reference => self
                .properties
                .iter()
                .map(PropertyNode::case_count_upper_bound)
                .fold(1u64, u64::saturating_mul),
        }
    }

    /// The tree as a boolean expression, `(a:1 OR a:2) AND (b:1)`.
    pub fn expression(&self) -> String {
        match self.kind {
            ValueKind::Literal => self.value.clone(),
            ValueKind::Reference => self
                .properties
                .iter()
                .map(PropertyNode::expression)
                .collect::<Vec<_>>()
                .join(" AND "),
        }
    }
}
