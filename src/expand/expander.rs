//! Tree-to-case expansion.
//!
//! Property nodes union the cases of their values (one value per case); value
//! nodes standing for a config take the cartesian merge of their properties'
//! cases, dropping pairings that break a correlation. Both steps deduplicate.

use crate::case::{Case, CaseProperty, CorrelationPath};
use crate::error::{ExpansionError, Result};
use crate::tree::{PropertyNode, ValueKind, ValueNode};
use std::collections::HashSet;

/// What has been walked on the way down to the current node.
#[derive(Debug, Clone, Default)]
struct Trail {
    origin_path: String,
    config_path: Vec<String>,
    correlation: CorrelationPath,
}

impl Trail {
    fn enter_config(&self, config: &str) -> Self {
        let mut config_path = self.config_path.clone();
        config_path.push(config.to_string());
        Self {
            origin_path: format!("{}:{}", self.origin_path, config),
            config_path,
            correlation: self.correlation.clone(),
        }
    }

    fn enter_property(&self, property: &str) -> Self {
        Self {
            origin_path: format!("{}/{}", self.origin_path, property),
            config_path: self.config_path.clone(),
            correlation: self.correlation.clone(),
        }
    }

    fn choose(&self, property: &PropertyNode, value: &ValueNode) -> Self {
        match &property.correlation_key {
            Some(key) => Self {
                correlation: self.correlation.child(key, value.index),
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    fn current_config(&self) -> &str {
        self.config_path.last().map(String::as_str).unwrap_or("<tree>")
    }
}

/// Expand a tree into its deduplicated cases.
///
/// Cases without any property (a config with no properties) are dropped.
/// Intermediate steps keep cases that differ only in their correlation paths;
/// the returned cases are unique by fingerprint.
///
/// # Returns
///
/// * `Ok(Vec<Case>)` - The cases, in expansion order
/// * `Err(ExpansionError::Structural)` - A property node has no values
pub fn expand_tree(root: &ValueNode) -> Result<Vec<Case>> {
    let cases = expand_value(root, None, &Trail::default())?;
    Ok(dedup(cases.into_iter().filter(|case| !case.is_empty()).collect()))
}

fn expand_value(node: &ValueNode, parent: Option<&PropertyNode>, trail: &Trail) -> Result<Vec<Case>> {
    match (node.kind, parent) {
        (ValueKind::Literal, Some(property)) => Ok(vec![leaf_case(property, node, trail)]),
        (ValueKind::Literal, None) => Err(ExpansionError::structural(
            &node.value,
            "the tree root must stand for a config, not a literal value",
        )),
        (ValueKind::Reference, _) => expand_reference(node, trail),
    }
}

fn expand_reference(node: &ValueNode, trail: &Trail) -> Result<Vec<Case>> {
    let trail = trail.enter_config(&node.value);

    // The empty case is the identity of the cartesian merge.
    let mut merged = vec![Case::default()];
    for property in &node.properties {
        let cases = expand_property(property, &trail)?;
        merged = dedup_correlated(merge_case_sets(&merged, &cases));
    }
    Ok(merged)
}

fn expand_property(property: &PropertyNode, trail: &Trail) -> Result<Vec<Case>> {
    if property.values.is_empty() {
        return Err(ExpansionError::structural(
            trail.current_config(),
            format!("property '{}' must have at least one value", property.name),
        ));
    }

    let trail = trail.enter_property(&property.name);
    let mut cases = Vec::new();
    for value in &property.values {
        let chosen = trail.choose(property, value);
        cases.extend(expand_value(value, Some(property), &chosen)?);
    }
    Ok(dedup_correlated(cases))
}

fn leaf_case(property: &PropertyNode, value: &ValueNode, trail: &Trail) -> Case {
    Case::single(CaseProperty {
        name: property.name.clone(),
        value: value.value.clone(),
        correlation_key: property.correlation_key.clone(),
        expansion: property.expansion,
        property_index: property.index,
        value_index: value.index,
        correlation_path: trail.correlation.clone(),
        origin_path: format!("{}:{}", trail.origin_path, value.value),
        origin_config_path: trail.config_path.clone(),
    })
}

/// Cartesian merge: every compatible (base, overlay) pair, overlay winning on
/// shared property names.
pub(crate) fn merge_case_sets(base: &[Case], overlay: &[Case]) -> Vec<Case> {
    let mut merged = Vec::with_capacity(base.len() * overlay.len());
    for base_case in base {
        for overlay_case in overlay {
            if correlation_mismatch(base_case, overlay_case) {
                continue;
            }
            merged.push(base_case.overlay(overlay_case));
        }
    }
    merged
}

/// True when a property of `a` and a property of `b` went through the same
/// correlation key with different value indices. Pool placeholders are
/// assigned after expansion and never constrain it.
pub(crate) fn correlation_mismatch(a: &Case, b: &Case) -> bool {
    a.properties()
        .iter()
        .filter(|p| !p.is_pool() && !p.correlation_path.is_empty())
        .any(|pa| {
            b.properties()
                .iter()
                .filter(|p| !p.is_pool())
                .any(|pb| pa.correlation_path.conflicts_with(&pb.correlation_path))
        })
}

/// Keep the first case of every fingerprint, in order.
pub(crate) fn dedup(cases: Vec<Case>) -> Vec<Case> {
    dedup_by(cases, Case::fingerprint)
}

/// Keep the first case of every fingerprint and correlation path set.
///
/// Two branches of a keyed import can yield the same values under different
/// indices; both must survive until every sibling has been merged.
pub(crate) fn dedup_correlated(cases: Vec<Case>) -> Vec<Case> {
    dedup_by(cases, correlated_fingerprint)
}

fn correlated_fingerprint(case: &Case) -> String {
    let mut parts: Vec<String> = case
        .properties()
        .iter()
        .map(|p| format!("{}{}", p.fingerprint(), p.correlation_path))
        .collect();
    parts.sort();
    parts.join("|")
}

fn dedup_by(cases: Vec<Case>, key: impl Fn(&Case) -> String) -> Vec<Case> {
    let mut seen = HashSet::with_capacity(cases.len());
    cases.into_iter().filter(|case| seen.insert(key(case))).collect()
}
