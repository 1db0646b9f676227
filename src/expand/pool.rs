//! Pool properties: round-robin assignment instead of cartesian expansion.
//!
//! Before the tree is built every pool property is swapped for a one-value
//! placeholder, so it never multiplies the case count. After expansion each
//! case that carries the placeholder gets the next pool value.

use crate::case::{Case, CaseProperty};
use crate::config::{Config, ConfigProperty, ExpansionKind};
use crate::error::{ExpansionError, Result};
use std::collections::HashMap;

/// Prefix of the correlation keys generated for pools declared without one.
pub const POOL_KEY_PREFIX: &str = "pool:";

/// A pool property lifted out of its config, with its full value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolProperty {
    pub name: String,
    pub values: Vec<String>,
    /// Declared key, or a generated `pool:<config>/<property>#<position>`.
    pub correlation_key: String,
    /// Config the pool was declared in.
    pub config: String,
    /// Position of the pool among that config's properties.
    pub index: usize,
}

/// Replace the pool properties of `config` with placeholders.
///
/// Placeholders keep the pool's position in the config, carry its first
/// value and its correlation key, and are marked as pool expansion.
///
/// # Returns
///
/// * `Ok((Config, Vec<PoolProperty>))` - The rewritten config and the lifted pools
/// * `Err(ExpansionError::Structural)` - A pool has no values or is an import
pub fn split_pools(config: &Config) -> Result<(Config, Vec<PoolProperty>)> {
    let mut pools = Vec::new();
    let mut properties = Vec::with_capacity(config.properties.len());

    for (index, property) in config.properties.iter().enumerate() {
        if !property.is_pool() {
            properties.push(property.clone());
            continue;
        }

        if property.is_import() {
            return Err(ExpansionError::structural(
                &config.name,
                format!("pool property '{}' cannot import configs", property.name),
            ));
        }
        let Some(first) = property.values.first() else {
            return Err(ExpansionError::structural(
                &config.name,
                format!("pool property '{}' must have at least one value", property.name),
            ));
        };

        let key = property
            .correlation_key
            .clone()
            .unwrap_or_else(|| format!("{}{}/{}#{}", POOL_KEY_PREFIX, config.name, property.name, index));

        let mut placeholder = ConfigProperty::literal(&property.name, [first.clone()]);
        placeholder.correlation_key = Some(key.clone());
        placeholder.expansion = ExpansionKind::Pool;
        properties.push(placeholder);

        pools.push(PoolProperty {
            name: property.name.clone(),
            values: property.values.clone(),
            correlation_key: key,
            config: config.name.clone(),
            index,
        });
    }

    Ok((Config::with_properties(config.name.clone(), properties), pools))
}

/// Assign pool values to expanded cases, cycling through each pool.
///
/// Pools sharing a correlation key advance one counter together and receive
/// the same position in a given case. Pool values beyond the number of cases
/// are never used.
pub fn apply_pools(mut cases: Vec<Case>, pools: &[PoolProperty]) -> Vec<Case> {
    if pools.is_empty() {
        return cases;
    }

    let groups = group_by_key(pools);
    let mut picked: HashMap<&str, usize> = HashMap::new();

    for case in &mut cases {
        for (key, members) in &groups {
            let counter = picked.entry(*key).or_insert(0);
            let mut assigned = false;
            for pool in members {
                assigned |= assign(case, pool, *counter);
            }
            if assigned {
                *counter += 1;
            }
        }
    }

    cases
}

fn group_by_key(pools: &[PoolProperty]) -> Vec<(&str, Vec<&PoolProperty>)> {
    let mut groups: Vec<(&str, Vec<&PoolProperty>)> = Vec::new();
    for pool in pools {
        match groups.iter_mut().find(|(key, _)| *key == pool.correlation_key) {
            Some((_, members)) => members.push(pool),
            None => groups.push((pool.correlation_key.as_str(), vec![pool])),
        }
    }
    groups
}

/// Give `case` the pool value at `pick`, returning whether the case took part.
///
/// Only the placeholder this pool left behind is overwritten, so a pool that
/// was overridden by a later same-named pool on the same key stays overridden.
/// A case that lost the placeholder to a later same-named property is left
/// alone; a case that carries the pool's correlation key but no property of
/// the pool's name receives one.
fn assign(case: &mut Case, pool: &PoolProperty, pick: usize) -> bool {
    if pool.values.is_empty() {
        return false;
    }
    let slot = pick % pool.values.len();
    let value = &pool.values[slot];
    let key = pool.correlation_key.as_str();
    let properties = case.properties_mut();

    if let Some(placeholder) = properties
        .iter_mut()
        .find(|p| is_placeholder_of(p, pool))
    {
        placeholder.value = value.clone();
        placeholder.value_index = slot;
        return true;
    }

    let correlated = properties.iter().any(|p| {
        p.correlation_key.as_deref() == Some(key) || p.correlation_path.index_for(key).is_some()
    });
    if !correlated || properties.iter().any(|p| p.name == pool.name) {
        return false;
    }

    let mut injected = CaseProperty::new(&pool.name, value.clone());
    injected.correlation_key = Some(pool.correlation_key.clone());
    injected.expansion = ExpansionKind::Pool;
    injected.property_index = pool.index;
    injected.value_index = slot;
    injected.origin_config_path = vec![pool.config.clone()];
    properties.push(injected);
    true
}

fn is_placeholder_of(property: &CaseProperty, pool: &PoolProperty) -> bool {
    property.is_pool()
        && property.name == pool.name
        && property.property_index == pool.index
        && property.correlation_key.as_deref() == Some(pool.correlation_key.as_str())
        && property.origin_config_path.last() == Some(&pool.config)
}
