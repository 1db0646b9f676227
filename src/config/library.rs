//! Name-based config lookup for import resolution.

use super::model::Config;
use crate::error::{ExpansionError, Result};
use serde::Serialize;
use std::collections::HashSet;
use tracing::trace;

/// The set of configs that import properties may reference by name.
///
/// Names are expected to be unique, but duplicates are only reported when a
/// duplicated name is actually looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigLibrary {
    configs: Vec<Config>,
}

impl ConfigLibrary {
    /// Create a library from configs.
    pub fn new(configs: impl IntoIterator<Item = Config>) -> Self {
        Self {
            configs: configs.into_iter().collect(),
        }
    }

    /// Add a config to the library.
    pub fn push(&mut self, config: Config) {
        self.configs.push(config);
    }

    pub fn configs(&self) -> &[Config] {
        &self.configs
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Config names in library order (duplicates included).
    pub fn names(&self) -> Vec<&str> {
        self.configs.iter().map(|c| c.name.as_str()).collect()
    }

    /// First config with the given name, if any.
    pub fn get(&self, name: &str) -> Option<&Config> {
        self.configs.iter().find(|c| c.name == name)
    }

    /// Look up exactly one config by name.
    ///
    /// # Arguments
    ///
    /// * `name` - The config name to resolve
    /// * `referenced_by` - Name of the config holding the import (for the error message)
    ///
    /// # Returns
    ///
    /// * `Ok(&Config)` - The single config with this name
    /// * `Err(ExpansionError::Resolution)` - No config has this name
    /// * `Err(ExpansionError::AmbiguousReference)` - More than one config has this name
    pub fn resolve(&self, name: &str, referenced_by: &str) -> Result<&Config> {
        let mut matches = self.configs.iter().filter(|c| c.name == name);
        let first = matches.next().ok_or_else(|| ExpansionError::Resolution {
            config: name.to_string(),
            referenced_by: referenced_by.to_string(),
        })?;

        let others = matches.count();
        if others > 0 {
            return Err(ExpansionError::AmbiguousReference {
                config: name.to_string(),
                count: others + 1,
            });
        }

        Ok(first)
    }

    /// Configs transitively imported by `config`, each once, in import order.
    ///
    /// Every import reference is resolved, so lookup errors surface here before
    /// any tree is built. Import cycles terminate (a config is visited once);
    /// the tree builder is what reports them.
    pub fn reachable_from(&self, config: &Config) -> Result<Vec<&Config>> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();
        self.collect_imports(config, &mut found, &mut seen)?;
        Ok(found)
    }

    fn collect_imports<'a>(
        &'a self,
        config: &Config,
        found: &mut Vec<&'a Config>,
        seen: &mut HashSet<&'a str>,
    ) -> Result<()> {
        for property in config.imports() {
            for name in &property.values {
                let imported = self.resolve(name, &config.name)?;
                if !seen.insert(imported.name.as_str()) {
                    continue;
                }
                trace!(config = %config.name, import = %imported.name, "resolved import");
                found.push(imported);
                self.collect_imports(imported, found, seen)?;
            }
        }
        Ok(())
    }
}

impl FromIterator<Config> for ConfigLibrary {
    fn from_iter<I: IntoIterator<Item = Config>>(iter: I) -> Self {
        Self::new(iter)
    }
}
