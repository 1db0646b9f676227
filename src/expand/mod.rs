//! Case expansion: config + library in, deduplicated cases out.
//!
//! The pipeline runs in four steps:
//! 1. resolve every config reachable through imports (lookup errors surface here)
//! 2. lift pool properties out of those configs, leaving placeholders
//! 3. build the expansion tree and expand it
//! 4. hand out pool values round-robin over the resulting cases
//!
//! ```
//! use caseforge::config::{Config, ConfigLibrary};
//! use caseforge::expand::expand;
//!
//! let config = Config::new("HelloWorld")
//!     .property("Name", ["Ali"])
//!     .property("Greeting", ["Hello World", "Bonjour le monde"]);
//!
//! let cases = expand(&config, &ConfigLibrary::default())?;
//! assert_eq!(cases.len(), 2);
//! assert_eq!(cases[1].get("Greeting")?, "Bonjour le monde");
//! # Ok::<(), caseforge::error::ExpansionError>(())
//! ```

mod expander;
mod pool;

#[cfg(test)]
mod tests;

pub use expander::expand_tree;
pub use pool::{POOL_KEY_PREFIX, PoolProperty, apply_pools, split_pools};

use crate::case::Case;
use crate::config::{Config, ConfigLibrary};
use crate::error::Result;
use crate::tree::{ValueNode, build_tree};
use tracing::debug;

/// Expand `config` into its cases, resolving imports in `library`.
///
/// # Returns
///
/// * `Ok(Vec<Case>)` - Deduplicated cases with pool values assigned
/// * `Err(ExpansionError::Resolution)` - An import names a missing config
/// * `Err(ExpansionError::AmbiguousReference)` - An import names a duplicated config
/// * `Err(ExpansionError::Structural)` - Empty property, invalid pool or import cycle
pub fn expand(config: &Config, library: &ConfigLibrary) -> Result<Vec<Case>> {
    ExpansionPlan::prepare(config, library)?.expand()
}

/// A config and the configs it imports, with pools lifted out, ready to expand.
#[derive(Debug, Clone)]
pub struct ExpansionPlan {
    root: Config,
    library: ConfigLibrary,
    pools: Vec<PoolProperty>,
}

impl ExpansionPlan {
    /// Resolve the imports of `config` and split off its pools.
    pub fn prepare(config: &Config, library: &ConfigLibrary) -> Result<Self> {
        let reachable = library.reachable_from(config)?;

        let (root, mut pools) = split_pools(config)?;
        let mut prepared = ConfigLibrary::default();
        for imported in reachable {
            let (processed, imported_pools) = split_pools(imported)?;
            pools.extend(imported_pools);
            prepared.push(processed);
        }

        debug!(
            config = %config.name,
            imports = prepared.len(),
            pools = pools.len(),
            "prepared expansion"
        );

        Ok(Self {
            root,
            library: prepared,
            pools,
        })
    }

    pub fn pools(&self) -> &[PoolProperty] {
        &self.pools
    }

    /// The expansion tree, with pool placeholders in place of pools.
    pub fn tree(&self) -> Result<ValueNode> {
        build_tree(&self.root, &self.library)
    }

    /// Build, expand and assign pools.
    pub fn expand(&self) -> Result<Vec<Case>> {
        let tree = self.tree()?;
        let cases = expand_tree(&tree)?;
        debug!(
            config = %self.root.name,
            upper_bound = tree.case_count_upper_bound(),
            cases = cases.len(),
            "expanded tree"
        );
        Ok(apply_pools(cases, &self.pools))
    }
}
