//! Caseforge: combinatorial test-case generation from composable configs.
//!
//! A [`Config`](config::Config) is a named list of properties, each with one or
//! more candidate values. Properties may import other configs from a
//! [`ConfigLibrary`](config::ConfigLibrary), forming a graph of reusable setup
//! fragments. Expanding a config produces every combination of its values as a
//! [`Case`](case::Case), with three refinements:
//!
//! - correlated properties (sharing a correlation key) only combine values of equal index
//! - later imports and top-level properties override same-named earlier ones
//! - pool properties hand out values round-robin instead of multiplying cases
//!
//! The engine is a pure function of its inputs: it performs no I/O, and
//! independent expansions may run on separate threads.

pub mod case;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod expand;
pub mod tree;

pub use case::Case;
pub use config::{Config, ConfigLibrary, ConfigProperty};
pub use error::{ExpansionError, Result};
pub use expand::expand;
