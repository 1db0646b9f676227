//! Expansion tree.
//!
//! Built fresh for every expansion from a config plus the library its imports
//! resolve against, then walked by the expander and discarded.

mod builder;
mod node;


// Re-export public API
pub use builder::{TreeBuilder, build_tree};
pub use node::{PropertyNode, ValueKind, ValueNode};
