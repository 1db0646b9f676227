//! Config model for caseforge.
//!
//! A config is a named, ordered set of properties; a property holds candidate
//! values, or, for import properties, names of other configs in a library.
//! Libraries can be built in code or loaded from YAML documents.

mod library;
mod model;
mod operations;
pub mod types;


// Re-export public API
pub use library::ConfigLibrary;
pub use model::{Config, ConfigProperty, LibraryDocument};
pub use types::{DEFAULT_IMPORT_PATTERN, ExpansionKind, ImportMarker, PropertyKind, Settings};
