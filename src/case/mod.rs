//! Generated cases.
//!
//! A case maps property names to one selected value each. Every property also
//! records how it was reached (indices, correlation path, origin path) so the
//! expander can enforce correlations across imports.

mod correlation;
mod model;


// Re-export public API
pub use correlation::{CorrelationPath, CorrelationSegment};
pub use model::{Case, CaseProperty};
