//! Widget tree inspection
//!
//! Snapshot data model of the target's UI hierarchy plus the capture logic
//! that materializes it from the inspector service extensions. A captured
//! tree is immutable and has no live link back to the target.

mod capture;
mod error;
mod node;
mod tree;

#[cfg(test)]
mod tests;

pub use capture::Inspector;
pub use error::InspectorError;
pub use node::{WidgetBounds, WidgetNode};
pub use tree::WidgetTree;

/// Result type for inspector operations
pub type Result<T> = std::result::Result<T, InspectorError>;
