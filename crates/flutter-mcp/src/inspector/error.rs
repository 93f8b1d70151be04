//! Inspector error types

use thiserror::Error;

/// Errors that can occur while capturing or reading widget trees
#[derive(Debug, Error)]
pub enum InspectorError {
    /// The VM service call failed
    #[error("VM service error: {0}")]
    Vm(#[from] crate::vm::VmError),

    /// The inspector extension returned something unexpected
    #[error("Malformed inspector payload: {0}")]
    Malformed(String),

    /// No widget with the requested id
    #[error("Widget not found: {0}")]
    WidgetNotFound(String),
}
