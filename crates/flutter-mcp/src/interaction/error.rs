//! Interaction error types

use thiserror::Error;

/// Errors that can occur while driving the target UI
#[derive(Debug, Error)]
pub enum InteractionError {
    /// The VM service call failed
    #[error("VM service error: {0}")]
    Vm(#[from] crate::vm::VmError),

    /// The driver extension reported a failure
    #[error("Driver error: {0}")]
    Driver(String),

    /// The pointer-injection handler reported a failure
    #[error("Pointer injection failed: {0}")]
    Injection(String),

    /// The handler's reply could not be interpreted
    #[error("Malformed injection reply: {0}")]
    MalformedReply(String),

    /// The widget has no usable geometry to aim at
    #[error("Widget {0} has no valid bounds")]
    NoGeometry(String),
}
