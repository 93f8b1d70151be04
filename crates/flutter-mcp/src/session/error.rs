//! Session error types

use thiserror::Error;

/// Errors that can occur managing the debug-service session
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session is currently established
    #[error("Not connected. Use flutter_connect first.")]
    NotConnected,

    /// The underlying VM service operation failed
    #[error("VM service error: {0}")]
    Vm(#[from] crate::vm::VmError),
}
