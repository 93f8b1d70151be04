//! Tool error types

use thiserror::Error;

use crate::inspector::InspectorError;
use crate::interaction::InteractionError;
use crate::selector::SelectorError;
use crate::session::SessionError;
use crate::vm::VmError;

/// Errors that can occur during tool execution.
///
/// These surface inside a successful MCP envelope with `isError: true`;
/// they are never protocol errors.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Invalid input parameters
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Tool execution failed
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// No debug-service session
    #[error("{0}")]
    NotConnected(String),

    /// No widget matched
    #[error("Widget not found: {0}")]
    WidgetNotFound(String),

    /// The selector did not parse
    #[error("{0}")]
    Selector(String),

    /// Timeout during execution
    #[error("Timeout: {0}")]
    Timeout(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SessionError> for ToolError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotConnected => Self::NotConnected(err.to_string()),
            SessionError::Vm(vm) => vm.into(),
        }
    }
}

impl From<VmError> for ToolError {
    fn from(err: VmError) -> Self {
        match err {
            VmError::NotConnected => Self::NotConnected(err.to_string()),
            VmError::Timeout { .. } => Self::Timeout(err.to_string()),
            other => Self::ExecutionFailed(other.to_string()),
        }
    }
}

impl From<InspectorError> for ToolError {
    fn from(err: InspectorError) -> Self {
        match err {
            InspectorError::WidgetNotFound(id) => Self::WidgetNotFound(id),
            InspectorError::Vm(vm) => vm.into(),
            other => Self::ExecutionFailed(other.to_string()),
        }
    }
}

impl From<InteractionError> for ToolError {
    fn from(err: InteractionError) -> Self {
        match err {
            InteractionError::Vm(vm) => vm.into(),
            other => Self::ExecutionFailed(other.to_string()),
        }
    }
}

impl From<SelectorError> for ToolError {
    fn from(err: SelectorError) -> Self {
        Self::Selector(err.to_string())
    }
}
