//! Selector error types

use thiserror::Error;

/// Errors that can occur while parsing a selector
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector string is malformed
    #[error("Selector parse error at position {position}: {message}")]
    Parse {
        /// Byte offset into the selector string
        position: usize,
        /// What was expected or found
        message: String,
    },
}

impl SelectorError {
    pub(crate) fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}
