//! UI interaction
//!
//! Taps, scrolls, long presses, and text entry against a connected target,
//! via the driver service extension and the pointer-injection handler
//! embedded in the target.

mod driver;
mod error;

#[cfg(test)]
mod tests;

pub use driver::{InteractionDriver, wait_for};
pub use error::InteractionError;

/// Result type for interaction operations
pub type Result<T> = std::result::Result<T, InteractionError>;
