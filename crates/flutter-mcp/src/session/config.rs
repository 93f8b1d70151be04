//! Session configuration types

use std::time::Duration;

use crate::vm::DEFAULT_TIMEOUT_SECS;

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Per-call timeout applied to VM service requests
    pub call_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
