//! Bridge configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How foreign failures are mapped to [`Error`](crate::Error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Only the generic failure status becomes `OperationFailed`. Every other
    /// failure is passed through as `Platform` with its status untouched.
    #[default]
    Narrow,
    /// Classify every well-known failure status into the taxonomy.
    Classify,
}

impl std::fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorPolicy::Narrow => write!(f, "narrow"),
            ErrorPolicy::Classify => write!(f, "classify"),
        }
    }
}

/// Settings copied into every wrapper at construction and inherited by the
/// child wrappers it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub error_policy: ErrorPolicy,
    /// Upper bound on how long teardown waits for in-flight notifications.
    #[serde(default = "default_drain_timeout_ms")]
    pub drain_timeout_ms: u64,
    #[serde(default = "default_log_unknown")]
    pub log_unknown_discriminants: bool,
}

fn default_drain_timeout_ms() -> u64 {
    5000
}

fn default_log_unknown() -> bool {
    true
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::Narrow,
            drain_timeout_ms: default_drain_timeout_ms(),
            log_unknown_discriminants: default_log_unknown(),
        }
    }
}

impl BridgeConfig {
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_drain_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.drain_timeout_ms = timeout_ms;
        self
    }

    pub fn with_log_unknown_discriminants(mut self, enabled: bool) -> Self {
        self.log_unknown_discriminants = enabled;
        self
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}
