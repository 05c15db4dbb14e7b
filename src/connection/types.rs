//! Connection status types

use serde::{Deserialize, Serialize};

/// Result of a connection check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Mutable part of a connection
#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    /// Whether the last probe succeeded
    pub is_connected: bool,
    /// Outcome of the last probe, if one has run
    pub last_probe: Option<CheckResult>,
}
