use std::env;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable holding the session idle time in seconds.
pub const SESSION_IDLE_VAR: &str = "SKY_SESSION_IDLE";

/// Cursor settings shared by every path of a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorConfig {
    /// Maximum gap in seconds between two events of the same session.
    /// Sessions are disabled when unset or 0.
    #[serde(default)]
    pub session_idle_secs: Option<u32>,
}

impl CursorConfig {
    /// Reads the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_value(env::var(SESSION_IDLE_VAR).ok())
    }

    fn from_env_value(value: Option<String>) -> Result<Self, ConfigError> {
        let session_idle_secs = match value.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(v) => Some(v.parse::<u32>().map_err(|_| ConfigError::InvalidSessionIdle {
                value: v.to_string(),
            })?),
        };
        Ok(Self { session_idle_secs })
    }
}
