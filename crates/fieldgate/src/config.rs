use fieldgate_core::{
    error::{Error, ErrorClass, ErrorOrigin},
    serialize::MAX_DOCUMENT_BYTES,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("invalid config value for '{field}': {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    #[error("config parse error: {0}")]
    Parse(String),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ServiceConfig
///
/// Runtime knobs for the service layer. Every key is optional in the JSON
/// form; missing keys take the defaults below.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Budget for a single store call, in milliseconds.
    pub store_timeout_ms: u64,
    /// Extra fetch attempts after a transient failure. Upserts never retry.
    pub fetch_retries: u32,
    /// Largest encoded document the store accepts.
    pub max_document_bytes: usize,
}

impl ServiceConfig {
    pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
    pub const DEFAULT_FETCH_RETRIES: u32 = 2;

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.store_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "store_timeout_ms",
                reason: "must be positive",
            });
        }
        if self.max_document_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_document_bytes",
                reason: "must be positive",
            });
        }

        Ok(())
    }

    #[must_use]
    pub const fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Total fetch attempts, the first one included.
    #[must_use]
    pub const fn fetch_attempts(&self) -> u32 {
        self.fetch_retries.saturating_add(1)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: Self::DEFAULT_STORE_TIMEOUT_MS,
            fetch_retries: Self::DEFAULT_FETCH_RETRIES,
            max_document_bytes: MAX_DOCUMENT_BYTES,
        }
    }
}

///
/// TESTS
///
