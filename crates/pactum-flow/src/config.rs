//! Flow timeouts.
//!
//! Defaults can be overridden through the environment:
//!
//! - `PACTUM_COUNTERPARTY_TIMEOUT_MS` (default: 30000): how long the
//!   initiator waits for each counterparty round-trip before abandoning the
//!   transition.
//! - `PACTUM_NOTIFY_TIMEOUT_MS` (default: 5000): how long delivery of the
//!   post-commit finality notice may take before it is given up on.

use std::time::Duration;

use thiserror::Error;

pub const COUNTERPARTY_TIMEOUT_VAR: &str = "PACTUM_COUNTERPARTY_TIMEOUT_MS";
pub const NOTIFY_TIMEOUT_VAR: &str = "PACTUM_NOTIFY_TIMEOUT_MS";

/// Timeouts applied by the initiator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowConfig {
    pub counterparty_timeout: Duration,
    pub notify_timeout: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            counterparty_timeout: Duration::from_secs(30),
            notify_timeout: Duration::from_secs(5),
        }
    }
}

impl FlowConfig {
    /// Defaults overridden by any variables present in the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            counterparty_timeout: millis(&lookup, COUNTERPARTY_TIMEOUT_VAR)?
                .unwrap_or(defaults.counterparty_timeout),
            notify_timeout: millis(&lookup, NOTIFY_TIMEOUT_VAR)?.unwrap_or(defaults.notify_timeout),
        })
    }

    pub fn with_counterparty_timeout(mut self, timeout: Duration) -> Self {
        self.counterparty_timeout = timeout;
        self
    }
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            var,
            value: raw,
            reason: "must be greater than 0".into(),
        }),
        Ok(ms) => Ok(Some(Duration::from_millis(ms))),
        Err(e) => Err(ConfigError::InvalidValue {
            var,
            value: raw,
            reason: e.to_string(),
        }),
    }
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("node identity key {identity} does not match its signing key {signer}")]
    KeyMismatch { identity: String, signer: String },
}
