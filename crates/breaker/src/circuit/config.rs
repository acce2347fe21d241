//! Configuration for circuit breaker behavior.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tripwire_core::{Error, Result};

/// Default number of failures before the circuit opens
const DEFAULT_FAILURE_THRESHOLD: usize = 5;

/// Default number of half-open successes needed to close the circuit
const DEFAULT_SUCCESS_THRESHOLD: usize = 2;

/// Default time the circuit stays open before a probe is allowed (30s)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of probes admitted at once while half-open
const DEFAULT_MAX_REQUESTS: usize = 1;

/// Default quiet period after which the closed failure count is cleared (60s)
const DEFAULT_RESET_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for circuit breaker behavior
///
/// Durations are serialized as whole milliseconds under `timeout_ms` and
/// `reset_timeout_ms`. Missing fields fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Number of failures while closed before opening the circuit
    pub failure_threshold: usize,
    /// Consecutive half-open successes required to close the circuit
    pub success_threshold: usize,
    /// Minimum time spent open before a probe is admitted
    #[serde(rename = "timeout_ms", with = "duration_ms")]
    pub timeout: Duration,
    /// Maximum number of probes in flight while half-open
    pub max_requests: usize,
    /// Time since the last failure after which the failure count is cleared
    #[serde(rename = "reset_timeout_ms", with = "duration_ms")]
    pub reset_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            success_threshold: DEFAULT_SUCCESS_THRESHOLD,
            timeout: DEFAULT_TIMEOUT,
            max_requests: DEFAULT_MAX_REQUESTS,
            reset_timeout: DEFAULT_RESET_TIMEOUT,
        }
    }
}

impl CircuitBreakerConfig {
    /// Create a circuit breaker config for database and repository adapters
    pub fn for_database() -> Self {
        Self {
            failure_threshold: 3,
            success_threshold: 2,
            timeout: Duration::from_secs(15),
            max_requests: 1,
            reset_timeout: Duration::from_secs(30),
        }
    }

    /// Create a circuit breaker config for third-party HTTP APIs
    pub fn for_external_api() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 3,
            timeout: Duration::from_secs(60),
            max_requests: 2,
            reset_timeout: Duration::from_secs(120),
        }
    }

    /// Parse a JSON document and validate the result
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every threshold can actually be reached
    pub fn validate(&self) -> Result<()> {
        if self.failure_threshold == 0 {
            return Err(Error::configuration(
                "failure_threshold must be at least 1",
            ));
        }
        if self.success_threshold == 0 {
            return Err(Error::configuration(
                "success_threshold must be at least 1",
            ));
        }
        if self.max_requests == 0 {
            return Err(Error::configuration("max_requests must be at least 1"));
        }
        Ok(())
    }

    /// Copy of this config that can never wedge the half-open state.
    ///
    /// A zero `max_requests` would admit no probe at all, leaving the
    /// circuit half-open forever, so it is raised to one.
    pub(crate) fn normalized(&self) -> Self {
        Self {
            max_requests: self.max_requests.max(1),
            ..self.clone()
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
