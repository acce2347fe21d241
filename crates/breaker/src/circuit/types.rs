//! Core types and enums for circuit breaker functionality.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Circuit breaker states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CircuitState {
    /// Circuit is closed - requests pass through normally
    #[default]
    Closed,
    /// Circuit is open - requests fail immediately
    Open,
    /// Circuit is half-open - limited requests allowed to test recovery
    HalfOpen,
}

impl CircuitState {
    /// Lowercase name used in log fields and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half-open",
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statistics about circuit breaker state
///
/// A copy taken under the breaker's lock, so the counters are always
/// consistent with each other and with `state`.
#[derive(Debug, Clone)]
pub struct CircuitBreakerStats {
    pub name: String,
    pub state: CircuitState,
    pub failure_count: usize,
    pub success_count: usize,
    pub half_open_count: usize,
    pub last_failure: Option<Instant>,
    pub state_change: Instant,
}

impl CircuitBreakerStats {
    /// Time spent in the current state as of now
    pub fn time_in_state(&self) -> Duration {
        self.state_change.elapsed()
    }

    /// Time since the most recent recorded failure, if any
    pub fn since_last_failure(&self) -> Option<Duration> {
        self.last_failure.map(|at| at.elapsed())
    }
}
