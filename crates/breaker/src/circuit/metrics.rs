//! Mutable counters and timestamps behind the circuit breaker's lock.

use super::history::{StateChangeRecord, TransitionLog};
use super::types::{CircuitBreakerStats, CircuitState};
use std::time::Instant;

/// Internal state tracking for a circuit breaker
///
/// Every field is read and written under the single lock owned by
/// [`CircuitBreaker`](super::CircuitBreaker).
#[derive(Debug)]
pub struct MetricsState {
    pub state: CircuitState,
    pub failure_count: usize,
    pub success_count: usize,
    pub half_open_count: usize,
    pub last_failure: Option<Instant>,
    pub state_change: Instant,
    /// Bumped on every transition; results from older generations are stale
    pub generation: u64,
    pub history: TransitionLog,
}

impl MetricsState {
    /// Create new metrics state in the closed state
    pub fn new(now: Instant) -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            success_count: 0,
            half_open_count: 0,
            last_failure: None,
            state_change: now,
            generation: 0,
            history: TransitionLog::default(),
        }
    }

    /// Reset internal counters
    pub fn reset_counters(&mut self) {
        self.failure_count = 0;
        self.success_count = 0;
        self.half_open_count = 0;
    }

    /// Enter `state`, stamping the change and appending it to the history
    pub fn enter(&mut self, state: CircuitState, now: Instant, reason: String) {
        self.state = state;
        self.state_change = now;
        self.generation = self.generation.wrapping_add(1);
        self.history.push(StateChangeRecord::new(state, reason));
    }

    /// Copy out the current statistics
    pub fn stats(&self, name: &str) -> CircuitBreakerStats {
        CircuitBreakerStats {
            name: name.to_string(),
            state: self.state,
            failure_count: self.failure_count,
            success_count: self.success_count,
            half_open_count: self.half_open_count,
            last_failure: self.last_failure,
            state_change: self.state_change,
        }
    }
}

impl Default for MetricsState {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}
