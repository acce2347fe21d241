//! State transition logic for circuit breaker.
//!
//! Every method here expects the caller to hold the breaker's write lock for
//! the whole call, so each admission decision and the transition it may
//! trigger happen as one step.

use super::config::CircuitBreakerConfig;
use super::metrics::MetricsState;
use super::types::CircuitState;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Ticket handed out by [`StateTransitions::allow_request`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Generation the call was admitted in
    pub generation: u64,
    /// Whether the call holds one of the half-open probe slots
    pub probe: bool,
}

/// Handles state transitions for circuit breaker
#[derive(Debug)]
pub struct StateTransitions {
    config: CircuitBreakerConfig,
    name: String,
}

impl StateTransitions {
    /// Create new state transitions handler
    pub fn new(config: CircuitBreakerConfig, name: impl Into<String>) -> Self {
        Self {
            config,
            name: name.into(),
        }
    }

    /// Decide whether a call may run, moving Open to HalfOpen once the
    /// open timeout has elapsed.
    pub fn allow_request(&self, metrics: &mut MetricsState, now: Instant) -> Option<Admission> {
        match metrics.state {
            CircuitState::Closed => Some(Admission {
                generation: metrics.generation,
                probe: false,
            }),
            CircuitState::Open => {
                if now.saturating_duration_since(metrics.state_change) < self.config.timeout {
                    return None;
                }
                self.transition_to_half_open(metrics, now);
                self.admit_probe(metrics)
            }
            CircuitState::HalfOpen => self.admit_probe(metrics),
        }
    }

    fn admit_probe(&self, metrics: &mut MetricsState) -> Option<Admission> {
        if metrics.half_open_count >= self.config.max_requests {
            return None;
        }
        metrics.half_open_count += 1;
        Some(Admission {
            generation: metrics.generation,
            probe: true,
        })
    }

    /// Record a successful call and handle state transitions
    pub fn record_success(&self, metrics: &mut MetricsState, admission: Admission, now: Instant) {
        metrics.failure_count = 0;

        // Admitted before the last transition; its outcome says nothing
        // about the current window.
        if admission.generation != metrics.generation {
            return;
        }

        match metrics.state {
            CircuitState::Closed => {
                // Forget a streak older than the reset window
                let expired = metrics.last_failure.is_some_and(|last| {
                    now.saturating_duration_since(last) >= self.config.reset_timeout
                });
                if expired {
                    metrics.failure_count = 0;
                }
            }
            CircuitState::HalfOpen => {
                metrics.success_count += 1;
                metrics.half_open_count = metrics.half_open_count.saturating_sub(1);
                if metrics.success_count >= self.config.success_threshold {
                    let reason = format!(
                        "success threshold reached ({}/{})",
                        metrics.success_count, self.config.success_threshold
                    );
                    self.transition_to_closed(metrics, now, reason);
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Record a failed call and handle state transitions
    pub fn record_failure(&self, metrics: &mut MetricsState, admission: Admission, now: Instant) {
        metrics.failure_count = metrics.failure_count.saturating_add(1);
        metrics.last_failure = Some(now);

        // A Closed breaker trips on its count whichever generation admitted
        // the call; elsewhere an earlier generation's failure changes nothing
        if metrics.state != CircuitState::Closed && admission.generation != metrics.generation {
            debug!(
                breaker = %self.name,
                state = %metrics.state,
                failures = metrics.failure_count,
                "Failure from an earlier circuit generation"
            );
            return;
        }

        match metrics.state {
            CircuitState::Closed => {
                if metrics.failure_count >= self.config.failure_threshold {
                    let reason = format!(
                        "failure threshold reached ({}/{})",
                        metrics.failure_count, self.config.failure_threshold
                    );
                    self.transition_to_open(metrics, now, reason);
                }
            }
            CircuitState::HalfOpen => {
                // Any failure in half-open state reopens the circuit
                self.transition_to_open(metrics, now, "probe failed while half-open".into());
            }
            CircuitState::Open => {}
        }
    }

    /// Give back a probe slot whose call never reported a result
    pub fn release(&self, metrics: &mut MetricsState, admission: Admission) {
        if admission.probe
            && admission.generation == metrics.generation
            && metrics.state == CircuitState::HalfOpen
        {
            metrics.half_open_count = metrics.half_open_count.saturating_sub(1);
        }
    }

    /// Force the circuit closed with every counter cleared
    pub fn reset(&self, metrics: &mut MetricsState, now: Instant) {
        let from = metrics.state;
        metrics.reset_counters();
        metrics.enter(CircuitState::Closed, now, "manual reset".into());
        info!(breaker = %self.name, %from, "Circuit breaker reset");
    }

    /// Transition to open state
    fn transition_to_open(&self, metrics: &mut MetricsState, now: Instant, reason: String) {
        let from = metrics.state;
        warn!(
            breaker = %self.name,
            %from,
            failures = metrics.failure_count,
            %reason,
            "Circuit breaker opening"
        );
        metrics.success_count = 0;
        metrics.half_open_count = 0;
        metrics.enter(CircuitState::Open, now, reason);
    }

    /// Transition to half-open state
    fn transition_to_half_open(&self, metrics: &mut MetricsState, now: Instant) {
        let reason = format!("open timeout of {:?} elapsed", self.config.timeout);
        info!(breaker = %self.name, %reason, "Circuit breaker entering half-open state");
        metrics.success_count = 0;
        metrics.half_open_count = 0;
        metrics.enter(CircuitState::HalfOpen, now, reason);
    }

    /// Transition to closed state
    fn transition_to_closed(&self, metrics: &mut MetricsState, now: Instant, reason: String) {
        info!(breaker = %self.name, %reason, "Circuit breaker closing");
        metrics.reset_counters();
        metrics.enter(CircuitState::Closed, now, reason);
    }
}
