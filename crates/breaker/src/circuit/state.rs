//! Circuit breaker state management and execution logic.

use super::config::CircuitBreakerConfig;
use super::error::CircuitOpenError;
use super::history::StateChangeRecord;
use super::metrics::MetricsState;
use super::transitions::{Admission, StateTransitions};
use super::types::{CircuitBreakerStats, CircuitState};
use parking_lot::RwLock;
use std::future::Future;
use std::time::Instant;
use tracing::debug;
use tripwire_core::Result;

/// Circuit breaker implementation
///
/// One instance guards one dependency and is shared by every caller of that
/// dependency, typically behind an `Arc`. All state lives behind a single
/// lock: admission decisions and result classification take it exclusively,
/// the introspection methods take it shared. The lock is never held while the
/// wrapped work runs.
///
/// There is no background timer. An open circuit moves to half-open only
/// when a call arrives after the open timeout has elapsed.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    metrics: RwLock<MetricsState>,
    transitions: StateTransitions,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self::named("", config)
    }

    /// Create a circuit breaker whose name shows up in logs and errors
    pub fn named(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        let name = name.into();
        let config = config.normalized();
        let transitions = StateTransitions::new(config.clone(), name.clone());

        Self {
            name,
            config,
            metrics: RwLock::new(MetricsState::new(Instant::now())),
            transitions,
        }
    }

    /// Create a circuit breaker, rejecting configurations with zero thresholds
    pub fn try_new(name: impl Into<String>, config: CircuitBreakerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::named(name, config))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Run `work` if the circuit admits it, passing its error through unchanged
    pub fn execute<F, E>(&self, work: F) -> std::result::Result<(), E>
    where
        F: FnOnce() -> std::result::Result<(), E>,
        E: From<CircuitOpenError>,
    {
        self.execute_with_result(work)
    }

    /// Run `work` if the circuit admits it and return its value or error as is
    ///
    /// A rejected call returns the [`CircuitOpenError`] converted into `E`
    /// without invoking `work`.
    pub fn execute_with_result<F, T, E>(&self, work: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: From<CircuitOpenError>,
    {
        let permit = self.acquire()?;
        let result = work();
        permit.complete(result.is_ok());
        result
    }

    /// Execute an async operation through the circuit breaker
    ///
    /// If the returned future is dropped before the operation finishes, its
    /// probe slot (if any) is released without counting a result.
    pub async fn call<F, Fut, T, E>(&self, operation: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: From<CircuitOpenError>,
    {
        let permit = self.acquire()?;
        let result = operation().await;
        permit.complete(result.is_ok());
        result
    }

    /// Get the current state of the circuit
    pub fn state(&self) -> CircuitState {
        self.metrics.read().state
    }

    /// Force the circuit closed and clear every counter
    pub fn reset(&self) {
        let mut metrics = self.metrics.write();
        self.transitions.reset(&mut metrics, Instant::now());
    }

    /// Get current circuit breaker statistics
    pub fn stats(&self) -> CircuitBreakerStats {
        self.metrics.read().stats(&self.name)
    }

    /// Recorded transitions, oldest first
    pub fn state_history(&self) -> Vec<StateChangeRecord> {
        self.metrics.read().history.snapshot()
    }

    fn acquire(&self) -> std::result::Result<Permit<'_>, CircuitOpenError> {
        let mut metrics = self.metrics.write();
        match self.transitions.allow_request(&mut metrics, Instant::now()) {
            Some(admission) => Ok(Permit {
                breaker: self,
                admission,
                settled: false,
            }),
            None => {
                debug!(breaker = %self.name, state = %metrics.state, "Call rejected");
                Err(CircuitOpenError {
                    name: self.name.clone(),
                    state: metrics.state,
                })
            }
        }
    }
}

/// An admitted call that has not reported its outcome yet
struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    admission: Admission,
    settled: bool,
}

impl Permit<'_> {
    fn complete(mut self, success: bool) {
        self.settled = true;
        let mut metrics = self.breaker.metrics.write();
        let transitions = &self.breaker.transitions;
        if success {
            transitions.record_success(&mut metrics, self.admission, Instant::now());
        } else {
            transitions.record_failure(&mut metrics, self.admission, Instant::now());
        }
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let mut metrics = self.breaker.metrics.write();
            self.breaker.transitions.release(&mut metrics, self.admission);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;
    use tripwire_core::Error;

    fn fast_config() -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failure_threshold: 3,
            success_threshold: 1,
            timeout: Duration::from_millis(50),
            max_requests: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_state_is_closed() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig::default());
        let stats = cb.stats();

        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(stats.failure_count, 0);
        assert_eq!(stats.success_count, 0);
        assert_eq!(stats.half_open_count, 0);
        assert!(stats.last_failure.is_none());
        assert!(cb.state_history().is_empty());
    }

    #[test]
    fn test_circuit_breaker_opens_on_failures() {
        let cb = CircuitBreaker::new(fast_config());
        let calls = Cell::new(0);

        for _ in 0..3 {
            let _ = cb.execute(|| {
                calls.set(calls.get() + 1);
                Err(Error::dependency("test", "fail"))
            });
        }
        assert_eq!(cb.state(), CircuitState::Open);

        let result = cb.execute(|| {
            calls.set(calls.get() + 1);
            Ok::<(), Error>(())
        });
        assert!(result.unwrap_err().is_circuit_open());
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_work_error_passes_through_unchanged() {
        let cb = CircuitBreaker::new(fast_config());

        let err = cb
            .execute(|| Err(Error::dependency("classifier", "boom")))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Dependency { ref dependency, ref message }
                if dependency == "classifier" && message == "boom"
        ));
    }

    #[test]
    fn test_execute_with_result_returns_value() {
        let cb = CircuitBreaker::new(fast_config());

        let value: std::result::Result<Vec<u8>, Error> = cb.execute_with_result(|| Ok(vec![1, 2]));
        assert_eq!(value.unwrap(), vec![1, 2]);
        assert_eq!(cb.stats().failure_count, 0);
    }

    #[test]
    fn test_custom_error_type() {
        #[derive(Debug, PartialEq)]
        enum LookupError {
            Rejected(CircuitState),
            NotFound,
        }

        impl From<CircuitOpenError> for LookupError {
            fn from(err: CircuitOpenError) -> Self {
                LookupError::Rejected(err.state)
            }
        }

        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 1,
            ..fast_config()
        });

        let first: std::result::Result<u32, LookupError> =
            cb.execute_with_result(|| Err(LookupError::NotFound));
        assert_eq!(first, Err(LookupError::NotFound));

        let second: std::result::Result<u32, LookupError> = cb.execute_with_result(|| Ok(7));
        assert_eq!(second, Err(LookupError::Rejected(CircuitState::Open)));
    }

    #[test]
    fn test_named_breaker_error_message() {
        let cb = CircuitBreaker::named(
            "supabase",
            CircuitBreakerConfig {
                failure_threshold: 1,
                ..fast_config()
            },
        );
        let _ = cb.execute(|| Err(Error::dependency("supabase", "down")));

        let err = cb.execute(|| Ok::<(), Error>(())).unwrap_err();
        assert_eq!(err.to_string(), "circuit breaker 'supabase' is open");
        assert_eq!(cb.stats().name, "supabase");
    }

    #[test]
    fn test_try_new_validates() {
        let bad = CircuitBreakerConfig {
            success_threshold: 0,
            ..Default::default()
        };
        assert!(CircuitBreaker::try_new("db", bad).is_err());
        assert!(CircuitBreaker::try_new("db", CircuitBreakerConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_failure_threshold_trips_on_first_failure() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 0,
            ..fast_config()
        });
        let _ = cb.execute(|| Err(Error::dependency("test", "fail")));
        assert_eq!(cb.state(), CircuitState::Open);
    }

    #[test]
    fn test_panicking_probe_releases_slot() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 1,
            timeout: Duration::ZERO,
            ..fast_config()
        });
        let _ = cb.execute(|| Err(Error::dependency("test", "fail")));

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = cb.execute(|| -> std::result::Result<(), Error> { panic!("probe panicked") });
        }));
        assert!(outcome.is_err());
        assert_eq!(cb.state(), CircuitState::HalfOpen);
        assert_eq!(cb.stats().half_open_count, 0);

        assert!(cb.execute(|| Ok::<(), Error>(())).is_ok());
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[test]
    fn test_reset_forces_closed() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 1,
            ..fast_config()
        });
        let _ = cb.execute(|| Err(Error::dependency("test", "fail")));
        assert_eq!(cb.state(), CircuitState::Open);

        cb.reset();

        let stats = cb.stats();
        assert_eq!(stats.state, CircuitState::Closed);
        assert_eq!(stats.failure_count, 0);
        assert_eq!(stats.success_count, 0);
        assert_eq!(stats.half_open_count, 0);
        assert!(cb.execute(|| Ok::<(), Error>(())).is_ok());
    }
}
