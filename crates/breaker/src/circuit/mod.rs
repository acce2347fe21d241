//! Circuit breaker for calls into unreliable dependencies
//!
//! A breaker counts failures of the work it wraps. Once failures cross the
//! configured threshold it opens and rejects calls without running them.
//! After the open timeout the next call is let through as a probe; enough
//! successful probes close the circuit again, a failed one re-opens it.
//!
//! ## Architecture
//!
//! - [`types`] - Core types (CircuitState, CircuitBreakerStats)
//! - [`config`] - Thresholds and timeouts
//! - [`error`] - The rejection error
//! - [`history`] - Bounded transition log
//! - `metrics` - Counters and timestamps behind the breaker's lock
//! - `transitions` - Admission and state transition rules
//! - [`state`] - The `CircuitBreaker` itself
//!
//! ## Examples
//!
//! ```rust
//! use tripwire_breaker::circuit::{CircuitBreaker, CircuitBreakerConfig};
//! use tripwire_core::{Error, Result};
//!
//! let cb = CircuitBreaker::named("classifier", CircuitBreakerConfig::default());
//!
//! let score: Result<u32> = cb.execute_with_result(|| {
//!     // Call the dependency here
//!     Ok(42)
//! });
//! assert_eq!(score.unwrap(), 42);
//!
//! let failed: Result<()> = cb.execute(|| Err(Error::dependency("classifier", "timeout")));
//! assert!(failed.is_err());
//! ```

pub mod config;
pub mod error;
pub mod history;
pub(crate) mod metrics;
pub mod state;
pub(crate) mod transitions;
pub mod types;

// Re-export public API
pub use config::CircuitBreakerConfig;
pub use error::CircuitOpenError;
pub use history::{StateChangeRecord, HISTORY_CAPACITY};
pub use state::CircuitBreaker;
pub use types::{CircuitBreakerStats, CircuitState};
