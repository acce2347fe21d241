//! Call-guarding circuit breaker for tripwire
//!
//! Wrap calls to a flaky dependency in a [`CircuitBreaker`] to fail fast
//! while it is unhealthy and probe for recovery once the open timeout has
//! passed. The breaker never retries; compose a retry layer around it if
//! needed.
//!
//! ## Key Components
//!
//! - **`circuit`**: The breaker state machine, its configuration and its
//!   statistics and history snapshots.
//! - **`registry`**: A name-keyed map guaranteeing a single breaker per
//!   protected dependency.

pub mod circuit;
pub mod registry;

pub use circuit::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerStats, CircuitOpenError, CircuitState,
    StateChangeRecord, HISTORY_CAPACITY,
};
pub use registry::CircuitBreakerRegistry;
