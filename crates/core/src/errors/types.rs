//! Core error type definitions

/// Result type alias for tripwire operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tripwire operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid circuit breaker or CLI configuration
    Configuration { message: String },

    /// A circuit breaker refused to admit a call
    CircuitOpen { name: String, state: String },

    /// A protected dependency reported a failure
    Dependency { dependency: String, message: String },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}
