//! Rejection error raised when a breaker refuses to admit a call.

use super::types::CircuitState;

/// A call was rejected without running because the circuit is not admitting
/// requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe(.name, .state))]
pub struct CircuitOpenError {
    /// Name of the rejecting breaker; empty for anonymous breakers
    pub name: String,
    /// State the breaker was in when it rejected the call
    pub state: CircuitState,
}

fn describe(name: &str, state: &CircuitState) -> String {
    if name.is_empty() {
        format!("circuit breaker is {state}")
    } else {
        format!("circuit breaker '{name}' is {state}")
    }
}

impl From<CircuitOpenError> for tripwire_core::Error {
    fn from(error: CircuitOpenError) -> Self {
        tripwire_core::Error::circuit_open(error.name, error.state.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_carries_state() {
        let err = CircuitOpenError {
            name: String::new(),
            state: CircuitState::Open,
        };
        assert_eq!(err.to_string(), "circuit breaker is open");

        let err = CircuitOpenError {
            name: "supabase".into(),
            state: CircuitState::HalfOpen,
        };
        assert_eq!(err.to_string(), "circuit breaker 'supabase' is half-open");
    }

    #[test]
    fn test_converts_into_core_error() {
        let err: tripwire_core::Error = CircuitOpenError {
            name: "classifier".into(),
            state: CircuitState::Open,
        }
        .into();
        assert!(err.is_circuit_open());
        assert_eq!(err.to_string(), "circuit breaker 'classifier' is open");
    }
}
