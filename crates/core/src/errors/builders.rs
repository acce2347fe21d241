//! Builder methods for creating errors with context

use super::types::Error;

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a circuit-open error for the named breaker
    #[must_use]
    pub fn circuit_open(name: impl Into<String>, state: impl Into<String>) -> Self {
        Error::CircuitOpen {
            name: name.into(),
            state: state.into(),
        }
    }

    /// Create a dependency failure error
    #[must_use]
    pub fn dependency(dependency: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Dependency {
            dependency: dependency.into(),
            message: message.into(),
        }
    }

    /// Whether this error was produced by a breaker rejecting the call
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, Error::CircuitOpen { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circuit_open_detection() {
        assert!(Error::circuit_open("db", "open").is_circuit_open());
        assert!(!Error::dependency("db", "timeout").is_circuit_open());
        assert!(!Error::configuration("bad").is_circuit_open());
    }
}
