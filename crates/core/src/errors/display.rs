//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::CircuitOpen { name, state } => {
                if name.is_empty() {
                    write!(f, "circuit breaker is {state}")
                } else {
                    write!(f, "circuit breaker '{name}' is {state}")
                }
            }
            Error::Dependency {
                dependency,
                message,
            } => {
                write!(f, "dependency '{dependency}' failed: {message}")
            }
            Error::Json { message, .. } => {
                write!(f, "JSON error: {message}")
            }
        }
    }
}
