//! One circuit breaker per protected dependency.

use crate::circuit::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerStats};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Shared map from dependency name to its circuit breaker
///
/// Callers look breakers up by name instead of constructing their own, so
/// every adapter talking to the same dependency shares one failure count.
#[derive(Debug, Default)]
pub struct CircuitBreakerRegistry {
    breakers: DashMap<String, Arc<CircuitBreaker>>,
    default_config: CircuitBreakerConfig,
}

impl CircuitBreakerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that builds new breakers from `config`
    pub fn with_default_config(config: CircuitBreakerConfig) -> Self {
        Self {
            breakers: DashMap::new(),
            default_config: config,
        }
    }

    /// Breaker for `name`, created with the registry's default config on first use
    pub fn breaker(&self, name: &str) -> Arc<CircuitBreaker> {
        self.get_or_create(name, || self.default_config.clone())
    }

    /// Breaker for `name`, created from `config` on first use
    ///
    /// `config` is only evaluated when no breaker exists yet; an existing
    /// breaker keeps the configuration it was created with.
    pub fn get_or_create<F>(&self, name: &str, config: F) -> Arc<CircuitBreaker>
    where
        F: FnOnce() -> CircuitBreakerConfig,
    {
        if let Some(existing) = self.breakers.get(name) {
            return Arc::clone(existing.value());
        }

        let entry = self.breakers.entry(name.to_string()).or_insert_with(|| {
            debug!(breaker = %name, "Registering circuit breaker");
            Arc::new(CircuitBreaker::named(name, config()))
        });
        Arc::clone(entry.value())
    }

    pub fn get(&self, name: &str) -> Option<Arc<CircuitBreaker>> {
        self.breakers.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Names of all registered breakers, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.breakers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Statistics for every registered breaker, sorted by name
    pub fn snapshot(&self) -> Vec<CircuitBreakerStats> {
        let mut stats: Vec<CircuitBreakerStats> =
            self.breakers.iter().map(|e| e.value().stats()).collect();
        stats.sort_by(|a, b| a.name.cmp(&b.name));
        stats
    }

    /// Force every registered breaker closed
    pub fn reset_all(&self) {
        for entry in self.breakers.iter() {
            entry.value().reset();
        }
    }

    pub fn len(&self) -> usize {
        self.breakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.is_empty()
    }
}
