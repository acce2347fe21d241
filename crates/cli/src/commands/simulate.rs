use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::time::Duration;
use tracing::info;
use tripwire_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerStats, CircuitState, StateChangeRecord,
};
use tripwire_core::{Error, Result};

pub struct SimulationOptions {
    pub name: String,
    pub calls: usize,
    pub failure_rate: f64,
    pub recover_after: Option<usize>,
    pub interval_ms: u64,
    pub latency_ms: u64,
    pub seed: Option<u64>,
}

/// Dependency that fails at random until it optionally recovers
struct FlakyDependency {
    name: String,
    rng: StdRng,
    failure_rate: f64,
    recover_after: Option<usize>,
    latency: Duration,
    invocations: usize,
}

impl FlakyDependency {
    fn new(options: &SimulationOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            name: options.name.clone(),
            rng,
            failure_rate: options.failure_rate,
            recover_after: options.recover_after,
            latency: Duration::from_millis(options.latency_ms),
            invocations: 0,
        }
    }

    async fn invoke(&mut self) -> Result<u32> {
        self.invocations += 1;
        tokio::time::sleep(self.latency).await;

        let healthy = self
            .recover_after
            .is_some_and(|after| self.invocations > after);
        if !healthy && self.rng.gen_bool(self.failure_rate) {
            return Err(Error::dependency(&self.name, "simulated failure"));
        }
        Ok(self.rng.gen_range(0..100))
    }
}

#[derive(Debug, Default, Serialize)]
struct Outcomes {
    succeeded: usize,
    failed: usize,
    rejected: usize,
}

#[derive(Debug, Serialize)]
struct StatsReport {
    state: CircuitState,
    failure_count: usize,
    success_count: usize,
    half_open_count: usize,
    time_in_state_ms: u64,
    since_last_failure_ms: Option<u64>,
}

impl From<&CircuitBreakerStats> for StatsReport {
    fn from(stats: &CircuitBreakerStats) -> Self {
        Self {
            state: stats.state,
            failure_count: stats.failure_count,
            success_count: stats.success_count,
            half_open_count: stats.half_open_count,
            time_in_state_ms: millis(stats.time_in_state()),
            since_last_failure_ms: stats.since_last_failure().map(millis),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    breaker: String,
    config: CircuitBreakerConfig,
    invocations: usize,
    outcomes: Outcomes,
    stats: StatsReport,
    history: Vec<StateChangeRecord>,
}

pub async fn run(config: CircuitBreakerConfig, options: SimulationOptions) -> eyre::Result<()> {
    let report = simulate(config, &options).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn simulate(
    config: CircuitBreakerConfig,
    options: &SimulationOptions,
) -> eyre::Result<SimulationReport> {
    eyre::ensure!(
        (0.0..=1.0).contains(&options.failure_rate),
        "failure rate must be between 0 and 1, got {}",
        options.failure_rate
    );
    let breaker = CircuitBreaker::try_new(options.name.clone(), config)?;
    let mut dependency = FlakyDependency::new(options);
    let mut outcomes = Outcomes::default();
    let interval = Duration::from_millis(options.interval_ms);

    info!(
        breaker = %breaker.name(),
        calls = options.calls,
        failure_rate = options.failure_rate,
        "Starting simulation"
    );

    for _ in 0..options.calls {
        match breaker.call(|| dependency.invoke()).await {
            Ok(_) => outcomes.succeeded += 1,
            Err(e) if e.is_circuit_open() => outcomes.rejected += 1,
            Err(_) => outcomes.failed += 1,
        }
        tokio::time::sleep(interval).await;
    }

    let stats = breaker.stats();
    info!(
        breaker = %breaker.name(),
        state = %stats.state,
        succeeded = outcomes.succeeded,
        failed = outcomes.failed,
        rejected = outcomes.rejected,
        "Simulation finished"
    );

    Ok(SimulationReport {
        breaker: breaker.name().to_string(),
        config: breaker.config().clone(),
        invocations: dependency.invocations,
        outcomes,
        stats: StatsReport::from(&stats),
        history: breaker.state_history(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(failure_rate: f64, recover_after: Option<usize>) -> SimulationOptions {
        SimulationOptions {
            name: "test-dependency".into(),
            calls: 20,
            failure_rate,
            recover_after,
            interval_ms: 0,
            latency_ms: 0,
            seed: Some(7),
        }
    }

    #[tokio::test]
    async fn test_always_failing_dependency_is_rejected() {
        let config = CircuitBreakerConfig {
            failure_threshold: 3,
            timeout: Duration::from_secs(60),
            ..Default::default()
        };
        let report = simulate(config, &options(1.0, None)).await.unwrap();

        assert_eq!(report.outcomes.failed, 3);
        assert_eq!(report.outcomes.rejected, 17);
        assert_eq!(report.invocations, 3);
        assert_eq!(report.stats.state, CircuitState::Open);
        assert_eq!(report.history.len(), 1);
    }

    #[tokio::test]
    async fn test_recovering_dependency_closes_circuit() {
        let config = CircuitBreakerConfig {
            failure_threshold: 2,
            success_threshold: 2,
            timeout: Duration::ZERO,
            ..Default::default()
        };
        let report = simulate(config, &options(1.0, Some(2))).await.unwrap();

        assert_eq!(report.outcomes.failed, 2);
        assert_eq!(report.outcomes.succeeded, 18);
        assert_eq!(report.stats.state, CircuitState::Closed);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["history"][0]["state"], "open");
        assert_eq!(json["config"]["failure_threshold"], 2);
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let config = CircuitBreakerConfig {
            max_requests: 0,
            ..Default::default()
        };
        assert!(simulate(config, &options(0.5, None)).await.is_err());

        let rate = simulate(CircuitBreakerConfig::default(), &options(1.5, None)).await;
        assert!(rate.unwrap_err().to_string().contains("failure rate"));
    }
}
