use eyre::WrapErr;
use std::path::Path;
use tripwire_breaker::CircuitBreakerConfig;

/// Read and validate a JSON breaker configuration
pub fn load(path: &Path) -> eyre::Result<CircuitBreakerConfig> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config file '{}'", path.display()))?;
    CircuitBreakerConfig::from_json_str(&raw)
        .wrap_err_with(|| format!("invalid config file '{}'", path.display()))
}

pub fn preset(name: &str) -> eyre::Result<CircuitBreakerConfig> {
    match name {
        "default" => Ok(CircuitBreakerConfig::default()),
        "database" => Ok(CircuitBreakerConfig::for_database()),
        "external-api" => Ok(CircuitBreakerConfig::for_external_api()),
        other => Err(eyre::eyre!("unknown preset '{other}'")),
    }
}

pub fn print_preset(name: &str) -> eyre::Result<()> {
    let config = preset(name)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
