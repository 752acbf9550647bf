//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::EngineConfig;

/// Upper bound on bisection steps. Beyond ~60 the bracket is already
/// below f64 resolution for any realistic share count.
const MAX_ITERATIONS: u32 = 200;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig> {
  let path = path.as_ref();

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = load_config_from_str(&content)
    .with_context(|| format!("Invalid config file: {}", path.display()))?;

  info!(
    name = %config.engine.name,
    iterations = config.search.iterations,
    ceiling = config.search.bracket_ceiling,
    liquidity = config.market.default_liquidity,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
///
/// # Errors
/// Fails on TOML syntax errors or validation failures.
pub fn load_config_from_str(content: &str) -> Result<EngineConfig> {
  let config: EngineConfig = toml::from_str(content)
    .context("Failed to parse config.toml")?;

  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &EngineConfig) -> Result<()> {
  anyhow::ensure!(
    !config.engine.name.is_empty(),
    "engine.name must not be empty"
  );

  // Search validation
  let search = &config.search;
  anyhow::ensure!(
    (1..=MAX_ITERATIONS).contains(&search.iterations),
    "search.iterations must be in [1, {}], got {}",
    MAX_ITERATIONS,
    search.iterations
  );
  search
    .validate()
    .context("Invalid [search] section")?;

  // Market validation
  anyhow::ensure!(
    config.market.default_liquidity.is_finite() && config.market.default_liquidity > 0.0,
    "market.default_liquidity must be positive, got {}",
    config.market.default_liquidity
  );
  anyhow::ensure!(
    config.market.max_spend.is_finite() && config.market.max_spend > 0.0,
    "market.max_spend must be positive, got {}",
    config.market.max_spend
  );
  anyhow::ensure!(
    config.market.max_spend <= search.bracket_ceiling,
    "market.max_spend ({}) must not exceed search.bracket_ceiling ({})",
    config.market.max_spend,
    search.bracket_ceiling
  );

  // Approval validation
  anyhow::ensure!(
    config.approval.buffer_bps <= 10_000,
    "approval.buffer_bps must be in [0, 10000], got {}",
    config.approval.buffer_bps
  );

  Ok(())
}
