//! Configuration Module - TOML-based Engine Configuration
//!
//! Loads and validates configuration from `config.toml`.
//! Search precision, trade limits and approval margins are
//! externalized here - nothing is hardcoded in the use cases.

pub mod loader;

use serde::Deserialize;

use crate::domain::lmsr::SearchParams;

/// Top-level engine configuration.
///
/// Loaded from `config.toml` at startup and validated before use.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
  /// Identity and logging.
  pub engine: EngineSection,
  /// Bisection parameters for spend → shares inversion.
  #[serde(default)]
  pub search: SearchParams,
  /// Market defaults and per-trade limits.
  #[serde(default)]
  pub market: MarketConfig,
  /// Token approval policy.
  #[serde(default)]
  pub approval: ApprovalConfig,
}

/// Engine identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
  /// Human-readable deployment name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Market defaults and trade limits.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
  /// Liquidity parameter (b) for newly created markets.
  #[serde(default = "default_liquidity")]
  pub default_liquidity: f64,
  /// Largest spend accepted for a single trade.
  #[serde(default = "default_max_spend")]
  pub max_spend: f64,
}

impl Default for MarketConfig {
  fn default() -> Self {
    Self {
      default_liquidity: default_liquidity(),
      max_spend: default_max_spend(),
    }
  }
}

/// Approval margin on top of the simulated cost.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApprovalConfig {
  /// Extra margin in basis points applied to `maxCost`. Zero by default:
  /// the tolerance between this engine and the contract is deployment policy.
  #[serde(default)]
  pub buffer_bps: u32,
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

const fn default_liquidity() -> f64 {
  100.0
}

const fn default_max_spend() -> f64 {
  1000.0
}
