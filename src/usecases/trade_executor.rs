//! Trade Executor - Quote and Commit Buys Against a Market
//!
//! Turns a `(side, spend)` request into a share purchase:
//! - Validates the spend against the per-trade cap
//! - Inverts the LMSR cost function for the share count
//! - Derives the contract `maxCost` in WAD
//! - Commits the share delta onto the caller's market state
//!
//! The executor holds no market state. `execute` takes `&mut MarketState`,
//! so within one process a market has a single writer at a time; across
//! processes the persistence layer must serialize read → execute → write.

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::EngineConfig;
use crate::domain::error::{LmsrError, LmsrResult};
use crate::domain::lmsr::{self, SearchParams};
use crate::domain::trade::{MarketState, Outcome, Prices, TradeReceipt, TradeSimulation};
use crate::domain::wad;

/// Why a trade request was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TradeRejection {
  /// Spend outside `(0, max_spend]`.
  #[error("invalid amount {amount}: must be greater than 0 and at most {max}")]
  InvalidAmount { amount: f64, max: f64 },

  /// The pricing engine refused the inputs.
  #[error(transparent)]
  Engine(#[from] LmsrError),
}

/// A priced but uncommitted trade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeQuote {
  pub side: Outcome,
  /// Amount the caller offered to spend.
  pub spend: f64,
  pub simulation: TradeSimulation,
  /// Simulated cost plus the approval buffer, in WAD, rounded up.
  pub max_cost_wad: u128,
}

/// A committed trade and the market prices it left behind.
#[derive(Debug, Clone)]
pub struct ExecutedTrade {
  pub receipt: TradeReceipt,
  pub prices: Prices,
}

/// Quotes and executes buys using configured search and limit settings.
#[derive(Debug, Clone)]
pub struct TradeExecutor {
  search: SearchParams,
  default_liquidity: f64,
  max_spend: f64,
  buffer_bps: u32,
}

impl TradeExecutor {
  /// Create an executor from validated config.
  pub fn new(config: &EngineConfig) -> Self {
    Self {
      search: config.search,
      default_liquidity: config.market.default_liquidity,
      max_spend: config.market.max_spend,
      buffer_bps: config.approval.buffer_bps,
    }
  }

  /// Search parameters in use.
  pub const fn search(&self) -> &SearchParams {
    &self.search
  }

  /// Open a new market with the configured default liquidity.
  ///
  /// # Errors
  /// `InvalidParameter` if the configured liquidity is invalid.
  pub fn open_market(&self) -> LmsrResult<MarketState> {
    MarketState::new(self.default_liquidity)
  }

  /// Price a buy without touching the market.
  ///
  /// # Errors
  /// - `InvalidAmount` if `spend` is not in `(0, max_spend]`.
  /// - `Engine` for any pricing failure, including non-convergence.
  #[instrument(skip_all, fields(%side, spend))]
  pub fn quote(
    &self,
    state: &MarketState,
    side: Outcome,
    spend: f64,
  ) -> Result<TradeQuote, TradeRejection> {
    if !(spend > 0.0 && spend <= self.max_spend) {
      warn!(spend, max = self.max_spend, "Rejected trade amount");
      return Err(TradeRejection::InvalidAmount {
        amount: spend,
        max: self.max_spend,
      });
    }

    let simulation = lmsr::simulate_buy(
      side,
      state.q_yes(),
      state.q_no(),
      state.liquidity(),
      spend,
      &self.search,
    )?;
    let max_cost_wad = wad::max_cost_wad(simulation.cost, self.buffer_bps)?;

    Ok(TradeQuote {
      side,
      spend,
      simulation,
      max_cost_wad,
    })
  }

  /// Price a buy and commit its share delta onto `state`.
  ///
  /// `state` is left unchanged if any step fails.
  ///
  /// # Errors
  /// Same as [`TradeExecutor::quote`].
  #[instrument(skip_all, fields(%side, spend))]
  pub fn execute(
    &self,
    state: &mut MarketState,
    side: Outcome,
    spend: f64,
  ) -> Result<ExecutedTrade, TradeRejection> {
    let quote = self.quote(state, side, spend)?;
    let sim = quote.simulation;

    let mut next = *state;
    next.apply(side, sim.delta_shares)?;
    let prices = next.prices()?;
    *state = next;

    let receipt = TradeReceipt::from_simulation(side, &sim);
    info!(
      trade_id = %receipt.id,
      shares = sim.delta_shares,
      cost = sim.cost,
      p_before = sim.p_before,
      p_after = sim.p_after,
      "Trade committed"
    );

    Ok(ExecutedTrade { receipt, prices })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::loader::load_config_from_str;

  fn executor() -> TradeExecutor {
    let config = load_config_from_str("[engine]\nname = \"test\"\n").unwrap();
    TradeExecutor::new(&config)
  }

  #[test]
  fn test_open_market_uses_default_liquidity() {
    let state = executor().open_market().unwrap();
    assert_eq!(state.liquidity(), 100.0);
    assert_eq!(state.prices().unwrap().p_yes, 0.5);
  }

  #[test]
  fn test_quote_does_not_mutate() {
    let exec = executor();
    let state = exec.open_market().unwrap();
    let quote = exec.quote(&state, Outcome::Yes, 10.0).unwrap();
    assert!(quote.simulation.delta_shares > 0.0);
    assert_eq!(state.q_yes(), 0.0);
  }

  #[test]
  fn test_quote_max_cost_covers_cost() {
    let exec = executor();
    let state = exec.open_market().unwrap();
    let quote = exec.quote(&state, Outcome::No, 10.0).unwrap();
    assert!(quote.max_cost_wad >= wad::to_wad_floor(quote.simulation.cost).unwrap());
    assert!(quote.max_cost_wad <= wad::to_wad_ceil(10.0).unwrap());
  }

  #[test]
  fn test_rejects_zero_and_oversized_amounts() {
    let exec = executor();
    let state = exec.open_market().unwrap();
    for amount in [0.0, -5.0, 1000.01, f64::NAN] {
      let err = exec.quote(&state, Outcome::Yes, amount).unwrap_err();
      assert!(matches!(err, TradeRejection::InvalidAmount { .. }), "{amount}");
    }
  }

  #[test]
  fn test_execute_commits_on_traded_axis() {
    let exec = executor();
    let mut state = exec.open_market().unwrap();
    let done = exec.execute(&mut state, Outcome::Yes, 10.0).unwrap();

    assert_eq!(state.q_yes(), done.receipt.shares_got);
    assert_eq!(state.q_no(), 0.0);
    assert_eq!(done.prices.p_yes, done.receipt.price_after);
    assert!(done.receipt.amount_spent <= 10.0);
  }

  #[test]
  fn test_failed_execute_leaves_state() {
    let exec = executor();
    let mut state = exec.open_market().unwrap();
    let before = state;
    assert!(exec.execute(&mut state, Outcome::No, 5000.0).is_err());
    assert_eq!(state, before);
  }
}
