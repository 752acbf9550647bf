//! Market Report - Read-only Market Snapshot
//!
//! Collects everything a reporting surface shows for one market:
//! share state, implied odds and the operator's worst-case subsidy.

use serde::Serialize;

use crate::domain::error::LmsrResult;
use crate::domain::format::{format_number, format_probability};
use crate::domain::lmsr;
use crate::domain::trade::MarketState;

/// Display snapshot of a single market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketReport {
  pub b: f64,
  pub q_yes: f64,
  pub q_no: f64,
  pub p_yes: f64,
  pub p_no: f64,
  /// Whole-percent odds, rounded.
  pub yes_percent: u32,
  pub no_percent: u32,
  pub yes_display: String,
  pub no_display: String,
  /// `b * ln 2`.
  pub max_loss: f64,
  pub max_loss_display: String,
}

impl MarketReport {
  /// Build a report from the current state.
  ///
  /// # Errors
  /// Propagates pricing errors for pathological states.
  pub fn from_state(state: &MarketState) -> LmsrResult<Self> {
    let prices = state.prices()?;
    let max_loss = lmsr::max_market_maker_loss(state.liquidity())?;

    Ok(Self {
      b: state.liquidity(),
      q_yes: state.q_yes(),
      q_no: state.q_no(),
      p_yes: prices.p_yes,
      p_no: prices.p_no,
      yes_percent: whole_percent(prices.p_yes),
      no_percent: whole_percent(prices.p_no),
      yes_display: format_probability(prices.p_yes),
      no_display: format_probability(prices.p_no),
      max_loss,
      max_loss_display: format_number(max_loss, 2),
    })
  }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_percent(p: f64) -> u32 {
  (p * 100.0).round().clamp(0.0, 100.0) as u32
}
