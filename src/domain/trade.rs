//! Core market domain types.
//!
//! Defines the outcome enum, the share state of a binary market, and the
//! value objects produced by pricing and trade simulation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{LmsrError, LmsrResult};
use super::lmsr;

// ────────────────────────────────────────────
// Outcome
// ────────────────────────────────────────────

/// One of the two outcomes of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    /// The opposite outcome.
    pub const fn other(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }

    /// The boolean the market contract uses for this outcome (`true` = YES).
    pub const fn as_contract_flag(self) -> bool {
        match self {
            Self::Yes => true,
            Self::No => false,
        }
    }
}

impl From<bool> for Outcome {
    fn from(flag: bool) -> Self {
        if flag { Self::Yes } else { Self::No }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => write!(f, "YES"),
            Self::No => write!(f, "NO"),
        }
    }
}

// ────────────────────────────────────────────
// MarketState
// ────────────────────────────────────────────

/// Cumulative share state of a binary LMSR market.
///
/// `b` is fixed at creation. `q_yes` and `q_no` only grow, through
/// [`MarketState::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketState {
    q_yes: f64,
    q_no: f64,
    b: f64,
}

impl MarketState {
    /// Opens a fresh market with no shares issued.
    ///
    /// # Errors
    /// `InvalidParameter` if `b` is not a positive finite number.
    pub fn new(b: f64) -> LmsrResult<Self> {
        Self::with_shares(0.0, 0.0, b)
    }

    /// Rebuilds a state read back from an external store.
    ///
    /// # Errors
    /// `InvalidParameter` if `b` is invalid or a share count is not finite.
    pub fn with_shares(q_yes: f64, q_no: f64, b: f64) -> LmsrResult<Self> {
        lmsr::check_liquidity(b)?;
        lmsr::check_finite("q_yes", q_yes)?;
        lmsr::check_finite("q_no", q_no)?;
        Ok(Self { q_yes, q_no, b })
    }

    /// YES shares outstanding.
    pub const fn q_yes(&self) -> f64 {
        self.q_yes
    }

    /// NO shares outstanding.
    pub const fn q_no(&self) -> f64 {
        self.q_no
    }

    /// Liquidity parameter.
    pub const fn liquidity(&self) -> f64 {
        self.b
    }

    /// Shares outstanding on `side`.
    pub const fn shares(&self, side: Outcome) -> f64 {
        match side {
            Outcome::Yes => self.q_yes,
            Outcome::No => self.q_no,
        }
    }

    /// State after adding `delta` shares on `side`, leaving `self` untouched.
    pub fn after_buy(&self, side: Outcome, delta: f64) -> Self {
        match side {
            Outcome::Yes => Self {
                q_yes: self.q_yes + delta,
                ..*self
            },
            Outcome::No => Self {
                q_no: self.q_no + delta,
                ..*self
            },
        }
    }

    /// Commits a purchase of `delta` shares on `side`.
    ///
    /// # Errors
    /// `InvalidParameter` if `delta` is negative or not finite.
    pub fn apply(&mut self, side: Outcome, delta: f64) -> LmsrResult<()> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(LmsrError::invalid("delta_shares", delta));
        }
        *self = self.after_buy(side, delta);
        Ok(())
    }

    /// Current implied probabilities.
    ///
    /// # Errors
    /// See [`lmsr::prices`].
    pub fn prices(&self) -> LmsrResult<Prices> {
        lmsr::prices(self.q_yes, self.q_no, self.b)
    }

    /// Current value of the cost potential.
    ///
    /// # Errors
    /// See [`lmsr::cost`].
    pub fn cost(&self) -> LmsrResult<f64> {
        lmsr::cost(self.q_yes, self.q_no, self.b)
    }
}

// ────────────────────────────────────────────
// Derived values
// ────────────────────────────────────────────

/// Implied outcome probabilities. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prices {
    pub p_yes: f64,
    pub p_no: f64,
}

impl Prices {
    /// Price of a single outcome.
    pub const fn of(&self, side: Outcome) -> f64 {
        match side {
            Outcome::Yes => self.p_yes,
            Outcome::No => self.p_no,
        }
    }
}

/// Result of converting a spend amount into shares for one trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeSimulation {
    /// Shares purchasable without exceeding the spend.
    pub delta_shares: f64,
    /// Exact cost of `delta_shares`; never above the spend.
    pub cost: f64,
    /// Price of the traded outcome before the trade.
    pub p_before: f64,
    /// Price of the traded outcome after the trade.
    pub p_after: f64,
}

/// A committed trade, as handed to the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub id: Uuid,
    pub side: Outcome,
    pub amount_spent: f64,
    pub shares_got: f64,
    pub price_before: f64,
    pub price_after: f64,
    pub executed_at: DateTime<Utc>,
}

impl TradeReceipt {
    pub(crate) fn from_simulation(side: Outcome, sim: &TradeSimulation) -> Self {
        Self {
            id: Uuid::new_v4(),
            side,
            amount_spent: sim.cost,
            shares_got: sim.delta_shares,
            price_before: sim.p_before,
            price_after: sim.p_after,
            executed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_market_starts_empty() {
        let state = MarketState::new(100.0).unwrap();
        assert_eq!(state.q_yes, 0.0);
        assert_eq!(state.q_no, 0.0);
        assert_eq!(state.liquidity(), 100.0);
    }

    #[test]
    fn test_new_market_rejects_non_positive_b() {
        assert!(matches!(
            MarketState::new(0.0),
            Err(LmsrError::InvalidParameter { name: "b", .. })
        ));
        assert!(MarketState::new(-5.0).is_err());
        assert!(MarketState::new(f64::NAN).is_err());
    }

    #[test]
    fn test_apply_only_touches_one_axis() {
        let mut state = MarketState::new(100.0).unwrap();
        state.apply(Outcome::No, 12.5).unwrap();
        assert_eq!(state.q_yes, 0.0);
        assert_eq!(state.q_no, 12.5);
        assert_eq!(state.liquidity(), 100.0);
    }

    #[test]
    fn test_apply_rejects_negative_delta() {
        let mut state = MarketState::new(100.0).unwrap();
        let err = state.apply(Outcome::Yes, -1.0).unwrap_err();
        assert!(matches!(err, LmsrError::InvalidParameter { name: "delta_shares", .. }));
        assert_eq!(state.q_yes, 0.0);
    }

    #[test]
    fn test_outcome_contract_flag_roundtrip() {
        assert!(Outcome::Yes.as_contract_flag());
        assert_eq!(Outcome::from(false), Outcome::No);
        assert_eq!(Outcome::Yes.other(), Outcome::No);
    }

    #[test]
    fn test_outcome_serializes_uppercase() {
        let json = serde_json::to_string(&Outcome::Yes).unwrap();
        assert_eq!(json, "\"YES\"");
        let back: Outcome = serde_json::from_str("\"NO\"").unwrap();
        assert_eq!(back, Outcome::No);
    }
}
