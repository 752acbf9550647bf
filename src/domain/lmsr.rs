//! Logarithmic Market Scoring Rule (LMSR) implementation.
//!
//! The LMSR prices every trade in the market. This module evaluates the
//! cost potential, the prices it implies, and inverts the cost function
//! to turn a spend amount into a share quantity.
//! Reference: Hanson (2003) "Combinatorial Information Market Design"
//!
//! Everything here is a pure function over `(q_yes, q_no, b)`. Results
//! must track the on-chain market contract, which evaluates the same
//! formula in WAD fixed-point (see [`super::wad`]).

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{LmsrError, LmsrResult};
use super::trade::{Outcome, Prices, TradeSimulation};

/// Default number of bisection steps in [`simulate_buy`].
pub const DEFAULT_ITERATIONS: u32 = 50;

/// Default initial upper bracket, as a multiple of the spend.
pub const DEFAULT_BRACKET_MULTIPLIER: f64 = 10.0;

/// Default hard ceiling for the share bracket.
pub const DEFAULT_BRACKET_CEILING: f64 = 1e12;

// ────────────────────────────────────────────
// Parameter checks
// ────────────────────────────────────────────

pub(crate) fn check_liquidity(b: f64) -> LmsrResult<()> {
    if b.is_finite() && b > 0.0 {
        Ok(())
    } else {
        Err(LmsrError::invalid("b", b))
    }
}

pub(crate) fn check_finite(name: &'static str, value: f64) -> LmsrResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LmsrError::invalid(name, value))
    }
}

/// Scales both share counts by `1/b`, failing if either leaves f64 range.
fn scaled(q_yes: f64, q_no: f64, b: f64) -> LmsrResult<(f64, f64)> {
    check_liquidity(b)?;
    check_finite("q_yes", q_yes)?;
    check_finite("q_no", q_no)?;

    let a = q_yes / b;
    let c = q_no / b;
    if a.is_finite() && c.is_finite() {
        Ok((a, c))
    } else {
        Err(LmsrError::overflow("share/liquidity ratio"))
    }
}

// ────────────────────────────────────────────
// Cost function and prices
// ────────────────────────────────────────────

/// `ln(e^a + e^c)` shifted by `max(a, c)` so neither exponential overflows.
#[inline]
pub fn log_sum_exp(a: f64, c: f64) -> f64 {
    let m = a.max(c);
    m + ((a - m).exp() + (c - m).exp()).ln()
}

/// LMSR cost potential: `C = b * ln(exp(q_yes/b) + exp(q_no/b))`.
///
/// # Errors
/// - `InvalidParameter` if `b <= 0` or any input is not finite.
/// - `NumericOverflow` if the scaled quantities or the result are not finite.
pub fn cost(q_yes: f64, q_no: f64, b: f64) -> LmsrResult<f64> {
    let (a, c) = scaled(q_yes, q_no, b)?;
    let value = b * log_sum_exp(a, c);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LmsrError::overflow("cost"))
    }
}

/// Implied probabilities: the softmax of `(q_yes/b, q_no/b)`.
///
/// These are the partial derivatives of [`cost`] along each share axis,
/// and always sum to one.
///
/// # Errors
/// Same conditions as [`cost`].
pub fn prices(q_yes: f64, q_no: f64, b: f64) -> LmsrResult<Prices> {
    let (a, c) = scaled(q_yes, q_no, b)?;
    let m = a.max(c);
    let exp_yes = (a - m).exp();
    let exp_no = (c - m).exp();
    let sum = exp_yes + exp_no;

    Ok(Prices {
        p_yes: exp_yes / sum,
        p_no: exp_no / sum,
    })
}

/// Price of a single outcome.
///
/// # Errors
/// Same conditions as [`cost`].
pub fn price(side: Outcome, q_yes: f64, q_no: f64, b: f64) -> LmsrResult<f64> {
    prices(q_yes, q_no, b).map(|p| p.of(side))
}

// ────────────────────────────────────────────
// Trade cost
// ────────────────────────────────────────────

/// `cost(after) - base` where `base` is the pre-trade cost.
fn cost_after_buy(
    side: Outcome,
    q_yes: f64,
    q_no: f64,
    b: f64,
    base: f64,
    delta: f64,
) -> LmsrResult<f64> {
    let after = match side {
        Outcome::Yes => cost(q_yes + delta, q_no, b)?,
        Outcome::No => cost(q_yes, q_no + delta, b)?,
    };
    Ok(after - base)
}

/// Cost of buying `delta` shares of `side` from the current state.
///
/// Equals the integral of the side's price over the share delta.
///
/// # Errors
/// - `InvalidParameter` if `delta` is negative or not finite.
/// - Any error from [`cost`].
pub fn cost_to_buy_shares(
    side: Outcome,
    q_yes: f64,
    q_no: f64,
    b: f64,
    delta: f64,
) -> LmsrResult<f64> {
    if !delta.is_finite() || delta < 0.0 {
        return Err(LmsrError::invalid("delta_shares", delta));
    }
    let base = cost(q_yes, q_no, b)?;
    cost_after_buy(side, q_yes, q_no, b, base, delta)
}

// ────────────────────────────────────────────
// Spend → shares inversion
// ────────────────────────────────────────────

/// Tuning knobs for the bisection in [`simulate_buy`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Bisection steps after the bracket is found.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Initial upper bracket as a multiple of the spend.
    #[serde(default = "default_bracket_multiplier")]
    pub initial_bracket_multiplier: f64,
    /// The bracket never grows beyond this share count.
    #[serde(default = "default_bracket_ceiling")]
    pub bracket_ceiling: f64,
}

impl SearchParams {
    /// # Errors
    /// `InvalidParameter` if the multiplier or ceiling is not a positive
    /// finite number.
    pub fn validate(&self) -> LmsrResult<()> {
        let m = self.initial_bracket_multiplier;
        if !(m.is_finite() && m > 0.0) {
            return Err(LmsrError::invalid("initial_bracket_multiplier", m));
        }
        let ceiling = self.bracket_ceiling;
        if !(ceiling.is_finite() && ceiling > 0.0) {
            return Err(LmsrError::invalid("bracket_ceiling", ceiling));
        }
        Ok(())
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            initial_bracket_multiplier: DEFAULT_BRACKET_MULTIPLIER,
            bracket_ceiling: DEFAULT_BRACKET_CEILING,
        }
    }
}

const fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

const fn default_bracket_multiplier() -> f64 {
    DEFAULT_BRACKET_MULTIPLIER
}

const fn default_bracket_ceiling() -> f64 {
    DEFAULT_BRACKET_CEILING
}

/// Finds how many shares of `side` a fixed `spend` buys.
///
/// `cost_to_buy_shares` is strictly increasing and convex in the share
/// delta, so bisection on `[0, high]` is well posed. The result always
/// rounds down to the last affordable bound: `cost <= spend` holds for
/// every returned simulation, so a caller never overspends its budget.
///
/// A non-positive `spend` returns an empty simulation without searching.
///
/// # Errors
/// - `InvalidParameter` for a non-finite `spend`, bad `b` or bad `params`.
/// - `NonConvergence` if the bracket reaches `params.bracket_ceiling`
///   without covering `spend`.
/// - `NumericOverflow` if any cost evaluation leaves f64 range.
pub fn simulate_buy(
    side: Outcome,
    q_yes: f64,
    q_no: f64,
    b: f64,
    spend: f64,
    params: &SearchParams,
) -> LmsrResult<TradeSimulation> {
    check_finite("spend", spend)?;
    params.validate()?;

    let before = price(side, q_yes, q_no, b)?;
    if spend <= 0.0 {
        return Ok(TradeSimulation {
            delta_shares: 0.0,
            cost: 0.0,
            p_before: before,
            p_after: before,
        });
    }

    let base = cost(q_yes, q_no, b)?;
    let trade_cost = |delta: f64| cost_after_buy(side, q_yes, q_no, b, base, delta);

    let mut low = 0.0_f64;
    // A subnormal spend times a small multiplier can round to zero, and
    // doubling zero never reaches the ceiling.
    let mut high = (spend * params.initial_bracket_multiplier).max(f64::MIN_POSITIVE);
    if !high.is_finite() {
        return Err(LmsrError::overflow("initial bracket"));
    }

    while trade_cost(high)? < spend {
        if high >= params.bracket_ceiling {
            warn!(
                %side,
                spend,
                b,
                ceiling = params.bracket_ceiling,
                "Bracket expansion hit ceiling"
            );
            return Err(LmsrError::NonConvergence {
                spend,
                ceiling: params.bracket_ceiling,
            });
        }
        high = (high * 2.0).min(params.bracket_ceiling);
    }

    for _ in 0..params.iterations {
        let mid = low + (high - low) / 2.0;
        if trade_cost(mid)? > spend {
            high = mid;
        } else {
            low = mid;
        }
    }

    let delta_shares = low;
    let spent = trade_cost(delta_shares)?;
    let after = match side {
        Outcome::Yes => price(side, q_yes + delta_shares, q_no, b)?,
        Outcome::No => price(side, q_yes, q_no + delta_shares, b)?,
    };

    debug!(
        %side,
        spend,
        delta_shares,
        cost = spent,
        resolution = high - low,
        p_before = before,
        p_after = after,
        "Simulated buy"
    );

    Ok(TradeSimulation {
        delta_shares,
        cost: spent,
        p_before: before,
        p_after: after,
    })
}

// ────────────────────────────────────────────
// Risk bound
// ────────────────────────────────────────────

/// Worst-case operator subsidy for a binary LMSR market: `b * ln 2`.
///
/// # Errors
/// `InvalidParameter` if `b` is not a positive finite number.
pub fn max_market_maker_loss(b: f64) -> LmsrResult<f64> {
    check_liquidity(b)?;
    Ok(b * std::f64::consts::LN_2)
}
