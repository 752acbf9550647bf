//! WAD fixed-point bridge to the market contract.
//!
//! The contract keeps shares, costs and odds as `uint256` scaled by 1e18.
//! Conversions go through `Decimal` so the 18-digit scaling itself adds no
//! binary rounding; only the final integer step rounds, and its direction
//! is chosen by the caller.
//!
//! How far the f64 engine may drift from the contract's own fixed-point
//! evaluation is not pinned down anywhere. `max_cost_wad` therefore takes
//! an explicit buffer instead of assuming a tolerance.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use super::error::{LmsrError, LmsrResult};

/// Fixed-point scale used by the contract.
pub const WAD: u128 = 1_000_000_000_000_000_000;

const WAD_DECIMAL: Decimal = dec!(1000000000000000000);
const BPS_DENOMINATOR: Decimal = dec!(10000);

fn scaled(amount: f64) -> LmsrResult<Decimal> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(LmsrError::invalid("amount", amount));
    }
    let d = Decimal::from_f64(amount).ok_or(LmsrError::overflow("wad conversion"))?;
    d.checked_mul(WAD_DECIMAL)
        .ok_or(LmsrError::overflow("wad conversion"))
}

/// Converts a token amount to WAD, rounding toward zero.
///
/// # Errors
/// - `InvalidParameter` for negative or non-finite amounts.
/// - `NumericOverflow` if the scaled value does not fit.
pub fn to_wad_floor(amount: f64) -> LmsrResult<u128> {
    scaled(amount)?
        .floor()
        .to_u128()
        .ok_or(LmsrError::overflow("wad conversion"))
}

/// Converts a token amount to WAD, rounding up.
///
/// # Errors
/// Same as [`to_wad_floor`].
pub fn to_wad_ceil(amount: f64) -> LmsrResult<u128> {
    scaled(amount)?
        .ceil()
        .to_u128()
        .ok_or(LmsrError::overflow("wad conversion"))
}

/// Converts a WAD value read from the contract back to f64.
#[allow(clippy::cast_precision_loss)]
pub fn from_wad(value: u128) -> f64 {
    value as f64 / WAD as f64
}

/// Upper bound to pass as the contract's `maxCost` (and token approval)
/// for a simulated cost, widened by `buffer_bps` basis points and rounded
/// up to the next wei.
///
/// # Errors
/// Same as [`to_wad_ceil`].
pub fn max_cost_wad(cost: f64, buffer_bps: u32) -> LmsrResult<u128> {
    let base = scaled(cost)?;
    let factor = Decimal::ONE + Decimal::from(buffer_bps) / BPS_DENOMINATOR;
    base.checked_mul(factor)
        .ok_or(LmsrError::overflow("max cost"))?
        .ceil()
        .to_u128()
        .ok_or(LmsrError::overflow("max cost"))
}
