//! Display helpers for reporting surfaces.
//!
//! Ties round away from zero on the exact binary value of the input,
//! so `2.5` shows as `3` while `1.005` (stored just below) shows as `1.00`.

use rust_decimal::prelude::*;

/// Formats a probability as a percentage with one decimal, e.g. `62.2%`.
pub fn format_probability(p: f64) -> String {
    format!("{}%", format_number(p * 100.0, 1))
}

/// Formats a number with a fixed number of decimals.
pub fn format_number(n: f64, decimals: usize) -> String {
    let rounded = u32::try_from(decimals).ok().and_then(|dp| {
        Decimal::from_f64_retain(n)
            .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
    });
    match rounded {
        Some(d) => format!("{d:.decimals$}"),
        // Out of Decimal range or not finite.
        None => format!("{n:.decimals$}"),
    }
}
