//! Domain layer - LMSR pricing engine and market value types.
//!
//! Pure functions over share state passed in by the caller. Nothing here
//! holds state between calls, so every function is safe to call from any
//! number of threads at once.

pub mod error;
pub mod format;
pub mod lmsr;
pub mod trade;
pub mod wad;

// Re-export core types for convenience
pub use error::{LmsrError, LmsrResult};
pub use lmsr::{
    SearchParams, cost, cost_to_buy_shares, max_market_maker_loss, price, prices,
    simulate_buy,
};
pub use trade::{MarketState, Outcome, Prices, TradeReceipt, TradeSimulation};
