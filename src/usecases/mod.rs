//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates the pricing engine into the operations callers run
//! against a market.
//!
//! Use cases:
//! - `TradeExecutor`: Quote and commit spend-denominated buys
//! - `MarketReport`: Read-only odds and subsidy snapshot

pub mod market_report;
pub mod trade_executor;

pub use market_report::MarketReport;
pub use trade_executor::{ExecutedTrade, TradeExecutor, TradeQuote, TradeRejection};
