//! Integration Tests - End-to-end Engine Flows
//!
//! Drives the public API the way a market service would:
//! load config, open a market, quote and execute trades, then report.

use std::thread;

use lmsr_engine::config::loader::load_config_from_str;
use lmsr_engine::domain::lmsr::{self, SearchParams};
use lmsr_engine::domain::trade::{MarketState, Outcome};
use lmsr_engine::domain::wad;
use lmsr_engine::domain::LmsrError;
use lmsr_engine::usecases::{MarketReport, TradeExecutor, TradeRejection};

const CONFIG: &str = r#"
[engine]
name = "integration"
log_level = "debug"

[search]
iterations = 50
initial_bracket_multiplier = 10.0
bracket_ceiling = 1e12

[market]
default_liquidity = 100.0
max_spend = 1000.0

[approval]
buffer_bps = 0
"#;

fn executor() -> TradeExecutor {
    TradeExecutor::new(&load_config_from_str(CONFIG).expect("valid config"))
}

// ---- Trade lifecycle ----

#[test]
fn test_sequence_of_trades_moves_odds_both_ways() {
    let exec = executor();
    let mut market = exec.open_market().unwrap();

    let first = exec.execute(&mut market, Outcome::Yes, 50.0).unwrap();
    assert!(first.prices.p_yes > 0.5);

    let second = exec.execute(&mut market, Outcome::No, 120.0).unwrap();
    assert!(second.prices.p_no > 0.5);
    assert_eq!(second.receipt.price_before, first.prices.p_no);

    assert_eq!(market.q_yes(), first.receipt.shares_got);
    assert_eq!(market.q_no(), second.receipt.shares_got);
    assert_eq!(market.liquidity(), 100.0);
}

#[test]
fn test_executed_cost_matches_cost_function_delta() {
    let exec = executor();
    let mut market = exec.open_market().unwrap();
    let before = market.cost().unwrap();

    let trade = exec.execute(&mut market, Outcome::Yes, 10.0).unwrap();
    let after = market.cost().unwrap();

    assert!((after - before - trade.receipt.amount_spent).abs() < 1e-9);
    assert!((trade.receipt.amount_spent - 10.0).abs() < 1e-4);
}

#[test]
fn test_quote_then_execute_agree() {
    let exec = executor();
    let mut market = MarketState::with_shares(35.0, 80.0, 100.0).unwrap();

    let quote = exec.quote(&market, Outcome::Yes, 42.0).unwrap();
    let done = exec.execute(&mut market, Outcome::Yes, 42.0).unwrap();

    assert_eq!(quote.simulation.delta_shares, done.receipt.shares_got);
    assert_eq!(quote.simulation.cost, done.receipt.amount_spent);
}

#[test]
fn test_rejected_trade_is_reported_and_harmless() {
    let exec = executor();
    let mut market = exec.open_market().unwrap();

    let err = exec.execute(&mut market, Outcome::Yes, 1500.0).unwrap_err();
    assert_eq!(
        err,
        TradeRejection::InvalidAmount {
            amount: 1500.0,
            max: 1000.0
        }
    );
    assert_eq!(market.q_yes(), 0.0);
}

#[test]
fn test_tight_ceiling_surfaces_non_convergence() {
    let toml = CONFIG.replace("bracket_ceiling = 1e12", "bracket_ceiling = 1000.0");
    let exec = TradeExecutor::new(&load_config_from_str(&toml).unwrap());
    // NO is almost worthless here: spending 1 token needs far more than 1000 shares.
    let market = MarketState::with_shares(2000.0, 0.0, 100.0).unwrap();

    let err = exec.quote(&market, Outcome::No, 1.0).unwrap_err();
    assert!(matches!(
        err,
        TradeRejection::Engine(LmsrError::NonConvergence { .. })
    ));
}

// ---- Approvals ----

#[test]
fn test_approval_buffer_widens_max_cost() {
    let buffered = CONFIG.replace("buffer_bps = 0", "buffer_bps = 100");
    let exec = TradeExecutor::new(&load_config_from_str(&buffered).unwrap());
    let market = exec.open_market().unwrap();

    let quote = exec.quote(&market, Outcome::Yes, 10.0).unwrap();
    let plain = wad::to_wad_ceil(quote.simulation.cost).unwrap();
    assert!(quote.max_cost_wad > plain);
    assert!(wad::from_wad(quote.max_cost_wad) <= quote.simulation.cost * 1.01 + 1e-12);
}

// ---- Reporting ----

#[test]
fn test_report_after_trades() {
    let exec = executor();
    let mut market = exec.open_market().unwrap();
    exec.execute(&mut market, Outcome::Yes, 25.0).unwrap();

    let report = MarketReport::from_state(&market).unwrap();
    assert_eq!(report.yes_percent + report.no_percent, 100);
    assert!(report.yes_percent > 50);
    assert_eq!(report.max_loss, 100.0 * std::f64::consts::LN_2);

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"max_loss_display\":\"69.31\""));
}

#[test]
fn test_receipt_serializes_for_persistence() {
    let exec = executor();
    let mut market = exec.open_market().unwrap();
    let done = exec.execute(&mut market, Outcome::No, 5.0).unwrap();

    let value = serde_json::to_value(&done.receipt).unwrap();
    assert_eq!(value["side"], "NO");
    assert_eq!(value["shares_got"], done.receipt.shares_got);
}

// ---- Concurrency ----

#[test]
fn test_pure_functions_are_thread_safe() {
    let params = SearchParams::default();
    let expected = lmsr::simulate_buy(Outcome::Yes, 10.0, 20.0, 100.0, 15.0, &params).unwrap();

    thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| lmsr::simulate_buy(Outcome::Yes, 10.0, 20.0, 100.0, 15.0, &params))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().unwrap(), expected);
        }
    });
}
