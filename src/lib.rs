//! LMSR Engine — Library Root
//!
//! Pricing engine for binary prediction markets run by a Logarithmic
//! Market Scoring Rule market maker, plus the use cases built on it.

pub mod config;
pub mod domain;
pub mod telemetry;
pub mod usecases;
