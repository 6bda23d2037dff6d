// src/risk/mod.rs
//! Position and portfolio risk by bump-and-revalue
pub mod greeks;
pub mod portfolio;

pub use greeks::{CASH_BUCKET, LINEAR_CONTRACT_SIZE, SPOT_BUMP};
pub use portfolio::{MarketSnapshot, Portfolio, RiskMeasures, RiskReport};
