//! # coin-greeks: Pricing and Risk for Coin-Margined Crypto Derivatives
//!
//! A Rust library for valuing European options and linear futures/perpetuals
//! written on a coin (BTC, ETH) and quoted in USD, inverting option premiums
//! into implied volatility, and computing position Greeks.
//!
//! ## Key Features
//!
//! - **Forward Pricing**: Undiscounted Black-76 with the base coin as zero-rate numeraire
//! - **Implied Volatility**: Newton-Raphson with vega floor and `[0, 500%]` clamp
//! - **Bump-and-Revalue Greeks**: Delta, Gamma, Vega, Theta and cash/forward bucket delta
//! - **Instrument Names**: Exchange identifiers such as `BTC-28JUN19-5000-C` and an injectable cache
//! - **Portfolio Risk**: Parallel aggregation with Rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use coin_greeks::instruments::{Contract, Position};
//! use std::sync::Arc;
//!
//! let asof = Utc.with_ymd_and_hms(2019, 6, 21, 8, 0, 0).unwrap();
//! let call: Contract = "BTC-28JUN19-5000-C".parse().expect("valid name");
//!
//! // Premium in USD, then back out the volatility
//! let premium = call.option_price(asof, 5500.0, 5500.0, 0.8);
//! let vol = call.implied_vol(asof, 5500.0, 5500.0, premium);
//! assert!((vol - 0.8).abs() < 1e-4);
//!
//! let position = Position::new(Arc::new(call), 2.0, 0.0);
//! let delta = position.delta(asof, 5500.0, 5500.0, 0.8);
//! assert!(delta > 0.0);
//! ```
//!
//! ## Failure Signalling
//!
//! The numeric entry points never panic or return errors: an option-only
//! computation on a linear contract, a zero-day implied vol and solver
//! non-convergence all produce `NaN`. The `try_*` variants and
//! [`analytics::solve_implied_vol`] return a [`PricingError`] instead.

// Module declarations
pub mod analytics;
pub mod dates;
pub mod error;
pub mod instruments;
pub mod math_utils;
pub mod risk;

// Re-export commonly used types for convenience
pub use error::{PricingError, PricingResult};
pub use instruments::{CallOrPut, Coin, Contract, ContractCache, Pair, Position};
pub use risk::{MarketSnapshot, Portfolio, RiskMeasures, RiskReport};
