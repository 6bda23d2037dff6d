// src/analytics/mod.rs
//! Closed-form forward option pricing and its inversion
pub mod black76;
pub mod implied_vol;

pub use black76::{forward_option_price, option_vega};
pub use implied_vol::{implied_vol, solve_implied_vol, ImpliedVolConfig};
