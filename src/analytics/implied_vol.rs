// src/analytics/implied_vol.rs
//! Implied volatility by Newton-Raphson on the forward pricer
//!
//! # Algorithm
//!
//! ```text
//! σₙ₊₁ = clamp(σₙ - (P(σₙ) - P_mkt) / (100·max(ν(σₙ), 1e-5·S)), 0, 5)
//! ```
//! where `P(σ) = S/F · C_fwd(σ)` and `ν` is the 50bp central-difference
//! vega per vol point. Iteration starts at 100% and stops once the premium
//! error relative to the forward drops below the tolerance.
//!
//! # Sentinels
//!
//! - zero days to expiry: no time value to invert
//! - premium at or below the zero-vol floor: volatility is 0
//! - iteration budget exhausted: non-convergence

use super::black76::{forward_option_price, option_vega};
use crate::error::{validation::*, PricingError, PricingResult};
use crate::instruments::CallOrPut;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpliedVolConfig {
    pub initial_vol: f64,
    pub max_iterations: usize,
    pub vol_cap: f64,
    /// Vega floor as a fraction of spot
    pub vega_floor_ratio: f64,
    /// Convergence threshold on |P(σ) - P_mkt| / F
    pub tolerance: f64,
}

impl Default for ImpliedVolConfig {
    fn default() -> Self {
        ImpliedVolConfig {
            initial_vol: 1.0,
            max_iterations: 1000,
            vol_cap: 5.0,
            vega_floor_ratio: 0.00001,
            tolerance: 0.00001,
        }
    }
}

impl ImpliedVolConfig {
    /// Validate the solver configuration
    pub fn validate(&self) -> PricingResult<()> {
        validate_iterations(self.max_iterations)?;
        validate_positive("vol_cap", self.vol_cap)?;
        validate_range("initial_vol", self.initial_vol, 0.0, self.vol_cap)?;
        validate_positive("vega_floor_ratio", self.vega_floor_ratio)?;
        validate_positive("tolerance", self.tolerance)?;
        Ok(())
    }
}

/// Premium (spot value) at zero volatility: the intrinsic floor.
pub fn floor_premium(expiry_days: i64, strike: f64, spot: f64, forward: f64, call_put: CallOrPut) -> f64 {
    spot / forward * forward_option_price(expiry_days, strike, forward, 0.0, call_put)
}

/// Implied volatility for a premium in quote-coin spot value
///
/// Returns `NaN` for zero expiry, a missing call/put flag or
/// non-convergence, and `0.0` when the premium does not exceed intrinsic.
/// Results always lie in `[0, 5]`.
pub fn implied_vol(
    expiry_days: i64,
    strike: f64,
    spot: f64,
    forward: f64,
    premium: f64,
    call_put: CallOrPut,
) -> f64 {
    solve_implied_vol(
        expiry_days,
        strike,
        spot,
        forward,
        premium,
        call_put,
        &ImpliedVolConfig::default(),
    )
    .unwrap_or(f64::NAN)
}

/// Typed form of [`implied_vol`] with an explicit configuration.
///
/// # Errors
///
/// - `ZeroExpiry` when `expiry_days == 0`
/// - `NotAnOption` when `call_put` is `NotApplicable`
/// - `NonConvergence` when the iteration budget runs out
/// - `InvalidParameters` or `InvalidConfiguration` when `cfg` fails
///   [`ImpliedVolConfig::validate`]
/// - `InvalidParameters` for a non-finite premium, a non-positive spot or
///   forward, or a negative strike
pub fn solve_implied_vol(
    expiry_days: i64,
    strike: f64,
    spot: f64,
    forward: f64,
    premium: f64,
    call_put: CallOrPut,
    cfg: &ImpliedVolConfig,
) -> PricingResult<f64> {
    cfg.validate()?;
    if call_put == CallOrPut::NotApplicable {
        return Err(PricingError::NotAnOption {
            contract: format!("strike {} without call/put flag", strike),
        });
    }
    if expiry_days == 0 {
        return Err(PricingError::ZeroExpiry);
    }
    validate_finite("premium", premium)?;
    validate_positive("spot", spot)?;
    validate_positive("forward", forward)?;
    validate_non_negative("strike", strike)?;

    if premium <= floor_premium(expiry_days, strike, spot, forward, call_put) {
        return Ok(0.0);
    }

    let vega_floor = cfg.vega_floor_ratio * spot;
    let mut guess_vol = cfg.initial_vol;
    for iteration in 0..cfg.max_iterations {
        let guess_premium =
            spot / forward * forward_option_price(expiry_days, strike, forward, guess_vol, call_put);
        let vega = option_vega(expiry_days, strike, spot, forward, guess_vol).max(vega_floor);

        guess_vol -= (guess_premium - premium) / (vega * 100.0);
        guess_vol = guess_vol.max(0.0).min(cfg.vol_cap);

        if (guess_premium - premium).abs() / forward < cfg.tolerance {
            debug!(iterations = iteration + 1, vol = guess_vol, "implied vol converged");
            return Ok(guess_vol);
        }
    }

    warn!(
        expiry_days,
        strike,
        forward,
        premium,
        last_vol = guess_vol,
        "implied vol did not converge"
    );
    Err(PricingError::NonConvergence {
        iterations: cfg.max_iterations,
        last_vol: guess_vol,
    })
}
