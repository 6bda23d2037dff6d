// src/analytics/black76.rs
//! Undiscounted Black-76 pricing on a forward
//!
//! # Mathematical Foundation
//!
//! The base coin is the numeraire and carries no interest, so the premium
//! of a European option on the forward `F` is
//! ```text
//! C = F·Φ(d₁) - K·Φ(d₂)
//! P = K·Φ(-d₂) - F·Φ(-d₁)
//!
//! d₁ = [ln(F/K) + σ²t/2] / (σ√t),   d₂ = d₁ - σ√t,   t = days/365
//! ```
//! expressed in quote currency at forward value. Callers convert to spot
//! value by multiplying by `S/F`.

use crate::instruments::CallOrPut;
use crate::math_utils::norm_cdf;

/// Volatility bump used by the finite-difference vega, 50bp each side.
pub const VOL_BUMP: f64 = 0.005;

/// Year fraction for an integer day count (ACT/365).
#[inline]
pub fn year_fraction(expiry_days: i64) -> f64 {
    expiry_days as f64 / 365.0
}

/// Intrinsic value on the forward
#[inline]
pub fn intrinsic(forward: f64, strike: f64, call_put: CallOrPut) -> f64 {
    match call_put {
        CallOrPut::Call => (forward - strike).max(0.0),
        CallOrPut::Put => (strike - forward).max(0.0),
        CallOrPut::NotApplicable => f64::NAN,
    }
}

/// Forward option premium in quote currency, undiscounted
///
/// # Parameters
/// - `expiry_days`: Days to expiry; zero removes all time value
/// - `strike`: Strike K
/// - `forward`: Forward F for the expiry
/// - `vol`: Annualised volatility σ
/// - `call_put`: `NotApplicable` yields `NaN`
///
/// # Edge Cases
/// - `expiry_days == 0` or `vol == 0` returns exactly the intrinsic value,
///   including the at-the-money case where `d₁` would be `0/0`.
pub fn forward_option_price(
    expiry_days: i64,
    strike: f64,
    forward: f64,
    vol: f64,
    call_put: CallOrPut,
) -> f64 {
    let vol = if expiry_days == 0 { 0.0 } else { vol };
    if vol == 0.0 {
        return intrinsic(forward, strike, call_put);
    }

    let t = year_fraction(expiry_days);
    let sig_sqrt_t = vol * t.sqrt();
    let d1 = ((forward / strike).ln() + 0.5 * vol * vol * t) / sig_sqrt_t;
    let d2 = d1 - sig_sqrt_t;

    match call_put {
        CallOrPut::Call => forward * norm_cdf(d1) - strike * norm_cdf(d2),
        CallOrPut::Put => -forward * norm_cdf(-d1) + strike * norm_cdf(-d2),
        CallOrPut::NotApplicable => f64::NAN,
    }
}

/// Central-difference vega in spot value, per 1 vol point
///
/// ```text
/// ν = S/F · [C(σ + 0.005) - C(σ - 0.005)]
/// ```
/// Always evaluated on the call; vega is the same for puts under this model.
pub fn option_vega(expiry_days: i64, strike: f64, spot: f64, forward: f64, vol: f64) -> f64 {
    spot / forward
        * (forward_option_price(expiry_days, strike, forward, vol + VOL_BUMP, CallOrPut::Call)
            - forward_option_price(expiry_days, strike, forward, vol - VOL_BUMP, CallOrPut::Call))
}

/// Analytic forward delta without the convexity term in d₁
///
/// ```text
/// Δ_call = Φ(ln(F/K) / (σ√t)),   Δ_put = Δ_call - 1
/// ```
pub fn simple_delta(expiry_days: i64, strike: f64, forward: f64, vol: f64, call_put: CallOrPut) -> f64 {
    let d = (forward / strike).ln() / (vol * year_fraction(expiry_days).sqrt());
    match call_put {
        CallOrPut::Call => norm_cdf(d),
        CallOrPut::Put => norm_cdf(d) - 1.0,
        CallOrPut::NotApplicable => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_put_call_parity() {
        for &(strike, forward) in &[(5000.0, 5500.0), (8000.0, 8000.0), (12000.0, 9000.0)] {
            for &days in &[1, 30, 365] {
                let c = forward_option_price(days, strike, forward, 0.8, CallOrPut::Call);
                let p = forward_option_price(days, strike, forward, 0.8, CallOrPut::Put);
                assert_relative_eq!(c - p, forward - strike, epsilon = 1e-8, max_relative = 1e-6);
            }
        }
    }

    #[test]
    fn test_zero_vol_is_intrinsic() {
        assert_eq!(forward_option_price(30, 5000.0, 5500.0, 0.0, CallOrPut::Call), 500.0);
        assert_eq!(forward_option_price(30, 5000.0, 5500.0, 0.0, CallOrPut::Put), 0.0);
        assert_eq!(forward_option_price(30, 6000.0, 5500.0, 0.0, CallOrPut::Put), 500.0);
        // at the money stays finite
        assert_eq!(forward_option_price(30, 5500.0, 5500.0, 0.0, CallOrPut::Call), 0.0);
    }

    #[test]
    fn test_zero_days_ignores_vol() {
        assert_eq!(forward_option_price(0, 5000.0, 5500.0, 0.9, CallOrPut::Call), 500.0);
        assert_eq!(forward_option_price(0, 5000.0, 5500.0, 3.0, CallOrPut::Put), 0.0);
    }

    #[test]
    fn test_not_applicable_is_nan() {
        assert!(forward_option_price(30, 5000.0, 5500.0, 0.8, CallOrPut::NotApplicable).is_nan());
    }

    #[test]
    fn test_reference_price() {
        // F = K = 100, σ = 20%, t = 1y: 100·(2Φ(0.1) - 1)
        let c = forward_option_price(365, 100.0, 100.0, 0.2, CallOrPut::Call);
        assert_abs_diff_eq!(c, 7.965_567_455_405_804, epsilon = 1e-9);
    }

    #[test]
    fn test_vega_matches_analytic() {
        // ν ≈ S/F · F·φ(d₁)·√t · 0.01 for a small bump
        let (days, k, s, f, vol): (i64, f64, f64, f64, f64) = (90, 9000.0, 8800.0, 9100.0, 0.6);
        let t = year_fraction(days);
        let d1 = ((f / k).ln() + 0.5 * vol * vol * t) / (vol * t.sqrt());
        let pdf = (-0.5 * d1 * d1).exp() / (2.0 * std::f64::consts::PI).sqrt();
        let analytic = s / f * f * pdf * t.sqrt() * 0.01;
        assert_relative_eq!(option_vega(days, k, s, f, vol), analytic, max_relative = 1e-4);
    }
}
