// src/instruments/contract.rs
//! Instrument descriptors
//!
//! A [`Contract`] is either a European option, a dated linear future or a
//! perpetual, all written on a coin-margined [`Pair`]. Contracts are built
//! once and never mutated; positions and caches share them behind `Arc`.

use super::pair::Pair;
use crate::analytics::{black76, implied_vol};
use crate::dates::day_diff;
use crate::error::{PricingError, PricingResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallOrPut {
    Call,
    Put,
    /// Linear (non-option) contracts
    NotApplicable,
}

impl CallOrPut {
    pub fn code(&self) -> &'static str {
        match self {
            CallOrPut::Call => "C",
            CallOrPut::Put => "P",
            CallOrPut::NotApplicable => "N",
        }
    }

    /// The opposite option flag; `NotApplicable` maps to itself.
    pub fn mirror(&self) -> CallOrPut {
        match self {
            CallOrPut::Call => CallOrPut::Put,
            CallOrPut::Put => CallOrPut::Call,
            CallOrPut::NotApplicable => CallOrPut::NotApplicable,
        }
    }
}

impl fmt::Display for CallOrPut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    is_option: bool,
    underlying: Pair,
    expiry: DateTime<Utc>,
    delivery: DateTime<Utc>,
    strike: f64,
    call_put: CallOrPut,
    perp: bool,
}

impl Contract {
    /// European option delivering at expiry.
    ///
    /// Passing `CallOrPut::NotApplicable` yields a contract that prices as
    /// `NaN`, matching the policy for any non-priceable request.
    pub fn option(underlying: Pair, expiry: DateTime<Utc>, strike: f64, call_put: CallOrPut) -> Self {
        Contract {
            is_option: true,
            underlying,
            expiry,
            delivery: expiry,
            strike,
            call_put,
            perp: false,
        }
    }

    /// Dated linear future.
    pub fn future(underlying: Pair, expiry: DateTime<Utc>) -> Self {
        Contract {
            is_option: false,
            underlying,
            expiry,
            delivery: expiry,
            strike: 0.0,
            call_put: CallOrPut::NotApplicable,
            perp: false,
        }
    }

    /// Perpetual swap. Its expiry is the construction time and carries no meaning.
    pub fn perpetual(underlying: Pair) -> Self {
        Self::perpetual_at(underlying, Utc::now())
    }

    /// Perpetual swap stamped with an explicit construction time.
    pub fn perpetual_at(underlying: Pair, now: DateTime<Utc>) -> Self {
        Contract {
            perp: true,
            ..Self::future(underlying, now)
        }
    }

    pub(crate) fn from_parts(
        is_option: bool,
        underlying: Pair,
        expiry: DateTime<Utc>,
        strike: f64,
        call_put: CallOrPut,
        perp: bool,
    ) -> Self {
        if is_option {
            Contract::option(underlying, expiry, strike, call_put)
        } else if perp {
            Contract::perpetual_at(underlying, expiry)
        } else {
            Contract::future(underlying, expiry)
        }
    }

    pub fn is_option(&self) -> bool {
        self.is_option
    }

    pub fn is_perpetual(&self) -> bool {
        self.perp
    }

    pub fn underlying(&self) -> Pair {
        self.underlying
    }

    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    pub fn delivery(&self) -> DateTime<Utc> {
        self.delivery
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn call_put(&self) -> CallOrPut {
        self.call_put
    }

    pub fn expiry_days(&self, asof: DateTime<Utc>) -> i64 {
        day_diff(asof, self.expiry)
    }

    /// The linear contract an option is written on. Linear contracts return a copy of themselves.
    pub fn underlying_future(&self) -> Contract {
        if self.is_option {
            Contract::future(self.underlying, self.expiry)
        } else {
            self.clone()
        }
    }

    /// Same option with the call/put flag swapped.
    pub fn call_put_mirror(&self) -> Contract {
        Contract {
            call_put: self.call_put.mirror(),
            ..self.clone()
        }
    }

    /// Option premium in quote-coin spot value, or `NaN` for a linear contract.
    pub fn option_price(&self, asof: DateTime<Utc>, spot: f64, forward: f64, vol: f64) -> f64 {
        self.try_option_price(asof, spot, forward, vol)
            .unwrap_or(f64::NAN)
    }

    pub fn try_option_price(
        &self,
        asof: DateTime<Utc>,
        spot: f64,
        forward: f64,
        vol: f64,
    ) -> PricingResult<f64> {
        self.ensure_option()?;
        let premium = black76::forward_option_price(
            self.expiry_days(asof),
            self.strike,
            forward,
            vol,
            self.call_put,
        );
        Ok(premium * spot / forward)
    }

    /// Implied volatility from a premium in quote-coin spot value (the units
    /// [`Contract::option_price`] returns). `NaN` if the solver cannot
    /// produce a volatility.
    pub fn implied_vol(&self, asof: DateTime<Utc>, spot: f64, forward: f64, premium: f64) -> f64 {
        self.try_implied_vol(asof, spot, forward, premium)
            .unwrap_or(f64::NAN)
    }

    /// Implied volatility from a premium quoted in base coin, the way the
    /// exchange quotes option prices.
    pub fn implied_vol_from_coin_price(
        &self,
        asof: DateTime<Utc>,
        spot: f64,
        forward: f64,
        coin_premium: f64,
    ) -> f64 {
        self.implied_vol(asof, spot, forward, coin_premium * spot)
    }

    pub fn try_implied_vol(
        &self,
        asof: DateTime<Utc>,
        spot: f64,
        forward: f64,
        premium: f64,
    ) -> PricingResult<f64> {
        self.ensure_option()?;
        implied_vol::solve_implied_vol(
            self.expiry_days(asof),
            self.strike,
            spot,
            forward,
            premium,
            self.call_put,
            &implied_vol::ImpliedVolConfig::default(),
        )
    }

    /// Analytic forward delta, `Φ(ln(F/K) / σ√t)` (minus one for puts).
    pub fn simple_delta(&self, asof: DateTime<Utc>, forward: f64, vol: f64) -> f64 {
        if !self.is_option {
            return f64::NAN;
        }
        black76::simple_delta(self.expiry_days(asof), self.strike, forward, vol, self.call_put)
    }

    fn ensure_option(&self) -> PricingResult<()> {
        if self.is_option {
            Ok(())
        } else {
            Err(PricingError::NotAnOption {
                contract: self.name(),
            })
        }
    }
}
