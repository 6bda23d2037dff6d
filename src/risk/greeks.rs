// src/risk/greeks.rs
//! Position valuation and bump-and-revalue Greeks
//!
//! # Conventions
//!
//! Present value is in quote-coin spot value. Options are worth
//! `option_price · quantity`; linear contracts use the inverse (coin-margined)
//! P&L
//! ```text
//! PV = (1/entry - 1/F) · S · quantity · LINEAR_CONTRACT_SIZE
//! ```
//!
//! Every Greek is a central difference of [`Position::pv`]:
//! ```text
//! vega  = PV(σ + 0.005) - PV(σ - 0.005)
//! delta = [PV(1.005·S, 1.005·F) - PV(0.995·S, 0.995·F)] · 100 / S
//! gamma = delta(1.005·S, 1.005·F) - delta(0.995·S, 0.995·F)
//! theta = PV(t + 1d) - PV(t)
//! ```
//! The bump sizes and the ×100 scaling define the reported numbers; they
//! are constants, not tuning knobs.

use crate::analytics::black76::VOL_BUMP;
use crate::instruments::Position;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

/// Relative bump applied to spot and forward.
pub const SPOT_BUMP: f64 = 0.005;

/// Quote-coin notional of one linear contract.
pub const LINEAR_CONTRACT_SIZE: f64 = 1.0;

/// Bucket holding the spot-only part of delta.
pub const CASH_BUCKET: &str = "CASH";

const UP: f64 = 1.0 + SPOT_BUMP;
const DOWN: f64 = 1.0 - SPOT_BUMP;
/// Scales a ±0.5% revaluation to a 1% move.
const PER_PERCENT: f64 = 100.0;

impl Position {
    /// Present value in quote-coin spot value.
    pub fn pv(&self, asof: DateTime<Utc>, spot: f64, forward: f64, vol: f64) -> f64 {
        let contract = self.contract();
        if contract.is_option() {
            contract.option_price(asof, spot, forward, vol) * self.quantity()
        } else {
            (1.0 / self.entry_price() - 1.0 / forward) * spot * self.quantity() * LINEAR_CONTRACT_SIZE
        }
    }

    /// PV change across a 1 vol point move, quote-coin spot value.
    pub fn vega(&self, asof: DateTime<Utc>, spot: f64, forward: f64, vol: f64) -> f64 {
        self.pv(asof, spot, forward, vol + VOL_BUMP) - self.pv(asof, spot, forward, vol - VOL_BUMP)
    }

    /// Delta in base-coin spot value, spot and forward moved together.
    pub fn delta(&self, asof: DateTime<Utc>, spot: f64, forward: f64, vol: f64) -> f64 {
        self.parallel_move(asof, spot, forward, vol) / spot
    }

    /// Change in delta across a ±0.5% parallel move of spot and forward.
    pub fn gamma(&self, asof: DateTime<Utc>, spot: f64, forward: f64, vol: f64) -> f64 {
        self.delta(asof, spot * UP, forward * UP, vol) - self.delta(asof, spot * DOWN, forward * DOWN, vol)
    }

    /// One-day time decay with market inputs held fixed.
    pub fn theta(&self, asof: DateTime<Utc>, spot: f64, forward: f64, vol: f64) -> f64 {
        self.pv(asof + Duration::days(1), spot, forward, vol) - self.pv(asof, spot, forward, vol)
    }

    /// Delta split into a [`CASH_BUCKET`] part (spot moved, forward fixed) and
    /// the remainder, keyed by the name of the underlying linear contract.
    ///
    /// The two buckets sum to [`Position::delta`].
    pub fn bucket_delta(
        &self,
        asof: DateTime<Utc>,
        spot: f64,
        forward: f64,
        vol: f64,
    ) -> BTreeMap<String, f64> {
        let total = self.parallel_move(asof, spot, forward, vol);
        let cash = (self.pv(asof, spot * UP, forward, vol) - self.pv(asof, spot * DOWN, forward, vol))
            * PER_PERCENT;

        let mut buckets = BTreeMap::new();
        buckets.insert(CASH_BUCKET.to_string(), cash / spot);
        buckets.insert(
            self.contract().underlying_future().name(),
            (total - cash) / spot,
        );
        buckets
    }

    fn parallel_move(&self, asof: DateTime<Utc>, spot: f64, forward: f64, vol: f64) -> f64 {
        (self.pv(asof, spot * UP, forward * UP, vol) - self.pv(asof, spot * DOWN, forward * DOWN, vol))
            * PER_PERCENT
    }
}
