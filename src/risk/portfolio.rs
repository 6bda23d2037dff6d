// src/risk/portfolio.rs
//! Aggregate risk over many positions
//!
//! Each position is revalued independently, so the sums are computed in
//! parallel with Rayon. Every position sees the same [`MarketSnapshot`].

use super::greeks::CASH_BUCKET;
use crate::instruments::Position;
use bitflags::bitflags;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

bitflags! {
    /// Measures to include in a [`RiskReport`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RiskMeasures: u32 {
        const NONE         = 0;
        const PV           = 1 << 0;
        const DELTA        = 1 << 1;
        const GAMMA        = 1 << 2;
        const VEGA         = 1 << 3;
        const THETA        = 1 << 4;
        const BUCKET_DELTA = 1 << 5;
        const ALL = Self::PV.bits()
            | Self::DELTA.bits()
            | Self::GAMMA.bits()
            | Self::VEGA.bits()
            | Self::THETA.bits()
            | Self::BUCKET_DELTA.bits();
    }
}

/// Market inputs for one revaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub asof: DateTime<Utc>,
    pub spot: f64,
    pub forward: f64,
    pub vol: f64,
}

impl MarketSnapshot {
    pub fn new(asof: DateTime<Utc>, spot: f64, forward: f64, vol: f64) -> Self {
        MarketSnapshot {
            asof,
            spot,
            forward,
            vol,
        }
    }
}

/// Requested measures; `None` where a measure was not asked for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub positions: usize,
    pub pv: Option<f64>,
    pub delta: Option<f64>,
    pub gamma: Option<f64>,
    pub vega: Option<f64>,
    pub theta: Option<f64>,
    pub bucket_delta: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    positions: Vec<Position>,
}

impl From<Vec<Position>> for Portfolio {
    fn from(positions: Vec<Position>) -> Self {
        Portfolio { positions }
    }
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, position: Position) {
        self.positions.push(position);
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn pv(&self, m: &MarketSnapshot) -> f64 {
        self.sum_by(|p| p.pv(m.asof, m.spot, m.forward, m.vol))
    }

    pub fn delta(&self, m: &MarketSnapshot) -> f64 {
        self.sum_by(|p| p.delta(m.asof, m.spot, m.forward, m.vol))
    }

    pub fn gamma(&self, m: &MarketSnapshot) -> f64 {
        self.sum_by(|p| p.gamma(m.asof, m.spot, m.forward, m.vol))
    }

    pub fn vega(&self, m: &MarketSnapshot) -> f64 {
        self.sum_by(|p| p.vega(m.asof, m.spot, m.forward, m.vol))
    }

    pub fn theta(&self, m: &MarketSnapshot) -> f64 {
        self.sum_by(|p| p.theta(m.asof, m.spot, m.forward, m.vol))
    }

    /// Per-position bucket deltas merged by bucket name.
    ///
    /// Always contains the [`CASH_BUCKET`] key, even for an empty portfolio.
    pub fn bucket_delta(&self, m: &MarketSnapshot) -> BTreeMap<String, f64> {
        let mut seed = BTreeMap::new();
        seed.insert(CASH_BUCKET.to_string(), 0.0);

        self.positions
            .par_iter()
            .map(|p| p.bucket_delta(m.asof, m.spot, m.forward, m.vol))
            .reduce(BTreeMap::new, merge_buckets)
            .into_iter()
            .fold(seed, |mut acc, (name, delta)| {
                *acc.entry(name).or_insert(0.0) += delta;
                acc
            })
    }

    /// Compute the selected measures in one call.
    pub fn risk_report(&self, m: &MarketSnapshot, measures: RiskMeasures) -> RiskReport {
        debug!(
            positions = self.positions.len(),
            ?measures,
            spot = m.spot,
            forward = m.forward,
            vol = m.vol,
            "portfolio risk run"
        );

        let pick = |flag: RiskMeasures, f: &dyn Fn() -> f64| measures.contains(flag).then(f);

        RiskReport {
            positions: self.positions.len(),
            pv: pick(RiskMeasures::PV, &|| self.pv(m)),
            delta: pick(RiskMeasures::DELTA, &|| self.delta(m)),
            gamma: pick(RiskMeasures::GAMMA, &|| self.gamma(m)),
            vega: pick(RiskMeasures::VEGA, &|| self.vega(m)),
            theta: pick(RiskMeasures::THETA, &|| self.theta(m)),
            bucket_delta: measures
                .contains(RiskMeasures::BUCKET_DELTA)
                .then(|| self.bucket_delta(m)),
        }
    }

    fn sum_by<F>(&self, f: F) -> f64
    where
        F: Fn(&Position) -> f64 + Sync + Send,
    {
        self.positions.par_iter().map(f).sum()
    }
}

fn merge_buckets(mut a: BTreeMap<String, f64>, b: BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    for (name, delta) in b {
        *a.entry(name).or_insert(0.0) += delta;
    }
    a
}
