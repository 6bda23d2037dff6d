// src/instruments/cache.rs
//! Parse-once store of contracts keyed by exchange name
//!
//! The cache is an ordinary value owned by the host application and passed
//! where needed; nothing in the pricing engine consults it. Lookups are
//! sharded by `DashMap`, so one cache can be shared by reference across
//! threads.

use super::contract::Contract;
use super::position::Position;
use crate::error::{PricingError, PricingResult};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Default)]
pub struct ContractCache {
    contracts: DashMap<String, Arc<Contract>>,
}

impl ContractCache {
    pub fn new() -> Self {
        ContractCache {
            contracts: DashMap::new(),
        }
    }

    /// Shared handle for `name`, parsing it on first use.
    pub fn get_or_parse(&self, name: &str) -> PricingResult<Arc<Contract>> {
        if let Some(entry) = self.contracts.get(name) {
            return Ok(Arc::clone(&entry));
        }

        let contract: Contract = name.parse()?;
        trace!(name, "contract cache miss");
        // A racing insert of the same name wins; both callers get its handle
        Ok(self
            .contracts
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(contract))
            .clone())
    }

    /// Register a contract under its exchange name and return the cached handle.
    pub fn insert(&self, contract: Contract) -> Arc<Contract> {
        let contract = Arc::new(contract);
        self.contracts.insert(contract.name(), Arc::clone(&contract));
        contract
    }

    pub fn get(&self, name: &str) -> Option<Arc<Contract>> {
        self.contracts.get(name).map(|entry| Arc::clone(&entry))
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    pub fn clear(&self) {
        self.contracts.clear();
    }

    /// Build positions from exchange names.
    ///
    /// Without `quantities` or `prices` every position is flat at zero price.
    pub fn positions_from_names(
        &self,
        names: &[&str],
        quantities: Option<&[f64]>,
        prices: Option<&[f64]>,
    ) -> PricingResult<Vec<Position>> {
        let sized = match (quantities, prices) {
            (Some(q), Some(p)) => {
                if q.len() != names.len() || p.len() != names.len() {
                    return Err(PricingError::InvalidConfiguration {
                        field: "positions".to_string(),
                        reason: format!(
                            "{} names but {} quantities and {} prices",
                            names.len(),
                            q.len(),
                            p.len()
                        ),
                    });
                }
                Some((q, p))
            }
            _ => None,
        };

        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let contract = self.get_or_parse(name)?;
                Ok(match sized {
                    Some((q, p)) => Position::new(contract, q[i], p[i]),
                    None => Position::new(contract, 0.0, 0.0),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::{CallOrPut, Pair};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_repeated_lookups_share_one_contract() {
        let cache = ContractCache::new();
        let a = cache.get_or_parse("BTC-28JUN19-5000-C").unwrap();
        let b = cache.get_or_parse("BTC-28JUN19-5000-C").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_bad_name_is_not_cached() {
        let cache = ContractCache::new();
        assert!(cache.get_or_parse("BTC-NOPE-1-C").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_keys_by_name() {
        let cache = ContractCache::new();
        let expiry = Utc.with_ymd_and_hms(2019, 9, 27, 8, 0, 0).unwrap();
        let put = cache.insert(Contract::option(Pair::ETH_USD, expiry, 200.0, CallOrPut::Put));
        let found = cache.get("ETH-27SEP19-200-P").unwrap();
        assert!(Arc::ptr_eq(&put, &found));

        cache.clear();
        assert!(cache.get("ETH-27SEP19-200-P").is_none());
    }

    #[test]
    fn test_nearby_strikes_get_separate_entries() {
        let cache = ContractCache::new();
        let expiry = Utc.with_ymd_and_hms(2019, 6, 28, 8, 0, 0).unwrap();
        let round = cache.insert(Contract::option(Pair::BTC_USD, expiry, 5000.0, CallOrPut::Call));
        let odd = cache.insert(Contract::option(Pair::BTC_USD, expiry, 5000.4, CallOrPut::Call));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&round.name()).unwrap().strike(), 5000.0);
        assert_eq!(cache.get(&odd.name()).unwrap().strike(), 5000.4);
    }

    #[test]
    fn test_positions_from_names() {
        let cache = ContractCache::new();
        let names = ["BTC-28JUN19-5000-C", "BTC-28JUN19", "BTC-28JUN19-5000-C"];
        let posns = cache
            .positions_from_names(&names, Some(&[1.0, -2000.0, 2.0][..]), Some(&[0.1, 8000.0, 0.12][..]))
            .unwrap();
        assert_eq!(posns.len(), 3);
        assert_eq!(posns[1].quantity(), -2000.0);
        assert_eq!(posns[2].entry_price(), 0.12);
        assert!(Arc::ptr_eq(&posns[0].shared_contract(), &posns[2].shared_contract()));
        assert_eq!(cache.len(), 2);

        let flat = cache.positions_from_names(&names, None, None).unwrap();
        assert!(flat.iter().all(|p| p.quantity() == 0.0 && p.entry_price() == 0.0));
    }

    #[test]
    fn test_positions_from_names_length_mismatch() {
        let cache = ContractCache::new();
        let err = cache
            .positions_from_names(&["BTC-28JUN19"], Some(&[1.0, 2.0][..]), Some(&[8000.0][..]))
            .unwrap_err();
        assert!(matches!(err, PricingError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_cache_shared_across_threads() {
        let cache = ContractCache::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for strike in [3000, 4000, 5000] {
                        let name = format!("BTC-28JUN19-{}-P", strike);
                        cache.get_or_parse(&name).unwrap();
                    }
                });
            }
        });
        assert_eq!(cache.len(), 3);
    }
}
