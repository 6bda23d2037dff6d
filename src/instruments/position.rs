// src/instruments/position.rs
use super::contract::Contract;
use std::sync::Arc;

/// A holding in one contract
///
/// The contract is shared, not owned: several positions (and the
/// [`ContractCache`](super::ContractCache)) may point at the same one.
/// Valuation and risk live in [`crate::risk`].
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    contract: Arc<Contract>,
    quantity: f64,
    entry_price: f64,
}

impl Position {
    /// `quantity` is signed (positive = long). `entry_price` is quote per
    /// base coin; for options it is not used in valuation.
    pub fn new(contract: Arc<Contract>, quantity: f64, entry_price: f64) -> Self {
        Position {
            contract,
            quantity,
            entry_price,
        }
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn shared_contract(&self) -> Arc<Contract> {
        Arc::clone(&self.contract)
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }
}
