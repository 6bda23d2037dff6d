// src/instruments/mod.rs
//! Contracts, positions and the instrument cache
pub mod cache;
pub mod contract;
pub mod naming;
pub mod pair;
pub mod position;

pub use cache::ContractCache;
pub use contract::{CallOrPut, Contract};
pub use pair::{Coin, Pair};
pub use position::Position;
