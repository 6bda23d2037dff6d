// src/instruments/pair.rs
use crate::error::PricingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coins the engine knows how to quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coin {
    BTC,
    ETH,
    USD,
}

impl Coin {
    pub fn ticker(&self) -> &'static str {
        match self {
            Coin::BTC => "BTC",
            Coin::ETH => "ETH",
            Coin::USD => "USD",
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ticker())
    }
}

impl FromStr for Coin {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BTC" => Ok(Coin::BTC),
            "ETH" => Ok(Coin::ETH),
            "USD" => Ok(Coin::USD),
            _ => Err(PricingError::parse(s, "do not recognise coin")),
        }
    }
}

/// Underlying of a contract: `coin` priced in `quote`
///
/// `coin` is the base (LHS) asset the contract is written on and also the
/// zero-rate numeraire; `quote` (RHS) is the currency premiums are
/// denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub coin: Coin,
    pub quote: Coin,
}

impl Pair {
    pub const BTC_USD: Pair = Pair {
        coin: Coin::BTC,
        quote: Coin::USD,
    };

    pub const ETH_USD: Pair = Pair {
        coin: Coin::ETH,
        quote: Coin::USD,
    };

    pub fn new(coin: Coin, quote: Coin) -> Self {
        Pair { coin, quote }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.coin, self.quote)
    }
}
