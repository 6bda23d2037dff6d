// src/instruments/naming.rs
//! Exchange-style instrument identifiers
//!
//! Full names follow the exchange convention:
//! ```text
//! BTC-PERPETUAL          perpetual swap
//! BTC-28JUN19            dated future
//! BTC-28JUN19-5000-C     option (C or P)
//! ```
//! Dated expiries settle at 08:00 UTC.
//!
//! [`Contract::from_partial_name`] additionally accepts a shorthand such as
//! `JUN-5000-C`, `FRI-P` or `ETH-PERP` relative to a supplied clock.

use super::contract::{CallOrPut, Contract};
use super::pair::{Coin, Pair};
use crate::error::{PricingError, PricingResult};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

const EXPIRY_HOUR: u32 = 8;
const PARTIAL_NAME_USAGE: &str =
    "don't understand contract; examples: JUN or 3500 or MAR-4000-C or BTC-3000-P";

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

impl Contract {
    /// Exchange identifier of the contract.
    pub fn name(&self) -> String {
        let coin = self.underlying().coin;
        if self.is_option() {
            format!(
                "{}-{}-{}-{}",
                coin,
                expiry_code(self.expiry()),
                self.strike(),
                self.call_put()
            )
        } else if self.is_perpetual() {
            format!("{}-PERPETUAL", coin)
        } else {
            format!("{}-{}", coin, expiry_code(self.expiry()))
        }
    }

    /// Parse a shorthand description, filling the gaps with defaults.
    ///
    /// Tokens are separated by `-` and matched case-insensitively. `now` is
    /// the reference clock for `PERP`, `FRI`, `2FR` and month names.
    pub fn from_partial_name(partial: &str, now: DateTime<Utc>) -> PricingResult<Contract> {
        let mut underlying = Pair::BTC_USD;
        let mut expiry = settlement(NaiveDate::from_ymd_opt(2019, 6, 28))
            .ok_or_else(|| PricingError::parse(partial, "invalid default expiry"))?;
        let mut strike = 5000.0;
        let mut call_put = CallOrPut::Call;
        let mut is_option = false;
        let mut perp = false;

        for token in partial.split('-') {
            let upper = token.to_ascii_uppercase();
            match upper.as_str() {
                "" => {}
                "PERP" => {
                    perp = true;
                    expiry = now;
                }
                "FRI" => expiry = next_friday(now, 0),
                "2FR" => expiry = next_friday(now, 7),
                "BTC" | "ETH" => underlying = Pair::new(upper.parse::<Coin>()?, Coin::USD),
                "C" => {
                    call_put = CallOrPut::Call;
                    is_option = true;
                }
                "P" => {
                    call_put = CallOrPut::Put;
                    is_option = true;
                }
                m if MONTHS.contains(&m) => {
                    expiry = last_friday_of(month_number(m), now)
                        .ok_or_else(|| PricingError::parse(partial, "cannot resolve month"))?;
                }
                other => {
                    if let Some(date) = parse_expiry(other) {
                        expiry = date;
                    } else if let Ok(n) = other.parse::<u32>() {
                        strike = f64::from(n);
                        is_option = true;
                    } else {
                        return Err(PricingError::parse(
                            partial,
                            format!("don't recognise '{}'; {}", token, PARTIAL_NAME_USAGE),
                        ));
                    }
                }
            }
        }

        if perp {
            is_option = false;
        }
        Ok(Contract::from_parts(
            is_option, underlying, expiry, strike, call_put, perp,
        ))
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Contract {
    type Err = PricingError;

    /// Parse a full exchange identifier. A perpetual is stamped with the current time.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = name.split('-').collect();
        if parts.len() != 2 && parts.len() != 4 {
            return Err(PricingError::parse(name, "not a good contract formation"));
        }

        let coin: Coin = parts[0]
            .parse()
            .map_err(|_| PricingError::parse(name, "do not recognise coin"))?;
        let underlying = Pair::new(coin, Coin::USD);

        if parts[1].eq_ignore_ascii_case("PERPETUAL") {
            if parts.len() == 4 {
                return Err(PricingError::parse(name, "options on perpetuals are not listed"));
            }
            return Ok(Contract::perpetual(underlying));
        }

        let expiry = parse_expiry(parts[1])
            .ok_or_else(|| PricingError::parse(name, format!("bad expiry '{}'", parts[1])))?;

        if parts.len() == 2 {
            return Ok(Contract::future(underlying, expiry));
        }

        let strike: f64 = parts[2]
            .parse()
            .map_err(|_| PricingError::parse(name, format!("bad strike '{}'", parts[2])))?;
        let call_put = match parts[3] {
            "C" | "c" => CallOrPut::Call,
            "P" | "p" => CallOrPut::Put,
            _ => return Err(PricingError::parse(name, "need C or P")),
        };

        Ok(Contract::option(underlying, expiry, strike, call_put))
    }
}

fn expiry_code(expiry: DateTime<Utc>) -> String {
    expiry.format("%-d%b%y").to_string().to_uppercase()
}

fn settlement(date: Option<NaiveDate>) -> Option<DateTime<Utc>> {
    date?.and_hms_opt(EXPIRY_HOUR, 0, 0).map(|dt| dt.and_utc())
}

/// `28JUN19` style date at the 08:00 UTC settlement time.
fn parse_expiry(code: &str) -> Option<DateTime<Utc>> {
    settlement(NaiveDate::parse_from_str(code, "%d%b%y").ok())
}

fn month_number(code: &str) -> u32 {
    MONTHS.iter().position(|m| *m == code).map_or(1, |i| i as u32 + 1)
}

/// Last Friday of `month`, in this year unless the month is already over.
fn last_friday_of(month: u32, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let following = month % 12 + 1;
    let mut year = now.year();
    if now.month() >= following {
        year += 1;
    }
    let first = settlement(NaiveDate::from_ymd_opt(year, following, 1))?;
    let back = 1 + (first.weekday().num_days_from_sunday() + 1) % 7;
    Some(first - Duration::days(i64::from(back)))
}

/// Next Friday settlement (today if Friday), plus `extra_days`.
fn next_friday(now: DateTime<Utc>, extra_days: i64) -> DateTime<Utc> {
    let today = crate::dates::utc_midnight(now) + Duration::hours(i64::from(EXPIRY_HOUR));
    let ahead = (5 - i64::from(today.weekday().num_days_from_sunday())).rem_euclid(7);
    today + Duration::days(ahead + extra_days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Weekday};

    fn jun28() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 6, 28, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_names() {
        let call = Contract::option(Pair::BTC_USD, jun28(), 5000.0, CallOrPut::Call);
        assert_eq!(call.name(), "BTC-28JUN19-5000-C");
        assert_eq!(call.call_put_mirror().to_string(), "BTC-28JUN19-5000-P");
        assert_eq!(Contract::future(Pair::ETH_USD, jun28()).name(), "ETH-28JUN19");
        assert_eq!(Contract::perpetual(Pair::BTC_USD).name(), "BTC-PERPETUAL");

        let single_digit = Utc.with_ymd_and_hms(2019, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(Contract::future(Pair::BTC_USD, single_digit).name(), "BTC-1MAR19");
    }

    #[test]
    fn test_fractional_strike_keeps_its_digits() {
        let odd = Contract::option(Pair::BTC_USD, jun28(), 5000.4, CallOrPut::Put);
        let round = Contract::option(Pair::BTC_USD, jun28(), 5000.0, CallOrPut::Put);
        assert_eq!(odd.name(), "BTC-28JUN19-5000.4-P");
        assert_ne!(odd.name(), round.name());

        let parsed: Contract = odd.name().parse().unwrap();
        assert_eq!(parsed, odd);
    }

    #[test]
    fn test_parse_full_names() {
        let call: Contract = "BTC-28JUN19-5000-C".parse().unwrap();
        assert!(call.is_option());
        assert_eq!(call.strike(), 5000.0);
        assert_eq!(call.call_put(), CallOrPut::Call);
        assert_eq!(call.expiry(), jun28());

        let fut: Contract = "BTC-28JUN19".parse().unwrap();
        assert_eq!(fut, Contract::future(Pair::BTC_USD, jun28()));

        let perp: Contract = "ETH-PERPETUAL".parse().unwrap();
        assert!(perp.is_perpetual());
        assert_eq!(perp.underlying(), Pair::ETH_USD);

        let short: Contract = "BTC-1MAR19-3500-P".parse().unwrap();
        assert_eq!(short.name(), "BTC-1MAR19-3500-P");
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        for bad in [
            "BTC",
            "BTC-28JUN19-5000",
            "XRP-28JUN19",
            "BTC-31FEB19",
            "BTC-28JUN19-abc-C",
            "BTC-28JUN19-5000-X",
            "BTC-PERPETUAL-5000-C",
        ] {
            let err = bad.parse::<Contract>().unwrap_err();
            assert!(
                matches!(err, PricingError::ContractParse { .. }),
                "{} gave {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_partial_name_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 2, 14, 10, 0, 0).unwrap();
        let c = Contract::from_partial_name("4000-P", now).unwrap();
        assert!(c.is_option());
        assert_eq!(c.strike(), 4000.0);
        assert_eq!(c.call_put(), CallOrPut::Put);
        assert_eq!(c.expiry(), jun28());
        assert_eq!(c.underlying(), Pair::BTC_USD);

        let fut = Contract::from_partial_name("eth-28jun19", now).unwrap();
        assert!(!fut.is_option());
        assert_eq!(fut.call_put(), CallOrPut::NotApplicable);
        assert_eq!(fut.strike(), 0.0);
        assert_eq!(fut.name(), "ETH-28JUN19");
    }

    #[test]
    fn test_partial_name_months_roll_forward() {
        let now = Utc.with_ymd_and_hms(2024, 2, 14, 10, 0, 0).unwrap();

        let mar = Contract::from_partial_name("MAR-4000-C", now).unwrap();
        assert_eq!(mar.expiry(), Utc.with_ymd_and_hms(2024, 3, 29, 8, 0, 0).unwrap());

        // January has passed, so JAN means next year
        let jan = Contract::from_partial_name("JAN", now).unwrap();
        assert_eq!(jan.expiry(), Utc.with_ymd_and_hms(2025, 1, 31, 8, 0, 0).unwrap());

        let dec = Contract::from_partial_name("DEC", now).unwrap();
        assert_eq!(dec.expiry(), Utc.with_ymd_and_hms(2024, 12, 27, 8, 0, 0).unwrap());
        assert_eq!(dec.expiry().weekday(), Weekday::Fri);
    }

    #[test]
    fn test_partial_name_fridays() {
        // Wednesday
        let now = Utc.with_ymd_and_hms(2024, 2, 14, 10, 0, 0).unwrap();
        let fri = Contract::from_partial_name("FRI", now).unwrap();
        assert_eq!(fri.expiry(), Utc.with_ymd_and_hms(2024, 2, 16, 8, 0, 0).unwrap());
        let fri2 = Contract::from_partial_name("2FR-C", now).unwrap();
        assert_eq!(fri2.expiry(), Utc.with_ymd_and_hms(2024, 2, 23, 8, 0, 0).unwrap());

        // A Friday resolves to itself, a Saturday to the following week
        let friday = Utc.with_ymd_and_hms(2024, 2, 16, 1, 0, 0).unwrap();
        assert_eq!(
            Contract::from_partial_name("FRI", friday).unwrap().expiry(),
            Utc.with_ymd_and_hms(2024, 2, 16, 8, 0, 0).unwrap()
        );
        let saturday = Utc.with_ymd_and_hms(2024, 2, 17, 1, 0, 0).unwrap();
        assert_eq!(
            Contract::from_partial_name("FRI", saturday).unwrap().expiry(),
            Utc.with_ymd_and_hms(2024, 2, 23, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_partial_name_perp_and_errors() {
        let now = Utc.with_ymd_and_hms(2024, 2, 14, 10, 0, 0).unwrap();
        let perp = Contract::from_partial_name("ETH-PERP", now).unwrap();
        assert!(perp.is_perpetual());
        assert!(!perp.is_option());
        assert_eq!(perp.expiry(), now);
        assert_eq!(perp.name(), "ETH-PERPETUAL");

        let err = Contract::from_partial_name("BTC-WHENEVER", now).unwrap_err();
        assert!(err.to_string().contains("WHENEVER"));
    }
}
