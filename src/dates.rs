// src/dates.rs
//! Day-count between timestamps
//!
//! Every tenor in the engine is an integer number of days obtained by
//! truncating both timestamps to UTC midnight and rounding the hour
//! difference to the nearest whole day. The rounded (not floored) count is
//! what the pricer and the implied-vol solver see as `expiry_days`.

use chrono::{DateTime, NaiveTime, Utc};

/// Truncate a timestamp to 00:00:00 UTC of the same calendar day.
pub fn utc_midnight(t: DateTime<Utc>) -> DateTime<Utc> {
    t.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Rounded number of days from `t1` to `t2` (negative if `t2` is earlier).
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use coin_greeks::dates::day_diff;
///
/// let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
/// let late = Utc.with_ymd_and_hms(2023, 1, 1, 23, 59, 59).unwrap();
/// let week = Utc.with_ymd_and_hms(2023, 1, 8, 0, 0, 0).unwrap();
/// assert_eq!(day_diff(start, late), 0);
/// assert_eq!(day_diff(start, week), 7);
/// ```
pub fn day_diff(t1: DateTime<Utc>, t2: DateTime<Utc>) -> i64 {
    let hours = (utc_midnight(t2) - utc_midnight(t1)).num_hours();
    (hours as f64 / 24.0).round() as i64
}
