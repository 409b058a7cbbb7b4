//! Julian Date ↔ UTC conversions.
//!
//! The engine samples on a continuous `f64` Julian Date (UT) axis and only
//! turns instants into calendar values at the edges: request parsing,
//! response formatting and per-month deduplication.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Julian Date of the Unix epoch (1970-01-01T00:00:00Z).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian Date (UT) of a UTC instant.
pub fn datetime_to_jd(dt: &DateTime<Utc>) -> f64 {
    let seconds = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) * 1e-9;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// UTC instant of a Julian Date (UT), rounded to the millisecond.
///
/// Returns `None` for non-finite input or dates chrono cannot represent.
pub fn jd_to_datetime(jd: f64) -> Option<DateTime<Utc>> {
    if !jd.is_finite() {
        return None;
    }
    let millis = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1000.0).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    Utc.timestamp_millis_opt(millis as i64).single()
}

/// Julian Date at 00:00 UT of a calendar date.
pub fn naive_date_to_jd(date: NaiveDate) -> f64 {
    datetime_to_jd(&date.and_time(chrono::NaiveTime::MIN).and_utc())
}
