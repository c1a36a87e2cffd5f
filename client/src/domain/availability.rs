//! Alternative-date arithmetic for the availability search.
//!
//! When the requested date has no free slots, the client probes nearby
//! dates and offers the closest alternatives: the next seven days, then up
//! to three days back.

use chrono::{Duration, NaiveDate};
use shared::AvailableSlot;

/// A conflict-free alternative found near the requested date
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSuggestion {
    pub date: NaiveDate,
    pub slots: Vec<AvailableSlot>,
    /// Absolute distance in days from the date the user asked for
    pub days_from_requested: i64,
}

/// Dates to probe when the requested date is fully booked: seven days
/// forward, then three days back
pub fn alternative_dates(requested: NaiveDate) -> Vec<NaiveDate> {
    let forward = (1..=7).map(|offset| requested + Duration::days(offset));
    let backward = (1..=3).map(|offset| requested - Duration::days(offset));
    forward.chain(backward).collect()
}

/// Absolute distance in days between two dates
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days().abs()
}
