//! Sample attempts for trying out statistics and reports.

use crate::attempt::Attempt;
use crate::tracker::Tracker;
use chrono::{NaiveDate, NaiveDateTime};

/// `(hour, minute, second, successful, description)` on 2025-12-23.
const SAMPLES: [(u32, u32, u32, bool, &str); 16] = [
    (22, 22, 22, true, "Fixed authentication bug - repeating 2s!"),
    (12, 12, 12, true, "Resolved API timeout - repeating pattern"),
    (12, 21, 0, true, "Fixed database connection - mirror time"),
    (13, 31, 0, true, "Resolved memory leak - mirror pattern"),
    (12, 34, 56, true, "Fixed CSS rendering - sequential!"),
    (23, 32, 0, true, "Resolved race condition - mirror time"),
    (11, 11, 11, false, "Tried to fix caching issue - repeating 1s"),
    (10, 1, 0, false, "Attempted deploy fix - mirror time"),
    (15, 47, 23, true, "Fixed typo in config"),
    (9, 18, 44, true, "Resolved import error"),
    (16, 29, 51, true, "Fixed validation bug"),
    (14, 37, 19, false, "Tried to fix async issue"),
    (10, 43, 7, false, "Attempted to resolve CORS"),
    (17, 52, 33, false, "Tried fixing performance issue"),
    (8, 26, 41, false, "Attempted database migration fix"),
    (19, 15, 8, false, "Tried to fix websocket connection"),
];

fn sample_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 23).unwrap_or_default()
}

/// The sample set as `(timestamp, successful, description)`.
pub fn sample_attempts() -> Vec<(NaiveDateTime, bool, &'static str)> {
    let day = sample_day();
    SAMPLES
        .iter()
        .filter_map(|&(h, m, s, ok, desc)| day.and_hms_opt(h, m, s).map(|ts| (ts, ok, desc)))
        .collect()
}

/// Append every sample attempt to `tracker`, returning what was recorded.
pub fn seed(tracker: &mut Tracker) -> Vec<Attempt> {
    sample_attempts()
        .into_iter()
        .map(|(ts, ok, desc)| tracker.add_at(ok, desc, ts))
        .collect()
}
