//! Local naive timestamps: the persisted ISO-8601 form and user input parsing.

use crate::error::{Result, TrackerError};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const MICROS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// `YYYY-MM-DDTHH:MM:SS`, with `.ffffff` appended only for a nonzero
/// sub-second part.
pub fn format_iso(ts: &NaiveDateTime) -> String {
    if ts.nanosecond() == 0 {
        ts.format(SECONDS_FORMAT).to_string()
    } else {
        ts.format(MICROS_FORMAT).to_string()
    }
}

/// Current local wall-clock time, truncated to microseconds so that it
/// survives a save/load cycle unchanged.
pub fn now_local() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(now.nanosecond() / 1_000 * 1_000)
        .unwrap_or(now)
}

/// Parse a full date and time separated by `T` or a space, with optional
/// fractional seconds.
pub fn parse_iso(input: &str) -> Option<NaiveDateTime> {
    input
        .parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Parse a time given on the command line.
///
/// Accepts `YYYY-MM-DDTHH:MM:SS[.f]`, `YYYY-MM-DD HH:MM:SS[.f]`, or a bare
/// `HH:MM:SS` which is placed on `today`.
pub fn parse_user_time(input: &str, today: NaiveDate) -> Result<NaiveDateTime> {
    let trimmed = input.trim();
    if let Some(ts) = parse_iso(trimmed) {
        return Ok(ts);
    }
    if let Ok(t) = NaiveTime::parse_from_str(trimmed, "%H:%M:%S") {
        return Ok(today.and_time(t));
    }
    Err(TrackerError::Timestamp {
        input: input.to_string(),
    })
}

/// Serde adapter for `NaiveDateTime` fields stored as [`format_iso`] strings.
pub mod iso {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_iso(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 23).unwrap()
    }

    #[test]
    fn test_format_whole_seconds() {
        let ts = day().and_hms_opt(22, 22, 22).unwrap();
        assert_eq!(format_iso(&ts), "2025-12-23T22:22:22");
    }

    #[test]
    fn test_format_micros() {
        let ts = day().and_hms_micro_opt(9, 5, 1, 120).unwrap();
        assert_eq!(format_iso(&ts), "2025-12-23T09:05:01.000120");
    }

    #[test]
    fn test_now_local_has_no_sub_micro_part() {
        assert_eq!(now_local().nanosecond() % 1_000, 0);
    }

    #[test]
    fn test_formatted_value_parses_back() {
        let ts = day().and_hms_micro_opt(23, 59, 59, 999_999).unwrap();
        let back: NaiveDateTime = format_iso(&ts).parse().unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_parse_iso_accepts_space_separator() {
        let ts = day().and_hms_opt(22, 22, 22).unwrap();
        assert_eq!(parse_iso("2025-12-23 22:22:22"), Some(ts));
        assert_eq!(parse_iso("2025-12-23T22:22:22"), Some(ts));
        assert_eq!(
            parse_iso("2025-12-23 09:18:44.123456"),
            day().and_hms_micro_opt(9, 18, 44, 123_456)
        );
        assert_eq!(parse_iso("22:22:22"), None);
    }

    #[test]
    fn test_parse_user_time_iso() {
        let ts = parse_user_time("2025-12-23T12:21:00", day()).unwrap();
        assert_eq!(ts, day().and_hms_opt(12, 21, 0).unwrap());
    }

    #[test]
    fn test_parse_user_time_space_separated() {
        let ts = parse_user_time("2024-02-29 01:02:03", day()).unwrap();
        assert_eq!(
            ts,
            NaiveDate::from_ymd_opt(2024, 2, 29)
                .unwrap()
                .and_hms_opt(1, 2, 3)
                .unwrap()
        );
    }

    #[test]
    fn test_parse_user_time_bare_time_uses_today() {
        let ts = parse_user_time(" 15:47:23 ", day()).unwrap();
        assert_eq!(ts, day().and_hms_opt(15, 47, 23).unwrap());
    }

    #[test]
    fn test_parse_user_time_rejects_garbage() {
        assert!(matches!(
            parse_user_time("25:00:00", day()),
            Err(TrackerError::Timestamp { .. })
        ));
        assert!(parse_user_time("yesterday", day()).is_err());
    }
}
