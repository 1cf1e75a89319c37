//! # Stage: Pattern Detector
//!
//! ## Responsibility
//! Maps a wall-clock time to a fixed, ordered set of named boolean predicates
//! over the six digits `HHMMSS` (each component zero-padded to two digits).
//! A time is "interesting" when at least one predicate holds.
//!
//! ## Guarantees
//! - Pure: only hour, minute and second are read; the date never matters
//! - Deterministic order: detector output always follows [`Pattern::ALL`]
//! - Zero-padded: every digit-based predicate sees `01:02:03` as `010203`
//!
//! ## NOT Responsible For
//! - Storing results (that is the attempt record and the tracker store)

use chrono::Timelike;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Pattern enum
// ---------------------------------------------------------------------------

/// One named predicate over the digits of a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pattern {
    /// All six digits identical (`22:22:22`).
    AllSameDigits,
    /// Hour, minute and second are equal and each has two equal digits.
    RepeatingPairs,
    /// Hour equals minute (`12:12:xx`).
    HourMinuteMatch,
    /// Hour reads as the minute reversed (`12:21:xx`).
    MirrorHourMinute,
    /// `HHMM` climbs by exactly one per digit (`12:34:xx`).
    SequentialAscending,
    /// `HHMM` falls by exactly one per digit.
    SequentialDescending,
    /// `HHMMSS` reads the same backwards.
    Palindrome,
    /// Every nonzero digit is even.
    AllEven,
    /// Every digit is odd.
    AllOdd,
    /// Consecutive digits alternate parity.
    AlternatingEvenOdd,
    /// Hour, minute and second strings are identical (`12:12:12`).
    RepeatingPattern,
}

impl Pattern {
    /// Every predicate in evaluation order. Persisted `pattern_names` lists
    /// follow this order.
    pub const ALL: [Pattern; 11] = [
        Pattern::AllSameDigits,
        Pattern::RepeatingPairs,
        Pattern::HourMinuteMatch,
        Pattern::MirrorHourMinute,
        Pattern::SequentialAscending,
        Pattern::SequentialDescending,
        Pattern::Palindrome,
        Pattern::AllEven,
        Pattern::AllOdd,
        Pattern::AlternatingEvenOdd,
        Pattern::RepeatingPattern,
    ];

    /// The snake_case name used in the persisted document.
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::AllSameDigits => "all_same_digits",
            Pattern::RepeatingPairs => "repeating_pairs",
            Pattern::HourMinuteMatch => "hour_minute_match",
            Pattern::MirrorHourMinute => "mirror_hour_minute",
            Pattern::SequentialAscending => "sequential_ascending",
            Pattern::SequentialDescending => "sequential_descending",
            Pattern::Palindrome => "palindrome",
            Pattern::AllEven => "all_even",
            Pattern::AllOdd => "all_odd",
            Pattern::AlternatingEvenOdd => "alternating_even_odd",
            Pattern::RepeatingPattern => "repeating_pattern",
        }
    }

    /// Parse a pattern name, accepting `-` in place of `_` and any case.
    pub fn from_str_loose(s: &str) -> Result<Self, String> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Pattern::ALL
            .iter()
            .copied()
            .find(|p| p.name() == normalized)
            .ok_or_else(|| format!("Unknown pattern: {}", s))
    }

    /// Evaluate this predicate against a time's digits.
    pub fn holds(&self, t: &TimeDigits) -> bool {
        let d = &t.digits;
        match self {
            Pattern::AllSameDigits => d.iter().all(|&x| x == d[0]),
            Pattern::RepeatingPairs => {
                d[0] == d[1]
                    && d[2] == d[3]
                    && d[4] == d[5]
                    && t.hour == t.minute
                    && t.minute == t.second
            }
            Pattern::HourMinuteMatch => t.hour == t.minute,
            Pattern::MirrorHourMinute => d[0] == d[3] && d[1] == d[2],
            Pattern::SequentialAscending => steps(&d[..4], 1),
            Pattern::SequentialDescending => steps(&d[..4], -1),
            Pattern::Palindrome => d[0] == d[5] && d[1] == d[4] && d[2] == d[3],
            Pattern::AllEven => d.iter().filter(|&&x| x != 0).all(|&x| x % 2 == 0),
            Pattern::AllOdd => d.iter().all(|&x| x % 2 == 1),
            Pattern::AlternatingEvenOdd => d.windows(2).all(|w| w[0] % 2 != w[1] % 2),
            Pattern::RepeatingPattern => {
                d[0] == d[2] && d[2] == d[4] && d[1] == d[3] && d[3] == d[5]
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// True when each digit differs from the previous one by exactly `delta`.
fn steps(digits: &[u8], delta: i16) -> bool {
    digits
        .windows(2)
        .all(|w| i16::from(w[0]) + delta == i16::from(w[1]))
}

// ---------------------------------------------------------------------------
// TimeDigits
// ---------------------------------------------------------------------------

/// Hour, minute and second of a time plus its six zero-padded digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeDigits {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    digits: [u8; 6],
}

impl TimeDigits {
    /// Returns `None` when a component is out of range.
    pub fn new(hour: u32, minute: u32, second: u32) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        let split = |v: u32| [(v / 10) as u8, (v % 10) as u8];
        let [h0, h1] = split(hour);
        let [m0, m1] = split(minute);
        let [s0, s1] = split(second);
        Some(TimeDigits {
            hour,
            minute,
            second,
            digits: [h0, h1, m0, m1, s0, s1],
        })
    }

    /// Digits of any chrono time-bearing value. A leap second (`:60`) is
    /// folded into `:59`.
    pub fn from_time<T: Timelike>(t: &T) -> Self {
        TimeDigits::new(t.hour(), t.minute(), t.second().min(59))
            .unwrap_or(TimeDigits {
                hour: 0,
                minute: 0,
                second: 0,
                digits: [0; 6],
            })
    }

    pub fn digits(&self) -> [u8; 6] {
        self.digits
    }
}

impl fmt::Display for TimeDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

// ---------------------------------------------------------------------------
// PatternSet
// ---------------------------------------------------------------------------

/// Ordered mapping from pattern name to whether it held.
///
/// Sets produced by the detector contain all of [`Pattern::ALL`] in order.
/// Sets read back from a data file keep the file's order and may carry
/// names this build does not know about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    entries: Vec<(String, bool)>,
}

impl PatternSet {
    pub fn detect(t: &TimeDigits) -> Self {
        PatternSet {
            entries: Pattern::ALL
                .iter()
                .map(|p| (p.name().to_string(), p.holds(t)))
                .collect(),
        }
    }

    /// Look up a pattern by persisted name.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, v)| v)
    }

    pub fn contains(&self, pattern: Pattern) -> bool {
        self.get(pattern.name()).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Names of the patterns that held, in set order.
    pub fn detected_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, v)| *v)
            .map(|(n, _)| n.clone())
            .collect()
    }

    pub fn is_interesting(&self) -> bool {
        self.entries.iter().any(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, name: String, value: bool) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }
}

impl Serialize for PatternSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PatternSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PatternSetVisitor;

        impl<'de> Visitor<'de> for PatternSetVisitor {
            type Value = PatternSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of pattern names to booleans")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PatternSet, A::Error> {
                let mut set = PatternSet::default();
                while let Some((name, value)) = access.next_entry::<String, bool>()? {
                    set.insert(name, value);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(PatternSetVisitor)
    }
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Evaluate every predicate for the time-of-day part of `t`.
pub fn detect_patterns<T: Timelike>(t: &T) -> PatternSet {
    PatternSet::detect(&TimeDigits::from_time(t))
}

/// The patterns that hold for `t`, in [`Pattern::ALL`] order.
pub fn detected<T: Timelike>(t: &T) -> Vec<Pattern> {
    let digits = TimeDigits::from_time(t);
    Pattern::ALL
        .iter()
        .copied()
        .filter(|p| p.holds(&digits))
        .collect()
}

/// Whether any pattern holds for `t`, together with the ones that do.
pub fn is_interesting_time<T: Timelike>(t: &T) -> (bool, Vec<Pattern>) {
    let found = detected(t);
    (!found.is_empty(), found)
}
