//! A single bug-fix attempt and its persisted shape.
//!
//! Derived pattern data is computed once when an attempt is created and then
//! frozen. Attempts read back from a data file keep whatever pattern data the
//! file recorded, even if the detector has changed since.

use crate::patterns::{detect_patterns, PatternSet};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One logged bug-fix outcome with its derived pattern data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    attempt_id: String,
    #[serde(with = "crate::timestamp::iso")]
    timestamp: NaiveDateTime,
    successful: bool,
    #[serde(default)]
    description: String,
    #[serde(default)]
    patterns: PatternSet,
    #[serde(default)]
    is_interesting: bool,
    #[serde(default)]
    pattern_names: Vec<String>,
}

impl Attempt {
    /// Create an attempt, running the detector on `timestamp`.
    ///
    /// Without an explicit id the identifier is `YYYYMMDD_HHMMSS` of the
    /// timestamp, so two attempts in the same second share an id.
    pub fn new(
        timestamp: NaiveDateTime,
        successful: bool,
        description: impl Into<String>,
        attempt_id: Option<String>,
    ) -> Self {
        let patterns = detect_patterns(&timestamp);
        let pattern_names = patterns.detected_names();
        let is_interesting = !pattern_names.is_empty();
        let attempt_id = attempt_id.unwrap_or_else(|| id_for(&timestamp));

        tracing::debug!(
            attempt_id = %attempt_id,
            is_interesting,
            patterns = ?pattern_names,
            "attempt created"
        );

        Attempt {
            attempt_id,
            timestamp,
            successful,
            description: description.into(),
            patterns,
            is_interesting,
            pattern_names,
        }
    }

    pub fn attempt_id(&self) -> &str {
        &self.attempt_id
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn successful(&self) -> bool {
        self.successful
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    pub fn is_interesting(&self) -> bool {
        self.is_interesting
    }

    /// Names of the patterns that held, in detector order.
    pub fn pattern_names(&self) -> &[String] {
        &self.pattern_names
    }

    pub fn has_pattern(&self, name: &str) -> bool {
        self.pattern_names.iter().any(|n| n == name)
    }

    /// Whether the stored pattern data equals a fresh detector run.
    ///
    /// Always true for attempts created in this process; may be false for
    /// attempts loaded from an older data file.
    pub fn matches_detector(&self) -> bool {
        let fresh = detect_patterns(&self.timestamp);
        fresh == self.patterns
            && fresh.detected_names() == self.pattern_names
            && fresh.is_interesting() == self.is_interesting
    }
}

/// Default identifier for an attempt made at `timestamp`.
pub fn id_for(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y%m%d_%H%M%S").to_string()
}
