use crate::attempt::Attempt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Success figures for attempts that showed one particular pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternStat {
    pub total: usize,
    pub successful: usize,
    pub success_rate: f64,
}

/// Aggregate view of the attempt history. All rates are percentages and are
/// exactly `0.0` when their population is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_attempts: usize,
    pub successful_attempts: usize,
    pub failed_attempts: usize,
    pub overall_success_rate: f64,
    pub interesting_time_attempts: usize,
    pub boring_time_attempts: usize,
    pub interesting_time_success_rate: f64,
    pub boring_time_success_rate: f64,
    /// Keyed by pattern name; only patterns observed in at least one attempt.
    pub pattern_stats: BTreeMap<String, PatternStat>,
}

impl Statistics {
    /// Compare interesting-time and boring-time success rates.
    pub fn verdict(&self) -> Verdict {
        let margin = self.interesting_time_success_rate - self.boring_time_success_rate;
        if margin > 0.0 {
            Verdict::Supported { margin }
        } else if margin < 0.0 {
            Verdict::Rejected { margin: -margin }
        } else {
            Verdict::NoCorrelation
        }
    }
}

/// Outcome of the "interesting times fix more bugs" hypothesis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// Interesting times succeed more often, by `margin` percentage points.
    Supported { margin: f64 },
    /// Boring times succeed more often, by `margin` percentage points.
    Rejected { margin: f64 },
    NoCorrelation,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Supported { margin } => write!(
                f,
                "HYPOTHESIS SUPPORTED! Interesting times are {margin:.1}% more successful!"
            ),
            Verdict::Rejected { margin } => write!(
                f,
                "HYPOTHESIS REJECTED! Boring times are {margin:.1}% more successful!"
            ),
            Verdict::NoCorrelation => write!(f, "No correlation detected yet"),
        }
    }
}

/// `part / whole * 100`, or `0.0` for an empty population.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub fn compute_statistics(attempts: &[Attempt]) -> Statistics {
    let total = attempts.len();
    let successful = attempts.iter().filter(|a| a.successful()).count();

    let (interesting, boring): (Vec<&Attempt>, Vec<&Attempt>) =
        attempts.iter().partition(|a| a.is_interesting());
    let interesting_successful = interesting.iter().filter(|a| a.successful()).count();
    let boring_successful = boring.iter().filter(|a| a.successful()).count();

    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for attempt in attempts {
        // A name listed twice in one record still counts the attempt once.
        let mut seen: Vec<&str> = Vec::new();
        for name in attempt.pattern_names() {
            if seen.contains(&name.as_str()) {
                continue;
            }
            seen.push(name);
            let entry = counts.entry(name).or_insert((0, 0));
            entry.0 += 1;
            if attempt.successful() {
                entry.1 += 1;
            }
        }
    }

    let pattern_stats = counts
        .into_iter()
        .map(|(name, (total, successful))| {
            (
                name.to_string(),
                PatternStat {
                    total,
                    successful,
                    success_rate: percentage(successful, total),
                },
            )
        })
        .collect();

    Statistics {
        total_attempts: total,
        successful_attempts: successful,
        failed_attempts: total - successful,
        overall_success_rate: percentage(successful, total),
        interesting_time_attempts: interesting.len(),
        boring_time_attempts: boring.len(),
        interesting_time_success_rate: percentage(interesting_successful, interesting.len()),
        boring_time_success_rate: percentage(boring_successful, boring.len()),
        pattern_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 23)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn make_attempts(data: &[((u32, u32, u32), bool)]) -> Vec<Attempt> {
        data.iter()
            .map(|&((h, m, s), ok)| Attempt::new(ts(h, m, s), ok, "", None))
            .collect()
    }

    #[test]
    fn test_percentage_zero_guard() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }

    #[test]
    fn test_empty_statistics_all_zero() {
        let stats = compute_statistics(&[]);
        assert_eq!(stats.total_attempts, 0);
        assert_eq!(stats.overall_success_rate, 0.0);
        assert_eq!(stats.interesting_time_success_rate, 0.0);
        assert_eq!(stats.boring_time_success_rate, 0.0);
        assert!(stats.pattern_stats.is_empty());
        assert_eq!(stats.verdict(), Verdict::NoCorrelation);
    }

    #[test]
    fn test_counts_and_partitions() {
        let attempts = make_attempts(&[
            ((22, 22, 22), true),
            ((15, 47, 23), false),
            ((12, 12, 12), true),
            ((16, 30, 0), true),
        ]);
        let stats = compute_statistics(&attempts);
        assert_eq!(stats.total_attempts, 4);
        assert_eq!(stats.successful_attempts, 3);
        assert_eq!(stats.failed_attempts, 1);
        assert!((stats.overall_success_rate - 75.0).abs() < 1e-9);
        // 16:30:00 has no pattern: 1, 6, 3 break every digit rule.
        assert_eq!(stats.interesting_time_attempts, 2);
        assert_eq!(stats.boring_time_attempts, 2);
        assert_eq!(stats.interesting_time_success_rate, 100.0);
        assert_eq!(stats.boring_time_success_rate, 50.0);
        assert_eq!(stats.verdict(), Verdict::Supported { margin: 50.0 });
    }

    #[test]
    fn test_pattern_stats_only_observed_patterns() {
        let attempts = make_attempts(&[((12, 21, 0), true), ((13, 31, 0), false)]);
        let stats = compute_statistics(&attempts);
        let keys: Vec<&String> = stats.pattern_stats.keys().collect();
        assert_eq!(keys, vec!["mirror_hour_minute"]);
        let mirror = &stats.pattern_stats["mirror_hour_minute"];
        assert_eq!(mirror.total, 2);
        assert_eq!(mirror.successful, 1);
        assert_eq!(mirror.success_rate, 50.0);
    }

    #[test]
    fn test_pattern_stats_palindrome_subset() {
        let attempts = make_attempts(&[
            ((0, 0, 0), true),
            ((11, 11, 11), false),
            ((22, 22, 22), true),
            ((12, 34, 56), true),
            ((15, 47, 23), false),
        ]);
        let stats = compute_statistics(&attempts);
        let palindrome = &stats.pattern_stats["palindrome"];
        assert_eq!(palindrome.total, 3);
        assert_eq!(palindrome.successful, 2);
        assert!((palindrome.success_rate - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_verdict_rejected() {
        let attempts = make_attempts(&[((22, 22, 22), false), ((15, 47, 23), true)]);
        let verdict = compute_statistics(&attempts).verdict();
        assert_eq!(verdict, Verdict::Rejected { margin: 100.0 });
        assert!(verdict.to_string().contains("100.0%"));
    }

    #[test]
    fn test_statistics_idempotent() {
        let attempts = make_attempts(&[((22, 22, 22), true), ((15, 47, 23), false)]);
        assert_eq!(compute_statistics(&attempts), compute_statistics(&attempts));
    }

    #[test]
    fn test_statistics_serializes_snake_case() {
        let stats = compute_statistics(&make_attempts(&[((12, 21, 0), true)]));
        let v: serde_json::Value = serde_json::to_value(&stats).unwrap();
        assert_eq!(v["total_attempts"], 1);
        assert_eq!(v["pattern_stats"]["mirror_hour_minute"]["total"], 1);
    }
}
