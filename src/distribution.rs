//! Whole-day pattern distribution.
//!
//! Runs the detector over all 86,400 seconds of a day to show how rare an
//! "interesting" time actually is. The sweep is pure, so [`day_distribution`]
//! computes it once per process.

use crate::patterns::{Pattern, TimeDigits};
use crate::stats::percentage;
use once_cell::sync::Lazy;
use serde::Serialize;

pub const SECONDS_PER_DAY: usize = 24 * 60 * 60;

const SAMPLE_SIZE: usize = 20;
const TOP_SIZE: usize = 5;

/// One interesting second and the patterns it shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterestingTime {
    pub time: String,
    pub patterns: Vec<Pattern>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternFrequency {
    pub pattern: Pattern,
    pub count: usize,
    pub pct_of_day: f64,
    pub pct_of_interesting: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourBucket {
    pub hour: u32,
    pub interesting: usize,
    pub total: usize,
}

impl HourBucket {
    pub fn pct(&self) -> f64 {
        percentage(self.interesting, self.total)
    }
}

/// How often interesting times come up over a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rarity {
    /// Under 10 % of the day.
    Rare,
    /// 10 % up to 30 %.
    Uncommon,
    Common,
}

impl Rarity {
    pub fn from_pct(pct: f64) -> Self {
        if pct < 10.0 {
            Rarity::Rare
        } else if pct < 30.0 {
            Rarity::Uncommon
        } else {
            Rarity::Common
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayDistribution {
    pub total: usize,
    pub interesting: usize,
    pub boring: usize,
    pub interesting_pct: f64,
    pub boring_pct: f64,
    /// Observed patterns, most frequent first; ties in [`Pattern::ALL`] order.
    pub frequencies: Vec<PatternFrequency>,
    pub by_hour: Vec<HourBucket>,
    /// The first interesting seconds of the day.
    pub sample: Vec<InterestingTime>,
    /// The seconds with the most patterns; ties keep time order.
    pub top: Vec<InterestingTime>,
    pub avg_patterns: f64,
    pub max_patterns: usize,
}

impl DayDistribution {
    pub fn rarity(&self) -> Rarity {
        Rarity::from_pct(self.interesting_pct)
    }

    /// `N` in "roughly 1 in N timestamps is interesting".
    pub fn one_in(&self) -> Option<usize> {
        (self.interesting_pct > 0.0).then(|| (100.0 / self.interesting_pct) as usize)
    }

    /// Average number of seconds between interesting times.
    pub fn seconds_between(&self) -> Option<usize> {
        (self.interesting > 0).then(|| self.total / self.interesting)
    }
}

static DAY: Lazy<DayDistribution> = Lazy::new(analyze_day);

/// The cached whole-day analysis.
pub fn day_distribution() -> &'static DayDistribution {
    &DAY
}

/// Sweep every second from 00:00:00 to 23:59:59.
pub fn analyze_day() -> DayDistribution {
    let mut counts = [0usize; Pattern::ALL.len()];
    let mut by_hour: Vec<HourBucket> = (0..24)
        .map(|hour| HourBucket {
            hour,
            interesting: 0,
            total: 0,
        })
        .collect();
    let mut interesting_times: Vec<(TimeDigits, Vec<Pattern>)> = Vec::new();

    for hour in 0..24u32 {
        for minute in 0..60u32 {
            for second in 0..60u32 {
                let Some(digits) = TimeDigits::new(hour, minute, second) else {
                    continue;
                };
                let found: Vec<Pattern> = Pattern::ALL
                    .iter()
                    .copied()
                    .filter(|p| p.holds(&digits))
                    .collect();

                let bucket = &mut by_hour[hour as usize];
                bucket.total += 1;
                if found.is_empty() {
                    continue;
                }
                bucket.interesting += 1;
                for p in &found {
                    if let Some(i) = Pattern::ALL.iter().position(|q| q == p) {
                        counts[i] += 1;
                    }
                }
                interesting_times.push((digits, found));
            }
        }
    }

    let total = SECONDS_PER_DAY;
    let interesting = interesting_times.len();
    let boring = total - interesting;

    let mut frequencies: Vec<PatternFrequency> = Pattern::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(&pattern, count)| PatternFrequency {
            pattern,
            count,
            pct_of_day: percentage(count, total),
            pct_of_interesting: percentage(count, interesting),
        })
        .collect();
    frequencies.sort_by(|a, b| b.count.cmp(&a.count));

    let to_entry = |(digits, patterns): &(TimeDigits, Vec<Pattern>)| InterestingTime {
        time: digits.to_string(),
        patterns: patterns.clone(),
    };

    let sample = interesting_times
        .iter()
        .take(SAMPLE_SIZE)
        .map(to_entry)
        .collect();

    let mut ranked: Vec<&(TimeDigits, Vec<Pattern>)> = interesting_times.iter().collect();
    ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    let top = ranked.into_iter().take(TOP_SIZE).map(to_entry).collect();

    let pattern_total: usize = interesting_times.iter().map(|(_, p)| p.len()).sum();
    let avg_patterns = if interesting == 0 {
        0.0
    } else {
        pattern_total as f64 / interesting as f64
    };
    let max_patterns = interesting_times
        .iter()
        .map(|(_, p)| p.len())
        .max()
        .unwrap_or(0);

    DayDistribution {
        total,
        interesting,
        boring,
        interesting_pct: percentage(interesting, total),
        boring_pct: percentage(boring, total),
        frequencies,
        by_hour,
        sample,
        top,
        avg_patterns,
        max_patterns,
    }
}
