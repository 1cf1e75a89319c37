//! Terminal rendering for attempts, statistics and the day distribution.

use crate::attempt::Attempt;
use crate::distribution::{DayDistribution, InterestingTime, Rarity};
use crate::patterns::is_interesting_time;
use crate::stats::{Statistics, Verdict};
use chrono::Timelike;
use colored::*;
use std::fmt::Write;

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|n| n.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One-line summary of whether `t` is an interesting time.
pub fn format_time_analysis<T: Timelike>(t: &T) -> String {
    let (interesting, patterns) = is_interesting_time(t);
    let clock = format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second());
    if interesting {
        let names: Vec<&str> = patterns.iter().map(|p| p.name()).collect();
        format!(
            "⭐ {} - {} Patterns: {}",
            clock.bright_yellow(),
            "INTERESTING!".bright_yellow().bold(),
            join_names(&names)
        )
    } else {
        format!("➖ {} - No special patterns detected", clock.dimmed())
    }
}

/// `⭐ 22:22:22 ✅ description (patterns)` style line.
pub fn format_attempt_line(attempt: &Attempt) -> String {
    let marker = if attempt.is_interesting() { "⭐" } else { "  " };
    let status = if attempt.successful() { "✅" } else { "❌" };
    let time = attempt.timestamp().format("%Y-%m-%d %H:%M:%S").to_string();
    let patterns = if attempt.pattern_names().is_empty() {
        String::new()
    } else {
        format!(" ({})", join_names(attempt.pattern_names()).cyan())
    };
    format!(
        "{} {} {} {}{}",
        marker,
        time,
        status,
        attempt.description(),
        patterns
    )
}

pub fn format_logged(attempt: &Attempt) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());
    if attempt.successful() {
        let _ = writeln!(out, "{}", "✅ SUCCESS LOGGED!".bright_green().bold());
    } else {
        let _ = writeln!(out, "{}", "❌ FAILURE LOGGED!".bright_red().bold());
    }
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "{}", format_time_analysis(&attempt.timestamp()));
    if !attempt.description().is_empty() {
        let _ = writeln!(out, "Description: {}", attempt.description());
    }
    let _ = writeln!(out, "ID: {}", attempt.attempt_id());
    out
}

pub fn format_verdict(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Supported { .. } => format!("🎯 {}", verdict).bright_green().to_string(),
        Verdict::Rejected { .. } => format!("📉 {}", verdict).bright_red().to_string(),
        Verdict::NoCorrelation => format!("➖ {}", verdict).dimmed().to_string(),
    }
}

pub fn format_statistics(stats: &Statistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "{}", "CURRENT STATISTICS".bold());
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "Total attempts: {}", stats.total_attempts);
    let _ = writeln!(
        out,
        "  successful: {}  failed: {}",
        stats.successful_attempts, stats.failed_attempts
    );
    let _ = writeln!(out, "Overall success rate: {:.1}%", stats.overall_success_rate);
    let _ = writeln!(out);
    let _ = writeln!(out, "Interesting time attempts: {}", stats.interesting_time_attempts);
    let _ = writeln!(
        out,
        "  → Success rate: {:.1}%",
        stats.interesting_time_success_rate
    );
    let _ = writeln!(out, "Boring time attempts: {}", stats.boring_time_attempts);
    let _ = writeln!(out, "  → Success rate: {:.1}%", stats.boring_time_success_rate);

    if !stats.pattern_stats.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<26} {:>6} {:>6} {:>9}", "Pattern", "Total", "Fixed", "Rate");
        for (name, p) in &stats.pattern_stats {
            let _ = writeln!(
                out,
                "{:<26} {:>6} {:>6} {:>8.1}%",
                name, p.total, p.successful, p.success_rate
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", format_verdict(&stats.verdict()));
    out
}

fn format_interesting(entry: &InterestingTime, max_names: usize) -> String {
    let names: Vec<&str> = entry.patterns.iter().map(|p| p.name()).collect();
    let mut shown = join_names(&names[..names.len().min(max_names)]);
    if names.len() > max_names {
        let _ = write!(shown, " (+{} more)", names.len() - max_names);
    }
    format!("{} - {}", entry.time, shown)
}

pub fn format_distribution(dist: &DayDistribution) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "{}", "PATTERN DISTRIBUTION ANALYSIS".bold());
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "Total possible timestamps: {}", dist.total);
    let _ = writeln!(
        out,
        "Interesting timestamps: {} ({:.2}%)",
        dist.interesting, dist.interesting_pct
    );
    let _ = writeln!(out, "Boring timestamps: {} ({:.2}%)", dist.boring, dist.boring_pct);

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<26} {:>8} {:>10} {:>16}",
        "Pattern", "Count", "% of Day", "% of Interesting"
    );
    for f in &dist.frequencies {
        let _ = writeln!(
            out,
            "{:<26} {:>8} {:>9.3}% {:>15.2}%",
            f.pattern.name(),
            f.count,
            f.pct_of_day,
            f.pct_of_interesting
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Sample interesting times (first {}):", dist.sample.len());
    for entry in &dist.sample {
        let _ = writeln!(out, "  {}", format_interesting(entry, 3));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{:<10} {:>12} {:>10}", "Hour", "Interesting", "% of Hour");
    for bucket in &dist.by_hour {
        let _ = writeln!(
            out,
            "{:<10} {:>12} {:>9.2}%",
            format!("{:02}:XX:XX", bucket.hour),
            bucket.interesting,
            bucket.pct()
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Average patterns per interesting timestamp: {:.2}",
        dist.avg_patterns
    );
    let _ = writeln!(out, "Maximum patterns in a single timestamp: {}", dist.max_patterns);
    let _ = writeln!(out, "Top {} timestamps with most patterns:", dist.top.len());
    for entry in &dist.top {
        let _ = writeln!(
            out,
            "  {} patterns: {}",
            entry.patterns.len(),
            format_interesting(entry, usize::MAX)
        );
    }

    let _ = writeln!(out);
    if let Some(n) = dist.one_in() {
        let _ = writeln!(out, "Roughly 1 in {} timestamps is interesting", n);
    }
    if let Some(gap) = dist.seconds_between() {
        let _ = writeln!(
            out,
            "An interesting time comes up every {} seconds (about every {} minutes)",
            gap,
            gap / 60
        );
    }
    let insight = match dist.rarity() {
        Rarity::Rare => "Interesting times are RARE (< 10%): good candidates for testing correlation",
        Rarity::Uncommon => "Interesting times are UNCOMMON (10-30%): a reasonable balance for testing",
        Rarity::Common => "Interesting times are COMMON (> 30%): criteria may need tightening",
    };
    let _ = writeln!(out, "💡 {}", insight.bright_cyan());
    out
}
