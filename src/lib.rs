//! Bug-fix timing tracker.
//!
//! Logs whether bug-fix attempts succeed and correlates the outcome with
//! "interesting" numeric patterns in the clock time (`22:22:22`, `12:21`,
//! `12:34`, ...).
//!
//! The history lives in a single JSON document that is rewritten on every
//! addition:
//!
//! ```no_run
//! use bugfix_timing::Tracker;
//!
//! let mut tracker = Tracker::load("bug_fix_data.json");
//! let attempt = tracker.add(true, "Fixed API endpoint");
//! println!("interesting: {} {:?}", attempt.is_interesting(), attempt.pattern_names());
//! println!("{:.1}%", tracker.statistics().overall_success_rate);
//! ```

pub mod attempt;
pub mod cli;
pub mod config;
pub mod distribution;
pub mod error;
pub mod patterns;
pub mod report;
pub mod seed;
pub mod session;
pub mod stats;
pub mod timestamp;
pub mod tracker;

pub use attempt::Attempt;
pub use error::TrackerError;
pub use patterns::{detect_patterns, is_interesting_time, Pattern, PatternSet};
pub use session::{track, FixSession};
pub use stats::{PatternStat, Statistics, Verdict};
pub use tracker::{LoadStatus, Tracker};
