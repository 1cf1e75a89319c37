//! # Stage: Tracker Store
//!
//! ## Responsibility
//! Owns the ordered, append-only history of [`Attempt`]s, mirrors it to a
//! single JSON document after every addition, and answers aggregate queries.
//!
//! ## Guarantees
//! - In sync: every `add` rewrites the whole document
//! - Non-fatal: a missing or corrupt document yields an empty store, a failed
//!   save keeps the in-memory append; both are logged, neither is raised
//! - Stable output: reloading a saved document and saving again reproduces the
//!   `attempts` array byte for byte
//!
//! ## NOT Responsible For
//! - Locking: two processes writing the same file race, last writer wins
//! - Crash safety: a crash mid-write can leave a truncated document

use crate::attempt::Attempt;
use crate::error::{Result, TrackerError};
use crate::patterns::Pattern;
use crate::stats::{compute_statistics, Statistics};
use crate::timestamp::now_local;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// On-disk layout of the data file. `last_updated` is written on save and
/// ignored on load.
#[derive(Debug, Deserialize)]
struct TrackerDocument {
    #[serde(default)]
    attempts: Vec<Attempt>,
}

/// Borrowed view of [`TrackerDocument`] used when saving.
#[derive(Serialize)]
struct TrackerDocumentRef<'a> {
    attempts: &'a [Attempt],
    last_updated: String,
}

/// What happened when the store was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The document was read; it held this many attempts.
    Loaded(usize),
    /// No document existed yet.
    Missing,
    /// The document existed but could not be read or parsed.
    Unreadable(String),
}

pub struct Tracker {
    path: PathBuf,
    attempts: Vec<Attempt>,
    load_status: LoadStatus,
    last_save_error: Option<String>,
}

impl Tracker {
    /// Open the store at `path`, starting empty when the document is missing
    /// or unusable.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (attempts, load_status) = match read_document(&path) {
            Ok(Some(attempts)) => {
                info!(path = %path.display(), count = attempts.len(), "loaded previous attempts");
                let n = attempts.len();
                (attempts, LoadStatus::Loaded(n))
            }
            Ok(None) => {
                info!(path = %path.display(), "no previous data found, starting fresh");
                (Vec::new(), LoadStatus::Missing)
            }
            Err(e) => {
                warn!(error = %e, "could not load tracker data, starting fresh");
                (Vec::new(), LoadStatus::Unreadable(e.to_string()))
            }
        };
        Tracker {
            path,
            attempts,
            load_status,
            last_save_error: None,
        }
    }

    /// Open the store at `path`, failing on an unreadable document.
    /// A missing document still yields an empty store.
    pub fn try_load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let (attempts, load_status) = match read_document(&path)? {
            Some(attempts) => {
                let n = attempts.len();
                (attempts, LoadStatus::Loaded(n))
            }
            None => (Vec::new(), LoadStatus::Missing),
        };
        Ok(Tracker {
            path,
            attempts,
            load_status,
            last_save_error: None,
        })
    }

    /// Record an attempt made now.
    pub fn add(&mut self, successful: bool, description: impl Into<String>) -> Attempt {
        self.add_at(successful, description, now_local())
    }

    /// Record an attempt made at `timestamp` and persist the whole history.
    pub fn add_at(
        &mut self,
        successful: bool,
        description: impl Into<String>,
        timestamp: NaiveDateTime,
    ) -> Attempt {
        let attempt = Attempt::new(timestamp, successful, description, None);
        self.attempts.push(attempt.clone());
        self.persist();
        attempt
    }

    /// Write the full document, stamping `last_updated` with the current time.
    pub fn save(&self) -> Result<()> {
        let doc = TrackerDocumentRef {
            attempts: &self.attempts,
            last_updated: crate::timestamp::format_iso(&now_local()),
        };
        let json = serde_json::to_string_pretty(&doc)?;
        fs::write(&self.path, json).map_err(|source| TrackerError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), count = self.attempts.len(), "saved attempts");
        Ok(())
    }

    fn persist(&mut self) {
        match self.save() {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                warn!(error = %e, "could not save tracker data, keeping in-memory state");
                self.last_save_error = Some(e.to_string());
            }
        }
    }

    pub fn statistics(&self) -> Statistics {
        compute_statistics(&self.attempts)
    }

    /// Up to `limit` attempts, newest timestamp first. Equal timestamps keep
    /// insertion order.
    pub fn recent(&self, limit: usize) -> Vec<&Attempt> {
        newest_first(self.attempts.iter(), limit)
    }

    /// Like [`Tracker::recent`], restricted to attempts that recorded `pattern`.
    pub fn recent_matching(&self, limit: usize, pattern: Pattern) -> Vec<&Attempt> {
        newest_first(
            self.attempts.iter().filter(|a| a.has_pattern(pattern.name())),
            limit,
        )
    }

    /// All attempts in insertion order.
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// Message of the most recent failed save, cleared by the next good one.
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}

/// `Ok(None)` when there is no document at `path`.
fn newest_first<'a>(attempts: impl Iterator<Item = &'a Attempt>, limit: usize) -> Vec<&'a Attempt> {
    let mut sorted: Vec<&Attempt> = attempts.collect();
    sorted.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    sorted.truncate(limit);
    sorted
}

fn read_document(path: &Path) -> Result<Option<Vec<Attempt>>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path).map_err(|source| TrackerError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: TrackerDocument = serde_json::from_str(&text).map_err(|source| TrackerError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(doc.attempts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 23)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = Tracker::load(dir.path().join("data.json"));
        assert!(tracker.is_empty());
        assert_eq!(tracker.load_status(), &LoadStatus::Missing);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{ not json").unwrap();
        let tracker = Tracker::load(&path);
        assert!(tracker.is_empty());
        assert!(matches!(tracker.load_status(), LoadStatus::Unreadable(_)));
    }

    #[test]
    fn test_try_load_surfaces_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"attempts":[{"attempt_id":"x"}]}"#).unwrap();
        assert!(matches!(
            Tracker::try_load(&path),
            Err(TrackerError::Parse { .. })
        ));
    }

    #[test]
    fn test_document_without_attempts_key_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{}").unwrap();
        let tracker = Tracker::load(&path);
        assert_eq!(tracker.load_status(), &LoadStatus::Loaded(0));
    }

    #[test]
    fn test_add_persists_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let mut tracker = Tracker::load(&path);
        tracker.add_at(true, "Fixed API endpoint", ts(22, 22, 22));
        let text = fs::read_to_string(&path).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["attempts"].as_array().unwrap().len(), 1);
        assert!(v["last_updated"].is_string());
        assert!(tracker.last_save_error().is_none());
    }

    #[test]
    fn test_save_failure_keeps_attempt() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be written as a file.
        let mut tracker = Tracker::load(dir.path());
        let attempt = tracker.add_at(false, "unsaved", ts(15, 47, 23));
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.attempts()[0], attempt);
        assert!(tracker.last_save_error().is_some());
    }

    #[test]
    fn test_recent_sorted_by_timestamp_desc() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::load(dir.path().join("data.json"));
        tracker.add_at(true, "noon", ts(12, 0, 0));
        tracker.add_at(true, "late", ts(23, 0, 0));
        tracker.add_at(true, "early", ts(1, 0, 0));
        let recent: Vec<&str> = tracker.recent(2).iter().map(|a| a.description()).collect();
        assert_eq!(recent, vec!["late", "noon"]);
        assert_eq!(tracker.recent(10).len(), 3);
        assert!(tracker.recent(0).is_empty());
    }

    #[test]
    fn test_recent_ties_keep_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::load(dir.path().join("data.json"));
        tracker.add_at(true, "first", ts(9, 0, 0));
        tracker.add_at(false, "second", ts(9, 0, 0));
        let recent: Vec<&str> = tracker.recent(2).iter().map(|a| a.description()).collect();
        assert_eq!(recent, vec!["first", "second"]);
    }

    #[test]
    fn test_recent_matching_filters_by_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::load(dir.path().join("data.json"));
        tracker.add_at(true, "mirror early", ts(1, 10, 0));
        tracker.add_at(false, "boring", ts(15, 47, 23));
        tracker.add_at(true, "mirror late", ts(12, 21, 0));
        tracker.add_at(true, "palindrome", ts(22, 22, 22));
        let mirrors: Vec<&str> = tracker
            .recent_matching(10, Pattern::MirrorHourMinute)
            .iter()
            .map(|a| a.description())
            .collect();
        assert_eq!(mirrors, vec!["palindrome", "mirror late", "mirror early"]);
        assert_eq!(tracker.recent_matching(1, Pattern::MirrorHourMinute).len(), 1);
        assert!(tracker.recent_matching(10, Pattern::SequentialDescending).is_empty());
    }
}
