//! Crate-level error type.
//!
//! The tracker store degrades gracefully on the lenient paths (`Tracker::load`,
//! `Tracker::add`) and only surfaces these errors through the strict ones
//! (`Tracker::try_load`, `Tracker::save`) and through configuration parsing.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// The data file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The data file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The data file is not a valid tracker document.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize tracker document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The TOML configuration file could not be read or parsed.
    #[error("invalid config file {}: {detail}", path.display())]
    Config { path: PathBuf, detail: String },

    #[error("invalid timestamp '{input}': expected YYYY-MM-DDTHH:MM:SS, YYYY-MM-DD HH:MM:SS or HH:MM:SS")]
    Timestamp { input: String },
}

pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_mentions_path() {
        let err = TrackerError::Read {
            path: PathBuf::from("/tmp/missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_timestamp_error_lists_formats() {
        let err = TrackerError::Timestamp {
            input: "noon".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'noon'"));
        assert!(msg.contains("HH:MM:SS"));
    }

    #[test]
    fn test_serialize_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: TrackerError = serde_err.into();
        assert!(matches!(err, TrackerError::Serialize(_)));
    }
}
