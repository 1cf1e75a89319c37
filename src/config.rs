//! Layered configuration: defaults, TOML file, environment, then CLI flags.
//!
//! ```toml
//! data_file = "/home/me/.bug_fix_data.json"
//! recent_limit = 20
//! ```

use crate::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "bug_fix_data.json";
pub const DEFAULT_RECENT_LIMIT: usize = 10;
/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "bugfix-timing.toml";
pub const DATA_FILE_ENV: &str = "BUGFIX_TIMING_DATA_FILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Where the attempt history is stored.
    pub data_file: PathBuf,
    /// Default number of attempts shown by `recent`.
    pub recent_limit: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl TrackerConfig {
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| TrackerError::Config {
            path: origin.to_path_buf(),
            detail: e.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| TrackerError::Config {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit `config_path` must exist; the default config file is only
    /// read when present. `env_data_file` is the value of
    /// [`DATA_FILE_ENV`], and `cli_data_file` wins over everything.
    pub fn resolve(
        config_path: Option<&Path>,
        env_data_file: Option<String>,
        cli_data_file: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(env) = env_data_file.filter(|v| !v.trim().is_empty()) {
            config.data_file = PathBuf::from(env);
        }
        if let Some(cli) = cli_data_file {
            config.data_file = cli;
        }

        tracing::debug!(data_file = %config.data_file.display(), recent_limit = config.recent_limit, "configuration resolved");
        Ok(config)
    }
}
