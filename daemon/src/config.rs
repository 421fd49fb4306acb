//! Splitter configuration with TOML file support.
//!
//! Settings come from three layers: built-in defaults, an optional TOML
//! file, then CLI flags and environment variables. [`SplitterConfig`] is the
//! file layer with every setting optional or defaulted; [`Settings`] is the
//! validated result the binary runs with.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use splitter_crypto::MAX_OUTPUTS;
use splitter_engine::{LeftoverPolicy, SplitConfig};
use splitter_types::{Address, Amount};
use splitter_utils::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(String),

    #[error("failed to parse config file: {0}")]
    Parse(String),

    #[error("missing setting {0}")]
    Missing(&'static str),

    #[error("invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// File-level configuration.
///
/// The account key is never read from a file, only from `ACCOUNT_PK` or
/// `--account-pk`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Base URL of the watcher.
    #[serde(default)]
    pub watcher_url: Option<String>,

    /// Plasma framework contract, the verifying contract for signatures.
    #[serde(default)]
    pub plasma_framework: Option<Address>,

    /// Token whose UTXOs are split.
    #[serde(default)]
    pub split_token: Option<Address>,

    /// Token fees are paid in. The zero address is ETH.
    #[serde(default)]
    pub fee_token: Address,

    /// Smallest output worth creating, in base units.
    #[serde(default = "default_min_value")]
    pub min_value: String,

    #[serde(default = "default_max_outputs")]
    pub max_outputs: usize,

    /// UTXOs requested per watcher page.
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,

    #[serde(default)]
    pub leftover_policy: LeftoverPolicy,

    /// Skip cross-token pairings that would leave the target whole.
    #[serde(default)]
    pub defer_unsplittable: bool,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_min_value() -> String {
    "50".to_string()
}

fn default_max_outputs() -> usize {
    MAX_OUTPUTS
}

fn default_page_limit() -> usize {
    splitter_watcher::DEFAULT_PAGE_LIMIT
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            watcher_url: None,
            plasma_framework: None,
            split_token: None,
            fee_token: Address::ZERO,
            min_value: default_min_value(),
            max_outputs: default_max_outputs(),
            page_limit: default_page_limit(),
            leftover_policy: LeftoverPolicy::default(),
            defer_unsplittable: false,
            request_timeout_secs: default_request_timeout_secs(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl SplitterConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate and fill in everything needed for a run.
    pub fn resolve(self) -> Result<Settings, ConfigError> {
        let watcher_url = self
            .watcher_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("watcher_url (WATCHER_URL)"))?;
        let plasma_framework = self.plasma_framework.ok_or(ConfigError::Missing(
            "plasma_framework (PLASMAFRAMEWORK_CONTRACT_ADDRESS)",
        ))?;
        let split_token = self
            .split_token
            .ok_or(ConfigError::Missing("split_token (SPLIT_TOKEN)"))?;

        let min_value: Amount = self.min_value.parse().map_err(|e| ConfigError::Invalid {
            name: "min_value",
            reason: format!("{e}"),
        })?;
        if min_value.is_zero() {
            return Err(ConfigError::Invalid {
                name: "min_value",
                reason: "must be positive".into(),
            });
        }
        if !(2..=MAX_OUTPUTS).contains(&self.max_outputs) {
            return Err(ConfigError::Invalid {
                name: "max_outputs",
                reason: format!("must be between 2 and {MAX_OUTPUTS}"),
            });
        }
        if self.page_limit == 0 {
            return Err(ConfigError::Invalid {
                name: "page_limit",
                reason: "must be positive".into(),
            });
        }

        Ok(Settings {
            watcher_url,
            plasma_framework,
            split_token,
            fee_token: self.fee_token,
            min_value,
            max_outputs: self.max_outputs,
            page_limit: self.page_limit,
            leftover_policy: self.leftover_policy,
            defer_unsplittable: self.defer_unsplittable,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            log_format: self.log_format,
            log_level: self.log_level,
        })
    }
}

/// Validated settings for one run.
#[derive(Clone, Debug)]
pub struct Settings {
    pub watcher_url: String,
    pub plasma_framework: Address,
    pub split_token: Address,
    pub fee_token: Address,
    pub min_value: Amount,
    pub max_outputs: usize,
    pub page_limit: usize,
    pub leftover_policy: LeftoverPolicy,
    pub defer_unsplittable: bool,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
    pub log_level: String,
}

impl Settings {
    pub fn split_config(&self) -> SplitConfig {
        SplitConfig {
            token: self.split_token,
            min_value: self.min_value,
            max_outputs: self.max_outputs,
            leftover_policy: self.leftover_policy,
            defer_unsplittable: self.defer_unsplittable,
        }
    }
}
