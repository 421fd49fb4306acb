//! Command line interface.

use clap::Parser;
use std::path::PathBuf;

use splitter_engine::LeftoverPolicy;
use splitter_types::{Address, Amount};
use splitter_utils::LogFormat;

use crate::config::SplitterConfig;

#[derive(Parser)]
#[command(
    name = "utxo-splitter",
    about = "Split large child chain UTXOs into many smaller ones"
)]
pub struct Cli {
    /// Watcher base URL.
    #[arg(long, env = "WATCHER_URL")]
    pub watcher_url: Option<String>,

    /// Plasma framework contract address.
    #[arg(long, env = "PLASMAFRAMEWORK_CONTRACT_ADDRESS")]
    pub plasma_framework: Option<Address>,

    /// Hex private key of the account whose UTXOs are split.
    #[arg(long, env = "ACCOUNT_PK", hide_env_values = true)]
    pub account_pk: Option<String>,

    /// Token to split.
    #[arg(long, env = "SPLIT_TOKEN")]
    pub split_token: Option<Address>,

    /// Token fees are paid in (zero address for ETH).
    #[arg(long, env = "OMG_FEE_TOKEN")]
    pub fee_token: Option<Address>,

    /// Smallest output worth creating, in base units.
    #[arg(long, env = "SPLIT_MIN_VALUE")]
    pub min_value: Option<Amount>,

    /// Most outputs per split transaction (2 to 4).
    #[arg(long, env = "SPLIT_MAX_OUTPUTS")]
    pub max_outputs: Option<usize>,

    /// What to do with UTXOs a round left unspent: "carry" or "drop".
    #[arg(long, env = "SPLIT_LEFTOVER_POLICY")]
    pub leftover_policy: Option<LeftoverPolicy>,

    /// Skip pairings with a fee UTXO that would leave the target whole.
    #[arg(long, env = "SPLIT_DEFER_UNSPLITTABLE")]
    pub defer_unsplittable: Option<bool>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "SPLITTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "SPLITTER_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "SPLITTER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Split round after round until nothing is left to split.
    Split,
    /// Print the first round's transactions without signing or submitting.
    Plan,
    /// Print the effective configuration as TOML.
    Config,
}

impl Cli {
    /// Layer flags and environment variables over the file configuration.
    pub fn apply(&self, mut config: SplitterConfig) -> SplitterConfig {
        if let Some(url) = &self.watcher_url {
            config.watcher_url = Some(url.clone());
        }
        if let Some(address) = self.plasma_framework {
            config.plasma_framework = Some(address);
        }
        if let Some(token) = self.split_token {
            config.split_token = Some(token);
        }
        if let Some(token) = self.fee_token {
            config.fee_token = token;
        }
        if let Some(min_value) = self.min_value {
            config.min_value = min_value.to_string();
        }
        if let Some(max_outputs) = self.max_outputs {
            config.max_outputs = max_outputs;
        }
        if let Some(policy) = self.leftover_policy {
            config.leftover_policy = policy;
        }
        if let Some(defer) = self.defer_unsplittable {
            config.defer_unsplittable = defer;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        config
    }
}
