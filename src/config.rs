//! Process bootstrap configuration (docs/ARCHITECTURE.md §6.3).
//!
//! Recognised options: `listen` (HTTP adapter bind address), `timeout`
//! (reserved, the core itself does not consume it), `log_level`/`log_fmt`
//! (observability only), `db_file` (on-disk directory for the storage
//! adapter), and `base_collection` (a collection auto-created on startup if
//! it doesn't already exist).
//!
//! Loaded from environment variables under the `LEXDB_` prefix, with an
//! optional `.env`/`lexdb.toml` overlay via `config` and `dotenvy`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// `host:port` the HTTP adapter binds to.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Reserved for the HTTP adapter's own request timeout; the core does
    /// not consume this value.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_fmt")]
    pub log_fmt: LogFormat,

    /// On-disk directory the storage adapter opens its database file in.
    #[serde(default = "default_db_file")]
    pub db_file: String,

    /// A collection to auto-create on startup if absent, using the
    /// default tokenizer and filter chain.
    #[serde(default)]
    pub base_collection: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
            log_fmt: default_log_fmt(),
            db_file: default_db_file(),
            base_collection: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (`LEXDB_*`), with an
    /// optional `.env` file overlay loaded first via `dotenvy`.
    pub fn load() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            .add_source(config::File::with_name("lexdb").required(false))
            .add_source(config::Environment::with_prefix("LEXDB").separator("__"));

        let config: Config = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_listen() -> String {
    "127.0.0.1:9000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_fmt() -> LogFormat {
    LogFormat::Json
}

fn default_db_file() -> String {
    "lexdb.redb".to_string()
}
