//! Configuration of the Cloudflare exporter.
//!
//! Settings are layered from lowest to highest precedence:
//!
//! 1. the embedded `default-config.yaml`
//! 2. an optional `config.yaml` in [`get_config_dir`]
//! 3. command line arguments and their environment variables ([`Args`])
//!
//! The merged result is validated into a [`Config`] before any collection cycle runs.

#[macro_use]
extern crate tracing;

mod app_config;
mod args;
mod dataset;
mod error;

pub use app_config::get_config_dir;
pub use args::Args;
pub use dataset::{
    Dataset,
    DatasetSet,
};
pub use error::ConfigError;
use serde::Deserialize;
use std::{
    net::SocketAddr,
    path::Path,
    time::Duration,
};
use url::Url;

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

/// Validated exporter configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_email: String,
    pub account_id: Option<String>,
    pub zone_name: Option<String>,
    pub datasets: DatasetSet,
    pub listen_address: SocketAddr,
    pub api_url: Url,
    pub eligible_plan: String,
    pub request_timeout: Duration,
    pub window: WindowOffsets,
    pub max_concurrent_fetches: usize,
}

/// Offsets from "now" bounding the rolling collection window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowOffsets {
    pub start: Duration,
    pub end: Duration,
}

impl Default for WindowOffsets {
    fn default() -> Self {
        Self {
            start: Duration::from_secs(20 * 60),
            end: Duration::from_secs(5 * 60),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    api_key: String,
    #[serde(default)]
    api_email: String,
    #[serde(default)]
    account_id: Option<String>,
    #[serde(default)]
    zone_name: Option<String>,
    datasets: DatasetSet,
    listen_address: SocketAddr,
    api_url: Url,
    eligible_plan: String,
    request_timeout: String,
    window_start_offset: String,
    window_end_offset: String,
    max_concurrent_fetches: usize,
}

impl Config {
    /// Loads the configuration from defaults, the user's config file and `args`.
    pub fn new(args: Args) -> Result<Self, ConfigError> {
        let config_file = get_config_dir().join("config.yaml");
        Self::from_sources(args, Some(&config_file))
    }

    /// Loads the configuration from defaults, an optional YAML file and `args`.
    pub fn from_sources(args: Args, config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml));

        if let Some(path) = config_file {
            debug!(path = %path.display(), "Looking for config file");
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Yaml)
                    .required(false),
            );
        }

        builder = builder.add_source(args);

        let raw: RawConfig = builder.build()?.try_deserialize()?;
        Self::try_from(raw)
    }

    /// Base URL of the API without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.api_url.as_str().trim_end_matches('/')
    }
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let api_key = raw.api_key.trim().to_string();
        let api_email = raw.api_email.trim().to_string();
        if api_key.is_empty() || api_email.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }

        let account_id = non_empty(raw.account_id);
        if account_id.is_none() {
            if let Some(dataset) = raw.datasets.iter().find(|dataset| dataset.requires_account()) {
                return Err(ConfigError::AccountRequired(dataset));
            }
        }

        let window = WindowOffsets {
            start: parse_duration("window_start_offset", &raw.window_start_offset)?,
            end: parse_duration("window_end_offset", &raw.window_end_offset)?,
        };
        if window.start <= window.end {
            return Err(ConfigError::InvalidWindow {
                start: window.start,
                end: window.end,
            });
        }

        if raw.max_concurrent_fetches == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }

        Ok(Self {
            api_key,
            api_email,
            account_id,
            zone_name: non_empty(raw.zone_name),
            datasets: raw.datasets,
            listen_address: raw.listen_address,
            api_url: raw.api_url,
            eligible_plan: raw.eligible_plan,
            request_timeout: parse_duration("request_timeout", &raw.request_timeout)?,
            window,
            max_concurrent_fetches: raw.max_concurrent_fetches,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_duration(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|source| ConfigError::InvalidDuration { field, source })
}
