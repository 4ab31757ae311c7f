use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::fetcher::DEFAULT_SOURCE_URL;

pub const DEFAULT_SOURCE_PATH: &str = "Folkhalsomyndigheten_Covid19.xlsx";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source_url: String,
    pub source_path: PathBuf,
    pub cache_max_age_minutes: u64,
    pub plot_dir: PathBuf,
    pub http_timeout_secs: u64,
    /// Re-run the whole pipeline on this cadence; one-shot when unset
    pub run_interval_minutes: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            source_url: env::var("SOURCE_URL").unwrap_or_else(|_| DEFAULT_SOURCE_URL.to_string()),
            source_path: env::var("SOURCE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SOURCE_PATH)),
            cache_max_age_minutes: parse_var("CACHE_MAX_AGE_MINUTES")?.unwrap_or(60),
            plot_dir: env::var("PLOT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("plots")),
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS")?.unwrap_or(60),
            run_interval_minutes: parse_var("RUN_INTERVAL_MINUTES")?,
        })
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_max_age_minutes * 60)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn run_interval(&self) -> Option<Duration> {
        self.run_interval_minutes
            .map(|minutes| Duration::from_secs(minutes * 60))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            cache_max_age_minutes: 60,
            plot_dir: PathBuf::from("plots"),
            http_timeout_secs: 60,
            run_interval_minutes: None,
        }
    }
}

fn parse_var<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(None),
    }
}
