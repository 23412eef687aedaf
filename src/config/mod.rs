//! Application configuration

pub mod prompts;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "openai/gpt-oss-20b:free";
pub const DEFAULT_BRAND: &str = "Shoply";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set (environment or .env file)")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub brand_name: String,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub request_timeout: Duration,
    pub temperature: f32,
    /// Cap on conversation memory; `None` keeps the whole session.
    pub memory_cap: Option<usize>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            api_key: get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?,
            api_base: get("OPENAI_API_BASE")
                .ok_or(ConfigError::Missing("OPENAI_API_BASE"))?
                .trim_end_matches('/')
                .to_string(),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            brand_name: get("BRAND_NAME").unwrap_or_else(|| DEFAULT_BRAND.into()),
            data_dir: get("SUPPORT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            log_dir: get("SUPPORT_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("logs")),
            request_timeout: Duration::from_secs(
                parse("SUPPORT_REQUEST_TIMEOUT_SECS", get("SUPPORT_REQUEST_TIMEOUT_SECS"))?
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            temperature: parse("SUPPORT_TEMPERATURE", get("SUPPORT_TEMPERATURE"))?
                .unwrap_or(DEFAULT_TEMPERATURE),
            memory_cap: parse("SUPPORT_MEMORY_CAP", get("SUPPORT_MEMORY_CAP"))?,
        })
    }
}

fn parse<T: FromStr>(name: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError> {
    value
        .map(|v| {
            v.trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value: v })
        })
        .transpose()
}
