use std::{path::PathBuf, time::Duration};
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_LOCAL_DIR: &str = "./data";
const DEFAULT_POSTS_TABLE: &str = "blog_posts";
const DEFAULT_SUBSCRIBERS_TABLE: &str = "subscribers";
const DEFAULT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_SUBSCRIBE_RATE: u32 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Connection settings for the hosted data store.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub url: String,
    pub api_key: String,
    pub posts_table: String,
    pub subscribers_table: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// `None` when `REMOTE_STORE_URL` or `REMOTE_STORE_KEY` is unset; the
    /// service then runs on the local store alone.
    pub remote: Option<RemoteConfig>,
    pub local_dir: PathBuf,
    pub subscribe_rate_per_minute: u32,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let remote = match (get("REMOTE_STORE_URL"), get("REMOTE_STORE_KEY")) {
            (Some(url), Some(api_key)) => Some(RemoteConfig {
                url,
                api_key,
                posts_table: get("REMOTE_POSTS_TABLE")
                    .unwrap_or_else(|| DEFAULT_POSTS_TABLE.to_string()),
                subscribers_table: get("REMOTE_SUBSCRIBERS_TABLE")
                    .unwrap_or_else(|| DEFAULT_SUBSCRIBERS_TABLE.to_string()),
                timeout: Duration::from_secs(parse_or(
                    "REMOTE_TIMEOUT_SECS",
                    get("REMOTE_TIMEOUT_SECS"),
                    DEFAULT_TIMEOUT_SECS,
                )?),
            }),
            _ => None,
        };

        let subscribe_rate_per_minute = parse_or(
            "SUBSCRIBE_RATE_PER_MINUTE",
            get("SUBSCRIBE_RATE_PER_MINUTE"),
            DEFAULT_SUBSCRIBE_RATE,
        )?;
        if subscribe_rate_per_minute == 0 {
            return Err(ConfigError::Invalid {
                key: "SUBSCRIBE_RATE_PER_MINUTE",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            remote,
            local_dir: get("LOCAL_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_DIR)),
            subscribe_rate_per_minute,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
