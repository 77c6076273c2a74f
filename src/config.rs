use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_SITE: &str = "https://www.mdpi.com";
pub const DEFAULT_CHROME_PATH: &str = "/usr/bin/chromium";
pub const DEFAULT_LOG_FILTER: &str = "trend_tracker=info,layout_probe=info";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Scheme and host of the search site, without trailing slash
    pub site: String,
    /// Pre-installed browser used on Linux hosts
    pub chrome_path: PathBuf,
    pub settle_delay: Duration,
    pub poll_attempts: u32,
    pub poll_interval: Duration,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let site = lookup("TRACKER_SITE")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_SITE.to_string());

        Self {
            site,
            chrome_path: lookup("TRACKER_CHROME_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CHROME_PATH)),
            settle_delay: Duration::from_secs(parse_or(&lookup, "TRACKER_SETTLE_SECS", 5)),
            poll_attempts: parse_or(&lookup, "TRACKER_POLL_ATTEMPTS", 5),
            poll_interval: Duration::from_millis(parse_or(
                &lookup,
                "TRACKER_POLL_INTERVAL_MS",
                1000,
            )),
            data_dir: lookup("TRACKER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn search_url(&self, keyword: &str) -> String {
        format!("{}/search?q={}", self.site, urlencoding::encode(keyword))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using {}", key, raw, default);
            default
        }),
        None => default,
    }
}
