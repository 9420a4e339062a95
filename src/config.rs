use crate::error::{AppError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the monitoring server; the push endpoint is derived from it.
    pub server_url: String,

    pub history_capacity: usize,

    #[serde(with = "humantime_serde")]
    pub reconnect_delay: Duration,

    #[serde(with = "humantime_serde")]
    pub reconnect_max_delay: Duration,

    pub reconnect_multiplier: f64,

    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,

    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    #[serde(with = "humantime_serde")]
    pub toast_ttl: Duration,

    pub export_dir: Option<String>,

    pub scoring: ScoringConfig,

    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    /// Added to the hash-join denominator so a cold cache scores 0 instead of NaN.
    pub join_guard: f64,

    /// Hit ratio shown on the cache gauge when no evaluation stats are reported.
    pub cache_hit_fallback: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            history_capacity: 50,
            reconnect_delay: Duration::from_secs(5),
            reconnect_max_delay: Duration::from_secs(5),
            reconnect_multiplier: 1.0,
            poll_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(10),
            toast_ttl: Duration::from_secs(5),
            export_dir: None,
            scoring: ScoringConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            join_guard: 1.0,
            cache_hit_fallback: 80.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Loads the config from `path`, or from the platform config directory when no
    /// path is given. A missing default file yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            AppError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;

        if self.history_capacity == 0 {
            return Err(AppError::Config(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        if self.reconnect_delay.is_zero() || self.poll_interval.is_zero() {
            return Err(AppError::Config(
                "reconnect_delay and poll_interval must be non-zero".to_string(),
            ));
        }
        if self.reconnect_max_delay < self.reconnect_delay {
            return Err(AppError::Config(
                "reconnect_max_delay must not be shorter than reconnect_delay".to_string(),
            ));
        }
        if !(self.reconnect_multiplier >= 1.0) {
            return Err(AppError::Config(
                "reconnect_multiplier must be >= 1.0".to_string(),
            ));
        }
        if self.scoring.join_guard < 0.0 || self.scoring.cache_hit_fallback < 0.0 {
            return Err(AppError::Config(
                "scoring constants must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.server_url)
            .map_err(|e| AppError::Config(format!("invalid server_url: {}", e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(AppError::Config(format!(
                "server_url must be http or https, got {}",
                other
            ))),
        }
    }

    /// Push endpoint with a scheme mirroring the server's: `ws` for http, `wss` for https.
    pub fn push_url(&self) -> Result<Url> {
        let mut url = self.base_url()?.join("/ws/metrics").map_err(|e| {
            AppError::Config(format!("cannot derive push endpoint: {}", e))
        })?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| AppError::Config("cannot derive push endpoint scheme".to_string()))?;
        Ok(url)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "rete", "rete-dash")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("dev", "rete", "rete-dash")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
