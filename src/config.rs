//! Configuration management for the status dashboard

use crate::errors::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the health API
    pub base_url: String,

    /// Service whose history strip is shown
    pub service: String,

    /// Name shown in the headline
    pub brand: String,

    /// Period between scheduled refresh cycles
    #[serde(with = "duration_secs")]
    pub refresh_interval: Duration,

    /// Quiet period before a burst of resize events is applied
    #[serde(with = "duration_millis")]
    pub resize_debounce: Duration,

    /// HTTP timeout for health API requests
    #[serde(with = "duration_secs")]
    pub http_timeout: Duration,

    /// Viewport width used for the first breakpoint computation
    pub initial_viewport_width: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://health.igloo.ooo".to_string(),
            service: "api".to_string(),
            brand: "Igloo".to_string(),
            refresh_interval: Duration::from_secs(60),
            resize_debounce: Duration::from_millis(250),
            http_timeout: Duration::from_secs(10),
            initial_viewport_width: 1024,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        config.apply_lookup(lookup);
        config
    }

    /// Load configuration from a JSON file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Overlay `DASHBOARD_*` variables on top of the current values
    pub fn apply_lookup<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("DASHBOARD_BASE_URL") {
            self.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Some(service) = lookup("DASHBOARD_SERVICE") {
            self.service = service;
        }

        if let Some(brand) = lookup("DASHBOARD_BRAND") {
            self.brand = brand;
        }

        if let Some(interval) = lookup("DASHBOARD_REFRESH_INTERVAL_SECS") {
            if let Ok(seconds) = interval.parse::<u64>() {
                self.refresh_interval = Duration::from_secs(seconds);
            }
        }

        if let Some(debounce) = lookup("DASHBOARD_DEBOUNCE_MS") {
            if let Ok(ms) = debounce.parse::<u64>() {
                self.resize_debounce = Duration::from_millis(ms);
            }
        }

        if let Some(timeout) = lookup("DASHBOARD_HTTP_TIMEOUT_SECS") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                self.http_timeout = Duration::from_secs(seconds);
            }
        }

        if let Some(width) = lookup("DASHBOARD_VIEWPORT_WIDTH") {
            if let Ok(px) = width.parse() {
                self.initial_viewport_width = px;
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(DashboardError::Config("base_url cannot be empty".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(DashboardError::Config(format!(
                "base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }

        if self.service.is_empty() {
            return Err(DashboardError::Config("service cannot be empty".to_string()));
        }

        if self.refresh_interval.is_zero() {
            return Err(DashboardError::Config(
                "refresh_interval must be greater than 0".to_string(),
            ));
        }

        if self.http_timeout.is_zero() {
            return Err(DashboardError::Config(
                "http_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
