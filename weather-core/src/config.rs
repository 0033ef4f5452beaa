use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::WeatherError;

pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Runtime configuration, built once at startup and handed to the provider and router.
///
/// Example TOML:
/// ```toml
/// listen_addr = "0.0.0.0:8081"
/// default_location = "Bangalore"
/// allowed_origins = ["http://localhost:5173"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Upstream API key. Normally supplied through `OPENWEATHER_API_KEY`.
    pub api_key: Option<String>,
    pub listen_addr: String,
    /// City used when a request carries no `location`.
    pub default_location: String,
    pub allowed_origins: Vec<String>,
    pub weather_base_url: String,
    pub geocoding_base_url: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            listen_addr: "0.0.0.0:8081".to_string(),
            default_location: "Bangalore".to_string(),
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
            weather_base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            geocoding_base_url: "https://api.openweathermap.org/geo/1.0".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load config from `path`, or from the platform config dir when no path is given.
    ///
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = Self::config_file_path()?;
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-proxy", "weather-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply environment overrides. Empty values are ignored.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(addr) = get("WEATHER_LISTEN_ADDR") {
            self.listen_addr = addr;
        }
        if let Some(location) = get("WEATHER_DEFAULT_LOCATION") {
            self.default_location = location;
        }
        if let Some(origins) = get("WEATHER_ALLOWED_ORIGINS") {
            self.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(url) = get("OPENWEATHER_BASE_URL") {
            self.weather_base_url = url;
        }
        if let Some(url) = get("OPENWEATHER_GEO_URL") {
            self.geocoding_base_url = url;
        }
        if let Some(secs) = get("WEATHER_TIMEOUT_SECS") {
            match secs.trim().parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid WEATHER_TIMEOUT_SECS value '{secs}'"),
            }
        }

        self
    }

    pub fn with_process_env(self) -> Self {
        self.with_env_overrides(|key| std::env::var(key).ok())
    }

    pub fn require_api_key(&self) -> Result<&str, WeatherError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                WeatherError::Config(format!("{API_KEY_ENV} environment variable is required"))
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
