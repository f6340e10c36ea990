use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub vehicles: VehicleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST API, including the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8085/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Directory holding `session.toml`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl SessionConfig {
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("session.toml")
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Flat day rate used for the advisory cost estimate
    #[serde(default = "default_daily_rate")]
    pub daily_rate: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            daily_rate: default_daily_rate(),
            currency: default_currency(),
        }
    }
}

fn default_daily_rate() -> f64 {
    500.0
}

fn default_currency() -> String {
    "₹".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleConfig {
    /// Starting coordinate pre-filled in the add-vehicle form (Latur)
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,
    #[serde(default = "default_longitude")]
    pub default_longitude: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            default_latitude: default_latitude(),
            default_longitude: default_longitude(),
        }
    }
}

fn default_latitude() -> f64 {
    18.5204
}

fn default_longitude() -> f64 {
    76.5644
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| "Failed to parse configuration file")?;
            config.validate()?;
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    /// Reject values that would make every request or estimate meaningless
    pub fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("api.base_url must start with http:// or https://, got '{}'", url);
        }
        if self.api.timeout_secs == 0 {
            anyhow::bail!("api.timeout_secs must be greater than zero");
        }
        if !self.booking.daily_rate.is_finite() || self.booking.daily_rate < 0.0 {
            anyhow::bail!("booking.daily_rate must be a non-negative number");
        }
        if !(-90.0..=90.0).contains(&self.vehicles.default_latitude)
            || !(-180.0..=180.0).contains(&self.vehicles.default_longitude)
        {
            anyhow::bail!("vehicles.default_latitude/default_longitude out of range");
        }
        Ok(())
    }
}
