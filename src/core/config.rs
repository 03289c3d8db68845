use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const API_KEY_ENV: &str = "FXC_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://api.currencybeacon.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CurrencyBeaconConfig {
    pub base_url: String,
}

impl Default for CurrencyBeaconConfig {
    fn default() -> Self {
        CurrencyBeaconConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub currencybeacon: CurrencyBeaconConfig,
}

/// Selections the interactive view opens with.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DefaultsConfig {
    pub from: String,
    pub to: String,
    pub amount: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            from: "US Dollar".to_string(),
            to: "Brazilian Real".to_string(),
            amount: "1".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    pub api_key: Option<String>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl AppConfig {
    /// Loads the config at the default location, or built-in defaults when
    /// no file has been written there yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxc", "fxc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Access key for the currency service; the environment wins over the
    /// config file.
    pub fn api_key(&self) -> Result<String> {
        Self::resolve_api_key(std::env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    fn resolve_api_key(env: Option<String>, file: Option<&str>) -> Result<String> {
        env.filter(|k| !k.trim().is_empty())
            .or_else(|| file.map(str::to_string).filter(|k| !k.trim().is_empty()))
            .with_context(|| {
                format!("No API key configured: set {API_KEY_ENV} or `api_key` in the config file")
            })
    }
}
