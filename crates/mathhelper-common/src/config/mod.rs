//! Configuration loading for Math Helper.
//! Reads mathhelper.toml from the current directory or the path in MATHHELPER_CONFIG.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::{MathHelperError, Result};

pub const CONFIG_ENV: &str = "MATHHELPER_CONFIG";
pub const API_URL_ENV: &str = "MATHHELPER_API_URL";
pub const DEFAULT_CONFIG_FILE: &str = "mathhelper.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Hosts besides the base URL's host that returned locators may point at.
    #[serde(default)]
    pub allowed_hosts: Vec<String>,
}

fn default_base_url()     -> String { "http://localhost:8080/".to_string() }
fn default_timeout_secs() -> u64    { 30 }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            allowed_hosts: Vec::new(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Parameters of the initial collection fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default)]
    pub descending: bool,
    /// `None` requests the whole collection in one page.
    #[serde(default)]
    pub page_size: Option<u32>,
}

fn default_sort_by() -> String { "id".to_string() }

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            sort_by: default_sort_by(),
            descending: false,
            page_size: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String { "mathhelper=info,warn".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter() }
    }
}


impl Config {
    /// Load configuration.
    /// Checks MATHHELPER_CONFIG first, then mathhelper.toml in the current
    /// directory, then falls back to defaults. MATHHELPER_API_URL overrides
    /// the API base URL.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var(CONFIG_ENV).ok();
        let mut config = Self::load_from(explicit.as_deref())?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            debug!(%url, "API base URL overridden from environment");
            config.api.base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicitly named file, or from the default file if it exists.
    pub fn load_from(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !Path::new(path).exists() {
                    return Err(MathHelperError::Config(format!(
                        "Config file not found: {path}"
                    )));
                }
                Self::from_path(path)
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_path(DEFAULT_CONFIG_FILE),
            None => {
                debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from a TOML file, or YAML when the extension says so.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| MathHelperError::Config(e.to_string()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| MathHelperError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url)
            .map_err(|e| MathHelperError::Config(format!("api.base_url: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(MathHelperError::Config(format!(
                "api.base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(MathHelperError::Config("api.timeout_secs must be positive".to_string()));
        }
        if self.list.page_size == Some(0) {
            return Err(MathHelperError::Config("list.page_size must be positive".to_string()));
        }
        Ok(())
    }
}
