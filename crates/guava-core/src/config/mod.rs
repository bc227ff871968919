//! Client configuration.
//!
//! Resolution order, highest first: explicit overrides from the caller,
//! `GUAVA_*` environment variables, the JSON config file, then defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{normalize_base_url, normalize_text_option};

const CONFIG_FILE_NAME: &str = "config.json";
const STORAGE_FILE_NAME: &str = "storage.json";
const APP_DIR_NAME: &str = "guava";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

pub const ENV_API_BASE_URL: &str = "GUAVA_API_BASE_URL";
pub const ENV_STORAGE_PATH: &str = "GUAVA_STORAGE_PATH";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "GUAVA_REQUEST_TIMEOUT_SECS";
pub const ENV_PURGE_LOCAL_ON_LOGOUT: &str = "GUAVA_PURGE_LOCAL_ON_LOGOUT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Storage file; the platform data directory when unset.
    pub storage_path: Option<PathBuf>,
    /// Drop preferences and the subscription cache on logout.
    pub purge_local_on_logout: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            storage_path: None,
            purge_local_on_logout: true,
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

pub fn default_storage_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME).join(STORAGE_FILE_NAME))
}

impl ClientConfig {
    /// Load the config file (or defaults when absent), then apply the
    /// process environment.
    pub fn resolve(config_path: Option<&Path>) -> Result<Self> {
        let path = config_path.map(Path::to_path_buf).or_else(default_config_path);
        let mut config = match path {
            Some(path) => Self::load_from_path(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            Error::Config(format!(
                "Failed to read config at {}: {}",
                path.display(),
                error
            ))
        })?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::Config(format!(
                "Failed to parse config at {}: {}",
                path.display(),
                error
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                Error::Config(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                ))
            })?;
        }

        let mut normalized = self.clone();
        normalized.validate()?;
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| Error::Config(format!("Failed to serialize config: {error}")))?;
        std::fs::write(path, serialized).map_err(|error| {
            Error::Config(format!(
                "Failed to write config at {}: {}",
                path.display(),
                error
            ))
        })
    }

    /// Apply `GUAVA_*` values from `lookup`. Blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = normalize_text_option(lookup(ENV_API_BASE_URL)) {
            self.api_base_url = url;
        }
        if let Some(path) = normalize_text_option(lookup(ENV_STORAGE_PATH)) {
            self.storage_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = normalize_text_option(lookup(ENV_REQUEST_TIMEOUT_SECS)) {
            self.request_timeout_secs = raw.parse().map_err(|_| {
                Error::Config(format!(
                    "{ENV_REQUEST_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
        }
        if let Some(raw) = normalize_text_option(lookup(ENV_PURGE_LOCAL_ON_LOGOUT)) {
            self.purge_local_on_logout = parse_flag(&raw).ok_or_else(|| {
                Error::Config(format!(
                    "{ENV_PURGE_LOCAL_ON_LOGOUT} must be true/false, got '{raw}'"
                ))
            })?;
        }
        Ok(())
    }

    /// Normalize the base URL and reject a zero timeout.
    pub fn validate(&mut self) -> Result<()> {
        self.api_base_url = normalize_base_url(&self.api_base_url).map_err(Error::Config)?;
        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn storage_path(&self) -> Result<PathBuf> {
        self.storage_path
            .clone()
            .or_else(default_storage_path)
            .ok_or_else(|| {
                Error::Config(format!(
                    "Could not resolve a data directory; set {ENV_STORAGE_PATH}"
                ))
            })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
