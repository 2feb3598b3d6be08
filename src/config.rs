//! Configuration handling for dc-download.
//!
//! Optional settings are loaded from `<config dir>/dc-download/config.toml`
//! or a custom path, then merged with the command line into a read-only
//! [`Configuration`].

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{
    RetryPolicy, DEFAULT_API_BASE_URL, DEFAULT_IMAGE_BASE_URL, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_RETRY_DELAY,
};
use crate::cli::{Args, ResolutionTier};
use crate::filename::FilenameFields;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Remote endpoint settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Per-request timeout. Requests wait indefinitely when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            image_base_url: default_image_base_url(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_secs: default_delay_secs(),
        }
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(c: RetryConfig) -> Self {
        RetryPolicy::new(c.max_attempts, Duration::from_secs(c.delay_secs))
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_delay_secs() -> u64 {
    DEFAULT_RETRY_DELAY.as_secs()
}

impl FileConfig {
    /// Load configuration from a file path.
    ///
    /// An explicit path must exist. Without one, the default path is used
    /// when present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                Self::load_from(path)
            }
            None => match default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Get the default config file path.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dc-download").join("config.toml"))
}

/// Process-wide settings, built once at startup and only borrowed after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub auth_token: String,
    pub item_id: String,
    pub resolution_tier: ResolutionTier,
    pub filename_fields: FilenameFields,
    pub output_directory: PathBuf,
    pub api: ApiConfig,
    pub retry: RetryPolicy,
}

impl Configuration {
    /// Merge parsed arguments with the file config.
    pub fn from_args(args: Args, file: FileConfig) -> Self {
        Self {
            auth_token: args.token,
            item_id: args.uuid,
            resolution_tier: args.size,
            filename_fields: args.filename,
            output_directory: args.output,
            api: file.api,
            retry: file.retry.into(),
        }
    }

    /// Check that the output directory exists. It is never created.
    pub fn validate_output_directory(&self) -> Result<(), ConfigError> {
        if !self.output_directory.is_dir() {
            return Err(ConfigError::OutputDirectory {
                path: self.output_directory.clone(),
            });
        }
        Ok(())
    }
}

/// Errors that can occur when building the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file '{}' does not exist", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Output directory '{}' does not exist or is not a directory", .path.display())]
    OutputDirectory { path: PathBuf },
}
