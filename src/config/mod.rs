//! Configuration management for agentscout.
//!
//! Configuration is read from `~/.config/agentscout/config.toml` unless a path
//! is given. If the default file doesn't exist, one with comments is created.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::fetcher::FetchConfig;
use crate::platform::KNOWN_PLATFORMS;
use crate::render::RenderConfig;

/// Log severity used when `RUST_LOG` is not set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where exported files go
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub csv_file: String,
    pub json_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            csv_file: "ai_agents_data.csv".to_string(),
            json_file: "ai_agents_data.json".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn csv_path(&self) -> PathBuf {
        self.dir.join(&self.csv_file)
    }

    pub fn json_path(&self) -> PathBuf {
        self.dir.join(&self.json_file)
    }
}

/// Main configuration struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    /// Drop records that have no description
    pub require_description: bool,
    /// Registry names of the platforms to scrape, in order
    pub platforms: Vec<String>,
    pub fetch: FetchConfig,
    pub render: RenderConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            require_description: false,
            platforms: KNOWN_PLATFORMS.iter().map(|p| p.to_string()).collect(),
            fetch: FetchConfig::default(),
            render: RenderConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default path.
    ///
    /// An explicit path must exist. A missing default file is created with
    /// comments. Missing fields use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::write_default_config(&default_path)?;
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path: `~/.config/agentscout/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("agentscout").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fetch.delay_secs.is_finite() || self.fetch.delay_secs < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fetch.delay_secs must be a number >= 0, got {}",
                self.fetch.delay_secs
            )));
        }
        if self.render.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "render.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.platforms.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one platform must be enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Write a default config file with comments.
    pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    pub fn default_config_content() -> String {
        r##"# agentscout configuration

# Log level when RUST_LOG is unset: trace, debug, info, warn, error
log_level = "info"

# Drop records whose page has no usable description
require_description = false

# Platforms to scrape, in order
platforms = ["agent.ai", "metaschool.so"]

[fetch]
# Seconds between any two requests (applies to retries too)
delay_secs = 2.0

# Retries after the first attempt for timeouts, connection errors, 408/429/5xx
max_retries = 2

# Backoff before retry n is backoff_base_ms * 2^n, capped at backoff_max_ms
backoff_base_ms = 1000
backoff_max_ms = 30000

# Timeout for plain HTTP requests in seconds
request_timeout_secs = 10

[render]
# Run browser in headless mode (no visible window)
headless = true

# Upper bound for one rendered page load in seconds
timeout_secs = 30

# Wait time after page load for dynamic content (milliseconds)
wait_after_load_ms = 2000

window_width = 1920
window_height = 1080

# Elements stripped from rendered markup
remove_selectors = ["script", "style", "noscript"]

[output]
dir = "data"
csv_file = "ai_agents_data.csv"
json_file = "ai_agents_data.json"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
