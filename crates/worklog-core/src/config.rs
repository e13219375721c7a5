//! Configuration for the report endpoint and local files

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use worklog_store::Paths;

pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:11434/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-r1:14b";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
/// Generation is slow on local models
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LANGUAGE: &str = "English";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidVar {
        name: String,
        value: String,
        reason: String,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Chat-completion endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Full URL of the chat-completions route
    pub endpoint_url: String,

    /// Model identifier sent in the request body
    pub model: String,

    /// Sent as `Authorization: Bearer <key>` when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    pub max_tokens: u32,

    /// Omitted from the request when `None`
    pub temperature: Option<f32>,

    pub timeout_secs: u64,
}

impl EndpointConfig {
    pub fn new() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: Some(DEFAULT_TEMPERATURE),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key with all but the last four characters hidden, for display
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            let chars: Vec<char> = key.chars().collect();
            if chars.len() <= 4 {
                "*".repeat(chars.len())
            } else {
                let tail: String = chars[chars.len() - 4..].iter().collect();
                format!("{}{}", "*".repeat(chars.len() - 4), tail)
            }
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint_url.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint_url is empty".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model is empty".to_string()));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid("max_tokens must be positive".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".to_string()));
        }
        if let Some(t) = self.temperature {
            if !t.is_finite() || t < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "temperature must be a non-negative number, got {}",
                    t
                )));
            }
        }
        Ok(())
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: EndpointConfig,

    /// Language the report is written in
    pub language: String,

    /// Where reports are written (OS temp dir when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,

    /// Work log file (`<home>/entries.json` when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            endpoint: EndpointConfig::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            report_dir: None,
            store_path: None,
        }
    }

    /// Defaults, then `config.json` under the work log home, then `WORKLOG_*` variables
    pub fn load(paths: &Paths) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(&paths.config_file())?;
        config.apply_vars(|name| std::env::var(name).ok())?;
        config.endpoint.validate()?;
        Ok(config)
    }

    /// Read a JSON config file; a missing file yields the defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut config: Config =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.endpoint.api_key = config.endpoint.api_key.filter(|k| !k.trim().is_empty());
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Overlay `WORKLOG_*` variables resolved through `lookup`
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("WORKLOG_ENDPOINT") {
            self.endpoint.endpoint_url = url.trim().to_string();
        }
        if let Some(model) = var("WORKLOG_MODEL") {
            self.endpoint.model = model.trim().to_string();
        }
        if let Some(key) = var("WORKLOG_API_KEY") {
            self.endpoint.api_key = Some(key.trim().to_string());
        }
        if let Some(value) = var("WORKLOG_MAX_TOKENS") {
            self.endpoint.max_tokens = parse_var("WORKLOG_MAX_TOKENS", &value)?;
        }
        if let Some(value) = var("WORKLOG_TEMPERATURE") {
            self.endpoint.temperature = if value.trim().eq_ignore_ascii_case("none") {
                None
            } else {
                Some(parse_var("WORKLOG_TEMPERATURE", &value)?)
            };
        }
        if let Some(value) = var("WORKLOG_TIMEOUT_SECS") {
            self.endpoint.timeout_secs = parse_var("WORKLOG_TIMEOUT_SECS", &value)?;
        }
        if let Some(language) = var("WORKLOG_LANGUAGE") {
            self.language = language.trim().to_string();
        }
        if let Some(dir) = var("WORKLOG_REPORT_DIR") {
            self.report_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    pub fn store_path(&self, paths: &Paths) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| paths.store_file())
    }

    pub fn report_dir(&self) -> PathBuf {
        self.report_dir
            .clone()
            .unwrap_or_else(Paths::default_report_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidVar {
            name: name.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}
