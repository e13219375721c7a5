//! Path resolution for the work log home directory

use std::path::PathBuf;

/// Environment variable that relocates the work log home directory
pub const HOME_ENV: &str = "WORKLOG_HOME";

/// Resolves standard paths for the store and configuration files
#[derive(Debug, Clone)]
pub struct Paths {
    pub home: PathBuf,
}

impl Paths {
    /// Resolve `$WORKLOG_HOME`, falling back to `~/.worklog`
    pub fn new() -> std::io::Result<Self> {
        if let Some(custom) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self {
                home: PathBuf::from(custom),
            });
        }

        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;

        Ok(Self {
            home: home.join(".worklog"),
        })
    }

    /// Use an explicit home directory
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Get entries.json path
    pub fn store_file(&self) -> PathBuf {
        self.home.join("entries.json")
    }

    /// Get config.json path
    pub fn config_file(&self) -> PathBuf {
        self.home.join("config.json")
    }

    /// Scratch directory reports are written to unless configured otherwise
    pub fn default_report_dir() -> PathBuf {
        std::env::temp_dir()
    }
}
