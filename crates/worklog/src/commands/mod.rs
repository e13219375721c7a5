pub mod config;
pub mod entries;
pub mod images;
pub mod report;
pub mod version;

use anyhow::Context;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeZone};
use std::path::PathBuf;
use worklog_core::Config;
use worklog_store::{LogStore, Paths};

/// Resolved paths and configuration shared by every command
pub struct Session {
    pub paths: Paths,
    pub config: Config,
}

impl Session {
    pub fn new(paths: Paths, config: Config) -> Self {
        Self { paths, config }
    }

    /// Resolve the work log home and config; `store` overrides the configured log file
    pub fn load(store: Option<PathBuf>) -> anyhow::Result<Self> {
        let paths = Paths::new().context("could not locate the work log home directory")?;
        let mut config = Config::load(&paths)
            .with_context(|| format!("invalid configuration in {}", paths.home.display()))?;
        if store.is_some() {
            config.store_path = store;
        }
        Ok(Self::new(paths, config))
    }

    pub fn store_path(&self) -> PathBuf {
        self.config.store_path(&self.paths)
    }

    pub async fn open_store(&self) -> anyhow::Result<LogStore> {
        let path = self.store_path();
        LogStore::open(&path)
            .await
            .with_context(|| format!("could not open work log {}", path.display()))
    }
}

/// Timestamp for an entry on `day` at the current local time, or now when no day is given
pub(crate) fn entry_date(day: Option<NaiveDate>) -> anyhow::Result<DateTime<FixedOffset>> {
    let now = Local::now();
    let Some(day) = day else {
        return Ok(now.fixed_offset());
    };
    Local
        .from_local_datetime(&day.and_time(now.time()))
        .earliest()
        .map(|dt| dt.fixed_offset())
        .with_context(|| format!("{} has no valid local time", day))
}

/// First line of `content`, cut to `max` characters
pub(crate) fn preview(content: &str, max: usize) -> String {
    let line = content.lines().next().unwrap_or("").trim();
    if line.chars().count() > max {
        let cut: String = line.chars().take(max).collect();
        format!("{}...", cut)
    } else if content.trim_end().contains('\n') {
        format!("{} ...", line)
    } else {
        line.to_string()
    }
}
