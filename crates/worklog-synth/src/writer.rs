use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;
use worklog_core::ReportKind;
use worklog_store::atomic_write;

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("invalid report file name '{0}'")]
    InvalidName(String),

    #[error("failed to write report {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// `<YYYY-MM-DD>_<kind>_report.md`
pub fn report_file_name(kind: ReportKind, day: NaiveDate) -> String {
    format!("{}_{}_report.md", day.format("%Y-%m-%d"), kind)
}

/// Writes finished reports into one directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Atomically write `text` as UTF-8 to `<dir>/<file_name>` and return the path
    pub fn write(&self, text: &str, file_name: &str) -> Result<PathBuf, WriteError> {
        let is_bare_name = !file_name.is_empty()
            && Path::new(file_name).file_name() == Some(std::ffi::OsStr::new(file_name));
        if !is_bare_name {
            return Err(WriteError::InvalidName(file_name.to_string()));
        }

        let path = self.dir.join(file_name);
        atomic_write(&path, text.as_bytes()).map_err(|source| WriteError::Io {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), bytes = text.len(), "wrote report");
        Ok(path)
    }
}
