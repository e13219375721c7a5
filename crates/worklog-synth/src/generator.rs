//! One report action: prompt, synthesize, clean, write

use crate::{offline_report, report_file_name, ReportClient, ReportWriter, SynthesisError, WriteError};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;
use worklog_core::{build_prompt, ReportKind};
use worklog_store::{Category, LogEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Synthesize through the configured model endpoint
    Ai,
    /// Write the raw daily lines, no network
    Offline,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("a report is already being generated")]
    Busy,

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("report task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result of a report action
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub kind: ReportKind,
    /// Report body, or the failure message when synthesis failed
    pub text: String,
    /// Written file; `None` when synthesis failed
    pub path: Option<PathBuf>,
    pub failure: Option<SynthesisError>,
    /// Daily entries the report was built from
    pub entries_used: usize,
}

impl ReportOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Runs report actions one at a time.
///
/// A second call while one is in flight gets [`GenerateError::Busy`]; the flag
/// is released on every exit path.
pub struct ReportGenerator {
    client: ReportClient,
    writer: ReportWriter,
    language: String,
    busy: AtomicBool,
}

impl ReportGenerator {
    pub fn new(client: ReportClient, writer: ReportWriter, language: impl Into<String>) -> Self {
        Self {
            client,
            writer,
            language: language.into(),
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Build a `kind` report from `entries` and write it as `<day>_<kind>_report.md`
    pub async fn generate(
        &self,
        entries: &[LogEntry],
        kind: ReportKind,
        mode: ReportMode,
        day: NaiveDate,
    ) -> Result<ReportOutcome, GenerateError> {
        let _guard = BusyGuard::acquire(&self.busy).ok_or(GenerateError::Busy)?;

        let entries_used = entries
            .iter()
            .filter(|e| e.category == Category::Daily)
            .count();
        info!(%kind, ?mode, entries = entries_used, "generating report");

        let text = match mode {
            ReportMode::Offline => offline_report(entries, kind),
            ReportMode::Ai => {
                let prompt = build_prompt(entries, kind, &self.language);
                let result = self.client.synthesize(&prompt).await;
                if !result.is_success() {
                    return Ok(ReportOutcome {
                        kind,
                        text: result.text,
                        path: None,
                        failure: result.failure,
                        entries_used,
                    });
                }
                result.text
            }
        };

        let writer = self.writer.clone();
        let file_name = report_file_name(kind, day);
        let body = text.clone();
        let path = tokio::task::spawn_blocking(move || writer.write(&body, &file_name)).await??;

        Ok(ReportOutcome {
            kind,
            text,
            path: Some(path),
            failure: None,
            entries_used,
        })
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
