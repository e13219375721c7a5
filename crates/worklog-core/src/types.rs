//! Core types for report synthesis

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use worklog_store::Category;

/// Report cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Daily,
    #[default]
    Weekly,
    Annual,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Daily => "daily",
            ReportKind::Weekly => "weekly",
            ReportKind::Annual => "annual",
        }
    }

    /// Category a synthesized report is filed under when kept in the log.
    ///
    /// Daily summaries are never stored back: they would be picked up as raw
    /// input by the next weekly report.
    pub fn stored_category(&self) -> Option<Category> {
        match self {
            ReportKind::Daily => None,
            ReportKind::Weekly => Some(Category::Weekly),
            ReportKind::Annual => Some(Category::Annual),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown report kind '{0}' (expected daily, weekly or annual)")]
pub struct ParseReportKindError(String);

impl FromStr for ReportKind {
    type Err = ParseReportKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(ReportKind::Daily),
            "weekly" | "week" => Ok(ReportKind::Weekly),
            "annual" | "yearly" | "year" => Ok(ReportKind::Annual),
            _ => Err(ParseReportKindError(s.to_string())),
        }
    }
}

/// System instruction plus user content for one chat completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}
