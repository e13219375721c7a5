//! Report synthesis over a chat-completion endpoint, and report files on disk

mod client;
mod generator;
mod offline;
mod types;
mod writer;

pub use client::ReportClient;
pub use generator::{GenerateError, ReportGenerator, ReportMode, ReportOutcome};
pub use offline::offline_report;
pub use types::{SynthesisError, SynthesisResult};
pub use writer::{report_file_name, ReportWriter, WriteError};
