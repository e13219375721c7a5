//! Report prompt construction, model response cleanup and endpoint configuration

mod cleanup;
mod config;
mod prompt;
mod types;

pub use cleanup::cleanup_response;
pub use config::{Config, ConfigError, EndpointConfig};
pub use prompt::{build_prompt, format_entry_line, TEMPLATE_VERSION};
pub use types::{ParseReportKindError, PromptPair, ReportKind};
