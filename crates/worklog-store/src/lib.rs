//! Work-log entry model and its single-file JSON store

mod error;
mod io;
mod paths;
mod store;
mod types;

pub use error::StoreError;
pub use io::{atomic_write, read_json, write_json};
pub use paths::Paths;
pub use store::LogStore;
pub use types::{Category, EntryFilter, LogEntry, ParseCategoryError};
