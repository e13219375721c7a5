use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use worklog_core::ReportKind;
use worklog_store::Category;

#[derive(Parser)]
#[command(name = "worklog")]
#[command(version)]
#[command(about = "Work journal with model-written status reports")]
pub struct Cli {
    /// Work log file (default: ~/.worklog/entries.json)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new entry
    Add {
        /// What you worked on
        content: String,

        /// daily, weekly or annual
        #[arg(short, long, default_value = "daily")]
        category: Category,

        /// Day the entry belongs to, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Attach an image file (repeatable)
        #[arg(short, long = "image")]
        images: Vec<PathBuf>,
    },

    /// List entries in insertion order
    List {
        #[command(flatten)]
        range: RangeArgs,

        /// Only this category
        #[arg(short, long)]
        category: Option<Category>,
    },

    /// Print one entry in full
    Show { id: String },

    /// Change an entry's content, date or category
    Edit {
        id: String,

        #[arg(long)]
        content: Option<String>,

        /// New day, YYYY-MM-DD (time of day is kept)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        category: Option<Category>,
    },

    /// Delete an entry by id or by list position
    Remove {
        #[arg(required_unless_present = "index")]
        id: Option<String>,

        /// Position as shown by `list`
        #[arg(long, conflicts_with = "id")]
        index: Option<usize>,
    },

    /// Attach image files to an entry
    Attach {
        id: String,

        #[arg(required = true)]
        images: Vec<PathBuf>,
    },

    /// Remove an attached image by its position
    Detach { id: String, image: usize },

    /// Generate a report from daily entries and write it as Markdown
    Report(ReportArgs),

    /// Print the effective configuration
    Config,

    /// Print version information
    Version,
}

/// Inclusive day range
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// First day to include, YYYY-MM-DD
    #[arg(long)]
    pub since: Option<NaiveDate>,

    /// Last day to include, YYYY-MM-DD
    #[arg(long)]
    pub until: Option<NaiveDate>,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// daily, weekly or annual
    #[arg(short, long, default_value = "weekly")]
    pub kind: ReportKind,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Skip the model and write the raw log lines
    #[arg(long)]
    pub offline: bool,

    /// Keep the generated report in the log as a weekly/annual entry
    #[arg(long)]
    pub save_entry: bool,

    /// Directory to write the report into (default: system temp dir)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Override the chat-completions URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Override the model name
    #[arg(long)]
    pub model: Option<String>,
}
