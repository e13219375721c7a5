use super::Session;
use crate::cli::ReportArgs;
use anyhow::{bail, Context};
use chrono::Local;
use std::path::PathBuf;
use tracing::warn;
use worklog_core::EndpointConfig;
use worklog_store::{Category, EntryFilter, LogEntry};
use worklog_synth::{ReportClient, ReportGenerator, ReportMode, ReportWriter};

/// Endpoint settings with the command-line overrides applied
fn endpoint_for(session: &Session, args: &ReportArgs) -> anyhow::Result<EndpointConfig> {
    let mut endpoint = session.config.endpoint.clone();
    if let Some(url) = &args.endpoint {
        endpoint.endpoint_url = url.trim().to_string();
    }
    if let Some(model) = &args.model {
        endpoint.model = model.trim().to_string();
    }
    endpoint.validate()?;
    Ok(endpoint)
}

/// Generate the report and return the written file
async fn generate_report(session: &Session, args: &ReportArgs) -> anyhow::Result<PathBuf> {
    let endpoint = endpoint_for(session, args)?;
    let report_dir = args
        .out
        .clone()
        .unwrap_or_else(|| session.config.report_dir());

    let store = session.open_store().await?;
    let filter = EntryFilter {
        category: Some(Category::Daily),
        since: args.range.since,
        until: args.range.until,
    };
    let entries = store.filter(&filter).await;
    if entries.is_empty() {
        warn!(kind = %args.kind, "no daily entries in range");
    }

    let client = ReportClient::new(endpoint).context("could not set up the HTTP client")?;
    let generator = ReportGenerator::new(
        client,
        ReportWriter::new(report_dir),
        session.config.language.clone(),
    );
    let mode = if args.offline {
        ReportMode::Offline
    } else {
        ReportMode::Ai
    };

    let outcome = generator
        .generate(&entries, args.kind, mode, Local::now().date_naive())
        .await?;
    let Some(path) = outcome.path else {
        bail!("{}", outcome.text);
    };

    if args.save_entry {
        match args.kind.stored_category() {
            Some(category) => {
                store
                    .append(LogEntry::new(outcome.text, category))
                    .await
                    .context("report was written but could not be saved to the log")?;
                eprintln!("Saved report as a {} entry", category);
            }
            None => eprintln!("Daily reports are not saved back to the log"),
        }
    }

    eprintln!(
        "{} report from {} daily entries",
        outcome.kind, outcome.entries_used
    );
    Ok(path)
}

pub async fn run(session: &Session, args: &ReportArgs) -> anyhow::Result<()> {
    let path = generate_report(session, args).await?;
    println!("{}", path.display());
    Ok(())
}
