use super::{entry_date, preview, Session};
use crate::cli::RangeArgs;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use std::path::PathBuf;
use worklog_store::{Category, EntryFilter, LogEntry};

const PREVIEW_CHARS: usize = 60;

pub async fn add(
    session: &Session,
    content: String,
    category: Category,
    date: Option<NaiveDate>,
    images: &[PathBuf],
) -> anyhow::Result<()> {
    if content.trim().is_empty() {
        bail!("entry content is empty");
    }
    let blobs = super::images::read_images(images).await?;
    let entry = LogEntry::with_date(entry_date(date)?, content, category).with_images(blobs);

    let store = session.open_store().await?;
    store.append(entry.clone()).await?;
    println!(
        "Added {} entry {} for {}",
        entry.category,
        entry.id(),
        entry.date_formatted()
    );
    Ok(())
}

/// Entries matching the filter, paired with their position in the whole log
fn listing(entries: &[LogEntry], filter: &EntryFilter) -> Vec<(usize, LogEntry)> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, e)| filter.matches(e))
        .map(|(i, e)| (i, e.clone()))
        .collect()
}

fn format_row(index: usize, entry: &LogEntry) -> String {
    let images = match entry.images.len() {
        0 => String::new(),
        1 => " [1 image]".to_string(),
        n => format!(" [{} images]", n),
    };
    format!(
        "{:>4}  {}  {:<7} {}  {}{}",
        index,
        entry.date_formatted(),
        entry.category,
        entry.id(),
        preview(&entry.content, PREVIEW_CHARS),
        images
    )
}

pub async fn list(
    session: &Session,
    category: Option<Category>,
    range: &RangeArgs,
) -> anyhow::Result<()> {
    let store = session.open_store().await?;
    let filter = EntryFilter {
        category,
        since: range.since,
        until: range.until,
    };
    let rows = listing(&store.entries().await, &filter);

    if rows.is_empty() {
        println!("No entries");
        return Ok(());
    }
    for (index, entry) in &rows {
        println!("{}", format_row(*index, entry));
    }
    Ok(())
}

fn format_entry(entry: &LogEntry) -> String {
    let mut out = format!(
        "id:       {}\ndate:     {}\ncategory: {}\n",
        entry.id(),
        entry.date.to_rfc3339(),
        entry.category
    );
    for (i, image) in entry.images.iter().enumerate() {
        out.push_str(&format!("image {}:  {} bytes\n", i, image.len()));
    }
    out.push('\n');
    out.push_str(&entry.content);
    out
}

pub async fn show(session: &Session, id: &str) -> anyhow::Result<()> {
    let store = session.open_store().await?;
    let entry = store
        .get(id)
        .await
        .with_context(|| format!("no entry with id {}", id))?;
    println!("{}", format_entry(&entry));
    Ok(())
}

pub async fn edit(
    session: &Session,
    id: &str,
    content: Option<String>,
    date: Option<NaiveDate>,
    category: Option<Category>,
) -> anyhow::Result<()> {
    if content.is_none() && date.is_none() && category.is_none() {
        bail!("nothing to change: pass --content, --date or --category");
    }
    if content.as_deref().is_some_and(|c| c.trim().is_empty()) {
        bail!("entry content is empty");
    }

    let store = session.open_store().await?;
    let edited = store
        .modify(id, |entry| {
            if let Some(content) = content {
                entry.content = content;
            }
            if let Some(day) = date {
                // Keep the time of day and offset the entry was recorded with
                if let Some(moved) = day
                    .and_time(entry.date.time())
                    .and_local_timezone(*entry.date.offset())
                    .single()
                {
                    entry.date = moved;
                }
            }
            if let Some(category) = category {
                entry.category = category;
            }
        })
        .await?;
    println!(
        "Updated {} entry {} for {}",
        edited.category,
        edited.id(),
        edited.date_formatted()
    );
    Ok(())
}

pub async fn remove(
    session: &Session,
    id: Option<&str>,
    index: Option<usize>,
) -> anyhow::Result<()> {
    let store = session.open_store().await?;
    let removed = match (id, index) {
        (Some(id), _) => store.remove(id).await?,
        (None, Some(index)) => store.remove_at(index).await?,
        (None, None) => bail!("pass an entry id or --index"),
    };
    println!(
        "Removed {} entry {} from {}",
        removed.category,
        removed.id(),
        removed.date_formatted()
    );
    Ok(())
}
