//! Turns daily log entries into a chat prompt

use crate::{PromptPair, ReportKind};
use worklog_store::{Category, LogEntry};

/// Bumped whenever a template's section layout changes
pub const TEMPLATE_VERSION: &str = "2";

const LANGUAGE_SLOT: &str = "{language}";

const DAILY_TEMPLATE: &str = "\
You are a professional work-report assistant. From the work log lines the user \
provides (one line per entry, formatted `YYYY-MM-DD: content`), write a clear, \
professional daily summary in Markdown with exactly these sections:

# Daily Summary
## Completed Today
## Problems & Solutions
## Plan for Tomorrow

Rules:
1. Write in {language}.
2. Use bullet lists and short paragraphs.
3. Keep technical details precise.
4. Output only the Markdown report, with no preamble and no code fences.";

const WEEKLY_TEMPLATE: &str = "\
You are a professional work-report assistant. From the work log lines the user \
provides (one line per entry, formatted `YYYY-MM-DD: content`), write a clear, \
professional weekly report in Markdown with exactly these sections:

# <a concise title for the week>
## This Week's Work
## Problems & Solutions
## Goal Progress
(a Markdown table with columns: Goal | Progress | Status)
## Next Week's Plan
## Reflections

Rules:
1. Write in {language}.
2. Use bullet lists and short paragraphs.
3. Keep technical details precise.
4. Output only the Markdown report, with no preamble and no code fences.";

const ANNUAL_TEMPLATE: &str = "\
You are a professional work-report assistant. From the work log lines the user \
provides (one line per entry, formatted `YYYY-MM-DD: content`), write a clear, \
professional annual review in Markdown with exactly these sections:

# <a concise title for the year>
## Highlights of the Year
## Key Projects & Outcomes
## Problems & Solutions
## Goal Progress
(a Markdown table with columns: Goal | Progress | Status)
## Plan for Next Year
## Reflections

Rules:
1. Write in {language}.
2. Use bullet lists and short paragraphs.
3. Keep technical details precise.
4. Output only the Markdown report, with no preamble and no code fences.";

fn template(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Daily => DAILY_TEMPLATE,
        ReportKind::Weekly => WEEKLY_TEMPLATE,
        ReportKind::Annual => ANNUAL_TEMPLATE,
    }
}

/// One prompt line: `YYYY-MM-DD: content`, with line breaks inside the content flattened to spaces
pub fn format_entry_line(entry: &LogEntry) -> String {
    let content = entry
        .content
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ");
    format!("{}: {}", entry.date_formatted(), content)
}

/// Build the prompt for a `kind` report from `entries`.
///
/// Only daily entries are used; previously synthesized reports never feed a new one.
/// Empty input yields an empty user block and leaves the response to the model.
pub fn build_prompt(entries: &[LogEntry], kind: ReportKind, language: &str) -> PromptPair {
    let user = entries
        .iter()
        .filter(|e| e.category == Category::Daily)
        .map(format_entry_line)
        .collect::<Vec<_>>()
        .join("\n");

    PromptPair {
        system: template(kind).replace(LANGUAGE_SLOT, language),
        user,
    }
}
