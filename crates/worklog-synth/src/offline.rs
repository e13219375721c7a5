use worklog_core::{format_entry_line, ReportKind};
use worklog_store::{Category, LogEntry};

/// Report body without a model: the daily log lines as a Markdown list
pub fn offline_report(entries: &[LogEntry], kind: ReportKind) -> String {
    let lines: Vec<String> = entries
        .iter()
        .filter(|e| e.category == Category::Daily)
        .map(|e| format!("- {}", format_entry_line(e)))
        .collect();

    let mut report = format!("# {} work log\n", capitalize(kind.as_str()));
    if lines.is_empty() {
        report.push_str("\nNo daily entries.\n");
    } else {
        report.push('\n');
        report.push_str(&lines.join("\n"));
        report.push('\n');
    }
    report
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
