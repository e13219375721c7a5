//! Normalization of model output before it is written as a report

use regex::Regex;
use std::sync::LazyLock;

static THINK_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(\s*)<think>.*?</think>(\s*)").expect("valid think regex")
});

const THINK_CLOSE: &str = "</think>";
const FENCE: &str = "```";

/// Strip reasoning traces and a Markdown code-fence wrapper from model output.
///
/// - every `<think>...</think>` span is removed; at either end of the text its
///   surrounding whitespace goes with it, in the middle the lines around it stay apart
/// - a `</think>` that ends its line with no opening tag before it (the opening
///   tag was cut off) drops everything before it
/// - a leading ```` ``` ````/```` ```markdown ```` line and its closing fence are removed
/// - the result is trimmed
///
/// Runs to a fixpoint, so `cleanup_response(cleanup_response(t)) == cleanup_response(t)`.
pub fn cleanup_response(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = cleanup_pass(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn cleanup_pass(text: &str) -> String {
    let without_think = remove_think_blocks(text);
    let body = after_dangling_close(&without_think);
    strip_fences(body.trim()).trim().to_string()
}

fn remove_think_blocks(text: &str) -> String {
    THINK_BLOCK
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let (start, end) = caps
                .get(0)
                .map_or((0, 0), |m| (m.start(), m.end()));
            if start == 0 || end == text.len() {
                return "";
            }
            let around = [caps.get(1), caps.get(2)]
                .into_iter()
                .flatten()
                .map(|m| m.as_str());
            let mut separator = "";
            for ws in around {
                if ws.contains('\n') {
                    return "\n";
                }
                if !ws.is_empty() {
                    separator = " ";
                }
            }
            separator
        })
        .into_owned()
}

/// Text after the first `</think>` that closes a line, when no `<think>` opens before it
fn after_dangling_close(text: &str) -> &str {
    for (pos, _) in text.match_indices(THINK_CLOSE) {
        if text[..pos].contains("<think>") {
            return text;
        }
        let rest = &text[pos + THINK_CLOSE.len()..];
        let line_tail = rest.split('\n').next().unwrap_or("");
        if line_tail.trim().is_empty() {
            return rest;
        }
    }
    text
}

fn strip_fences(text: &str) -> &str {
    let mut body = text;
    let mut opened = false;

    if body.starts_with(FENCE) {
        let (first_line, rest) = body.split_once('\n').unwrap_or((body, ""));
        let info = first_line[FENCE.len()..].trim();
        if info.is_empty() || info.eq_ignore_ascii_case("markdown") || info.eq_ignore_ascii_case("md") {
            body = rest;
            opened = true;
        }
    }

    let trimmed = body.trim_end();
    if let Some(before) = trimmed.strip_suffix(FENCE) {
        let on_own_line = before.is_empty() || before.ends_with('\n');
        // Without an opening wrapper, a closing fence that pairs with an
        // inner code block must stay.
        let unpaired = fence_lines(trimmed) % 2 == 1;
        if on_own_line && (opened || unpaired) {
            return before;
        }
    }
    body
}

fn fence_lines(text: &str) -> usize {
    text.lines()
        .filter(|line| line.trim_start().starts_with(FENCE))
        .count()
}
