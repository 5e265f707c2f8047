//! Free-text cleanup for meeting bodies and log cells.
//!
//! Event bodies arrive as HTML more often than not, carry signature
//! blocks separated by long underscore rules, and use bare acronyms that
//! the destination timesheet wants spelled out. Everything in this module
//! is a pure function of its inputs.

use scraper::Html;

use crate::model::AcronymRule;

/// Minimum length of an underscore run treated as a boilerplate divider.
const BOILERPLATE_RUN: usize = 10;

/// Strips markup from `raw`, truncates trailing boilerplate, and trims the
/// result. Plain text passes through unchanged apart from whitespace
/// normalization.
pub fn normalize(raw: &str) -> String {
    let text = strip_markup(raw);
    truncate_boilerplate(&text).trim().to_string()
}

/// Removes all markup elements, including `script`/`style` blocks and
/// embedded comments, preserving visible text joined on single spaces.
pub fn strip_markup(raw: &str) -> String {
    let fragment = Html::parse_fragment(raw);
    let mut parts: Vec<&str> = Vec::new();

    for node in fragment.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |element| matches!(element.name(), "script" | "style"))
        });
        if !hidden {
            parts.push(text);
        }
    }

    let joined = parts.join(" ");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Discards everything from the first run of ten or more consecutive
/// underscores onward. Signature blocks in the source mail bodies are
/// separated from the agenda by such a rule.
pub fn truncate_boilerplate(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut run_start = None;
    let mut run_len = 0;

    for (idx, byte) in bytes.iter().enumerate() {
        if *byte == b'_' {
            if run_len == 0 {
                run_start = Some(idx);
            }
            run_len += 1;
            if run_len >= BOILERPLATE_RUN {
                // Safe: run_start is set whenever run_len > 0.
                return text[..run_start.unwrap_or(idx)].trim_end();
            }
        } else {
            run_len = 0;
            run_start = None;
        }
    }

    text
}

/// Appends a terminating period when the text does not already end with
/// one, so that static suffix text can be concatenated as a new sentence.
pub fn ensure_terminated(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.is_empty() || trimmed.ends_with('.') {
        trimmed.to_string()
    } else {
        format!("{trimmed}.")
    }
}

/// Expands bare acronym occurrences into their full forms.
///
/// Rules apply in list order; when short forms overlap, an earlier rule
/// may shadow a later one. Occurrences already written as
/// `short (long)` or `long (short)` are protected: substitution
/// candidates intersecting a protected span are copied verbatim instead
/// of relying on sentinel substrings that could collide with user text.
pub fn expand(text: &str, rules: &[AcronymRule]) -> String {
    let mut current = text.to_string();
    for rule in rules {
        current = apply_rule(&current, rule);
    }
    current
}

fn apply_rule(text: &str, rule: &AcronymRule) -> String {
    let protected = protected_spans(text, rule);
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in rule.pattern().captures_iter(text) {
        let (Some(whole), Some(lead), Some(acr), Some(tail)) = (
            caps.get(0),
            caps.name("lead"),
            caps.name("acr"),
            caps.name("tail"),
        ) else {
            continue;
        };

        out.push_str(&text[last..whole.start()]);
        if intersects(&protected, acr.start(), acr.end()) {
            out.push_str(whole.as_str());
        } else {
            out.push_str(lead.as_str());
            out.push_str(rule.long());
            out.push_str(tail.as_str());
        }
        last = whole.end();
    }

    out.push_str(&text[last..]);
    out
}

/// Byte spans of already-expanded occurrences that must not be altered.
fn protected_spans(text: &str, rule: &AcronymRule) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    for form in rule.protected_forms() {
        for (start, matched) in text.match_indices(form.as_str()) {
            spans.push((start, start + matched.len()));
        }
    }
    spans
}

fn intersects(spans: &[(usize, usize)], start: usize, end: usize) -> bool {
    spans.iter().any(|(s, e)| start < *e && *s < end)
}
