//! Call site scanner
//!
//! Locates every call matching a prefix regex and pairs it with its balanced
//! closing parenthesis. Works on raw text, so it tolerates files the host
//! parser would reject.

use super::tokenizer::QuoteState;
use regex::Regex;

/// One matched call occurrence
///
/// Offsets are 0-based byte indices into the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    /// Text matched by the prefix pattern, including the opening parenthesis
    pub prefix: &'a str,
    /// First capture group of the prefix pattern, if it has one
    pub receiver: Option<&'a str>,
    /// Raw text between the parentheses
    pub args: &'a str,
    /// Start of the prefix match
    pub start: usize,
    /// Index of the matching `)`
    pub close: usize,
}

impl CallSite<'_> {
    /// Byte range covering the whole call, prefix through closing parenthesis
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.close + 1
    }
}

/// Returns true if `pattern` can be used as a call prefix.
///
/// The pattern has to end at an opening parenthesis; anything else would make
/// the balanced scan start at an arbitrary byte.
pub fn is_call_prefix(pattern: &Regex) -> bool {
    pattern.as_str().ends_with(r"\(")
}

/// Find the `)` matching an already-consumed `(`.
///
/// `from` is the index just after the opening parenthesis. Parentheses inside
/// quoted strings are ignored. Returns `None` when the text ends first.
pub fn find_matching_close(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut quotes = QuoteState::default();
    let mut depth: usize = 1;

    for idx in from..bytes.len() {
        if quotes.step(bytes, idx) {
            continue;
        }
        match bytes[idx] {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }

    None
}

/// Find every call in `text` whose prefix matches `prefix`.
///
/// Results are in source order and never overlap: scanning resumes after each
/// call's closing parenthesis, so calls nested in another match's arguments
/// are not reported. An unbalanced call stops the scan; calls found before it
/// are still returned.
pub fn find_calls<'a>(text: &'a str, prefix: &Regex) -> Vec<CallSite<'a>> {
    let mut calls = Vec::new();

    if !is_call_prefix(prefix) {
        tracing::debug!(
            pattern = prefix.as_str(),
            "call prefix does not end at an opening parenthesis, skipping scan"
        );
        return calls;
    }

    let mut search_start = 0;
    while search_start < text.len() {
        let Some(captures) = prefix.captures_at(text, search_start) else {
            break;
        };
        let Some(whole) = captures.get(0) else {
            break;
        };
        if whole.is_empty() || !whole.as_str().ends_with('(') {
            break;
        }

        let open_end = whole.end();
        let Some(close) = find_matching_close(text, open_end) else {
            tracing::debug!(
                offset = whole.start(),
                "unbalanced call, abandoning the rest of the scan"
            );
            break;
        };

        calls.push(CallSite {
            prefix: whole.as_str(),
            receiver: captures.get(1).map(|m| m.as_str()),
            args: &text[open_end..close],
            start: whole.start(),
            close,
        });

        search_start = close + 1;
    }

    calls
}
