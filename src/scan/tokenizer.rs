//! Top-level argument splitting
//!
//! Splits the raw text between a call's parentheses into argument expressions.
//! Quote handling is deliberately approximate: a quote closes the string unless
//! the byte right before it is a backslash. `"a\\"` is therefore misread as an
//! unterminated string, the same way the call scanner misreads it.

/// Options for [`split_arguments`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitOptions {
    /// Ignore commas nested inside parentheses
    pub track_parentheses: bool,
}

impl SplitOptions {
    pub fn nested() -> Self {
        Self {
            track_parentheses: true,
        }
    }
}

/// Tracks whether the cursor is inside a quoted string
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct QuoteState {
    active: Option<u8>,
}

impl QuoteState {
    /// Feed byte `idx` of `bytes`; returns true if the byte was consumed as
    /// part of string bookkeeping (opening quote, body, closing quote).
    #[inline]
    pub(crate) fn step(&mut self, bytes: &[u8], idx: usize) -> bool {
        let b = bytes[idx];
        match self.active {
            Some(quote) => {
                if b == quote && (idx == 0 || bytes[idx - 1] != b'\\') {
                    self.active = None;
                }
                true
            }
            None if b == b'"' || b == b'\'' => {
                self.active = Some(b);
                true
            }
            None => false,
        }
    }
}

/// Split `args` on top-level commas, trimming each argument.
///
/// Whitespace-only input yields no arguments. Any other input yields exactly
/// one more argument than it has top-level commas, so `"a,"` is `["a", ""]`.
pub fn split_arguments(args: &str, options: SplitOptions) -> Vec<&str> {
    if args.trim().is_empty() {
        return Vec::new();
    }

    let bytes = args.as_bytes();
    let mut quotes = QuoteState::default();
    let mut depth: usize = 0;
    let mut start = 0;
    let mut parts = Vec::new();

    for idx in 0..bytes.len() {
        if quotes.step(bytes, idx) {
            continue;
        }
        match bytes[idx] {
            b'(' if options.track_parentheses => depth += 1,
            b')' if options.track_parentheses => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(args[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(args[start..].trim());

    parts
}
