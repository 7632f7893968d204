//! Small helpers over raw source text: literals, identifiers, line bounds.

/// Inner content of a bare `"..."` or `'...'` literal.
///
/// Returns `None` for anything that is not a single quoted literal, including
/// concatenations such as `"a" .. "b"`.
pub fn extract_string_literal(arg: &str) -> Option<&str> {
    let arg = arg.trim();
    let bytes = arg.as_bytes();
    if bytes.len() < 2 {
        return None;
    }

    let quote = bytes[0];
    if (quote != b'"' && quote != b'\'') || bytes[bytes.len() - 1] != quote {
        return None;
    }

    let inner = &arg[1..arg.len() - 1];
    let inner_bytes = inner.as_bytes();
    let closes_early = inner_bytes
        .iter()
        .enumerate()
        .any(|(i, &b)| b == quote && (i == 0 || inner_bytes[i - 1] != b'\\'));
    if closes_early {
        return None;
    }

    Some(inner)
}

/// Numeric value of an argument, accepting decimal and `0x` hex forms.
pub fn extract_numeric(arg: &str) -> Option<f64> {
    let arg = arg.trim();
    if let Some(hex) = arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).ok().map(|v| v as f64);
    }
    arg.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Returns true for a plain Lua identifier.
pub fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Byte index of the start of the line containing `offset`.
pub fn line_start(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Byte index just past the newline ending the line containing `offset`,
/// or the text length for the last line.
pub fn next_line_start(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    text[offset..]
        .find('\n')
        .map(|i| offset + i + 1)
        .unwrap_or(text.len())
}

/// 0-based line number of `offset`.
pub fn line_of(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    text.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
}

/// Returns true if some line of `text`, trimmed, equals `line`.
pub fn has_line(text: &str, line: &str) -> bool {
    text.lines().any(|l| l.trim() == line)
}
