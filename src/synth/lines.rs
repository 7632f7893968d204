//! Annotation line templates and fragment placement
//!
//! The templates are consumed by the language server's doc-comment parser and
//! must stay byte-exact.

use std::ops::Range;

/// `---@class <name>` or `---@class <name> : <base>`
pub fn class_line(name: &str, base: Option<&str>) -> String {
    match base {
        Some(base) => format!("---@class {name} : {base}"),
        None => format!("---@class {name}"),
    }
}

pub fn setter_line(name: &str, owner: &str, value: &str) -> String {
    format!("---@field Set{name} fun(self: {owner}, value: {value})")
}

pub fn getter_line(name: &str, owner: &str, value: &str) -> String {
    format!("---@field Get{name} fun(self: {owner}): {value}")
}

/// Backing field of an accessor pair, with an optional visibility token
pub fn backing_line(key: &str, value: &str, visibility: Option<&str>) -> String {
    match visibility {
        Some(vis) => format!("---@field {vis} {key} {value}"),
        None => format!("---@field {key} {value}"),
    }
}

/// Where an annotation fragment goes, as 0-based byte offsets into the
/// original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Top of the file, after a byte-order mark if present
    FileStart,
    /// Start of the line containing the offset
    AboveLine(usize),
    /// Start of the line following the one containing the offset
    BelowLine(usize),
}

/// Output of a synthesizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Annotation lines inserted as a block
    Annotation { lines: Vec<String>, anchor: Anchor },
    /// Source text replaced in place
    Rewrite { range: Range<usize>, text: String },
}

impl Fragment {
    pub fn annotation(lines: Vec<String>, anchor: Anchor) -> Self {
        Self::Annotation { lines, anchor }
    }

    /// Rendered text: annotation lines joined by `\n` with one trailing
    /// newline, or the rewrite text as is.
    pub fn render(&self) -> String {
        match self {
            Self::Annotation { lines, .. } => {
                let mut out = lines.join("\n");
                out.push('\n');
                out
            }
            Self::Rewrite { text, .. } => text.clone(),
        }
    }

    pub fn lines(&self) -> &[String] {
        match self {
            Self::Annotation { lines, .. } => lines,
            Self::Rewrite { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_templates() {
        assert_eq!(class_line("my_ent", Some("base_anim")), "---@class my_ent : base_anim");
        assert_eq!(class_line("Player", None), "---@class Player");
        assert_eq!(
            setter_line("Speed", "my_ent", "number"),
            "---@field SetSpeed fun(self: my_ent, value: number)"
        );
        assert_eq!(
            getter_line("Speed", "my_ent", "number"),
            "---@field GetSpeed fun(self: my_ent): number"
        );
        assert_eq!(
            backing_line("m_Speed", "number", Some("protected")),
            "---@field protected m_Speed number"
        );
        assert_eq!(backing_line("m_Speed", "any", None), "---@field m_Speed any");
    }

    #[test]
    fn test_render_has_exactly_one_trailing_newline() {
        let fragment = Fragment::annotation(
            vec!["---@class A".to_string(), "---@field x any".to_string()],
            Anchor::FileStart,
        );
        assert_eq!(fragment.render(), "---@class A\n---@field x any\n");
    }
}
