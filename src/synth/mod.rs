//! Documentation synthesizers
//!
//! Each synthesizer turns recognized call shapes into annotation fragments.
//! Placement is decided here; the diff assembler only converts anchors to
//! offsets and orders the result.

pub mod accessor;
pub mod lines;
pub mod macros;
pub mod network;
pub mod owner;
pub mod registration;
pub mod scoped;

pub use lines::{Anchor, Fragment};
pub use owner::{Owner, OwnerResolver};
pub use scoped::ScopeTarget;

use crate::scan::text::{has_line, line_start};
use regex::Regex;

/// Line-start offset of an existing `---@class <name>` annotation
pub fn find_class_line(text: &str, name: &str) -> Option<usize> {
    let pattern = format!(r"(?m)^[ \t]*---@class[ \t]+{}(?:[ \t:]|$)", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    re.find(text).map(|m| line_start(text, m.start()))
}

/// Drop lines already present in `text` and repeated lines, keeping order
pub fn missing_lines(text: &str, lines: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for line in lines {
        if !has_line(text, &line) && !out.contains(&line) {
            out.push(line);
        }
    }
    out
}

/// Field lines for reopened meta-table classes, grouped by type.
///
/// Each group is placed after the line holding its last call.
#[derive(Debug, Default)]
pub(crate) struct InlineGroups {
    groups: Vec<(String, usize, Vec<String>)>,
}

impl InlineGroups {
    pub(crate) fn push(&mut self, type_name: &str, anchor: usize, lines: Vec<String>) {
        match self.groups.iter_mut().find(|(name, _, _)| name == type_name) {
            Some((_, last, existing)) => {
                *last = (*last).max(anchor);
                existing.extend(lines);
            }
            None => self.groups.push((type_name.to_string(), anchor, lines)),
        }
    }

    pub(crate) fn into_fragments(self, text: &str) -> Vec<Fragment> {
        self.groups
            .into_iter()
            .filter_map(|(type_name, anchor, lines)| {
                let fields = missing_lines(text, lines);
                if fields.is_empty() {
                    return None;
                }
                let mut block = Vec::with_capacity(fields.len() + 1);
                block.push(lines::class_line(&type_name, None));
                block.extend(fields);
                Some(Fragment::annotation(block, Anchor::BelowLine(anchor)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_class_line() {
        let text = "local x = 1\n---@class my_ent : base_anim\n---@class my_ent_big\n";
        assert_eq!(find_class_line(text, "my_ent"), Some(12));
        assert_eq!(find_class_line(text, "my_ent_big"), Some(41));
        assert_eq!(find_class_line(text, "my"), None);
        assert_eq!(find_class_line("---@class A", "A"), Some(0));
    }

    #[test]
    fn test_missing_lines_skips_present_and_repeated() {
        let text = "---@field SetA fun(self: T, value: any)\n";
        let lines = vec![
            "---@field SetA fun(self: T, value: any)".to_string(),
            "---@field GetA fun(self: T): any".to_string(),
            "---@field GetA fun(self: T): any".to_string(),
        ];
        assert_eq!(missing_lines(text, lines), vec!["---@field GetA fun(self: T): any"]);
    }

    #[test]
    fn test_inline_groups_merge_by_type() {
        let mut groups = InlineGroups::default();
        groups.push("Player", 10, vec!["---@field a any".to_string()]);
        groups.push("Entity", 20, vec!["---@field b any".to_string()]);
        groups.push("Player", 30, vec!["---@field c any".to_string()]);

        let fragments = groups.into_fragments("");
        assert_eq!(fragments.len(), 2);
        assert_eq!(
            fragments[0],
            Fragment::annotation(
                vec![
                    "---@class Player".to_string(),
                    "---@field a any".to_string(),
                    "---@field c any".to_string(),
                ],
                Anchor::BelowLine(30),
            )
        );
    }
}
