//! Diff assembly
//!
//! Turns synthesizer fragments into host text edits. Offsets are always taken
//! against the original text, so the result is ordered for application from
//! the end of the file backwards.

use crate::error::{AnnotateError, AnnotateResult};
use crate::scan::text::{line_start, next_line_start};
use crate::synth::{Anchor, Fragment};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::ops::Range;

const BOM: &str = "\u{feff}";

/// One edit in the host's coordinates.
///
/// Positions are 1-based byte positions. `finish < start` inserts `text`
/// before byte `start`; otherwise bytes `start..=finish` are replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub start: usize,
    pub finish: usize,
    pub text: String,
}

impl TextEdit {
    /// Insert before the 0-based byte `offset`
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            start: offset + 1,
            finish: offset,
            text: text.into(),
        }
    }

    /// Replace the 0-based half-open `range`
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            start: range.start + 1,
            finish: range.end,
            text: text.into(),
        }
    }

    pub fn is_insertion(&self) -> bool {
        self.finish < self.start
    }

    /// 0-based position the edit starts at
    pub fn offset(&self) -> usize {
        self.start.saturating_sub(1)
    }

    /// 0-based half-open byte range the edit covers; empty for insertions
    pub fn range(&self) -> Range<usize> {
        let start = self.offset();
        start..self.finish.max(start)
    }
}

#[derive(Debug)]
struct Pending {
    seq: usize,
    range: Range<usize>,
    insertion: bool,
    text: String,
}

fn check_offset(text: &str, offset: usize) -> AnnotateResult<()> {
    if offset > text.len() {
        return Err(AnnotateError::EditOutOfBounds {
            start: offset,
            end: offset,
            len: text.len(),
        });
    }
    if !text.is_char_boundary(offset) {
        return Err(AnnotateError::EditNotOnBoundary {
            start: offset,
            end: offset,
        });
    }
    Ok(())
}

fn check_range(text: &str, range: &Range<usize>) -> AnnotateResult<()> {
    if range.start > range.end || range.end > text.len() {
        return Err(AnnotateError::EditOutOfBounds {
            start: range.start,
            end: range.end,
            len: text.len(),
        });
    }
    if !text.is_char_boundary(range.start) || !text.is_char_boundary(range.end) {
        return Err(AnnotateError::EditNotOnBoundary {
            start: range.start,
            end: range.end,
        });
    }
    Ok(())
}

/// 0-based insertion point of an anchor, plus whether a newline must be
/// prepended because the anchor line is the unterminated last line.
fn anchor_position(text: &str, anchor: Anchor) -> AnnotateResult<(usize, bool)> {
    match anchor {
        Anchor::FileStart => Ok((if text.starts_with(BOM) { BOM.len() } else { 0 }, false)),
        Anchor::AboveLine(offset) => {
            check_offset(text, offset)?;
            Ok((line_start(text, offset), false))
        }
        Anchor::BelowLine(offset) => {
            check_offset(text, offset)?;
            let pos = next_line_start(text, offset);
            let unterminated = pos == text.len() && !text.is_empty() && !text.ends_with('\n');
            Ok((pos, unterminated))
        }
    }
}

/// Assemble `fragments` into edits against `text`.
///
/// The result never holds overlapping replacements; an insertion that would
/// land strictly inside a replacement is moved to the replacement's end.
/// Edits are sorted by descending start. At the same start a replacement comes
/// before insertions, and insertions come in reverse generation order, so
/// applying the list front to back keeps generated blocks in generation order.
pub fn assemble(fragments: &[Fragment], text: &str) -> AnnotateResult<Vec<TextEdit>> {
    let mut replacements: Vec<Pending> = Vec::new();
    let mut insertions: Vec<Pending> = Vec::new();

    for (seq, fragment) in fragments.iter().enumerate() {
        match fragment {
            Fragment::Annotation { lines, anchor } => {
                if lines.is_empty() {
                    continue;
                }
                let (pos, needs_newline) = anchor_position(text, *anchor)?;
                let mut body = fragment.render();
                if needs_newline {
                    body.insert(0, '\n');
                }
                insertions.push(Pending {
                    seq,
                    range: pos..pos,
                    insertion: true,
                    text: body,
                });
            }
            Fragment::Rewrite { range, text: body } => {
                check_range(text, range)?;
                let overlaps = replacements
                    .iter()
                    .any(|r| r.range.start < range.end && range.start < r.range.end);
                if overlaps {
                    tracing::debug!(
                        start = range.start,
                        end = range.end,
                        "dropping replacement overlapping an earlier one"
                    );
                    continue;
                }
                replacements.push(Pending {
                    seq,
                    range: range.clone(),
                    insertion: false,
                    text: body.clone(),
                });
            }
        }
    }

    for insertion in &mut insertions {
        let pos = insertion.range.start;
        if let Some(r) = replacements
            .iter()
            .find(|r| r.range.start < pos && pos < r.range.end)
        {
            tracing::trace!(from = pos, to = r.range.end, "insertion moved past replacement");
            insertion.range = r.range.end..r.range.end;
        }
    }

    let mut pending: Vec<Pending> = replacements.into_iter().chain(insertions).collect();
    pending.sort_by_key(|p| (Reverse(p.range.start), p.insertion, Reverse(p.seq)));

    Ok(pending
        .into_iter()
        .map(|p| {
            if p.insertion {
                TextEdit::insert(p.range.start, p.text)
            } else {
                TextEdit::replace(p.range, p.text)
            }
        })
        .collect())
}

/// Apply an assembled edit list to `text`
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> AnnotateResult<String> {
    let mut out = text.to_string();
    for edit in edits {
        if edit.start == 0 {
            return Err(AnnotateError::EditOutOfBounds {
                start: edit.start,
                end: edit.finish,
                len: out.len(),
            });
        }
        let range = edit.range();
        check_range(&out, &range)?;
        out.replace_range(range, &edit.text);
    }
    Ok(out)
}
