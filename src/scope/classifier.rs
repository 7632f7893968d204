//! Path → (scope, logical type) classification

use super::ScopeRule;
use crate::error::{AnnotateError, AnnotateResult};
use percent_encoding::percent_decode_str;
use serde::Serialize;

/// Scope and inferred type name of a classified file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Global the scope is written against (e.g. `ENT`)
    pub scope_name: String,
    /// Type name inferred from the path, original case
    pub logical_type: String,
}

/// A file path split into segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath {
    normalized: String,
    segments: Vec<String>,
    lowered: Vec<String>,
}

impl SourcePath {
    /// Build from a plain path or a `file://` URI
    pub fn parse(identifier: &str) -> AnnotateResult<Self> {
        let path = if let Some(rest) = identifier.strip_prefix("file://") {
            decode_uri_path(identifier, rest)?
        } else {
            identifier.to_string()
        };

        let normalized = path.replace('\\', "/");
        let segments: Vec<String> = normalized
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .map(str::to_string)
            .collect();
        if segments.is_empty() {
            return Err(AnnotateError::InvalidUri {
                uri: identifier.to_string(),
                reason: "path has no components".to_string(),
            });
        }
        let lowered = segments.iter().map(|s| s.to_lowercase()).collect();

        Ok(Self {
            normalized,
            segments,
            lowered,
        })
    }

    /// The path with `/` separators
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Final component, original case
    pub fn file_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// Final component without its extension
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }

    /// Containing directory with `/` separators, or `None` for a bare name
    pub fn parent(&self) -> Option<&str> {
        self.normalized
            .trim_end_matches('/')
            .rfind('/')
            .map(|idx| &self.normalized[..idx])
            .filter(|dir| !dir.is_empty())
            .or_else(|| self.normalized.starts_with('/').then_some("/"))
    }

    /// Directory segments (all but the last), lower-cased
    fn lowered_dirs(&self) -> &[String] {
        &self.lowered[..self.lowered.len() - 1]
    }

    /// Name of the containing directory, original case
    pub fn parent_name(&self) -> Option<&str> {
        let len = self.segments.len();
        (len >= 2).then(|| self.segments[len - 2].as_str())
    }
}

fn decode_uri_path(uri: &str, rest: &str) -> AnnotateResult<String> {
    let path = percent_decode_str(rest)
        .decode_utf8()
        .map_err(|e| AnnotateError::InvalidUri {
            uri: uri.to_string(),
            reason: format!("path is not UTF-8: {e}"),
        })?;

    // file:///c:/x → c:/x
    let drive = path.as_bytes();
    if drive.len() >= 3 && drive[0] == b'/' && drive[1].is_ascii_alphabetic() && drive[2] == b':'
    {
        return Ok(path[1..].to_string());
    }
    Ok(path.into_owned())
}

/// End index (into the directory segments) of the nearest-to-end occurrence of
/// `folder` among `dirs`.
fn last_occurrence(dirs: &[String], folder: &[String]) -> Option<usize> {
    let width = folder.len();
    if width == 0 || width > dirs.len() {
        return None;
    }

    (width - 1..dirs.len())
        .rev()
        .find(|&end| dirs[end + 1 - width..=end] == *folder)
}

/// Classify `path` against `rules`.
///
/// The rule whose folder occurs nearest to the end of the path wins; on a tie
/// the longer folder wins. Only directory segments are matched, never the
/// file name.
pub fn classify(path: &SourcePath, rules: &[ScopeRule]) -> Option<Classification> {
    let dirs = path.lowered_dirs();

    let mut best: Option<(usize, usize, &ScopeRule)> = None;
    for rule in rules {
        let Some(end) = last_occurrence(dirs, &rule.folder_segments) else {
            continue;
        };
        let width = rule.folder_segments.len();
        let better = match best {
            None => true,
            Some((best_end, best_width, _)) => {
                end > best_end || (end == best_end && width > best_width)
            }
        };
        if better {
            best = Some((end, width, rule));
        }
    }

    let (end, _, rule) = best?;
    let logical_type = if end + 1 == dirs.len() {
        path.file_stem().to_string()
    } else {
        path.segments[end + 1].clone()
    };

    Some(Classification {
        scope_name: rule.scope_name.clone(),
        logical_type,
    })
}
