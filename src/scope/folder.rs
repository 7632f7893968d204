//! Folder-structure detection
//!
//! Decides whether a type is spread over a directory (`entities/crate/init.lua`,
//! `cl_init.lua`, `sh_parts.lua`, ...) or lives in one file, and for directory
//! types looks up the declared base in the hub files.

use super::{Classification, FolderBaseCache, ScopeRule, SourcePath};
use crate::fs::SourceFs;
use regex::Regex;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseKind {
    /// `ENT.Base = SomeGlobal`
    Identifier,
    /// `ENT.Base = "base_anim"`, or the scope global when nothing is declared
    Literal,
}

/// Declared base of a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderBase {
    pub kind: BaseKind,
    pub value: String,
}

impl FolderBase {
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            kind: BaseKind::Literal,
            value: value.into(),
        }
    }

    pub fn identifier(value: impl Into<String>) -> Self {
        Self {
            kind: BaseKind::Identifier,
            value: value.into(),
        }
    }
}

/// A type defined by a whole directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderScope {
    /// The directory, `/`-separated
    pub path: String,
    pub base: FolderBase,
}

/// First `<scope>.Base = <value>` assignment in `text`.
///
/// `pattern` must capture a double-quoted value in group 1, a single-quoted
/// value in group 2 and an identifier in group 3.
pub fn find_base_assignment(text: &str, pattern: &Regex) -> Option<FolderBase> {
    let captures = pattern.captures(text)?;
    if let Some(literal) = captures.get(1).or_else(|| captures.get(2)) {
        return Some(FolderBase::literal(literal.as_str()));
    }
    captures
        .get(3)
        .map(|ident| FolderBase::identifier(ident.as_str()))
}

fn directory_holds_type_files(dir: &str, rule: &ScopeRule, fs: &dyn SourceFs) -> bool {
    let dir_path = Path::new(dir);
    if rule.hubs.iter().any(|hub| fs.exists(&dir_path.join(hub))) {
        return true;
    }
    fs.list_files(dir_path)
        .iter()
        .any(|name| rule.is_hub(name) || rule.is_satellite(name))
}

fn resolve_base(dir: &str, rule: &ScopeRule, fs: &dyn SourceFs) -> FolderBase {
    let dir_path = Path::new(dir);
    rule.hubs
        .iter()
        .filter_map(|hub| fs.read_to_string(&dir_path.join(hub)))
        .find_map(|content| find_base_assignment(&content, &rule.base_assignment))
        .unwrap_or_else(|| FolderBase::literal(&rule.scope_name))
}

/// Detect a directory-scoped type for `path`.
///
/// Returns `None` when the type is confined to the file itself. Once a folder
/// scope is established the result always carries a base, defaulting to the
/// scope global, and is cached per `(folder, scope)` for the session.
pub fn detect(
    path: &SourcePath,
    classification: &Classification,
    rule: &ScopeRule,
    fs: &dyn SourceFs,
    cache: &FolderBaseCache,
) -> Option<FolderScope> {
    let dir = path.parent()?;

    let is_folder_type = rule.is_hub(path.file_name())
        || (path
            .parent_name()
            .is_some_and(|name| name.eq_ignore_ascii_case(&classification.logical_type))
            && directory_holds_type_files(dir, rule, fs));
    if !is_folder_type {
        return None;
    }

    let base = match cache.get(dir, &rule.scope_name) {
        Some(base) => {
            tracing::trace!(folder = dir, scope = %rule.scope_name, "folder base cache hit");
            base
        }
        None => {
            let base = cache.get_or_insert(dir, &rule.scope_name, resolve_base(dir, rule, fs));
            tracing::debug!(
                folder = dir,
                scope = %rule.scope_name,
                base = %base.value,
                "resolved folder base"
            );
            base
        }
    };

    Some(FolderScope {
        path: dir.to_string(),
        base: (*base).clone(),
    })
}
