//! Class annotation for files inside a scope folder

use super::lines::class_line;
use super::owner::OwnerResolver;
use super::{Anchor, Fragment, accessor, find_class_line, missing_lines, network};
use crate::context::AnnotatorContext;
use crate::scope::{FolderBase, FolderScope, SourcePath, classify, detect, find_base_assignment};
use serde::Serialize;

/// The type a scoped file contributes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeTarget {
    /// Scope global the file writes to (e.g. `ENT`)
    pub global: String,
    pub logical_type: String,
    pub base: FolderBase,
    /// Set when the type spans a whole directory
    pub folder: Option<FolderScope>,
}

impl ScopeTarget {
    /// Classify `path` and resolve the type's base.
    ///
    /// A base assigned in the file itself wins over the folder's hub files;
    /// with neither, the scope global stands in.
    pub fn resolve(path: &SourcePath, text: &str, ctx: &AnnotatorContext) -> Option<Self> {
        let classification = classify(path, &ctx.rules)?;
        let rule = ctx.rule(&classification.scope_name)?;

        let folder = detect(path, &classification, rule, ctx.fs(), ctx.folder_cache());
        let base = find_base_assignment(text, &rule.base_assignment)
            .or_else(|| folder.as_ref().map(|f| f.base.clone()))
            .unwrap_or_else(|| FolderBase::literal(&rule.scope_name));

        Some(Self {
            global: classification.scope_name,
            logical_type: classification.logical_type,
            base,
            folder,
        })
    }

    pub fn class_line(&self) -> String {
        class_line(&self.logical_type, Some(&self.base.value))
    }
}

/// Field lines for everything the file declares on the scope global
pub fn collect_field_lines(
    text: &str,
    target: &ScopeTarget,
    ctx: &AnnotatorContext,
    resolver: &OwnerResolver<'_>,
) -> Vec<String> {
    let owner = &target.global;
    let owner_type = &target.logical_type;
    let whole = 0..text.len();
    let mut lines =
        accessor::collect_field_lines(text, owner, owner_type, whole.clone(), ctx, resolver);
    lines.extend(network::collect_field_lines(
        text, owner, owner_type, whole, ctx, resolver,
    ));
    lines
}

/// The class annotation at the top of the file, or only the missing field
/// lines below an existing class annotation.
pub fn synthesize(
    text: &str,
    target: &ScopeTarget,
    ctx: &AnnotatorContext,
    resolver: &OwnerResolver<'_>,
) -> Option<Fragment> {
    let fields = missing_lines(text, collect_field_lines(text, target, ctx, resolver));

    match find_class_line(text, &target.logical_type) {
        Some(existing) => {
            if fields.is_empty() {
                return None;
            }
            Some(Fragment::annotation(fields, Anchor::BelowLine(existing)))
        }
        None => {
            let mut lines = Vec::with_capacity(fields.len() + 1);
            lines.push(target.class_line());
            lines.extend(fields);
            Some(Fragment::annotation(lines, Anchor::FileStart))
        }
    }
}
