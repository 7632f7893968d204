//! Text pass entry point
//!
//! Runs every synthesizer over one file and assembles the edits. Failures
//! stay inside this boundary: a file that cannot be processed yields no edits
//! and a warning, never an error for the host.

use crate::context::AnnotatorContext;
use crate::diff::{TextEdit, assemble};
use crate::error::AnnotateResult;
use crate::scope::SourcePath;
use crate::synth::{
    Fragment, OwnerResolver, ScopeTarget, accessor, macros, network, registration, scoped,
};

/// Every fragment for `text`, in generation order
pub fn fragments(path: &SourcePath, text: &str, ctx: &AnnotatorContext) -> Vec<Fragment> {
    let resolver = OwnerResolver::new(text, &ctx.patterns);
    let mut fragments = macros::synthesize(text, ctx);

    if let Some(target) = ScopeTarget::resolve(path, text, ctx) {
        tracing::debug!(
            path = path.as_str(),
            scope = %target.global,
            class = %target.logical_type,
            base = %target.base.value,
            "scoped file"
        );
        fragments.extend(scoped::synthesize(text, &target, ctx, &resolver));
    }

    fragments.extend(registration::synthesize(text, ctx, &resolver));
    fragments.extend(accessor::synthesize(text, ctx, &resolver));
    fragments.extend(network::synthesize(text, ctx, &resolver));
    fragments
}

/// Edits for one file, or an error if the file identifier or a computed
/// offset is invalid
pub fn annotate(uri: &str, text: &str, ctx: &AnnotatorContext) -> AnnotateResult<Vec<TextEdit>> {
    let path = SourcePath::parse(uri)?;
    let fragments = fragments(&path, text, ctx);
    assemble(&fragments, text)
}

/// Host-facing entry: `None` when there is nothing to change or the file
/// could not be processed
pub fn annotate_file(uri: &str, text: &str, ctx: &AnnotatorContext) -> Option<Vec<TextEdit>> {
    match annotate(uri, text, ctx) {
        Ok(edits) if edits.is_empty() => None,
        Ok(edits) => {
            tracing::debug!(uri, edits = edits.len(), "annotated");
            Some(edits)
        }
        Err(e) => {
            tracing::warn!(uri, error = %e, code = %e.status_code(), "skipping file");
            None
        }
    }
}
