//! Base-class macro rewrite
//!
//! `DEFINE_BASECLASS(x)` is a preprocessor-style macro the language server
//! cannot see through; it is replaced with the plain Lua it expands to.

use super::Fragment;
use crate::context::AnnotatorContext;
use crate::scan::find_calls;

pub fn synthesize(text: &str, ctx: &AnnotatorContext) -> Vec<Fragment> {
    find_calls(text, &ctx.patterns.base_macro)
        .into_iter()
        .map(|site| Fragment::Rewrite {
            range: site.span(),
            text: ctx.base_macro_replacement(site.args),
        })
        .collect()
}
