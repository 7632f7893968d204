//! Accessor-pair synthesizer
//!
//! `AccessorFunc(target, backingKey, name [, forceType])` generates a getter,
//! a setter and a backing field. Lines come out backing, setter, getter.

use super::lines::{backing_line, getter_line, setter_line};
use super::owner::{Owner, OwnerResolver};
use super::{Fragment, InlineGroups};
use crate::context::AnnotatorContext;
use crate::scan::{
    CallSite, SplitOptions, extract_string_literal, find_calls, is_identifier, split_arguments,
};
use std::ops::Range;

/// Recognized argument shapes, by arity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorShape<'a> {
    /// `(target, key, name)`
    Untyped {
        target: &'a str,
        key: Option<&'a str>,
        name: &'a str,
    },
    /// `(target, key, name, force)`
    Forced {
        target: &'a str,
        key: Option<&'a str>,
        name: &'a str,
        force: &'a str,
    },
}

impl<'a> AccessorShape<'a> {
    pub fn target(&self) -> &'a str {
        match self {
            Self::Untyped { target, .. } | Self::Forced { target, .. } => target,
        }
    }

    pub fn key(&self) -> Option<&'a str> {
        match self {
            Self::Untyped { key, .. } | Self::Forced { key, .. } => *key,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Self::Untyped { name, .. } | Self::Forced { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessorCall<'a> {
    pub site: CallSite<'a>,
    pub shape: AccessorShape<'a>,
}

impl<'a> AccessorCall<'a> {
    /// Parse a scanned call; `None` when the shape is not recognized
    pub fn parse(site: CallSite<'a>) -> Option<Self> {
        let args = split_arguments(site.args, SplitOptions::nested());
        let (target, key, name) = match args.as_slice() {
            [target, key, name] | [target, key, name, _] => (*target, *key, *name),
            _ => return None,
        };

        if !is_identifier(target) {
            return None;
        }
        let name = extract_string_literal(name).filter(|n| is_identifier(n))?;
        let key = extract_string_literal(key).filter(|k| !k.is_empty());

        let shape = match args.get(3) {
            Some(&force) => AccessorShape::Forced {
                target,
                key,
                name,
                force,
            },
            None => AccessorShape::Untyped { target, key, name },
        };
        Some(Self { site, shape })
    }

    pub fn value_type<'c>(&self, ctx: &'c AnnotatorContext) -> &'c str {
        match self.shape {
            AccessorShape::Untyped { .. } => &ctx.untyped,
            AccessorShape::Forced { force, .. } => ctx.force_type(force),
        }
    }

    /// Backing field (when a key is given), setter, getter
    pub fn lines(&self, owner_type: &str, ctx: &AnnotatorContext) -> Vec<String> {
        let value = self.value_type(ctx);
        let name = self.shape.name();

        let mut lines = Vec::with_capacity(3);
        if let Some(key) = self.shape.key() {
            lines.push(backing_line(key, value, ctx.backing_visibility()));
        }
        lines.push(setter_line(name, owner_type, value));
        lines.push(getter_line(name, owner_type, value));
        lines
    }
}

/// Every recognized accessor call in `text`, in source order
pub fn scan<'a>(text: &'a str, ctx: &AnnotatorContext) -> Vec<AccessorCall<'a>> {
    find_calls(text, &ctx.patterns.accessor)
        .into_iter()
        .filter_map(|site| {
            let call = AccessorCall::parse(site);
            if call.is_none() {
                tracing::trace!(offset = site.start, "unrecognized accessor call shape");
            }
            call
        })
        .collect()
}

/// Field lines of the accessors in `span` whose target resolves to `owner_table`
pub fn collect_field_lines(
    text: &str,
    owner_table: &str,
    owner_type: &str,
    span: Range<usize>,
    ctx: &AnnotatorContext,
    resolver: &OwnerResolver<'_>,
) -> Vec<String> {
    scan(text, ctx)
        .iter()
        .filter(|call| span.contains(&call.site.start))
        .filter(|call| resolver.owned_by(call.shape.target(), call.site.start, owner_table))
        .flat_map(|call| call.lines(owner_type, ctx))
        .collect()
}

/// Inline fragments for accessors on meta tables. Accessors on plain tables
/// are embedded under their class annotation instead.
pub fn synthesize(
    text: &str,
    ctx: &AnnotatorContext,
    resolver: &OwnerResolver<'_>,
) -> Vec<Fragment> {
    let mut groups = InlineGroups::default();
    for call in scan(text, ctx) {
        if let Some(Owner::Meta(ty)) = resolver.resolve(call.shape.target(), call.site.start) {
            groups.push(ty, call.site.close, call.lines(ty, ctx));
        }
    }
    groups.into_fragments(text)
}
