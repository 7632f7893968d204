//! Networked-field synthesizer
//!
//! `receiver:NetworkVar(type, name)` and `receiver:NetworkVar(type, slot, name)`
//! (optionally followed by an editor table) generate a setter and a getter, in
//! that order. This is the reverse of the accessor convention and downstream
//! tooling expects it.

use super::lines::{getter_line, setter_line};
use super::owner::{Owner, OwnerResolver};
use super::{Fragment, InlineGroups};
use crate::context::AnnotatorContext;
use crate::scan::{
    CallSite, SplitOptions, extract_string_literal, find_calls, is_identifier, split_arguments,
};
use std::ops::Range;

/// Recognized argument shapes, by arity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkShape<'a> {
    /// `(type, name)`
    Plain { declared: &'a str, name: &'a str },
    /// `(type, slot, name)`
    Indexed {
        declared: &'a str,
        slot: &'a str,
        name: &'a str,
    },
}

impl<'a> NetworkShape<'a> {
    pub fn declared(&self) -> &'a str {
        match self {
            Self::Plain { declared, .. } | Self::Indexed { declared, .. } => declared,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Self::Plain { name, .. } | Self::Indexed { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkCall<'a> {
    pub site: CallSite<'a>,
    /// Receiver token; `self` when the pattern does not capture one
    pub receiver: &'a str,
    pub shape: NetworkShape<'a>,
}

/// Parse the raw argument text of a networked-field call
pub fn parse_arguments(args: &str) -> Option<NetworkShape<'_>> {
    let args = split_arguments(args, SplitOptions::nested());
    let shape = match args[..] {
        [declared, name] => NetworkShape::Plain {
            declared: extract_string_literal(declared)?,
            name: extract_string_literal(name)?,
        },
        // A trailing `{ KeyName = ..., Edit = {...} }` table only feeds the editor.
        // Braces are not tracked, so its commas split it into several pieces.
        [declared, slot, name, ref extra @ ..]
            if extra.first().is_none_or(|e| e.starts_with('{')) =>
        {
            NetworkShape::Indexed {
                declared: extract_string_literal(declared)?,
                slot,
                name: extract_string_literal(name)?,
            }
        }
        _ => {
            tracing::debug!(args = args.len(), "unrecognized networked-field arguments");
            return None;
        }
    };
    is_identifier(shape.name()).then_some(shape)
}

impl<'a> NetworkCall<'a> {
    pub fn parse(site: CallSite<'a>) -> Option<Self> {
        Some(Self {
            site,
            receiver: site.receiver.unwrap_or("self"),
            shape: parse_arguments(site.args)?,
        })
    }

    /// Setter, getter
    pub fn lines(&self, owner_type: &str, ctx: &AnnotatorContext) -> Vec<String> {
        shape_lines(&self.shape, owner_type, ctx)
    }
}

/// Setter then getter for one parsed shape
pub fn shape_lines(
    shape: &NetworkShape<'_>,
    owner_type: &str,
    ctx: &AnnotatorContext,
) -> Vec<String> {
    let value = ctx.network_type(shape.declared());
    vec![
        setter_line(shape.name(), owner_type, value),
        getter_line(shape.name(), owner_type, value),
    ]
}

/// Every recognized networked-field call in `text`, in source order
pub fn scan<'a>(text: &'a str, ctx: &AnnotatorContext) -> Vec<NetworkCall<'a>> {
    find_calls(text, &ctx.patterns.network)
        .into_iter()
        .filter_map(NetworkCall::parse)
        .collect()
}

/// Field lines of the networked fields in `span` whose receiver resolves to
/// `owner_table`
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
        .filter(|call| resolver.owned_by(call.receiver, call.site.start, owner_table))
        .flat_map(|call| call.lines(owner_type, ctx))
        .collect()
}

/// Inline fragments for networked fields declared on meta tables
pub fn synthesize(
    text: &str,
    ctx: &AnnotatorContext,
    resolver: &OwnerResolver<'_>,
) -> Vec<Fragment> {
    let mut groups = InlineGroups::default();
    for call in scan(text, ctx) {
        if let Some(Owner::Meta(ty)) = resolver.resolve(call.receiver, call.site.start) {
            groups.push(ty, call.site.close, call.lines(ty, ctx));
        }
    }
    groups.into_fragments(text)
}
