//! Registration synthesizer
//!
//! Panels and controls registered at runtime (`vgui.Register`,
//! `derma.DefineControl`) get a class annotation above the assignment that
//! created their table, with the table's accessor and networked fields
//! underneath.

use super::lines::class_line;
use super::owner::OwnerResolver;
use super::{Anchor, Fragment, accessor, find_class_line, missing_lines, network};
use crate::config::RegistrationShapeKind;
use crate::context::AnnotatorContext;
use crate::scan::text::line_start;
use crate::scan::{
    CallSite, SplitOptions, extract_string_literal, find_calls, is_identifier, split_arguments,
};

/// Recognized argument shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationShape<'a> {
    /// `(name, table [, base])`
    Panel {
        name: &'a str,
        table: &'a str,
        base: Option<&'a str>,
    },
    /// `(name, description, table [, base])`
    Control {
        name: &'a str,
        description: &'a str,
        table: &'a str,
        base: Option<&'a str>,
    },
}

impl<'a> RegistrationShape<'a> {
    pub fn parse(args: &'a str, kind: RegistrationShapeKind) -> Option<Self> {
        let args = split_arguments(args, SplitOptions::nested());
        let shape = match (kind, &args[..]) {
            (RegistrationShapeKind::Panel, &[name, table, ref rest @ ..]) if rest.len() <= 1 => {
                Self::Panel {
                    name: extract_string_literal(name)?,
                    table,
                    base: rest.first().and_then(|&b| extract_string_literal(b)),
                }
            }
            (RegistrationShapeKind::Control, &[name, description, table, ref rest @ ..])
                if rest.len() <= 1 =>
            {
                Self::Control {
                    name: extract_string_literal(name)?,
                    description,
                    table,
                    base: rest.first().and_then(|&b| extract_string_literal(b)),
                }
            }
            _ => return None,
        };

        (!shape.name().is_empty() && is_identifier(shape.table())).then_some(shape)
    }

    pub fn name(&self) -> &'a str {
        match self {
            Self::Panel { name, .. } | Self::Control { name, .. } => name,
        }
    }

    pub fn table(&self) -> &'a str {
        match self {
            Self::Panel { table, .. } | Self::Control { table, .. } => table,
        }
    }

    pub fn base(&self) -> Option<&'a str> {
        match self {
            Self::Panel { base, .. } | Self::Control { base, .. } => *base,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration<'a> {
    pub site: CallSite<'a>,
    pub shape: RegistrationShape<'a>,
    pub default_base: &'a str,
}

impl Registration<'_> {
    pub fn base(&self) -> &str {
        self.shape.base().unwrap_or(self.default_base)
    }
}

/// Every recognized registration call in `text`, in source order
pub fn scan<'a>(text: &'a str, ctx: &'a AnnotatorContext) -> Vec<Registration<'a>> {
    let mut found: Vec<Registration<'a>> = ctx
        .patterns
        .registrations
        .iter()
        .flat_map(|rule| {
            find_calls(text, &rule.prefix)
                .into_iter()
                .filter_map(move |site| {
                    Some(Registration {
                        site,
                        shape: RegistrationShape::parse(site.args, rule.shape)?,
                        default_base: &rule.default_base,
                    })
                })
        })
        .collect();
    found.sort_by_key(|r| r.site.start);
    found
}

/// Line start of the nearest `local T =` or `T =` before `before`
pub fn preceding_assignment(
    text: &str,
    table: &str,
    before: usize,
    ctx: &AnnotatorContext,
) -> Option<usize> {
    [
        ctx.patterns.local_assignment(table),
        ctx.patterns.global_assignment(table),
    ]
    .into_iter()
    .flatten()
    .filter_map(|re| {
        re.find_iter(text)
            .map(|m| m.start())
            .take_while(|&start| start < before)
            .last()
    })
    .max()
    .map(|start| line_start(text, start))
}

/// Class annotations for registered tables.
///
/// A registration whose table has no assignment earlier in the file is
/// skipped, as is a name that already has a class annotation.
pub fn synthesize(
    text: &str,
    ctx: &AnnotatorContext,
    resolver: &OwnerResolver<'_>,
) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut done: Vec<&str> = Vec::new();

    for registration in scan(text, ctx) {
        let name = registration.shape.name();
        let table = registration.shape.table();
        if done.contains(&name) {
            continue;
        }
        if find_class_line(text, name).is_some() {
            tracing::trace!(class = name, "class annotation already present");
            continue;
        }
        let Some(anchor) = preceding_assignment(text, table, registration.site.start, ctx) else {
            tracing::debug!(
                class = name,
                table,
                "no assignment of the registered table, skipping"
            );
            continue;
        };

        // The same table name may be reassigned for the next panel
        let span = anchor..registration.site.start;
        let fields = missing_lines(
            text,
            accessor::collect_field_lines(text, table, name, span.clone(), ctx, resolver)
                .into_iter()
                .chain(network::collect_field_lines(
                    text, table, name, span, ctx, resolver,
                )),
        );
        let mut lines = Vec::with_capacity(fields.len() + 1);
        lines.push(class_line(name, Some(registration.base())));
        lines.extend(fields);

        done.push(name);
        fragments.push(Fragment::annotation(lines, Anchor::AboveLine(anchor)));
    }

    fragments
}
