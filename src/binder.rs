//! Tree pass
//!
//! Runs after the host has parsed the (already annotated) text. Attaches the
//! class annotation to the scope declaration node and binds networked fields
//! declared in the scope's init methods, through the host's own tree API.

use crate::context::AnnotatorContext;
use crate::error::AnnotateResult;
use crate::scope::SourcePath;
use crate::synth::ScopeTarget;
use crate::synth::network::{parse_arguments, shape_lines};
use serde::Serialize;

/// A call found by the host inside a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeCall<N> {
    pub node: N,
    /// Receiver of a method call (`self` in `self:NetworkVar(...)`)
    pub receiver: Option<String>,
    /// Raw argument text between the parentheses
    pub args: String,
}

/// Host-owned syntax tree
pub trait SyntaxTree {
    type Node: Copy + std::fmt::Debug;

    /// Declaration node of a scope global (`ENT = ENT or {}`, `local SWEP = {}`)
    fn scope_declaration(&self, global: &str) -> Option<Self::Node>;

    /// Body of `function owner:method(...)`
    fn method_body(&self, owner: &str, method: &str) -> Option<Self::Node>;

    /// Calls named `callee` inside `block`, in source order
    fn calls_in(&self, block: Self::Node, callee: &str) -> Vec<TreeCall<Self::Node>>;

    /// Documentation lines already attached to `node`
    fn docs(&self, node: Self::Node) -> Vec<String>;

    fn attach_doc(&mut self, node: Self::Node, line: String);
}

/// What a tree pass did
#[derive(Debug, Default, Clone, Serialize)]
pub struct BindReport {
    /// Resolved type of the file, when it is scoped
    pub target: Option<ScopeTarget>,
    /// Whether the scope declaration node was found
    pub declaration_found: bool,
    /// Lines attached by this pass, in order
    pub attached: Vec<String>,
    /// Lines skipped because they were already attached
    pub already_present: usize,
}

struct Attacher<'t, T: SyntaxTree> {
    tree: &'t mut T,
    node: T::Node,
    existing: Vec<String>,
}

impl<T: SyntaxTree> Attacher<'_, T> {
    fn attach(&mut self, line: String, report: &mut BindReport) {
        if self.existing.iter().any(|l| l.trim() == line) {
            report.already_present += 1;
            return;
        }
        self.tree.attach_doc(self.node, line.clone());
        self.existing.push(line.clone());
        report.attached.push(line);
    }
}

/// Bind the class annotation and init-method fields of the file at `uri`.
///
/// Unscoped files and files without a scope declaration node are left alone.
pub fn bind<T: SyntaxTree>(
    tree: &mut T,
    uri: &str,
    text: &str,
    ctx: &AnnotatorContext,
) -> AnnotateResult<BindReport> {
    let path = SourcePath::parse(uri)?;
    let mut report = BindReport::default();

    let Some(target) = ScopeTarget::resolve(&path, text, ctx) else {
        return Ok(report);
    };
    let Some(declaration) = tree.scope_declaration(&target.global) else {
        tracing::debug!(uri, scope = %target.global, "no scope declaration node");
        report.target = Some(target);
        return Ok(report);
    };
    report.declaration_found = true;

    let existing = tree.docs(declaration);
    let class_present = existing.iter().any(|line| {
        line.trim()
            .strip_prefix("---@class")
            .and_then(|rest| rest.split_whitespace().next())
            .is_some_and(|name| name.trim_end_matches(':') == target.logical_type)
    });

    let mut attacher = Attacher {
        tree,
        node: declaration,
        existing,
    };
    if class_present {
        report.already_present += 1;
    } else {
        attacher.attach(target.class_line(), &mut report);
    }

    let init_methods = ctx
        .rule(&target.global)
        .map(|rule| rule.init_methods.clone())
        .unwrap_or_default();
    for method in &init_methods {
        let Some(body) = attacher.tree.method_body(&target.global, method) else {
            continue;
        };
        for call in attacher.tree.calls_in(body, &ctx.patterns.network_method) {
            let owned = match call.receiver.as_deref() {
                None | Some("self") => true,
                Some(receiver) => receiver == target.global,
            };
            if !owned {
                continue;
            }
            let Some(shape) = parse_arguments(&call.args) else {
                tracing::trace!(node = ?call.node, "unrecognized networked-field call");
                continue;
            };
            for line in shape_lines(&shape, &target.logical_type, ctx) {
                attacher.attach(line, &mut report);
            }
        }
    }

    report.target = Some(target);
    Ok(report)
}

/// Host-facing entry: errors are logged and reported as an empty pass
pub fn bind_file<T: SyntaxTree>(
    tree: &mut T,
    uri: &str,
    text: &str,
    ctx: &AnnotatorContext,
) -> BindReport {
    bind(tree, uri, text, ctx).unwrap_or_else(|e| {
        tracing::warn!(uri, error = %e, "tree pass skipped");
        BindReport::default()
    })
}
