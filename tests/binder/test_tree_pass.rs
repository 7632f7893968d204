//! Tree pass against a host-owned syntax tree

use crate::common::MockTree;
use gluadoc::{AnnotatorContext, MemoryFs, Settings, bind, bind_file};

fn ctx(fs: MemoryFs) -> AnnotatorContext {
    AnnotatorContext::new(&Settings::default(), fs).unwrap()
}

fn lamp_tree() -> (MockTree, usize) {
    let mut tree = MockTree::new();
    let declaration = tree.declare("ENT");
    let body = tree.method("ENT", "SetupDataTables");
    tree.call(body, "NetworkVar", Some("self"), "\"Bool\", 0, \"On\"");
    tree.call(body, "NetworkVar", Some("other"), "\"Int\", 1, \"Ignored\"");
    tree.call(body, "NetworkVar", None, "\"Vector\", \"Target\"");
    tree.call(body, "NetworkVarNotify", Some("self"), "\"On\", fn");
    (tree, declaration)
}

#[test]
fn test_binds_class_and_init_fields() {
    let fs = MemoryFs::new()
        .with_file("lua/entities/lamp/shared.lua", "ENT.Base = \"base_anim\"\n");
    let ctx = ctx(fs);
    let (mut tree, declaration) = lamp_tree();

    let report = bind(&mut tree, "lua/entities/lamp/init.lua", "", &ctx).unwrap();
    assert!(report.declaration_found);
    assert_eq!(report.already_present, 0);
    assert_eq!(
        tree.doc_lines(declaration),
        vec![
            "---@class lamp : base_anim",
            "---@field SetOn fun(self: lamp, value: boolean)",
            "---@field GetOn fun(self: lamp): boolean",
            "---@field SetTarget fun(self: lamp, value: Vector)",
            "---@field GetTarget fun(self: lamp): Vector",
        ]
    );
    assert_eq!(report.attached, tree.doc_lines(declaration));
    assert_eq!(report.target.unwrap().logical_type, "lamp");
}

#[test]
fn test_second_pass_attaches_nothing() {
    let ctx = ctx(MemoryFs::new());
    let (mut tree, declaration) = lamp_tree();

    bind(&mut tree, "lua/entities/lamp.lua", "", &ctx).unwrap();
    let before = tree.doc_lines(declaration);
    let report = bind(&mut tree, "lua/entities/lamp.lua", "", &ctx).unwrap();

    assert!(report.attached.is_empty());
    assert_eq!(report.already_present, before.len());
    assert_eq!(tree.doc_lines(declaration), before);
}

#[test]
fn test_text_pass_class_line_counts_as_present() {
    let ctx = ctx(MemoryFs::new());
    let mut tree = MockTree::new();
    let declaration = tree.declare("ENT");
    // The text pass already placed a class line with a different base
    tree.attach_existing(declaration, "---@class lamp : base_gmodentity");

    let report = bind(&mut tree, "lua/entities/lamp.lua", "", &ctx).unwrap();
    assert!(report.attached.is_empty());
    assert_eq!(report.already_present, 1);
}

#[test]
fn test_missing_declaration_and_unscoped_files() {
    let ctx = ctx(MemoryFs::new());
    let mut tree = MockTree::new();

    let report = bind(&mut tree, "lua/weapons/pistol.lua", "", &ctx).unwrap();
    assert!(!report.declaration_found);
    assert_eq!(report.target.unwrap().global, "SWEP");

    let report = bind(&mut tree, "lua/autorun/init.lua", "", &ctx).unwrap();
    assert!(report.target.is_none());
}

#[test]
fn test_bad_uri_yields_empty_report() {
    let ctx = ctx(MemoryFs::new());
    let (mut tree, declaration) = lamp_tree();

    assert!(bind(&mut tree, "file:///x%FF.lua", "", &ctx).is_err());
    let report = bind_file(&mut tree, "file:///x%FF.lua", "", &ctx);
    assert!(report.target.is_none());
    assert!(tree.doc_lines(declaration).is_empty());
}
