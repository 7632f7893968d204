//! Settings files drive classification and type tables

use crate::common::TestProject;
use gluadoc::{AnnotatorContext, ConfigError, MemoryFs, Settings, annotate_file, apply_edits};

#[test]
fn test_custom_scope_from_settings_file() {
    let project = TestProject::new();
    let config = project.add_file(
        ".gluadoc/settings.toml",
        r#"
untyped = "unknown"

[[scopes]]
name = "PLUGIN"
folder = "plugins"
satellites = ['^sh_plugin\.lua$']

[types.network]
Color = "Color"
"#,
    );

    let settings = Settings::load_from(&config).unwrap();
    assert_eq!(settings.scopes.len(), 1);
    // Tables merge key by key over the defaults
    assert_eq!(settings.types.network.get("Float").map(String::as_str), Some("number"));

    let fs = MemoryFs::new().with_file("schema/plugins/doors/sh_plugin.lua", "");
    let ctx = AnnotatorContext::new(&settings, fs).unwrap();

    let text = "function PLUGIN:SetupDataTables()\n\
                \tself:NetworkVar(\"Color\", 0, \"Tint\")\n\
                \tself:NetworkVar(\"Matrix\", 1, \"Frame\")\n\
                end\n";
    let edits = annotate_file("schema/plugins/doors/sh_plugin.lua", text, &ctx).unwrap();
    let out = apply_edits(text, &edits).unwrap();
    assert_eq!(
        out.lines().take(5).collect::<Vec<_>>(),
        vec![
            "---@class doors : PLUGIN",
            "---@field SetTint fun(self: doors, value: Color)",
            "---@field GetTint fun(self: doors): Color",
            "---@field SetFrame fun(self: doors, value: unknown)",
            "---@field GetFrame fun(self: doors): unknown",
        ]
    );

    // Default scopes are replaced, not extended
    assert!(annotate_file("lua/entities/crate.lua", "", &ctx).is_none());
}

#[test]
fn test_registration_rule_from_settings_file() {
    let project = TestProject::new();
    let config = project.add_file(
        "settings.toml",
        r#"
[fields]
backing_visibility = ""

[[patterns.registration]]
prefix = '\bmyui\.Register\s*\('
shape = "panel"
default_base = "EditablePanel"
"#,
    );
    let settings = Settings::load_from(&config).unwrap();
    let ctx = AnnotatorContext::new(&settings, MemoryFs::new()).unwrap();

    let text = "local PANEL = {}\n\
                AccessorFunc(PANEL, \"m_Value\", \"Value\")\n\
                myui.Register(\"Knob\", PANEL)\n\
                vgui.Register(\"Ignored\", PANEL)\n";
    let edits = annotate_file("lua/myui/knob.lua", text, &ctx).unwrap();
    let out = apply_edits(text, &edits).unwrap();
    assert!(out.starts_with(
        "---@class Knob : EditablePanel\n\
         ---@field m_Value any\n\
         ---@field SetValue fun(self: Knob, value: any)\n\
         ---@field GetValue fun(self: Knob): any\n\
         local PANEL = {}\n"
    ));
    assert!(!out.contains("Ignored :"));
}

#[test]
fn test_bad_pattern_fails_at_context_build() {
    let project = TestProject::new();
    let config = project.add_file(
        "settings.toml",
        "[patterns]\nnetwork = '\\b(\\w+:NetworkVar\\('\n",
    );
    let settings = Settings::load_from(&config).unwrap();
    let err = AnnotatorContext::new(&settings, MemoryFs::new()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    assert_eq!(err.status_code(), "INVALID_PATTERN");
}
