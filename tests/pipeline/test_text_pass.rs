//! End-to-end runs of the text pass over realistic addon files

use crate::common::TestProject;
use gluadoc::{AnnotatorContext, MemoryFs, Settings, annotate_file, apply_edits};

fn memory_ctx(fs: MemoryFs) -> AnnotatorContext {
    AnnotatorContext::new(&Settings::default(), fs).unwrap()
}

/// Annotate, apply, and check a second run has nothing left to do
fn annotate_and_apply(uri: &str, text: &str, ctx: &AnnotatorContext) -> String {
    let edits = annotate_file(uri, text, ctx).expect("expected edits");
    let out = apply_edits(text, &edits).unwrap();
    assert!(
        annotate_file(uri, &out, ctx).is_none(),
        "second run should be a no-op:\n{out}"
    );
    out
}

const SHARED: &str = "ENT.Type = \"anim\"
ENT.Base = \"base_anim\"

function ENT:SetupDataTables()
\tself:NetworkVar(\"Float\", 0, \"Speed\")
\tself:NetworkVar(\"Entity\", 1, \"Driver\")
end
";

#[test]
fn test_folder_entity_on_disk() {
    let project = TestProject::new();
    project.add_file("lua/entities/my_ent/shared.lua", SHARED);
    project.add_file(
        "lua/entities/my_ent/cl_init.lua",
        "include(\"shared.lua\")\n\nfunction ENT:Draw()\n\tself:DrawModel()\nend\n",
    );
    let ctx = AnnotatorContext::with_disk(&Settings::default()).unwrap();

    let uri = project.uri("lua/entities/my_ent/shared.lua");
    let edits = annotate_file(&uri, SHARED, &ctx).unwrap();
    assert_eq!(edits.len(), 1);
    assert!(edits[0].is_insertion());
    assert_eq!(edits[0].start, 1);

    let out = apply_edits(SHARED, &edits).unwrap();
    std::fs::write(&uri, &out).unwrap();
    assert_eq!(
        project.read("lua/entities/my_ent/shared.lua"),
        format!(
            "---@class my_ent : base_anim\n\
             ---@field SetSpeed fun(self: my_ent, value: number)\n\
             ---@field GetSpeed fun(self: my_ent): number\n\
             ---@field SetDriver fun(self: my_ent, value: Entity)\n\
             ---@field GetDriver fun(self: my_ent): Entity\n\
             {SHARED}"
        )
    );
    assert!(annotate_file(&uri, &out, &ctx).is_none());

    // The client hub has no base of its own and inherits the folder's
    let uri = project.uri("lua/entities/my_ent/cl_init.lua");
    let text = project.read("lua/entities/my_ent/cl_init.lua");
    let out = annotate_and_apply(&uri, &text, &ctx);
    assert!(out.starts_with("---@class my_ent : base_anim\ninclude("));
}

#[test]
fn test_satellite_file_uses_folder_base() {
    let fs = MemoryFs::new()
        .with_file("lua/weapons/rifle/shared.lua", "SWEP.Base = \"weapon_base\"\n")
        .with_file("lua/weapons/rifle/sv_ammo.lua", "");
    let ctx = memory_ctx(fs);

    let text = "AccessorFunc(SWEP, \"m_iClip\", \"Clip\", FORCE_NUMBER)\n";
    let out = annotate_and_apply("lua/weapons/rifle/sv_ammo.lua", text, &ctx);
    assert_eq!(
        out,
        "---@class rifle : weapon_base\n\
         ---@field protected m_iClip number\n\
         ---@field SetClip fun(self: rifle, value: number)\n\
         ---@field GetClip fun(self: rifle): number\n\
         AccessorFunc(SWEP, \"m_iClip\", \"Clip\", FORCE_NUMBER)\n"
    );
}

#[test]
fn test_new_field_lands_under_existing_class() {
    let ctx = memory_ctx(MemoryFs::new());
    let text = "---@class lamp : ENT\n\
                ---@field SetOn fun(self: lamp, value: boolean)\n\
                ---@field GetOn fun(self: lamp): boolean\n\
                function ENT:SetupDataTables()\n\
                \tself:NetworkVar(\"Bool\", 0, \"On\")\n\
                \tself:NetworkVar(\"Int\", 1, \"Level\")\n\
                end\n";

    let out = annotate_and_apply("lua/entities/lamp.lua", text, &ctx);
    assert_eq!(
        out.lines().take(3).collect::<Vec<_>>(),
        vec![
            "---@class lamp : ENT",
            "---@field SetLevel fun(self: lamp, value: integer)",
            "---@field GetLevel fun(self: lamp): integer",
        ]
    );
    assert_eq!(out.matches("---@field").count(), 4);
}

#[test]
fn test_registered_panel() {
    let ctx = memory_ctx(MemoryFs::new());
    let text = "-- Settings window\n\
                local PANEL = {}\n\
                \n\
                AccessorFunc(PANEL, \"m_bOpen\", \"Open\", FORCE_BOOL)\n\
                \n\
                function PANEL:Init()\n\
                end\n\
                \n\
                vgui.Register(\"SettingsWindow\", PANEL, \"DFrame\")\n";

    let out = annotate_and_apply("lua/autorun/client/cl_settings.lua", text, &ctx);
    assert_eq!(
        out,
        "-- Settings window\n\
         ---@class SettingsWindow : DFrame\n\
         ---@field protected m_bOpen boolean\n\
         ---@field SetOpen fun(self: SettingsWindow, value: boolean)\n\
         ---@field GetOpen fun(self: SettingsWindow): boolean\n\
         local PANEL = {}\n\
         \n\
         AccessorFunc(PANEL, \"m_bOpen\", \"Open\", FORCE_BOOL)\n\
         \n\
         function PANEL:Init()\n\
         end\n\
         \n\
         vgui.Register(\"SettingsWindow\", PANEL, \"DFrame\")\n"
    );
}

#[test]
fn test_meta_table_class_is_reopened_after_last_call() {
    let ctx = memory_ctx(MemoryFs::new());
    let text = "local meta = FindMetaTable(\"Player\")\n\
                AccessorFunc(meta, \"m_iLevel\", \"Level\", FORCE_NUMBER)\n\
                AccessorFunc(meta, \"m_sTitle\", \"Title\")\n\
                print(\"done\")";

    let out = annotate_and_apply("lua/autorun/sh_player.lua", text, &ctx);
    assert_eq!(
        out,
        "local meta = FindMetaTable(\"Player\")\n\
         AccessorFunc(meta, \"m_iLevel\", \"Level\", FORCE_NUMBER)\n\
         AccessorFunc(meta, \"m_sTitle\", \"Title\")\n\
         ---@class Player\n\
         ---@field protected m_iLevel number\n\
         ---@field SetLevel fun(self: Player, value: number)\n\
         ---@field GetLevel fun(self: Player): number\n\
         ---@field protected m_sTitle any\n\
         ---@field SetTitle fun(self: Player, value: any)\n\
         ---@field GetTitle fun(self: Player): any\n\
         print(\"done\")"
    );
}

#[test]
fn test_base_macro_rewrite_keeps_surrounding_text() {
    let ctx = memory_ctx(MemoryFs::new());
    let text = "AddCSLuaFile()\nDEFINE_BASECLASS( \"base_anim\" )\n";
    let out = annotate_and_apply("lua/autorun/sh_macro.lua", text, &ctx);
    assert_eq!(
        out,
        "AddCSLuaFile()\nlocal BaseClass = baseclass.Get( \"base_anim\" )\n"
    );
}

#[test]
fn test_file_uri_and_windows_paths_classify_alike() {
    let ctx = memory_ctx(MemoryFs::new());
    let text = "ENT.PrintName = \"Crate\"\n";
    let expected = "---@class crate : ENT\nENT.PrintName = \"Crate\"\n";

    for uri in [
        "file:///home/dev/addon/lua/entities/crate.lua",
        "C:\\addons\\pack\\lua\\entities\\crate.lua",
        "file:///c%3A/addons/pack/lua/entities/crate.lua",
    ] {
        let edits = annotate_file(uri, text, &ctx).unwrap();
        assert_eq!(apply_edits(text, &edits).unwrap(), expected, "{uri}");
    }
}

#[test]
fn test_unscoped_file_without_calls_is_untouched() {
    let ctx = memory_ctx(MemoryFs::new());
    let text = "hook.Add(\"Think\", \"x\", function() end)\n";
    assert!(annotate_file("lua/autorun/server/sv_hooks.lua", text, &ctx).is_none());
}
