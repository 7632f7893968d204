//! Configuration module for the annotation engine.
//!
//! This module provides a layered configuration system that supports:
//! - Default values (stock Garry's Mod conventions)
//! - TOML configuration file
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `GLUADOC_` and use double
//! underscores to separate nested levels:
//! - `GLUADOC_UNTYPED=unknown` sets `untyped`
//! - `GLUADOC_FIELDS__BACKING_VISIBILITY=private` sets `fields.backing_visibility`

use crate::error::{ConfigError, ConfigResult};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".gluadoc";
const CONFIG_FILE: &str = "settings.toml";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Marker used when a type tag cannot be resolved
    #[serde(default = "default_untyped")]
    pub untyped: String,

    /// Replacement for the base-class macro; `{args}` is the raw argument text
    #[serde(default = "default_base_macro_replacement")]
    pub base_macro_replacement: String,

    /// Scope-to-folder rules
    #[serde(default = "default_scopes")]
    pub scopes: Vec<ScopeConfig>,

    /// Type dictionaries
    #[serde(default)]
    pub types: TypeTables,

    /// Call and statement pattern templates
    #[serde(default)]
    pub patterns: PatternConfig,

    /// Field line options
    #[serde(default)]
    pub fields: FieldConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScopeConfig {
    /// Global table name the scope is written against (e.g. `ENT`)
    pub name: String,

    /// Folder path, `/`-separated, matched case-insensitively
    pub folder: String,

    /// File names that make a whole directory define one type
    #[serde(default = "default_hubs")]
    pub hubs: Vec<String>,

    /// Regexes over file names that also mark a directory-per-type layout
    #[serde(default = "default_satellites")]
    pub satellites: Vec<String>,

    /// Methods whose bodies hold networked-field declarations
    #[serde(default = "default_init_methods")]
    pub init_methods: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TypeTables {
    /// Declared-type tag → annotation type (networked fields)
    #[serde(default = "default_network_types")]
    pub network: HashMap<String, String>,

    /// Force-type constant name → annotation type (accessors)
    #[serde(default = "default_force_types")]
    pub force: HashMap<String, String>,

    /// Numeric force-type constant → annotation type (accessors)
    #[serde(default = "default_force_index_types")]
    pub force_index: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationShapeKind {
    /// `(name, table, base?)`
    Panel,
    /// `(name, description, table, base?)`
    Control,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RegistrationConfig {
    /// Regex ending at the opening parenthesis of the call
    pub prefix: String,

    pub shape: RegistrationShapeKind,

    /// Base used when the call does not name one
    #[serde(default = "default_panel_base")]
    pub default_base: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PatternConfig {
    #[serde(default = "default_accessor_pattern")]
    pub accessor: String,

    /// Must capture the receiver in group 1
    #[serde(default = "default_network_pattern")]
    pub network: String,

    /// Method name of networked-field calls as seen by the tree pass
    #[serde(default = "default_network_method")]
    pub network_method: String,

    #[serde(default = "default_base_macro_pattern")]
    pub base_macro: String,

    /// `{scope}` is replaced by the escaped scope global
    #[serde(default = "default_base_assignment_pattern")]
    pub base_assignment: String,

    /// `{name}` is replaced by the escaped table name
    #[serde(default = "default_local_assignment_pattern")]
    pub local_assignment: String,

    /// `{name}` is replaced by the escaped table name
    #[serde(default = "default_global_assignment_pattern")]
    pub global_assignment: String,

    /// Captures `(alias, type)` for meta-table lookups
    #[serde(default = "default_meta_table_pattern")]
    pub meta_table: String,

    /// Captures `(owner, method)` of a method definition header
    #[serde(default = "default_function_header_pattern")]
    pub function_header: String,

    #[serde(default = "default_registrations")]
    pub registration: Vec<RegistrationConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldConfig {
    /// Visibility token placed before accessor backing keys; empty disables it
    #[serde(default = "default_backing_visibility")]
    pub backing_visibility: String,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_false() -> bool {
    false
}
fn default_untyped() -> String {
    "any".to_string()
}
fn default_hubs() -> Vec<String> {
    vec![
        "init.lua".to_string(),
        "shared.lua".to_string(),
        "cl_init.lua".to_string(),
    ]
}
fn default_satellites() -> Vec<String> {
    vec![r"^(sh|sv|cl)_[\w\-]+\.lua$".to_string()]
}
fn default_init_methods() -> Vec<String> {
    vec!["SetupDataTables".to_string()]
}
fn default_panel_base() -> String {
    "Panel".to_string()
}
fn default_backing_visibility() -> String {
    "protected".to_string()
}
fn default_base_macro_replacement() -> String {
    "local BaseClass = baseclass.Get({args})".to_string()
}
fn default_accessor_pattern() -> String {
    r"\bAccessorFunc\s*\(".to_string()
}
fn default_network_pattern() -> String {
    r"\b([A-Za-z_][\w]*)\s*:\s*NetworkVar\s*\(".to_string()
}
fn default_network_method() -> String {
    "NetworkVar".to_string()
}
fn default_base_macro_pattern() -> String {
    r"\bDEFINE_BASECLASS\s*\(".to_string()
}
fn default_base_assignment_pattern() -> String {
    r#"(?m)^[ \t]*{scope}\.Base[ \t]*=[ \t]*(?:"([^"\n]*)"|'([^'\n]*)'|([A-Za-z_][\w\.]*))"#
        .to_string()
}
fn default_local_assignment_pattern() -> String {
    r"(?m)^[ \t]*local[ \t]+{name}[ \t]*=(?:[^=]|$)".to_string()
}
fn default_global_assignment_pattern() -> String {
    r"(?m)^[ \t]*{name}[ \t]*=(?:[^=]|$)".to_string()
}
fn default_meta_table_pattern() -> String {
    concat!(
        r#"(?m)^[ \t]*(?:local[ \t]+)?([A-Za-z_]\w*)[ \t]*=[ \t]*"#,
        r#"FindMetaTable[ \t]*\([ \t]*["']([^"'\n]+)["'][ \t]*\)"#,
    )
    .to_string()
}
fn default_function_header_pattern() -> String {
    r"(?m)^[ \t]*function[ \t]+([A-Za-z_]\w*)[:\.]([A-Za-z_]\w*)[ \t]*\(".to_string()
}

fn default_registrations() -> Vec<RegistrationConfig> {
    vec![
        RegistrationConfig {
            prefix: r"\bvgui\.Register\s*\(".to_string(),
            shape: RegistrationShapeKind::Panel,
            default_base: default_panel_base(),
        },
        RegistrationConfig {
            prefix: r"\bderma\.DefineControl\s*\(".to_string(),
            shape: RegistrationShapeKind::Control,
            default_base: default_panel_base(),
        },
    ]
}

fn scope(name: &str, folder: &str) -> ScopeConfig {
    ScopeConfig {
        name: name.to_string(),
        folder: folder.to_string(),
        hubs: default_hubs(),
        satellites: default_satellites(),
        init_methods: default_init_methods(),
    }
}

fn default_scopes() -> Vec<ScopeConfig> {
    vec![
        scope("ENT", "entities"),
        scope("SWEP", "weapons"),
        scope("EFFECT", "effects"),
        scope("TOOL", "weapons/gmod_tool/stools"),
        scope("GM", "gamemodes"),
    ]
}

fn table(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn default_network_types() -> HashMap<String, String> {
    table(&[
        ("String", "string"),
        ("Bool", "boolean"),
        ("Float", "number"),
        ("Double", "number"),
        ("Int", "integer"),
        ("Vector", "Vector"),
        ("Angle", "Angle"),
        ("Entity", "Entity"),
    ])
}

fn default_force_types() -> HashMap<String, String> {
    table(&[
        ("FORCE_STRING", "string"),
        ("FORCE_NUMBER", "number"),
        ("FORCE_BOOL", "boolean"),
        ("FORCE_ANGLE", "Angle"),
        ("FORCE_COLOR", "Color"),
        ("FORCE_VECTOR", "Vector"),
    ])
}

fn default_force_index_types() -> HashMap<String, String> {
    table(&[
        ("1", "string"),
        ("2", "number"),
        ("3", "boolean"),
        ("4", "Angle"),
        ("5", "Color"),
        ("6", "Vector"),
    ])
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            debug: false,
            untyped: default_untyped(),
            base_macro_replacement: default_base_macro_replacement(),
            scopes: default_scopes(),
            types: TypeTables::default(),
            patterns: PatternConfig::default(),
            fields: FieldConfig::default(),
        }
    }
}

impl Default for TypeTables {
    fn default() -> Self {
        Self {
            network: default_network_types(),
            force: default_force_types(),
            force_index: default_force_index_types(),
        }
    }
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            accessor: default_accessor_pattern(),
            network: default_network_pattern(),
            network_method: default_network_method(),
            base_macro: default_base_macro_pattern(),
            base_assignment: default_base_assignment_pattern(),
            local_assignment: default_local_assignment_pattern(),
            global_assignment: default_global_assignment_pattern(),
            meta_table: default_meta_table_pattern(),
            function_header: default_function_header_pattern(),
            registration: default_registrations(),
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            backing_visibility: default_backing_visibility(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));

        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("GLUADOC_").map(|key| {
                key.as_str()
                    .to_lowercase()
                    .replace("__", ".")
                    .into()
            }))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Load configuration from a specific file
    ///
    /// Unlike [`Settings::load`], a missing file is an error here: the caller
    /// asked for this file explicitly.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileRead {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
            });
        }

        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Find the workspace config by looking for a .gluadoc directory
    /// Searches from current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(CONFIG_DIR);
            if config_dir.is_dir() {
                return Some(config_dir.join(CONFIG_FILE));
            }
        }

        None
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let write_error = |reason: String| ConfigError::FileWrite {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self).map_err(|e| write_error(e.to_string()))?;
        std::fs::write(path, toml_string).map_err(|e| write_error(e.to_string()))
    }

    /// Create a default settings file in the current directory
    pub fn init_config_file(force: bool) -> ConfigResult<PathBuf> {
        let config_path = PathBuf::from(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err(ConfigError::FileWrite {
                path: config_path,
                reason: "configuration file already exists, use --force to overwrite".to_string(),
            });
        }

        let body = toml::to_string_pretty(&Settings::default()).map_err(|e| {
            ConfigError::FileWrite {
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;
        let template = format!(
            "# gluadoc configuration\n\
             #\n\
             # Scopes map a global table (ENT, SWEP, ...) to the folder its types live in.\n\
             # Patterns are Rust regex syntax; call prefixes must end with \\(.\n\
             \n{body}"
        );

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::FileWrite {
                path: config_path.clone(),
                reason: e.to_string(),
            })?;
        }
        std::fs::write(&config_path, template).map_err(|e| ConfigError::FileWrite {
            path: config_path.clone(),
            reason: e.to_string(),
        })?;

        Ok(config_path)
    }
}
