//! Session context shared by both passes
//!
//! Built once from [`Settings`]; every regex template is compiled here so a bad
//! configuration fails at start-up instead of on the first file that needs it.

use crate::config::{RegistrationShapeKind, Settings, TypeTables};
use crate::error::{ConfigError, ConfigResult};
use crate::fs::{DiskFs, SourceFs};
use crate::scan::{extract_numeric, is_call_prefix};
use crate::scope::{FolderBaseCache, ScopeRule};
use regex::Regex;

/// A compiled registration call rule
#[derive(Debug, Clone)]
pub struct RegistrationRule {
    pub prefix: Regex,
    pub shape: RegistrationShapeKind,
    pub default_base: String,
}

/// Compiled `[patterns]`
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    pub accessor: Regex,
    pub network: Regex,
    pub network_method: String,
    pub base_macro: Regex,
    pub meta_table: Regex,
    pub function_header: Regex,
    pub registrations: Vec<RegistrationRule>,
    local_assignment: String,
    global_assignment: String,
}

impl CompiledPatterns {
    /// `local <name> =` matcher for one table name
    pub fn local_assignment(&self, name: &str) -> Option<Regex> {
        instantiate(&self.local_assignment, name)
    }

    /// `<name> =` matcher for one table name
    pub fn global_assignment(&self, name: &str) -> Option<Regex> {
        instantiate(&self.global_assignment, name)
    }

    /// `local <name> =` matcher for any identifier, captured as `name`
    pub fn any_local_assignment(&self) -> Option<Regex> {
        let pattern = self
            .local_assignment
            .replace("{name}", r"(?P<name>[A-Za-z_]\w*)");
        Regex::new(&pattern).ok()
    }
}

fn instantiate(template: &str, name: &str) -> Option<Regex> {
    let pattern = template.replace("{name}", &regex::escape(name));
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::debug!(
                pattern = %pattern,
                error = %e,
                "assignment template failed to compile"
            );
            None
        }
    }
}

fn compile(name: &str, pattern: &str) -> ConfigResult<Regex> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        name: name.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

fn compile_call(name: &str, pattern: &str) -> ConfigResult<Regex> {
    let re = compile(name, pattern)?;
    if !is_call_prefix(&re) {
        tracing::warn!(
            pattern = name,
            "call prefix does not end with \\( and will never match"
        );
    }
    Ok(re)
}

fn compile_template(name: &str, template: &str) -> ConfigResult<String> {
    // Validate with a representative table name
    compile(name, &template.replace("{name}", "PANEL"))?;
    Ok(template.to_string())
}

/// Everything a pass needs besides the file itself
pub struct AnnotatorContext {
    pub rules: Vec<ScopeRule>,
    pub patterns: CompiledPatterns,
    pub types: TypeTables,
    pub untyped: String,
    backing_visibility: Option<String>,
    base_macro_replacement: String,
    folder_cache: FolderBaseCache,
    fs: Box<dyn SourceFs>,
}

impl std::fmt::Debug for AnnotatorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotatorContext")
            .field("rules", &self.rules.len())
            .field("untyped", &self.untyped)
            .field("folder_cache", &self.folder_cache)
            .finish()
    }
}

impl AnnotatorContext {
    /// Build a context reading neighbouring files through `fs`
    pub fn new(settings: &Settings, fs: impl SourceFs + 'static) -> ConfigResult<Self> {
        let p = &settings.patterns;
        let registrations = p
            .registration
            .iter()
            .map(|rule| {
                Ok(RegistrationRule {
                    prefix: compile_call("patterns.registration.prefix", &rule.prefix)?,
                    shape: rule.shape,
                    default_base: rule.default_base.clone(),
                })
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        let patterns = CompiledPatterns {
            accessor: compile_call("patterns.accessor", &p.accessor)?,
            network: compile_call("patterns.network", &p.network)?,
            network_method: p.network_method.clone(),
            base_macro: compile_call("patterns.base_macro", &p.base_macro)?,
            meta_table: compile("patterns.meta_table", &p.meta_table)?,
            function_header: compile("patterns.function_header", &p.function_header)?,
            registrations,
            local_assignment: compile_template("patterns.local_assignment", &p.local_assignment)?,
            global_assignment: compile_template(
                "patterns.global_assignment",
                &p.global_assignment,
            )?,
        };

        let visibility = settings.fields.backing_visibility.trim();

        Ok(Self {
            rules: ScopeRule::compile_all(settings)?,
            patterns,
            types: settings.types.clone(),
            untyped: settings.untyped.clone(),
            backing_visibility: (!visibility.is_empty()).then(|| visibility.to_string()),
            base_macro_replacement: settings.base_macro_replacement.clone(),
            folder_cache: FolderBaseCache::new(),
            fs: Box::new(fs),
        })
    }

    /// Build a context over the real filesystem
    pub fn with_disk(settings: &Settings) -> ConfigResult<Self> {
        Self::new(settings, DiskFs)
    }

    pub fn fs(&self) -> &dyn SourceFs {
        self.fs.as_ref()
    }

    pub fn folder_cache(&self) -> &FolderBaseCache {
        &self.folder_cache
    }

    pub fn rule(&self, scope_name: &str) -> Option<&ScopeRule> {
        self.rules.iter().find(|r| r.scope_name == scope_name)
    }

    pub fn backing_visibility(&self) -> Option<&str> {
        self.backing_visibility.as_deref()
    }

    pub fn base_macro_replacement(&self, args: &str) -> String {
        self.base_macro_replacement.replace("{args}", args)
    }

    /// Annotation type for a networked-field type tag
    pub fn network_type(&self, tag: &str) -> &str {
        self.types
            .network
            .get(tag)
            .map(String::as_str)
            .unwrap_or(&self.untyped)
    }

    /// Annotation type for an accessor force-type argument, either a named
    /// constant or its numeric value
    pub fn force_type(&self, arg: &str) -> &str {
        if let Some(ty) = self.types.force.get(arg.trim()) {
            return ty;
        }
        extract_numeric(arg)
            .filter(|n| n.fract() == 0.0)
            .and_then(|n| self.types.force_index.get(&(n as i64).to_string()))
            .map(String::as_str)
            .unwrap_or(&self.untyped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;

    #[test]
    fn test_type_resolution() {
        let ctx = AnnotatorContext::new(&Settings::default(), MemoryFs::new()).unwrap();
        assert_eq!(ctx.network_type("Float"), "number");
        assert_eq!(ctx.network_type("Quaternion"), "any");
        assert_eq!(ctx.force_type("FORCE_BOOL"), "boolean");
        assert_eq!(ctx.force_type("2"), "number");
        assert_eq!(ctx.force_type("2.5"), "any");
        assert_eq!(ctx.force_type("SOMETHING"), "any");
    }

    #[test]
    fn test_invalid_pattern_is_a_config_error() {
        let mut settings = Settings::default();
        settings.patterns.accessor = "AccessorFunc(".to_string();
        let result = AnnotatorContext::new(&settings, MemoryFs::new());
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_empty_visibility_disables_token() {
        let mut settings = Settings::default();
        settings.fields.backing_visibility = "  ".to_string();
        let ctx = AnnotatorContext::new(&settings, MemoryFs::new()).unwrap();
        assert_eq!(ctx.backing_visibility(), None);
    }

    #[test]
    fn test_assignment_templates() {
        let ctx = AnnotatorContext::new(&Settings::default(), MemoryFs::new()).unwrap();
        let local = ctx.patterns.local_assignment("PANEL").unwrap();
        assert!(local.is_match("  local PANEL = {}"));
        assert!(!local.is_match("local PANEL2 = {}"));
        let global = ctx.patterns.global_assignment("PANEL").unwrap();
        assert!(global.is_match("PANEL = {}"));
        assert!(!global.is_match("PANEL == nil"));
    }
}
