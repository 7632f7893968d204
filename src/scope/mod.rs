//! Scope rules: which folder a file lives in, which type it defines, and what
//! that type derives from.

pub mod cache;
pub mod classifier;
pub mod folder;

pub use cache::FolderBaseCache;
pub use classifier::{Classification, SourcePath, classify};
pub use folder::{BaseKind, FolderBase, FolderScope, detect, find_base_assignment};

use crate::config::{ScopeConfig, Settings};
use crate::error::{ConfigError, ConfigResult};
use regex::Regex;

/// A compiled scope rule
#[derive(Debug, Clone)]
pub struct ScopeRule {
    pub scope_name: String,
    /// Lower-cased folder path segments
    pub folder_segments: Vec<String>,
    /// Lower-cased hub file names, in lookup order
    pub hubs: Vec<String>,
    pub satellites: Vec<Regex>,
    pub init_methods: Vec<String>,
    /// `<scope>.Base = <value>` matcher
    pub base_assignment: Regex,
}

impl ScopeRule {
    pub fn compile(config: &ScopeConfig, base_template: &str) -> ConfigResult<Self> {
        let invalid = |reason: &str| ConfigError::InvalidScope {
            scope: config.name.clone(),
            reason: reason.to_string(),
        };

        if config.name.trim().is_empty() {
            return Err(invalid("scope name is empty"));
        }
        let folder_segments: Vec<String> = config
            .folder
            .replace('\\', "/")
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .collect();
        if folder_segments.is_empty() {
            return Err(invalid("folder is empty"));
        }

        let satellites = config
            .satellites
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    name: format!("scopes.{}.satellites", config.name),
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        let base_pattern = base_template.replace("{scope}", &regex::escape(&config.name));
        let base_assignment =
            Regex::new(&base_pattern).map_err(|source| ConfigError::InvalidPattern {
                name: "patterns.base_assignment".to_string(),
                pattern: base_pattern.clone(),
                source,
            })?;

        Ok(Self {
            scope_name: config.name.clone(),
            folder_segments,
            hubs: config.hubs.iter().map(|h| h.to_lowercase()).collect(),
            satellites,
            init_methods: config.init_methods.clone(),
            base_assignment,
        })
    }

    /// Compile every scope in `settings`
    pub fn compile_all(settings: &Settings) -> ConfigResult<Vec<Self>> {
        settings
            .scopes
            .iter()
            .map(|scope| Self::compile(scope, &settings.patterns.base_assignment))
            .collect()
    }

    /// Returns true if `file_name` (any case) is one of this scope's hubs
    pub fn is_hub(&self, file_name: &str) -> bool {
        let lowered = file_name.to_lowercase();
        self.hubs.iter().any(|hub| *hub == lowered)
    }

    /// Returns true if `file_name` (any case) matches a satellite pattern
    pub fn is_satellite(&self, file_name: &str) -> bool {
        let lowered = file_name.to_lowercase();
        self.satellites.iter().any(|re| re.is_match(&lowered))
    }
}
