//! Error types for the annotation engine
//!
//! Configuration errors halt initialization. Per-file errors are swallowed at
//! the per-invocation boundary and turn into "no edits for this file".

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or compiling configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Layered settings could not be extracted
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Failed to read configuration file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write configuration file '{path}': {reason}")]
    FileWrite { path: PathBuf, reason: String },

    /// A regex template from `[patterns]` does not compile
    #[error("Invalid pattern '{name}' ({pattern}): {source}")]
    InvalidPattern {
        name: String,
        pattern: String,
        source: regex::Error,
    },

    #[error("Invalid scope rule '{scope}': {reason}")]
    InvalidScope { scope: String, reason: String },
}

impl ConfigError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> String {
        match self {
            Self::Load(_) => "CONFIG_LOAD_ERROR",
            Self::FileRead { .. } => "CONFIG_READ_ERROR",
            Self::FileWrite { .. } => "CONFIG_WRITE_ERROR",
            Self::InvalidPattern { .. } => "INVALID_PATTERN",
            Self::InvalidScope { .. } => "INVALID_SCOPE",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Load(_) | Self::FileRead { .. } => vec![
                "Check that .gluadoc/settings.toml is valid TOML",
                "Run 'gluadoc init --force' to regenerate the default configuration",
            ],
            Self::InvalidPattern { .. } => vec![
                "Patterns are Rust regex syntax, not Lua patterns",
                "Call prefixes must end with an escaped opening parenthesis: \\(",
            ],
            Self::InvalidScope { .. } => vec!["Every scope needs a name and a non-empty folder"],
            Self::FileWrite { .. } => vec!["Check write permissions for the .gluadoc directory"],
        }
    }
}

/// Errors raised while annotating a single file
#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("Invalid file identifier '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    /// Offsets computed by a synthesizer fall outside the text
    #[error("Edit at {start}..{end} is outside a text of {len} bytes")]
    EditOutOfBounds { start: usize, end: usize, len: usize },

    #[error("Edit at {start}..{end} does not fall on a character boundary")]
    EditNotOnBoundary { start: usize, end: usize },
}

impl AnnotateError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> String {
        match self {
            Self::InvalidUri { .. } => "INVALID_URI",
            Self::EditOutOfBounds { .. } => "EDIT_OUT_OF_BOUNDS",
            Self::EditNotOnBoundary { .. } => "EDIT_NOT_ON_BOUNDARY",
        }
        .to_string()
    }
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for per-file operations
pub type AnnotateResult<T> = Result<T, AnnotateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_stable() {
        let err = AnnotateError::InvalidUri {
            uri: "file://".to_string(),
            reason: "empty path".to_string(),
        };
        assert_eq!(err.status_code(), "INVALID_URI");

        let err = ConfigError::InvalidScope {
            scope: "ENT".to_string(),
            reason: "empty folder".to_string(),
        };
        assert_eq!(err.status_code(), "INVALID_SCOPE");
        assert!(!err.recovery_suggestions().is_empty());
    }

    #[test]
    fn test_invalid_pattern_message_names_the_template() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = ConfigError::InvalidPattern {
            name: "accessor".to_string(),
            pattern: "(".to_string(),
            source,
        };
        assert!(err.to_string().contains("accessor"));
    }
}
