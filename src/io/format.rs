//! Output format for CLI results.
//!
//! `--json` wraps every command result in the same envelope so scripts can
//! branch on `status` and `exit_code` without parsing text.

use crate::error::ConfigError;
use crate::io::exit_code::ExitCode;
use serde::{Deserialize, Serialize};

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (default)
    Text,
    /// JSON for tool integration
    Json,
}

impl OutputFormat {
    #[must_use]
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Standard JSON response format.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonResponse<T = serde_json::Value>
where
    T: Serialize,
{
    /// Status: "success" or "error"
    pub status: String,

    /// Result code (e.g., "OK", "PENDING_EDITS", "INVALID_PATTERN")
    pub code: String,

    pub message: String,

    /// Payload (only for success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Recovery suggestions (only for errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,

    /// Exit code for shell scripts
    pub exit_code: u8,
}

impl<T> JsonResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            code: "OK".to_string(),
            message: "Operation completed successfully".to_string(),
            data: Some(data),
            suggestions: None,
            exit_code: ExitCode::Success as u8,
        }
    }

    /// Success payload carrying a non-zero exit code, e.g. `--check` with
    /// pending edits
    pub fn with_exit(mut self, code: ExitCode, message: &str) -> Self {
        self.code = code.status_code().to_string();
        self.message = message.to_string();
        self.exit_code = code as u8;
        self
    }
}

impl JsonResponse<serde_json::Value> {
    /// Create an error response from a configuration error.
    pub fn from_config_error(error: &ConfigError) -> Self {
        Self {
            status: "error".to_string(),
            code: error.status_code(),
            message: error.to_string(),
            data: None,
            suggestions: Some(
                error
                    .recovery_suggestions()
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            exit_code: ExitCode::from_config_error(error) as u8,
        }
    }
}
