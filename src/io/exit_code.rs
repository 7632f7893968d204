//! Exit codes for CLI operations following Unix conventions.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success - every file processed (with or without edits)
//! - `1`: General error - unspecified failure
//! - `2`: Blocking error - configuration could not be loaded or compiled
//! - `3-125`: Specific recoverable errors
//! - `126-255`: Reserved by shell

use crate::error::ConfigError;

/// Standard exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation succeeded (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Critical error that should halt automation (code 2)
    BlockingError = 2,

    /// `--check` found files that would change (code 3)
    PendingEdits = 3,

    /// File I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Machine-readable code for JSON output
    pub fn status_code(&self) -> &'static str {
        match self {
            ExitCode::Success => "OK",
            ExitCode::GeneralError => "GENERAL_ERROR",
            ExitCode::BlockingError => "BLOCKING_ERROR",
            ExitCode::PendingEdits => "PENDING_EDITS",
            ExitCode::IoError => "IO_ERROR",
            ExitCode::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Map a configuration error to an exit code.
    ///
    /// A configuration that cannot be parsed or compiled stops everything; a
    /// failed write during `init` is only an I/O problem.
    pub fn from_config_error(error: &ConfigError) -> Self {
        match error {
            ConfigError::Load(_)
            | ConfigError::InvalidPattern { .. }
            | ConfigError::InvalidScope { .. } => ExitCode::BlockingError,
            ConfigError::FileRead { .. } => ExitCode::ConfigError,
            ConfigError::FileWrite { .. } => ExitCode::IoError,
        }
    }
}
