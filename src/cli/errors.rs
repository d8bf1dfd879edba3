//! CLI-specific error types

use std::fmt;
use std::io;

use crate::entity::DeviceTreeError;
use crate::errors::GuardError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout)
    IoError,
    /// Physical path not known to the resolver
    UnsupportedPath,
    /// Bad command argument
    InvalidArgument,
    /// Guard store operation failed
    StoreError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "GUARD_CLI_CONFIG_ERROR",
            Self::IoError => "GUARD_CLI_IO_ERROR",
            Self::UnsupportedPath => "GUARD_CLI_UNSUPPORTED_PATH",
            Self::InvalidArgument => "GUARD_CLI_INVALID_ARGUMENT",
            Self::StoreError => "GUARD_CLI_STORE_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Physical path the resolver does not know
    pub fn unsupported_path(path: &str) -> Self {
        Self::new(
            CliErrorCode::UnsupportedPath,
            format!("Unsupported physical path {}", path),
        )
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidArgument, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<GuardError> for CliError {
    fn from(e: GuardError) -> Self {
        Self::new(CliErrorCode::StoreError, e.to_string())
    }
}

impl From<DeviceTreeError> for CliError {
    fn from(e: DeviceTreeError) -> Self {
        Self::config_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_keeps_guard_code() {
        let err: CliError = GuardError::already_guarded("Entity already guarded").into();
        assert_eq!(err.code(), &CliErrorCode::StoreError);
        assert!(err.message().contains("GUARD_ALREADY_GUARDED"));
        assert!(err.to_string().starts_with("GUARD_CLI_STORE_ERROR: "));
    }

    #[test]
    fn test_unsupported_path_message() {
        let err = CliError::unsupported_path("/sys-0/bogus");
        assert_eq!(err.code_str(), "GUARD_CLI_UNSUPPORTED_PATH");
        assert_eq!(err.message(), "Unsupported physical path /sys-0/bogus");
    }
}
