//! Guard error types
//!
//! Error codes:
//! - GUARD_STORE_OPEN_FAILED (FATAL severity)
//! - GUARD_SEEK_FAILED (FATAL severity)
//! - GUARD_READ_FAILED (FATAL severity)
//! - GUARD_WRITE_FAILED (FATAL severity)
//! - GUARD_INVALID_ENTRY (ERROR severity)
//! - GUARD_INVALID_ENTITY_PATH (ERROR severity)
//! - GUARD_ALREADY_GUARDED (ERROR severity)
//! - GUARD_FILE_OVERFLOWED (ERROR severity)
//!
//! FATAL is fatal to the current operation only. Nothing is retried.

use std::fmt;
use std::io;

/// Severity levels for guard errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller can correct the input and try again
    Error,
    /// The operation is abandoned; the file may need operator attention
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Guard error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardErrorCode {
    /// Store not opened, or backing file missing/unreadable
    StoreOpenFailed,
    /// Positioning within the backing file failed
    SeekFailed,
    /// Reading from the backing file failed
    ReadFailed,
    /// Writing to the backing file failed
    WriteFailed,
    /// Malformed input or record not found by id
    InvalidEntry,
    /// Malformed entity path or record not found by path
    InvalidEntityPath,
    /// A live record already guards the target
    AlreadyGuarded,
    /// No slot left for a new record
    GuardFileOverFlowed,
}

impl GuardErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            GuardErrorCode::StoreOpenFailed => "GUARD_STORE_OPEN_FAILED",
            GuardErrorCode::SeekFailed => "GUARD_SEEK_FAILED",
            GuardErrorCode::ReadFailed => "GUARD_READ_FAILED",
            GuardErrorCode::WriteFailed => "GUARD_WRITE_FAILED",
            GuardErrorCode::InvalidEntry => "GUARD_INVALID_ENTRY",
            GuardErrorCode::InvalidEntityPath => "GUARD_INVALID_ENTITY_PATH",
            GuardErrorCode::AlreadyGuarded => "GUARD_ALREADY_GUARDED",
            GuardErrorCode::GuardFileOverFlowed => "GUARD_FILE_OVERFLOWED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            GuardErrorCode::StoreOpenFailed
            | GuardErrorCode::SeekFailed
            | GuardErrorCode::ReadFailed
            | GuardErrorCode::WriteFailed => Severity::Fatal,
            GuardErrorCode::InvalidEntry
            | GuardErrorCode::InvalidEntityPath
            | GuardErrorCode::AlreadyGuarded
            | GuardErrorCode::GuardFileOverFlowed => Severity::Error,
        }
    }
}

impl fmt::Display for GuardErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Guard error with enough context to diagnose without re-reading the file
#[derive(Debug)]
pub struct GuardError {
    code: GuardErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl GuardError {
    /// Create an error with the given code and message
    pub fn new(code: GuardErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Attach context details (offset, sizes, path, ...)
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach the underlying I/O error
    pub fn with_source(mut self, source: io::Error) -> Self {
        self.source = Some(source);
        self
    }

    pub fn store_open_failed(message: impl Into<String>) -> Self {
        Self::new(GuardErrorCode::StoreOpenFailed, message)
    }

    pub fn seek_failed(offset: u64, source: io::Error) -> Self {
        Self::new(GuardErrorCode::SeekFailed, "Failed to seek in guard file")
            .with_details(format!("byte_offset: {}", offset))
            .with_source(source)
    }

    pub fn read_failed(offset: u64, len: u64, source: io::Error) -> Self {
        Self::new(GuardErrorCode::ReadFailed, "Failed to read from guard file")
            .with_details(format!("byte_offset: {}, length: {}", offset, len))
            .with_source(source)
    }

    pub fn write_failed(offset: u64, len: u64, source: io::Error) -> Self {
        Self::new(GuardErrorCode::WriteFailed, "Failed to write to guard file")
            .with_details(format!("byte_offset: {}, length: {}", offset, len))
            .with_source(source)
    }

    pub fn invalid_entry(message: impl Into<String>) -> Self {
        Self::new(GuardErrorCode::InvalidEntry, message)
    }

    pub fn invalid_entity_path(message: impl Into<String>) -> Self {
        Self::new(GuardErrorCode::InvalidEntityPath, message)
    }

    pub fn already_guarded(message: impl Into<String>) -> Self {
        Self::new(GuardErrorCode::AlreadyGuarded, message)
    }

    pub fn overflowed(message: impl Into<String>) -> Self {
        Self::new(GuardErrorCode::GuardFileOverFlowed, message)
    }

    /// Returns the error code
    pub fn code(&self) -> GuardErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether the caller can recover by supplying different input
    pub fn is_recoverable(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for GuardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for guard operations
pub type GuardResult<T> = Result<T, GuardError>;
