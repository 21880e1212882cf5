//! # Error Handling
//!
//! Error types shared by the API smoke checks and the click automation.
//!
//! ## Architecture
//!
//! - **`HarnessError`**: one variant per failure class, each carrying an
//!   [`ErrorContext`] with a timestamp and optional hints
//! - **`HasRecoverySuggestion`**: exposes the operator-facing hint
//! - **`category()`**: stable short name used in log fields
//!
//! ## Failure classes
//!
//! Every check failure maps to one of three wire-level causes:
//!
//! - transport: the request never produced a response
//! - unexpected status: the response code differs from the expected one
//! - missing field / mismatch: the JSON body has the wrong shape or value
//!
//! Preconditions (no token, no document id) are reported separately so a
//! failed login does not masquerade as a server fault further down the run.
//!
//! ## Usage
//!
//! ```rust
//! use ocr_smoke::error::{HarnessError, HasRecoverySuggestion};
//!
//! let error = HarnessError::unexpected_status("GET /api/stats", 200, 500, "boom")
//!     .with_recovery_suggestion("check the server logs");
//!
//! assert_eq!(error.category(), "unexpected_status");
//! assert_eq!(error.recovery_suggestion(), Some("check the server logs"));
//! ```

use std::{error::Error as StdError, fmt, time::SystemTime};

/// Metadata attached to every [`HarnessError`]
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// When the error occurred
    pub timestamp: SystemTime,
    /// Additional context about the error
    pub context: Option<String>,
    /// Suggested recovery action
    pub recovery_suggestion: Option<String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            timestamp: SystemTime::now(),
            context: None,
            recovery_suggestion: None,
        }
    }
}

impl ErrorContext {
    /// Create a new error context
    pub fn new() -> Self {
        Self::default()
    }
}

/// Base error type for the harness
#[derive(Debug)]
pub enum HarnessError {
    /// The HTTP request failed before a response was received
    Transport {
        operation: String,
        source: reqwest::Error,
        context: ErrorContext,
    },
    /// The response status differs from the expected one
    UnexpectedStatus {
        operation: String,
        expected: u16,
        actual: u16,
        body: String,
        context: ErrorContext,
    },
    /// The response body could not be decoded as JSON
    InvalidBody {
        operation: String,
        reason: String,
        context: ErrorContext,
    },
    /// A required JSON field is absent
    MissingField {
        operation: String,
        field: String,
        body: String,
        context: ErrorContext,
    },
    /// A JSON field is present but holds the wrong value
    Mismatch {
        operation: String,
        field: String,
        expected: String,
        actual: String,
        context: ErrorContext,
    },
    /// Data required from an earlier step is not available
    Precondition {
        operation: String,
        reason: String,
        context: ErrorContext,
    },
    /// A request fixture could not be generated
    Fixture {
        fixture: String,
        reason: String,
        context: ErrorContext,
    },
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
    /// I/O errors
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
    /// Synthetic input backend failures
    Automation {
        backend: String,
        reason: String,
        context: ErrorContext,
    },
}

impl HarnessError {
    /// Create a transport error
    pub fn transport(operation: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            operation: operation.into(),
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create an unexpected status error
    pub fn unexpected_status(
        operation: impl Into<String>,
        expected: u16,
        actual: u16,
        body: impl Into<String>,
    ) -> Self {
        Self::UnexpectedStatus {
            operation: operation.into(),
            expected,
            actual,
            body: body.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create an invalid body error
    pub fn invalid_body(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBody {
            operation: operation.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(
        operation: impl Into<String>,
        field: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::MissingField {
            operation: operation.into(),
            field: field.into(),
            body: body.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a value mismatch error
    pub fn mismatch(
        operation: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Mismatch {
            operation: operation.into(),
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a precondition error
    pub fn precondition(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Precondition {
            operation: operation.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a fixture error
    pub fn fixture(fixture: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fixture {
            fixture: fixture.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: None,
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create an automation backend error
    pub fn automation(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Automation {
            backend: backend.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Attach the path an I/O error refers to
    pub fn with_path(mut self, new_path: impl Into<String>) -> Self {
        if let Self::Io { path, .. } = &mut self {
            *path = Some(new_path.into());
        }
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_mut().context = Some(context.into());
        self
    }

    /// Add recovery suggestion
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Transport { context, .. } => context,
            Self::UnexpectedStatus { context, .. } => context,
            Self::InvalidBody { context, .. } => context,
            Self::MissingField { context, .. } => context,
            Self::Mismatch { context, .. } => context,
            Self::Precondition { context, .. } => context,
            Self::Fixture { context, .. } => context,
            Self::Config { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Automation { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Transport { context, .. } => context,
            Self::UnexpectedStatus { context, .. } => context,
            Self::InvalidBody { context, .. } => context,
            Self::MissingField { context, .. } => context,
            Self::Mismatch { context, .. } => context,
            Self::Precondition { context, .. } => context,
            Self::Fixture { context, .. } => context,
            Self::Config { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Automation { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::InvalidBody { .. } => "invalid_body",
            Self::MissingField { .. } => "missing_field",
            Self::Mismatch { .. } => "mismatch",
            Self::Precondition { .. } => "precondition",
            Self::Fixture { .. } => "fixture",
            Self::Config { .. } => "config",
            Self::Io { .. } => "io",
            Self::Automation { .. } => "automation",
        }
    }

    /// Short, human-readable failure detail used in the check report.
    ///
    /// Unlike `Display` this omits the operation name, which the report
    /// already prints on the status line.
    pub fn detail(&self) -> String {
        match self {
            Self::Transport { source, .. } => format!("Exception: {}", source),
            Self::UnexpectedStatus {
                expected,
                actual,
                body,
                ..
            } => {
                if body.is_empty() {
                    format!("Expected {}, got {}", expected, actual)
                } else {
                    format!("Status: {}, Response: {}", actual, body)
                }
            }
            Self::InvalidBody { reason, .. } => format!("Invalid response: {}", reason),
            Self::MissingField { field, body, .. } => {
                format!("Invalid response (missing '{}'): {}", field, body)
            }
            Self::Mismatch {
                field,
                expected,
                actual,
                ..
            } => format!("'{}' is {:?}, expected {:?}", field, actual, expected),
            Self::Precondition { reason, .. } => reason.clone(),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::Transport {
                operation, source, ..
            } => {
                write!(f, "Request {} failed: {}", operation, source)
            }
            HarnessError::UnexpectedStatus {
                operation,
                expected,
                actual,
                ..
            } => {
                write!(
                    f,
                    "{} returned status {} (expected {})",
                    operation, actual, expected
                )
            }
            HarnessError::InvalidBody {
                operation, reason, ..
            } => {
                write!(f, "{} returned an unreadable body: {}", operation, reason)
            }
            HarnessError::MissingField {
                operation, field, ..
            } => {
                write!(f, "{} response is missing '{}'", operation, field)
            }
            HarnessError::Mismatch {
                operation,
                field,
                expected,
                actual,
                ..
            } => {
                write!(
                    f,
                    "{} returned '{}' = {:?}, expected {:?}",
                    operation, field, actual, expected
                )
            }
            HarnessError::Precondition {
                operation, reason, ..
            } => {
                write!(f, "{} skipped: {}", operation, reason)
            }
            HarnessError::Fixture {
                fixture, reason, ..
            } => {
                write!(f, "Could not create fixture {}: {}", fixture, reason)
            }
            HarnessError::Config {
                field,
                value,
                reason,
                ..
            } => {
                write!(
                    f,
                    "Configuration error in '{}': {} (value: {})",
                    field, reason, value
                )
            }
            HarnessError::Io {
                operation,
                path,
                source,
                ..
            } => {
                if let Some(path) = path {
                    write!(
                        f,
                        "I/O error during {} on '{}': {}",
                        operation, path, source
                    )
                } else {
                    write!(f, "I/O error during {}: {}", operation, source)
                }
            }
            HarnessError::Automation {
                backend, reason, ..
            } => {
                write!(f, "Input backend {} failed: {}", backend, reason)
            }
        }
    }
}

impl StdError for HarnessError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Transport { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias using our custom error type
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Trait for errors with recovery suggestions
pub trait HasRecoverySuggestion {
    /// Get recovery suggestion
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for HarnessError {
    fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = HarnessError::config("base_url", "", "must not be empty");
        assert_eq!(error.category(), "config");
        assert_eq!(
            error.to_string(),
            "Configuration error in 'base_url': must not be empty (value: )"
        );
    }

    #[test]
    fn test_error_with_context() {
        let error = HarnessError::precondition("GET /api/auth/me", "No token available")
            .with_context("authentication group")
            .with_recovery_suggestion("make sure signup or login succeeded");

        assert_eq!(error.category(), "precondition");
        assert_eq!(error.context().context.as_deref(), Some("authentication group"));
        assert_eq!(
            error.recovery_suggestion(),
            Some("make sure signup or login succeeded")
        );
    }

    #[test]
    fn test_detail_omits_operation() {
        let error = HarnessError::precondition("GET /api/stats", "No token available");
        assert_eq!(error.detail(), "No token available");

        let error = HarnessError::unexpected_status("GET /api/auth/me", 401, 200, "");
        assert_eq!(error.detail(), "Expected 401, got 200");

        let error = HarnessError::unexpected_status("GET /api/stats", 200, 500, "oops");
        assert_eq!(error.detail(), "Status: 500, Response: oops");
    }

    #[test]
    fn test_io_error_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error = HarnessError::io("read workflow", io).with_path("steps.json");
        assert!(error.source().is_some());
        assert!(error.to_string().contains("steps.json"));
    }
}
