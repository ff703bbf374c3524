//! Error types for the splanner library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Category of a rejected constructor or mutator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Drive base is inconsistent with the hub it targets
    InvalidDriveBase,
    /// Plan or run name is empty or whitespace
    EmptyName,
    /// Left and right motor share a port
    DuplicateMotorPort,
    /// Wheel diameter or axle track is zero, negative or not finite
    NonPositiveDimension,
    /// Point coordinate is NaN or infinite
    NonFiniteCoordinate,
    /// Action anchor does not index a point of its run
    DanglingAnchor,
    /// Plan has no runs to generate code for
    NoRuns,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::InvalidDriveBase => "invalid drive base",
            ValidationErrorKind::EmptyName => "empty name",
            ValidationErrorKind::DuplicateMotorPort => "duplicate motor port",
            ValidationErrorKind::NonPositiveDimension => "non-positive dimension",
            ValidationErrorKind::NonFiniteCoordinate => "non-finite coordinate",
            ValidationErrorKind::DanglingAnchor => "dangling action anchor",
            ValidationErrorKind::NoRuns => "plan has no runs",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-correctable input error raised by the validating constructors.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}: {reason}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub reason: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

/// Comprehensive error type for all splanner operations.
#[derive(Error, Debug)]
pub enum SplanError {
    /// Bad constructor or mutator input
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    /// Persisted document could not be parsed into a plan
    #[error("Malformed plan document: {message}")]
    MalformedDocument { message: String },
    /// Run already holds the maximum number of points
    #[error("Run '{run}' cannot hold more than {limit} points")]
    CapacityExceeded { run: String, limit: usize },
    /// Index outside the addressed collection
    #[error("{what} index {index} out of range (length {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    /// Template source could not provide the template text
    #[error("Code template unavailable: {message}")]
    TemplateUnavailable { message: String },
    /// Template does not contain the placeholder exactly once
    #[error("Expected exactly one placeholder in template, found {occurrences}")]
    PlaceholderNotFound { occurrences: usize },
    /// Device channel refused or lost the payload
    #[error("Delivery to device failed: {message}")]
    DeliveryFailed { message: String },
    /// Serialization errors while encoding a plan
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating validation errors.
pub struct ValidationErrorBuilder {
    kind: ValidationErrorKind,
}

impl ValidationErrorBuilder {
    /// Create a new validation error builder for a kind.
    pub fn new(kind: ValidationErrorKind) -> Self {
        Self { kind }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> SplanError {
        SplanError::Validation(ValidationError::new(self.kind, reason))
    }
}

impl SplanError {
    /// Creates a builder for validation errors.
    pub fn validation(kind: ValidationErrorKind) -> ValidationErrorBuilder {
        ValidationErrorBuilder::new(kind)
    }

    /// Creates a malformed document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        SplanError::MalformedDocument {
            message: message.into(),
        }
    }

    /// Returns the validation kind if this is a validation error.
    pub fn validation_kind(&self) -> Option<ValidationErrorKind> {
        match self {
            SplanError::Validation(e) => Some(e.kind),
            _ => None,
        }
    }
}

/// Extension trait for Result to provide concise error mapping with
/// anyhow-style context.
pub trait ResultExt<T> {
    /// Add context to any error type, converting to a configuration error.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display;
}

/// Specialized extension trait for file-system Results.
pub trait IoResultExt<T> {
    /// Attach the offending path to an I/O failure.
    fn at_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: fmt::Display,
{
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| SplanError::Configuration {
            message: format!("{context}: {e}"),
        })
    }
}

impl<T> IoResultExt<T> for std::result::Result<T, std::io::Error> {
    fn at_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| SplanError::FileSystem {
            path: path.into(),
            source,
        })
    }
}

/// Result type alias for splanner operations
pub type Result<T> = std::result::Result<T, SplanError>;
