//! Error types for verso operations.
//!
//! Absence is never an error in verso: missing resources and projects come
//! back as `None` or empty collections, and deletes of missing entries return
//! `false`. The variants below cover everything else.

use thiserror::Error;

/// Result type alias for verso operations.
pub type VersoResult<T> = Result<T, VersoError>;

/// Main error type for all verso operations.
#[derive(Error, Debug)]
pub enum VersoError {
    /// The backend does not implement this operation.
    #[error("Unsupported operation: {operation}")]
    Unsupported {
        operation: String,
        code: ErrorCode,
    },

    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Parse error.
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        code: ErrorCode,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Operations (OP_xxx)
    OpUnsupported,

    // Validation (VAL_xxx)
    ValInvalidInput,
    ValInvalidVersion,
    ValInvalidResource,

    // Configuration (CFG_xxx)
    CfgInvalid,

    // Parse (PARSE_xxx)
    ParseInvalidJson,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::OpUnsupported => "OP_001",
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValInvalidVersion => "VAL_002",
            ErrorCode::ValInvalidResource => "VAL_003",
            ErrorCode::CfgInvalid => "CFG_001",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl VersoError {
    /// Create an unsupported operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
            code: ErrorCode::OpUnsupported,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: None,
        }
    }

    /// Create a validation error for a malformed version value.
    pub fn invalid_version(value: impl Into<String>) -> Self {
        Self::Validation {
            message: format!("'{}' is not a valid version timestamp", value.into()),
            code: ErrorCode::ValInvalidVersion,
            suggestion: Some("Use a numeric millisecond timestamp".to_string()),
        }
    }

    /// Create a validation error for a malformed resource document.
    pub fn invalid_resource(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidResource,
            suggestion: Some("Resources must be JSON objects".to_string()),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidJson,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error signals an operation the backend does not implement.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unsupported { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            Self::Configuration(_) => ErrorCode::CfgInvalid,
            Self::Serialization(_) => ErrorCode::ParseInvalidJson,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Unsupported { .. } => Some("Use a backend that implements this operation"),
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Configuration(_) => Some("Please check your repository configuration"),
            _ => None,
        }
    }
}
