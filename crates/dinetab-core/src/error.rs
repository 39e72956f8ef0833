//! # Error Types
//!
//! Domain-specific error types for dinetab-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  dinetab-core errors (this file)                                       │
//! │  ├── CoreError        - Parsing/formatting failures                    │
//! │  └── ValidationError  - Value checks (config values, payload fields)   │
//! │                                                                         │
//! │  dinetab-backend                                                       │
//! │  ├── ConfigError      - .env loading                                   │
//! │  └── BackendError     - Init order, backend-reported, decode           │
//! │                                                                         │
//! │  dinetab-realtime                                                      │
//! │  └── RealtimeError    - Change feed socket + payloads                  │
//! │                                                                         │
//! │  Flow: ValidationError → ConfigError → caller (page shows message)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by the pure helpers in this crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A timestamp string could not be parsed.
    ///
    /// ## When This Occurs
    /// - A row carries a malformed `created_at`
    /// - A page passes user input straight to `format_date_time_str`
    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    /// A language code outside the supported set.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// A status/method string the enum does not know.
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    /// A monetary amount that cannot be represented.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A link could not be built.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Value validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is still the template placeholder.
    #[error("{field} still contains the placeholder '{marker}'")]
    Placeholder { field: String, marker: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid URL, invalid slug).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
