//! # Backend Error Types
//!
//! Error types for configuration loading and backend calls.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  .env text ──► ValidationError (dinetab-core)                          │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │               ConfigError ──► page shows "configure .env first"        │
//! │                                                                         │
//! │  repository call                                                       │
//! │     │ handle missing? ──► BackendError::NotInitialized (no I/O)        │
//! │     ▼                                                                   │
//! │  PostgREST ──► non-2xx ──► BackendError::Api { code, message, ... }    │
//! │     │          network ──► BackendError::Http                          │
//! │     ▼                                                                   │
//! │  rows ──► bad shape ──► BackendError::Decode { collection, .. }        │
//! │           wrong count ─► BackendError::NotSingleRow { count, .. }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use dinetab_core::ValidationError;
use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading `.env` or `dinetab.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required key is absent or blank.
    #[error("Missing configuration value: {0}")]
    MissingKey(String),

    /// A key still holds the template value.
    #[error("{key} still contains the template placeholder '{marker}'")]
    Placeholder { key: String, marker: String },

    /// Settings were requested before a successful load.
    #[error("Configuration not loaded. Call load() first.")]
    NotLoaded,

    /// The source could not be read (file, URL).
    #[error("Failed to read configuration from {source_name}: {reason}")]
    ReadFailed { source_name: String, reason: String },

    /// `dinetab.toml` is malformed or a tuning value is out of range.
    #[error("Invalid client settings: {0}")]
    InvalidSettings(String),
}

impl ConfigError {
    pub(crate) fn read_failed(source_name: impl Into<String>, reason: impl ToString) -> Self {
        ConfigError::ReadFailed {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Required { field } => ConfigError::MissingKey(field),
            ValidationError::Placeholder { field, marker } => {
                ConfigError::Placeholder { key: field, marker }
            }
            other => ConfigError::InvalidSettings(other.to_string()),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::InvalidSettings(err.to_string())
    }
}

// =============================================================================
// Backend Errors
// =============================================================================

/// Result type alias for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised by [`crate::BackendClient`] and its repositories.
#[derive(Debug, Error)]
pub enum BackendError {
    // =========================================================================
    // Lifecycle
    // =========================================================================
    /// An entity method was called before `init`.
    ///
    /// ## When This Occurs
    /// - A page forgot to call `init` after loading `.env`
    /// - `init` failed and the caller carried on
    #[error("Backend client not initialized. Call init() first.")]
    NotInitialized,

    /// `init` was called on an already initialized client.
    #[error("Backend client already initialized")]
    AlreadyInitialized,

    // =========================================================================
    // Backend-reported
    // =========================================================================
    /// The backend answered with an error body, passed through verbatim.
    ///
    /// ## When This Occurs
    /// - Row level security rejected the request (`42501`)
    /// - Unique or foreign key violation (`23505`, `23503`)
    /// - Unknown column in a filter or payload (`PGRST204`, `42703`)
    #[error("Backend error {status}{}: {message}", .code.as_deref().map(|c| format!(" [{c}]")).unwrap_or_default())]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    // =========================================================================
    // Transport
    // =========================================================================
    /// The request never got a response (DNS, TLS, timeout, reset).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The request could not be built (bad base URL, header value).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // =========================================================================
    // Payloads
    // =========================================================================
    /// Rows came back in a shape the DTO does not accept.
    #[error("Failed to decode {collection} rows: {reason}")]
    Decode { collection: String, reason: String },

    /// A write payload could not be serialized.
    #[error("Failed to encode {collection} payload: {reason}")]
    Encode { collection: String, reason: String },

    /// A single-row read or write matched zero or several rows.
    #[error("Expected exactly one {collection} row, got {count}")]
    NotSingleRow { collection: String, count: usize },
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            BackendError::InvalidRequest(err.to_string())
        } else {
            BackendError::Http(err.to_string())
        }
    }
}

impl From<url::ParseError> for BackendError {
    fn from(err: url::ParseError) -> Self {
        BackendError::InvalidRequest(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl BackendError {
    /// True when the handle was missing, so nothing reached the network.
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, BackendError::NotInitialized)
    }

    /// True when the backend itself rejected the request.
    pub fn is_backend_reported(&self) -> bool {
        matches!(self, BackendError::Api { .. })
    }

    /// Backend error code (`PGRST116`, `23505`, ...), if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            BackendError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn decode(collection: &str, err: impl ToString) -> Self {
        BackendError::Decode {
            collection: collection.to_string(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn encode(collection: &str, err: impl ToString) -> Self {
        BackendError::Encode {
            collection: collection.to_string(),
            reason: err.to_string(),
        }
    }
}
