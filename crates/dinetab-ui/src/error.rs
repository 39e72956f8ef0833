//! # UI Error Types
//!
//! Errors raised while loading translation files.
//!
//! ## Fallback
//! ```text
//! load("fr") ──► fetch fr ──► ok ─────────────────────────► fr translations
//!                    │
//!                    └── any LanguageError ──► fetch en ──► en translations
//!                                                  │
//!                                                  └── error ──► returned
//! ```
//! The error a caller sees is always the last attempt's.

use std::path::PathBuf;

use thiserror::Error;

/// Language file loading failures.
#[derive(Debug, Error)]
pub enum LanguageError {
    /// Language codes are path segments; anything but `[A-Za-z0-9-_]` is refused.
    #[error("Invalid language code: {0:?}")]
    InvalidCode(String),

    #[error("Invalid language base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered, but not with 2xx.
    #[error("Failed to load language file {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read language file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Language file {code} is not valid JSON: {source}")]
    Parse {
        code: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LanguageError {
    /// True when the file simply is not there (404 or missing on disk).
    pub fn is_not_found(&self) -> bool {
        match self {
            LanguageError::Status { status, .. } => *status == 404,
            LanguageError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Result type for language loading.
pub type LanguageResult<T> = Result<T, LanguageError>;
