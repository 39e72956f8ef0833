//! # Validation Module
//!
//! Value checks for configuration. Row contents are left to the backend.
//!
//! ## Where Checks Happen
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  .env  ──► validate_backend_url / validate_anon_key ──► BackendSettings │
//! │                 (non-empty, template placeholder replaced)             │
//! │                                                                         │
//! │  dinetab.toml ──► validate_currency_code / validate_range ──► tuning    │
//! │                                                                         │
//! │  Everything else (row constraints, foreign keys, RLS) is the backend's │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use dinetab_core::validation::{validate_anon_key, validate_backend_url};
//!
//! assert!(validate_backend_url("https://abc.supabase.co").is_ok());
//! assert!(validate_backend_url("https://your-project.supabase.co").is_err());
//! assert!(validate_anon_key("").is_err());
//! ```

use crate::error::ValidationError;
use crate::{KEY_PLACEHOLDER_MARKER, URL_PLACEHOLDER_MARKER};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Env file key holding the backend URL.
pub const URL_KEY: &str = "SUPABASE_URL";

/// Env file key holding the anonymous API key.
pub const ANON_KEY_KEY: &str = "SUPABASE_ANON_KEY";

// =============================================================================
// String Validators
// =============================================================================

/// Fails when `value` is empty after trimming.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Fails when `value` still contains the template's `marker`.
pub fn validate_not_placeholder(field: &str, value: &str, marker: &str) -> ValidationResult<()> {
    if value.contains(marker) {
        return Err(ValidationError::Placeholder {
            field: field.to_string(),
            marker: marker.to_string(),
        });
    }
    Ok(())
}

/// Validates the backend URL from the env file.
///
/// ## Rules
/// - Must not be empty
/// - Must not contain `your-project`
///
/// The scheme and host are not checked here; an unusable URL surfaces as a
/// transport error on the first call.
pub fn validate_backend_url(url: &str) -> ValidationResult<()> {
    validate_required(URL_KEY, url)?;
    validate_not_placeholder(URL_KEY, url, URL_PLACEHOLDER_MARKER)
}

/// Validates the anon key from the env file.
///
/// ## Rules
/// - Must not be empty
/// - Must not contain `your-anon-key`
pub fn validate_anon_key(key: &str) -> ValidationResult<()> {
    validate_required(ANON_KEY_KEY, key)?;
    validate_not_placeholder(ANON_KEY_KEY, key, KEY_PLACEHOLDER_MARKER)
}

/// Validates an ISO 4217 style currency code (three ASCII uppercase letters).
///
/// ## Example
/// ```rust
/// use dinetab_core::validation::validate_currency_code;
///
/// assert!(validate_currency_code("MAD").is_ok());
/// assert!(validate_currency_code("mad").is_err());
/// assert!(validate_currency_code("DIRHAM").is_err());
/// ```
pub fn validate_currency_code(code: &str) -> ValidationResult<()> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: format!("'{code}' is not a three-letter uppercase code"),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a numeric setting (seconds, milliseconds, counts) against an
/// inclusive range.
pub fn validate_range(field: &str, value: u64, min: u64, max: u64) -> ValidationResult<()> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: min as i64,
            max: max as i64,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_url() {
        assert!(validate_backend_url("https://abcd1234.supabase.co").is_ok());
        assert!(matches!(
            validate_backend_url("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_backend_url("https://your-project.supabase.co"),
            Err(ValidationError::Placeholder { .. })
        ));
    }

    #[test]
    fn test_anon_key() {
        assert!(validate_anon_key("eyJhbGciOiJIUzI1NiJ9.abc.def").is_ok());
        assert!(matches!(
            validate_anon_key(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_anon_key("your-anon-key-here"),
            Err(ValidationError::Placeholder { .. })
        ));
    }

    #[test]
    fn test_placeholder_error_names_field() {
        let err = validate_anon_key("your-anon-key").unwrap_err();
        assert_eq!(
            err.to_string(),
            "SUPABASE_ANON_KEY still contains the placeholder 'your-anon-key'"
        );
    }

    #[test]
    fn test_currency_code() {
        assert!(validate_currency_code("EUR").is_ok());
        assert!(validate_currency_code("EU").is_err());
        assert!(validate_currency_code("E1R").is_err());
    }

    #[test]
    fn test_range() {
        assert!(validate_range("toast_duration_ms", 3000, 100, 60_000).is_ok());
        assert!(validate_range("toast_duration_ms", 50, 100, 60_000).is_err());
        assert!(validate_range("toast_duration_ms", 60_001, 100, 60_000).is_err());
        assert!(validate_range("http.request_timeout_secs", 300, 1, 300).is_ok());
        assert!(validate_range("http.request_timeout_secs", 0, 1, 300).is_err());
    }
}
