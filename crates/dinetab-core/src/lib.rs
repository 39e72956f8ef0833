//! # dinetab-core: Pure Domain Types for Dinetab
//!
//! Everything the ordering pages and the backend client agree on, with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dinetab Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Web pages (customer, staff, admin)                 │   │
//! │  └─────────────┬───────────────────────────────┬───────────────────┘   │
//! │                │                               │                        │
//! │  ┌─────────────▼──────────────┐   ┌────────────▼────────────────────┐  │
//! │  │ dinetab-backend / realtime │   │          dinetab-ui             │  │
//! │  │ REST + live order feed     │   │ toasts, debounce, languages     │  │
//! │  └─────────────┬──────────────┘   └────────────┬────────────────────┘  │
//! │                │                               │                        │
//! │  ┌─────────────▼───────────────────────────────▼───────────────────┐   │
//! │  │               ★ dinetab-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  money  │ │ format  │ │  i18n   │ │  links  │  │   │
//! │  │   │ Order   │ │ Money   │ │ dates   │ │Language │ │ QR code │  │   │
//! │  │   │ Table.. │ │ MAD     │ │ times   │ │ dir     │ │ URLs    │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO TIMERS • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entity DTOs (DiningTable, MenuItem, Order, EmployeeShift, ...)
//! - [`money`] - Money type with integer minor units
//! - [`format`] - Currency and date/time formatting
//! - [`i18n`] - Supported languages, detection, text direction
//! - [`links`] - Customer deep links and QR code URLs
//! - [`validation`] - Value checks shared by config and write payloads
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use dinetab_core::format::format_currency;
//! use dinetab_core::money::Money;
//!
//! let total = Money::from_minor(1250);
//! assert_eq!(format_currency(total, "MAD"), "12,50 د.م.");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod format;
pub mod i18n;
pub mod links;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use i18n::{Language, TextDirection};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency used when a page does not say otherwise (Moroccan dirham).
pub const DEFAULT_CURRENCY: &str = "MAD";

/// Marker left in the template `.env` for the backend URL.
///
/// A URL still containing it means nobody edited the template.
pub const URL_PLACEHOLDER_MARKER: &str = "your-project";

/// Marker left in the template `.env` for the anon key.
pub const KEY_PLACEHOLDER_MARKER: &str = "your-anon-key";

/// External service that renders QR code images.
pub const QR_CODE_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Edge length of generated QR codes, as the service expects it.
pub const QR_CODE_SIZE: &str = "300x300";

/// Page customers land on after scanning a table QR code.
pub const CUSTOMER_PAGE: &str = "customer.html";
