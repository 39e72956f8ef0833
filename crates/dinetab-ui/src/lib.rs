//! # dinetab-ui: Page Helpers for Dinetab
//!
//! The stateful half of the presentation layer. Pure formatting rules
//! (currency, dates, text direction, QR links) live in `dinetab-core`; this
//! crate owns what needs timers, I/O or history.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   customer / staff / admin pages                                        │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  ┌───────────────────────── dinetab-ui ──────────────────────────────┐  │
//! │  │                                                                   │  │
//! │  │  notify     ToastCenter       10 ms show, 3 s visible, 300 ms out │  │
//! │  │  debounce   Debouncer         trailing edge, last args win        │  │
//! │  │  url_state  UrlState          ?table=4&lang=fr + back stack       │  │
//! │  │  lang       LanguageLoader    /lang/{code}.json, en fallback      │  │
//! │  │  icons      render()          stroke SVG set                      │  │
//! │  │  markup     loading/error     escaped HTML fragments              │  │
//! │  │                                                                   │  │
//! │  └───────────────────────────────┬───────────────────────────────────┘  │
//! │                                  ▼                                      │
//! │                            dinetab-core                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! let toasts = ToastCenter::with_duration(settings.display.toast_duration());
//! toasts.show_success("Order sent to the kitchen");
//!
//! let page = UrlState::parse(location)?;
//! let language = page.language(browser_locale);
//! let translations = LanguageLoader::http(origin)?.load_language(language).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod debounce;
pub mod error;
pub mod icons;
pub mod lang;
pub mod markup;
pub mod notify;
pub mod url_state;

// =============================================================================
// Re-exports
// =============================================================================

pub use debounce::Debouncer;
pub use error::{LanguageError, LanguageResult};
pub use icons::IconOptions;
pub use lang::{
    DirTranslationSource, HttpTranslationSource, LanguageLoader, TranslationSource, Translations,
};
pub use markup::{error_markup, escape_html, loading_markup};
pub use notify::{Toast, ToastCenter, ToastEvent, ToastKind};
pub use url_state::UrlState;
