//! # Languages
//!
//! The three languages the menu is published in, how a page picks one, and
//! which way its text runs.
//!
//! ## Detection Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ?lang=ar in the URL (QR code links carry it)                          │
//! │       │ allowed? ──yes──► use it                                        │
//! │       no                                                                │
//! │       ▼                                                                 │
//! │  browser locale "fr-MA" → primary subtag "fr"                           │
//! │       │ allowed? ──yes──► use it                                        │
//! │       no                                                                │
//! │       ▼                                                                 │
//! │  English                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Language
// =============================================================================

/// A supported interface/menu language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English, also the fallback for everything.
    #[default]
    En,
    /// French.
    Fr,
    /// Arabic, written right-to-left.
    Ar,
}

/// Every language, in menu display order.
pub const SUPPORTED_LANGUAGES: [Language; 3] = [Language::En, Language::Fr, Language::Ar];

impl Language {
    /// The fallback language. Its language file must always exist.
    pub const DEFAULT: Language = Language::En;

    /// Two-letter code as used in URLs and language file names.
    pub const fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Ar => "ar",
        }
    }

    pub const fn direction(&self) -> TextDirection {
        match self {
            Language::Ar => TextDirection::Rtl,
            Language::En | Language::Fr => TextDirection::Ltr,
        }
    }

    pub const fn is_default(&self) -> bool {
        matches!(self, Language::En)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            "ar" => Ok(Language::Ar),
            other => Err(CoreError::UnsupportedLanguage(other.to_string())),
        }
    }
}

// =============================================================================
// Detection
// =============================================================================

/// Picks the page language from the `lang` URL parameter and the browser
/// locale, falling back to English.
///
/// ## Example
/// ```rust
/// use dinetab_core::i18n::{detect_language, Language};
///
/// assert_eq!(detect_language(Some("ar"), Some("fr-FR")), Language::Ar);
/// assert_eq!(detect_language(Some("de"), Some("fr-FR")), Language::Fr);
/// assert_eq!(detect_language(None, Some("es-ES")), Language::En);
/// ```
pub fn detect_language(url_lang: Option<&str>, browser_locale: Option<&str>) -> Language {
    if let Some(lang) = url_lang.and_then(|l| l.parse::<Language>().ok()) {
        return lang;
    }

    browser_locale
        .and_then(|locale| locale.split(['-', '_']).next())
        .and_then(|primary| primary.parse::<Language>().ok())
        .unwrap_or(Language::DEFAULT)
}

// =============================================================================
// Text Direction
// =============================================================================

/// Writing direction of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

impl fmt::Display for TextDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `dir` and `lang` attributes for the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct PageAttributes {
    pub dir: TextDirection,
    pub lang: Language,
}

impl PageAttributes {
    /// Renders the attributes as they go on `<html>`.
    pub fn to_html_attrs(&self) -> String {
        format!(r#"dir="{}" lang="{}""#, self.dir, self.lang)
    }
}

/// Direction and language attributes for a page shown in `lang`.
pub fn page_attributes(lang: Language) -> PageAttributes {
    PageAttributes {
        dir: lang.direction(),
        lang,
    }
}
