//! # Language Files
//!
//! Loads `/lang/{code}.json` translation files.
//!
//! ## Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         LanguageLoader                                  │
//! │                                                                         │
//! │   load("fr") ─────────────────┬──────────────────────────────────┐     │
//! │                               ▼                                  │     │
//! │              ┌──────────────────────────────────┐                │     │
//! │              │   dyn TranslationSource          │                │     │
//! │              └────────┬────────────────┬────────┘                │     │
//! │                       │                │                         │     │
//! │       HttpTranslationSource     DirTranslationSource             │     │
//! │       GET {base}/lang/fr.json   {dir}/fr.json                    │     │
//! │                                                                  │     │
//! │   failure on fr ──► one retry with en ──► failure ──► Err ◄──────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use dinetab_core::i18n::Language;

use crate::error::{LanguageError, LanguageResult};

// =============================================================================
// Sources
// =============================================================================

/// Where language files come from.
#[async_trait]
pub trait TranslationSource: Send + Sync {
    /// Raw JSON text of the file for `code`.
    async fn fetch(&self, code: &str) -> LanguageResult<String>;
}

/// Language files served over HTTP at `{origin}/lang/{code}.json`.
#[derive(Debug, Clone)]
pub struct HttpTranslationSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpTranslationSource {
    /// `base` is the site origin, e.g. `https://menu.example.com`.
    pub fn new(base: &str) -> LanguageResult<Self> {
        Ok(Self::with_client(reqwest::Client::new(), Url::parse(base)?))
    }

    pub fn with_client(client: reqwest::Client, base: Url) -> Self {
        HttpTranslationSource { client, base }
    }

    /// Absolute URL of the file for `code`.
    pub fn url_for(&self, code: &str) -> LanguageResult<Url> {
        check_code(code)?;
        Ok(self.base.join(&format!("/lang/{code}.json"))?)
    }
}

#[async_trait]
impl TranslationSource for HttpTranslationSource {
    async fn fetch(&self, code: &str) -> LanguageResult<String> {
        let url = self.url_for(code)?;
        debug!(%url, "Fetching language file");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LanguageError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Language files in a local directory, `{dir}/{code}.json`.
#[derive(Debug, Clone)]
pub struct DirTranslationSource {
    dir: PathBuf,
}

impl DirTranslationSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirTranslationSource { dir: dir.into() }
    }
}

#[async_trait]
impl TranslationSource for DirTranslationSource {
    async fn fetch(&self, code: &str) -> LanguageResult<String> {
        check_code(code)?;
        let path = self.dir.join(format!("{code}.json"));
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LanguageError::Io { path, source })
    }
}

fn check_code(code: &str) -> LanguageResult<()> {
    let valid = !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(LanguageError::InvalidCode(code.to_string()))
    }
}

// =============================================================================
// Translations
// =============================================================================

/// A parsed language file.
#[derive(Debug, Clone, PartialEq)]
pub struct Translations {
    /// Code of the file actually loaded; `en` after a fallback.
    pub code: String,
    pub entries: Value,
}

impl Translations {
    /// Looks up a dotted key such as `orders.status.ready`.
    pub fn get(&self, key: &str) -> Option<&str> {
        key.split('.')
            .try_fold(&self.entries, |node, part| node.get(part))
            .and_then(Value::as_str)
    }

    /// [`Translations::get`], or the key itself when missing.
    pub fn text<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }

    /// True if the requested file was replaced by the English one.
    pub fn is_fallback(&self, requested: &str) -> bool {
        self.code != requested
    }
}

// =============================================================================
// Loader
// =============================================================================

#[derive(Clone)]
pub struct LanguageLoader {
    source: Arc<dyn TranslationSource>,
}

impl std::fmt::Debug for LanguageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageLoader").finish_non_exhaustive()
    }
}

impl LanguageLoader {
    pub fn new(source: impl TranslationSource + 'static) -> Self {
        LanguageLoader {
            source: Arc::new(source),
        }
    }

    /// Loader over HTTP from the site at `base`.
    pub fn http(base: &str) -> LanguageResult<Self> {
        Ok(Self::new(HttpTranslationSource::new(base)?))
    }

    /// Loader over a local directory.
    pub fn dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(DirTranslationSource::new(dir))
    }

    /// Loads `code`; any failure on a code other than `en` is retried once
    /// with `en`. A failure on `en` is returned.
    pub async fn load(&self, code: &str) -> LanguageResult<Translations> {
        let fallback = Language::DEFAULT.code();
        match self.load_exact(code).await {
            Ok(translations) => Ok(translations),
            Err(e) if code != fallback => {
                warn!(code, error = %e, fallback, "Language file failed, using fallback");
                self.load_exact(fallback).await
            }
            Err(e) => Err(e),
        }
    }

    /// [`LanguageLoader::load`] for a supported language.
    pub async fn load_language(&self, language: Language) -> LanguageResult<Translations> {
        self.load(language.code()).await
    }

    async fn load_exact(&self, code: &str) -> LanguageResult<Translations> {
        let text = self.source.fetch(code).await?;
        let entries = serde_json::from_str(&text).map_err(|source| LanguageError::Parse {
            code: code.to_string(),
            source,
        })?;
        Ok(Translations {
            code: code.to_string(),
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory source recording every requested code.
    #[derive(Default)]
    struct FakeSource {
        files: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn with(mut self, code: &str, body: &str) -> Self {
            self.files.insert(code.to_string(), body.to_string());
            self
        }
    }

    #[async_trait]
    impl TranslationSource for FakeSource {
        async fn fetch(&self, code: &str) -> LanguageResult<String> {
            self.requests.lock().unwrap().push(code.to_string());
            self.files.get(code).cloned().ok_or_else(|| LanguageError::Status {
                url: format!("https://menu.example.com/lang/{code}.json"),
                status: 404,
            })
        }
    }

    fn loader(source: FakeSource) -> (LanguageLoader, Arc<FakeSource>) {
        let source = Arc::new(source);
        let loader = LanguageLoader {
            source: Arc::clone(&source) as Arc<dyn TranslationSource>,
        };
        (loader, source)
    }

    const EN: &str = r#"{"menu": {"title": "Menu", "add": "Add to order"}}"#;
    const FR: &str = r#"{"menu": {"title": "Carte", "add": "Ajouter"}}"#;

    #[tokio::test]
    async fn test_loads_requested_language() {
        let (loader, source) = loader(FakeSource::default().with("en", EN).with("fr", FR));

        let fr = loader.load_language(Language::Fr).await.unwrap();
        assert_eq!(fr.code, "fr");
        assert_eq!(fr.get("menu.title"), Some("Carte"));
        assert!(!fr.is_fallback("fr"));
        assert_eq!(*source.requests.lock().unwrap(), vec!["fr"]);
    }

    #[tokio::test]
    async fn test_missing_language_falls_back_once_to_en() {
        let (loader, source) = loader(FakeSource::default().with("en", EN));

        let translations = loader.load("ar").await.unwrap();
        assert_eq!(translations.code, "en");
        assert!(translations.is_fallback("ar"));
        assert_eq!(translations.text("menu.add"), "Add to order");
        assert_eq!(*source.requests.lock().unwrap(), vec!["ar", "en"]);
    }

    #[tokio::test]
    async fn test_malformed_file_falls_back() {
        let (loader, _) = loader(FakeSource::default().with("en", EN).with("fr", "{ not json"));
        assert_eq!(loader.load("fr").await.unwrap().code, "en");
    }

    #[tokio::test]
    async fn test_en_failure_propagates_without_loop() {
        let (loader, source) = loader(FakeSource::default());

        let err = loader.load("en").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(*source.requests.lock().unwrap(), vec!["en"]);
    }

    #[tokio::test]
    async fn test_fallback_failure_returns_en_error() {
        let (loader, source) = loader(FakeSource::default().with("en", "[broken"));

        let err = loader.load("fr").await.unwrap_err();
        assert!(matches!(err, LanguageError::Parse { ref code, .. } if code == "en"));
        assert_eq!(*source.requests.lock().unwrap(), vec!["fr", "en"]);
    }

    #[tokio::test]
    async fn test_dir_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.json"), EN).unwrap();
        std::fs::write(dir.path().join("fr.json"), FR).unwrap();

        let loader = LanguageLoader::dir(dir.path());
        assert_eq!(loader.load("fr").await.unwrap().get("menu.add"), Some("Ajouter"));
        assert_eq!(loader.load("ar").await.unwrap().code, "en");

        let source = DirTranslationSource::new(dir.path());
        assert!(matches!(
            source.fetch("../en").await,
            Err(LanguageError::InvalidCode(_))
        ));
    }

    #[test]
    fn test_http_url() {
        let source = HttpTranslationSource::new("https://menu.example.com/admin/index.html").unwrap();
        assert_eq!(
            source.url_for("fr").unwrap().as_str(),
            "https://menu.example.com/lang/fr.json"
        );
        assert!(source.url_for("fr/../../secret").is_err());
    }

    #[test]
    fn test_translation_lookup() {
        let translations = Translations {
            code: "en".to_string(),
            entries: json!({"status": {"ready": "Ready"}, "count": 3}),
        };
        assert_eq!(translations.get("status.ready"), Some("Ready"));
        assert_eq!(translations.get("status"), None);
        assert_eq!(translations.get("count"), None);
        assert_eq!(translations.text("status.unknown"), "status.unknown");
    }
}
