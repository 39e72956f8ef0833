//! # Configuration
//!
//! Connection settings from the `.env` file, plus optional client tuning.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    What Comes From Where                                │
//! │                                                                         │
//! │  .env  (required, KEY=VALUE)                                           │
//! │     SUPABASE_URL=https://abcd.supabase.co                              │
//! │     SUPABASE_ANON_KEY=eyJhbGciOi...                                    │
//! │        │  EnvConfig::load(ConfigSource::File | Url | Text)             │
//! │        ▼                                                                │
//! │     BackendSettings { url, anon_key }  ──► BackendClient::init         │
//! │                                                                         │
//! │  dinetab.toml  (optional tuning, lowest → highest priority)            │
//! │     1. Default values                                                  │
//! │     2. ~/.config/dinetab/dinetab.toml (Linux)                          │
//! │        ~/Library/Application Support/com.dinetab.dinetab/ (macOS)      │
//! │     3. DINETAB_* environment variables                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Env File Format
//! ```text
//! # comments and blank lines are skipped
//! SUPABASE_URL=https://abcd.supabase.co
//! SUPABASE_ANON_KEY=eyJhbGciOiJIUzI1NiIs...==   ← '=' allowed inside values
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use dinetab_core::validation::{
    validate_anon_key, validate_backend_url, validate_currency_code, validate_range,
    ANON_KEY_KEY, URL_KEY,
};
use dinetab_core::{Language, DEFAULT_CURRENCY};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Backend Settings
// =============================================================================

/// The two values every backend call needs.
///
/// Immutable once built. `Debug` redacts the key.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendSettings {
    url: String,
    anon_key: String,
}

impl BackendSettings {
    /// Builds settings, rejecting blank or template values.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> ConfigResult<Self> {
        let url = url.into().trim().to_string();
        let anon_key = anon_key.into().trim().to_string();
        validate_backend_url(&url)?;
        validate_anon_key(&anon_key)?;
        Ok(BackendSettings { url, anon_key })
    }

    /// Backend base URL as configured.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }
}

impl fmt::Debug for BackendSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSettings")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Env Config
// =============================================================================

/// Where the `.env` text comes from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// A file on disk.
    File(PathBuf),
    /// Fetched over HTTP, e.g. `/.env` next to the pages.
    Url(String),
    /// Text already in hand.
    Text(String),
}

impl ConfigSource {
    fn name(&self) -> String {
        match self {
            ConfigSource::File(path) => path.display().to_string(),
            ConfigSource::Url(url) => url.clone(),
            ConfigSource::Text(_) => "inline text".to_string(),
        }
    }

    async fn read(&self) -> ConfigResult<String> {
        match self {
            ConfigSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ConfigError::read_failed(self.name(), e)),
            ConfigSource::Url(url) => {
                let response = reqwest::get(url)
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| ConfigError::read_failed(self.name(), e))?;
                response
                    .text()
                    .await
                    .map_err(|e| ConfigError::read_failed(self.name(), e))
            }
            ConfigSource::Text(text) => Ok(text.clone()),
        }
    }
}

/// Loaded `.env` values.
///
/// ## Lifecycle
/// ```text
///   EnvConfig::new()      ── backend_settings() → Err(NotLoaded)
///        │ load(source) ok
///        ▼
///   loaded                ── backend_settings() → Ok(settings)
///        │ load(source) err
///        ▼
///   unloaded again        ── backend_settings() → Err(NotLoaded)
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    values: HashMap<String, String>,
    settings: Option<BackendSettings>,
}

impl EnvConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `KEY=VALUE` lines.
    ///
    /// Lines are trimmed; blank lines, `#` comments and lines without `=`
    /// are skipped. The key ends at the first `=`, so values may contain
    /// `=`. Later duplicates win.
    ///
    /// ## Example
    /// ```rust
    /// use dinetab_backend::EnvConfig;
    ///
    /// let values = EnvConfig::parse("# backend\nSUPABASE_ANON_KEY=abc==\n\nbogus line");
    /// assert_eq!(values["SUPABASE_ANON_KEY"], "abc==");
    /// assert_eq!(values.len(), 1);
    /// ```
    pub fn parse(text: &str) -> HashMap<String, String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect()
    }

    /// Reads, parses and validates the `.env` text from `source`.
    ///
    /// Calling it again re-reads and replaces the values. Any failure leaves
    /// the config unloaded.
    pub async fn load(&mut self, source: ConfigSource) -> ConfigResult<BackendSettings> {
        let result = source
            .read()
            .await
            .and_then(|text| self.load_text(&text));

        match &result {
            Ok(settings) => info!(source = %source.name(), url = %settings.url(), "Configuration loaded"),
            Err(e) => {
                self.reset();
                warn!(source = %source.name(), error = %e, "Configuration load failed");
            }
        }
        result
    }

    /// [`EnvConfig::load`] for text already in memory.
    pub fn load_text(&mut self, text: &str) -> ConfigResult<BackendSettings> {
        let values = Self::parse(text);
        let url = values
            .get(URL_KEY)
            .ok_or_else(|| ConfigError::MissingKey(URL_KEY.to_string()));
        let key = values
            .get(ANON_KEY_KEY)
            .ok_or_else(|| ConfigError::MissingKey(ANON_KEY_KEY.to_string()));

        let settings = match (url, key) {
            (Ok(url), Ok(key)) => BackendSettings::new(url.as_str(), key.as_str()),
            (Err(e), _) | (_, Err(e)) => Err(e),
        };

        match settings {
            Ok(settings) => {
                debug!(keys = values.len(), "Parsed env file");
                self.values = values;
                self.settings = Some(settings.clone());
                Ok(settings)
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    fn reset(&mut self) {
        self.values.clear();
        self.settings = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.settings.is_some()
    }

    /// The validated connection settings.
    pub fn backend_settings(&self) -> ConfigResult<BackendSettings> {
        self.settings.clone().ok_or(ConfigError::NotLoaded)
    }

    /// Any other key from the loaded file.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

// =============================================================================
// Client Settings (dinetab.toml)
// =============================================================================

/// HTTP behavior for REST calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Whole-request timeout (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    20
}

impl Default for HttpSettings {
    fn default() -> Self {
        HttpSettings {
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl HttpSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Change feed socket behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeSettings {
    /// Interval between channel heartbeats (seconds).
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,

    /// WebSocket connect timeout (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Change events buffered before the relay waits on the consumer.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_heartbeat_interval() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_channel_capacity() -> usize {
    256
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        RealtimeSettings {
            heartbeat_interval_secs: default_heartbeat_interval(),
            connect_timeout_secs: default_connect_timeout(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl RealtimeSettings {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Presentation defaults shared by the pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Language when neither the URL nor the browser picks one.
    #[serde(default)]
    pub language: Language,

    #[serde(default = "default_currency")]
    pub currency: String,

    /// Public site origin used for table QR codes.
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// How long a toast stays visible (milliseconds).
    #[serde(default = "default_toast_duration")]
    pub toast_duration_ms: u64,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_toast_duration() -> u64 {
    3000
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            language: Language::default(),
            currency: default_currency(),
            public_base_url: None,
            toast_duration_ms: default_toast_duration(),
        }
    }
}

impl DisplaySettings {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

/// Optional client tuning.
///
/// ## Example Config File
/// ```toml
/// [http]
/// request_timeout_secs = 20
///
/// [realtime]
/// heartbeat_interval_secs = 30
/// connect_timeout_secs = 10
///
/// [display]
/// language = "fr"
/// currency = "MAD"
/// public_base_url = "https://tabs.example.ma"
/// toast_duration_ms = 3000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(default)]
    pub http: HttpSettings,

    #[serde(default)]
    pub realtime: RealtimeSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl ClientSettings {
    /// Loads tuning from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (dinetab.toml), skipped when absent
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut settings = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client settings from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| ConfigError::read_failed(path.display().to_string(), e))?;
                settings = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Client settings file not found, using defaults");
            }
        }

        settings.apply_env_overrides();
        settings.validate()?;

        Ok(settings)
    }

    /// Loads settings or returns defaults if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client settings: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        validate_range("http.request_timeout_secs", self.http.request_timeout_secs, 1, 300)?;
        validate_range(
            "realtime.heartbeat_interval_secs",
            self.realtime.heartbeat_interval_secs,
            1,
            3600,
        )?;
        validate_range(
            "realtime.connect_timeout_secs",
            self.realtime.connect_timeout_secs,
            1,
            300,
        )?;
        if self.realtime.channel_capacity == 0 {
            return Err(ConfigError::InvalidSettings(
                "realtime.channel_capacity must be greater than 0".into(),
            ));
        }
        validate_currency_code(&self.display.currency)?;
        validate_range(
            "display.toast_duration_ms",
            self.display.toast_duration_ms,
            100,
            60_000,
        )?;

        if let Some(ref base) = self.display.public_base_url {
            if url::Url::parse(base).is_err() {
                return Err(ConfigError::InvalidSettings(format!(
                    "display.public_base_url is not a valid URL: {}",
                    base
                )));
            }
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        fn parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
            let raw = std::env::var(name).ok()?;
            match raw.parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(var = name, value = %raw, "Ignoring unparseable environment override");
                    None
                }
            }
        }

        if let Some(secs) = parsed::<u64>("DINETAB_HTTP_TIMEOUT_SECS") {
            self.http.request_timeout_secs = secs;
        }
        if let Some(secs) = parsed::<u64>("DINETAB_HEARTBEAT_INTERVAL_SECS") {
            debug!(secs, "Overriding heartbeat interval from environment");
            self.realtime.heartbeat_interval_secs = secs;
        }
        if let Some(secs) = parsed::<u64>("DINETAB_CONNECT_TIMEOUT_SECS") {
            self.realtime.connect_timeout_secs = secs;
        }
        if let Some(lang) = parsed::<Language>("DINETAB_LANGUAGE") {
            self.display.language = lang;
        }
        if let Ok(currency) = std::env::var("DINETAB_CURRENCY") {
            self.display.currency = currency.trim().to_uppercase();
        }
        if let Ok(base) = std::env::var("DINETAB_PUBLIC_BASE_URL") {
            debug!(url = %base, "Overriding public base URL from environment");
            self.display.public_base_url = Some(base);
        }
        if let Some(ms) = parsed::<u64>("DINETAB_TOAST_DURATION_MS") {
            self.display.toast_duration_ms = ms;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "dinetab", "dinetab")
            .map(|dirs| dirs.config_dir().join("dinetab.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    const GOOD_ENV: &str = "\
# Backend connection
SUPABASE_URL=https://abcd1234.supabase.co

SUPABASE_ANON_KEY = eyJhbGciOiJIUzI1NiJ9.payload.sig==
UNRELATED=1
";

    #[test]
    fn test_parse_skips_comments_and_junk() {
        let values = EnvConfig::parse("  # note\nA=1\nnot a pair\n B = two words \n\nC=x=y");
        assert_eq!(values.len(), 3);
        assert_eq!(values["A"], "1");
        assert_eq!(values["B"], "two words");
        assert_eq!(values["C"], "x=y");
    }

    #[test]
    fn test_load_text_success() {
        let mut config = EnvConfig::new();
        assert!(matches!(config.backend_settings(), Err(ConfigError::NotLoaded)));

        let settings = config.load_text(GOOD_ENV).unwrap();
        assert_eq!(settings.url(), "https://abcd1234.supabase.co");
        assert_eq!(settings.anon_key(), "eyJhbGciOiJIUzI1NiJ9.payload.sig==");
        assert_eq!(config.backend_settings().unwrap(), settings);
        assert_eq!(config.get("UNRELATED"), Some("1"));
    }

    #[test]
    fn test_missing_key_fails() {
        let mut config = EnvConfig::new();
        let err = config.load_text("SUPABASE_URL=https://abcd.supabase.co").unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ref k) if k == "SUPABASE_ANON_KEY"));
        assert!(!config.is_loaded());
    }

    #[test]
    fn test_empty_value_fails() {
        let mut config = EnvConfig::new();
        let err = config
            .load_text("SUPABASE_URL=\nSUPABASE_ANON_KEY=abc")
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ref k) if k == "SUPABASE_URL"));
    }

    #[test]
    fn test_placeholders_fail() {
        let mut config = EnvConfig::new();
        let err = config
            .load_text("SUPABASE_URL=https://your-project.supabase.co\nSUPABASE_ANON_KEY=abc")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Placeholder { ref key, .. } if key == "SUPABASE_URL"));

        let err = config
            .load_text("SUPABASE_URL=https://abcd.supabase.co\nSUPABASE_ANON_KEY=your-anon-key")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Placeholder { .. }));
        assert!(matches!(config.backend_settings(), Err(ConfigError::NotLoaded)));
    }

    #[test]
    fn test_failed_reload_unloads() {
        let mut config = EnvConfig::new();
        config.load_text(GOOD_ENV).unwrap();
        assert!(config.load_text("SUPABASE_URL=x").is_err());
        assert!(!config.is_loaded());
        assert_eq!(config.get("UNRELATED"), None);
    }

    #[test]
    fn test_settings_debug_redacts_key() {
        let settings = BackendSettings::new("https://abcd.supabase.co", "secret-key").unwrap();
        let printed = format!("{:?}", settings);
        assert!(!printed.contains("secret-key"));
        assert!(printed.contains("abcd.supabase.co"));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(GOOD_ENV.as_bytes()).unwrap();

        let mut config = EnvConfig::new();
        let settings = config
            .load(ConfigSource::File(file.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(settings.url(), "https://abcd1234.supabase.co");

        // Reload is allowed and replaces the values
        let settings = config
            .load(ConfigSource::Text(
                "SUPABASE_URL=https://other.supabase.co\nSUPABASE_ANON_KEY=k2".to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(settings.url(), "https://other.supabase.co");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = EnvConfig::new();
        let err = config
            .load(ConfigSource::File(dir.path().join(".env")))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
        assert!(!config.is_loaded());
    }

    #[tokio::test]
    async fn test_load_from_url() {
        let (base, request) = crate::testing::serve_once("200 OK", GOOD_ENV).await;

        let mut config = EnvConfig::new();
        let settings = config
            .load(ConfigSource::Url(format!("{base}/.env")))
            .await
            .unwrap();
        assert_eq!(settings.url(), "https://abcd1234.supabase.co");
        assert!(request.await.unwrap().starts_with("GET /.env HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_load_from_url_not_found() {
        let (base, _request) = crate::testing::serve_once("404 Not Found", "").await;

        let mut config = EnvConfig::new();
        let err = config
            .load(ConfigSource::Url(format!("{base}/.env")))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
        assert!(!config.is_loaded());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_load_files_concurrently() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.env");
        let second = dir.path().join("second.env");
        std::fs::write(&first, GOOD_ENV).unwrap();
        std::fs::write(
            &second,
            "SUPABASE_URL=https://other.supabase.co\nSUPABASE_ANON_KEY=k2\n",
        )
        .unwrap();

        let (mut a, mut b) = (EnvConfig::new(), EnvConfig::new());
        let (ra, rb) = tokio::join!(
            a.load(ConfigSource::File(first)),
            b.load(ConfigSource::File(second))
        );
        assert_eq!(ra.unwrap().url(), "https://abcd1234.supabase.co");
        assert_eq!(rb.unwrap().anon_key(), "k2");
    }

    #[test]
    fn test_client_settings_defaults() {
        let settings = ClientSettings::default();
        assert_eq!(settings.http.request_timeout(), Duration::from_secs(20));
        assert_eq!(settings.realtime.heartbeat_interval(), Duration::from_secs(30));
        assert_eq!(settings.display.currency, "MAD");
        assert_eq!(settings.display.toast_duration(), Duration::from_millis(3000));
        assert!(settings.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_client_settings_file_and_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dinetab.toml");
        std::fs::write(
            &path,
            "[display]\nlanguage = \"fr\"\ncurrency = \"EUR\"\n\n[realtime]\nheartbeat_interval_secs = 15\n",
        )
        .unwrap();

        std::env::set_var("DINETAB_HEARTBEAT_INTERVAL_SECS", "45");
        let settings = ClientSettings::load(Some(path));
        std::env::remove_var("DINETAB_HEARTBEAT_INTERVAL_SECS");

        let settings = settings.unwrap();
        assert_eq!(settings.display.language, Language::Fr);
        assert_eq!(settings.display.currency, "EUR");
        assert_eq!(settings.realtime.heartbeat_interval_secs, 45);
        assert_eq!(settings.http.request_timeout_secs, 20);
    }

    #[test]
    #[serial]
    fn test_client_settings_rejects_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dinetab.toml");
        std::fs::write(&path, "[display]\ncurrency = \"dirham\"\n").unwrap();
        assert!(ClientSettings::load(Some(path.clone())).is_err());

        std::fs::write(&path, "[http\n").unwrap();
        assert!(matches!(
            ClientSettings::load(Some(path)),
            Err(ConfigError::InvalidSettings(_))
        ));
    }

    #[test]
    #[serial]
    fn test_missing_settings_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ClientSettings::load(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings, ClientSettings::default());
    }
}
