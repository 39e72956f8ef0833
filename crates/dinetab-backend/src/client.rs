//! # Backend Client
//!
//! The handle pages hold to reach the hosted backend.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BackendClient::new()                                                  │
//! │       │   tables().list_active() ──► Err(NotInitialized), no request   │
//! │       │                                                                 │
//! │       │ init(&settings)          builds RestBackend (reqwest)          │
//! │       │ init_with(settings, b)   installs any Backend (tests, proxies) │
//! │       ▼                                                                 │
//! │  initialized (exactly once; a second init → AlreadyInitialized)        │
//! │       │                                                                 │
//! │       ├── tables()      ──► TableRepository                            │
//! │       ├── menu()        ──► MenuRepository                             │
//! │       ├── categories()  ──► CategoryRepository                         │
//! │       ├── orders()      ──► OrderRepository                            │
//! │       ├── employees()   ──► EmployeeRepository                         │
//! │       ├── shifts()      ──► ShiftRepository                            │
//! │       └── analytics()   ──► AnalyticsRepository                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::info;

use crate::config::{BackendSettings, ClientSettings};
use crate::error::{BackendError, BackendResult};
use crate::query::Query;
use crate::repository::{
    AnalyticsRepository, CategoryRepository, EmployeeRepository, MenuRepository, OrderRepository,
    ShiftRepository, TableRepository,
};
use crate::rest::RestBackend;

// =============================================================================
// Backend Trait
// =============================================================================

/// Executes one [`Query`] and returns the raw JSON rows.
///
/// Implementations report backend rejections as [`BackendError::Api`] and
/// leave row decoding to the repositories.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn execute(&self, query: Query) -> BackendResult<Value>;
}

// =============================================================================
// Clock
// =============================================================================

/// Source of "now" for clock-in/out and `updated_at` stamps.
///
/// The business date is the UTC date of `now()`.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// =============================================================================
// Backend Client
// =============================================================================

struct Handle {
    backend: Arc<dyn Backend>,
    settings: BackendSettings,
}

/// Entry point for every backend call.
///
/// Share it behind an `Arc`; initialization happens once through `&self`.
pub struct BackendClient {
    handle: OnceLock<Handle>,
    options: ClientSettings,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendClient")
            .field("initialized", &self.is_initialized())
            .field("settings", &self.handle.get().map(|h| &h.settings))
            .finish()
    }
}

impl Default for BackendClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendClient {
    /// Creates an uninitialized client with default tuning.
    pub fn new() -> Self {
        Self::with_options(ClientSettings::default())
    }

    /// Creates an uninitialized client with the given tuning.
    pub fn with_options(options: ClientSettings) -> Self {
        BackendClient {
            handle: OnceLock::new(),
            options,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for timestamps written by the client.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Connects the client to the backend described by `settings`.
    pub fn init(&self, settings: &BackendSettings) -> BackendResult<()> {
        if self.is_initialized() {
            return Err(BackendError::AlreadyInitialized);
        }
        let backend = RestBackend::new(settings, self.options.http.request_timeout())?;
        self.init_with(settings.clone(), Arc::new(backend))
    }

    /// Installs a custom [`Backend`].
    pub fn init_with(
        &self,
        settings: BackendSettings,
        backend: Arc<dyn Backend>,
    ) -> BackendResult<()> {
        let url = settings.url().to_string();
        self.handle
            .set(Handle { backend, settings })
            .map_err(|_| BackendError::AlreadyInitialized)?;
        info!(url = %url, "Backend client initialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.get().is_some()
    }

    fn handle(&self) -> BackendResult<&Handle> {
        self.handle.get().ok_or(BackendError::NotInitialized)
    }

    /// The installed backend, for queries no repository covers.
    pub fn backend(&self) -> BackendResult<Arc<dyn Backend>> {
        self.handle().map(|h| Arc::clone(&h.backend))
    }

    /// Connection settings the client was initialized with.
    pub fn settings(&self) -> BackendResult<&BackendSettings> {
        self.handle().map(|h| &h.settings)
    }

    pub fn options(&self) -> &ClientSettings {
        &self.options
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // =========================================================================
    // Repositories
    // =========================================================================

    pub fn tables(&self) -> TableRepository<'_> {
        TableRepository::new(self)
    }

    pub fn menu(&self) -> MenuRepository<'_> {
        MenuRepository::new(self)
    }

    pub fn categories(&self) -> CategoryRepository<'_> {
        CategoryRepository::new(self)
    }

    pub fn orders(&self) -> OrderRepository<'_> {
        OrderRepository::new(self)
    }

    pub fn employees(&self) -> EmployeeRepository<'_> {
        EmployeeRepository::new(self)
    }

    pub fn shifts(&self) -> ShiftRepository<'_> {
        ShiftRepository::new(self)
    }

    pub fn analytics(&self) -> AnalyticsRepository<'_> {
        AnalyticsRepository::new(self)
    }
}
