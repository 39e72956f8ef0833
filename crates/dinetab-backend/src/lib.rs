//! # dinetab-backend: Hosted Backend Access for Dinetab
//!
//! Loads the connection settings and performs every REST call the Dinetab
//! pages make against the hosted backend.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dinetab Data Flow                                │
//! │                                                                         │
//! │  .env (file / URL)                                                     │
//! │       │  EnvConfig::load                                                │
//! │       ▼                                                                 │
//! │  BackendSettings { url, anon_key }                                     │
//! │       │  BackendClient::init                                            │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  dinetab-backend (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ BackendClient │    │  Repositories │    │ RestBackend  │  │   │
//! │  │   │  (client.rs)  │───►│ tables, menu  │───►│  (rest.rs)   │  │   │
//! │  │   │ once-init     │    │ orders, shifts│    │ Query → HTTP │  │   │
//! │  │   │ handle, clock │    │ analytics ... │    │ reqwest      │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  https://<project>.supabase.co/rest/v1/<collection>                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - `.env` connection settings and `dinetab.toml` tuning
//! - [`client`] - The backend handle, [`Backend`] trait and [`Clock`]
//! - [`query`] - Requests described as data
//! - [`rest`] - PostgREST transport
//! - [`repository`] - One repository per collection
//! - [`error`] - Config and backend error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dinetab_backend::{BackendClient, ConfigSource, EnvConfig};
//! use dinetab_core::{OrderFilter, OrderStatus};
//!
//! let mut config = EnvConfig::new();
//! let settings = config.load(ConfigSource::File(".env".into())).await?;
//!
//! let client = BackendClient::new();
//! client.init(&settings)?;
//!
//! let pending = client
//!     .orders()
//!     .list(&OrderFilter::default().status(OrderStatus::Pending))
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod repository;
pub mod rest;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::{Backend, BackendClient, Clock, SystemClock};
pub use config::{BackendSettings, ClientSettings, ConfigSource, EnvConfig};
pub use error::{BackendError, BackendResult, ConfigError, ConfigResult};
pub use query::{Direction, Query};
pub use rest::RestBackend;

// Repository re-exports for convenience
pub use repository::{
    AnalyticsRepository, CategoryRepository, EmployeeRepository, MenuRepository, OrderRepository,
    ShiftRepository, TableRepository,
};
