//! # dinetab-realtime: Live Order Feed for Dinetab
//!
//! Pushes order inserts, updates and deletes from the backend's Realtime
//! service to whoever holds a [`Subscription`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BackendClient (initialized) ──► OrderFeed::subscribe                  │
//! │                                        │                                │
//! │                                        ▼                                │
//! │   wss://<project>.supabase.co/realtime/v1/websocket?apikey=..&vsn=1.0.0 │
//! │                                        │                                │
//! │                              ┌─────────┴─────────┐                      │
//! │                              │  relay task       │  join, heartbeat,    │
//! │                              │  (transport.rs)   │  decode changes      │
//! │                              └─────────┬─────────┘                      │
//! │                     mpsc (events)      │      watch (status)            │
//! │                                        ▼                                │
//! │  Subscription::next() / status() / stop()   or   callback adapter      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`feed`] - [`OrderFeed`], [`Subscription`] and the change types
//! - [`protocol`] - Phoenix channel messages and the socket URL
//! - [`transport`] - The relay task
//! - [`error`] - Realtime error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod feed;
pub mod protocol;
pub mod transport;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{RealtimeError, RealtimeResult};
pub use feed::{forward_to, ChangeKind, OrderChange, OrderFeed, Subscription, SubscriptionStatus};
pub use transport::RelayConfig;
