//! # Order Feed
//!
//! Live order changes for the kitchen and admin pages.
//!
//! ## Usage
//! ```rust,ignore
//! let mut subscription = OrderFeed::subscribe(&client).await?;
//!
//! while let Some(change) = subscription.next().await {
//!     match change {
//!         Ok(change) => refresh(change),
//!         Err(e) => warn!(error = %e, "Skipping change"),
//!     }
//! }
//! ```
//!
//! Or with a callback, the way the pages register a listener:
//! ```rust,ignore
//! let subscription = OrderFeed::subscribe_with(&client, |change| {
//!     println!("{} {:?}", change.event_type, change.new.map(|o| o.id));
//! })
//! .await?;
//! // ... later
//! subscription.stop().await;
//! ```

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::WebSocketStream;
use tracing::{info, warn};

use dinetab_backend::client::BackendClient;
use dinetab_backend::config::RealtimeSettings;
use dinetab_core::Order;

use crate::error::{RealtimeError, RealtimeResult};
use crate::protocol::{socket_url, ChangeBinding, ORDERS_TOPIC};
use crate::transport::{connect, Relay, RelayConfig};

pub use crate::protocol::ChangeKind;

// =============================================================================
// Events
// =============================================================================

/// One change on the `orders` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderChange {
    pub event_type: ChangeKind,
    /// The row after the change; `None` for deletes.
    pub new: Option<Order>,
    /// The row before the change, as far as the backend reports it.
    pub old: Option<Value>,
}

/// Where a subscription stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    /// Socket open, join sent, no reply yet.
    Connecting,
    Joined,
    /// The join was refused or the socket failed.
    Errored,
    /// Stopped locally or closed by the server.
    Closed,
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionStatus::Connecting => write!(f, "CONNECTING"),
            SubscriptionStatus::Joined => write!(f, "SUBSCRIBED"),
            SubscriptionStatus::Errored => write!(f, "CHANNEL_ERROR"),
            SubscriptionStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

impl SubscriptionStatus {
    /// True once the subscription can no longer deliver events.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubscriptionStatus::Errored | SubscriptionStatus::Closed)
    }
}

// =============================================================================
// Subscription
// =============================================================================

/// Handle to a running order feed.
///
/// Dropping the handle stops the relay as [`Subscription::stop`] would,
/// without waiting for it.
pub struct Subscription {
    events: Option<mpsc::Receiver<RealtimeResult<OrderChange>>>,
    status: watch::Receiver<SubscriptionStatus>,
    stop: Option<oneshot::Sender<()>>,
    relay: Option<JoinHandle<()>>,
    forwarder: Option<JoinHandle<()>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("status", &self.status())
            .finish()
    }
}

impl Subscription {
    /// Next change, or `None` once the feed has ended.
    ///
    /// Always `None` for callback subscriptions.
    pub async fn next(&mut self) -> Option<RealtimeResult<OrderChange>> {
        match self.events.as_mut() {
            Some(events) => events.recv().await,
            None => None,
        }
    }

    pub fn status(&self) -> SubscriptionStatus {
        *self.status.borrow()
    }

    /// Watch channel for status transitions.
    pub fn status_changes(&self) -> watch::Receiver<SubscriptionStatus> {
        self.status.clone()
    }

    /// Leaves the channel, closes the socket and waits for the relay to end.
    ///
    /// Changes still buffered are discarded.
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        drop(self.events.take());
        if let Some(relay) = self.relay.take() {
            let _ = relay.await;
        }
        if let Some(forwarder) = self.forwarder.take() {
            let _ = forwarder.await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

// =============================================================================
// Order Feed
// =============================================================================

/// Factory for order subscriptions.
#[derive(Debug, Clone)]
pub struct OrderFeed {
    settings: RealtimeSettings,
    topic: String,
    bindings: Vec<ChangeBinding>,
}

impl Default for OrderFeed {
    fn default() -> Self {
        Self::new(RealtimeSettings::default())
    }
}

impl OrderFeed {
    /// Feed of every change on `orders` on the `orders-channel` topic.
    pub fn new(settings: RealtimeSettings) -> Self {
        OrderFeed {
            settings,
            topic: ORDERS_TOPIC.to_string(),
            bindings: vec![ChangeBinding::all_orders()],
        }
    }

    /// Subscribes with the client's realtime settings.
    pub async fn subscribe(client: &BackendClient) -> RealtimeResult<Subscription> {
        Self::new(client.options().realtime.clone()).open(client).await
    }

    /// Subscribes and hands every change to `callback` on a spawned task.
    ///
    /// Changes that fail to decode are logged and skipped.
    pub async fn subscribe_with<F>(client: &BackendClient, callback: F) -> RealtimeResult<Subscription>
    where
        F: FnMut(OrderChange) + Send + 'static,
    {
        let subscription = Self::subscribe(client).await?;
        Ok(forward_to(subscription, callback))
    }

    /// Connects to the backend behind `client` and joins the channel.
    pub async fn open(&self, client: &BackendClient) -> RealtimeResult<Subscription> {
        let settings = client.settings()?;
        let url = socket_url(settings.url(), settings.anon_key())?;

        info!(
            host = url.host_str().unwrap_or_default(),
            topic = %self.topic,
            "Subscribing to order changes"
        );
        let ws = connect(&url, self.settings.connect_timeout()).await?;
        Ok(self.attach(ws))
    }

    /// Runs the channel over an already open socket.
    pub fn attach<S>(&self, ws: WebSocketStream<S>) -> Subscription
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let config = RelayConfig {
            topic: self.topic.clone(),
            bindings: self.bindings.clone(),
            heartbeat_interval: self.settings.heartbeat_interval(),
            channel_capacity: self.settings.channel_capacity.max(1),
        };
        let (events_tx, events_rx) = mpsc::channel(config.channel_capacity);
        let (status_tx, status_rx) = watch::channel(SubscriptionStatus::Connecting);
        let (stop_tx, stop_rx) = oneshot::channel();

        let relay = Relay::new(ws, config, events_tx, status_tx, stop_rx);
        let handle = tokio::spawn(relay.run());

        Subscription {
            events: Some(events_rx),
            status: status_rx,
            stop: Some(stop_tx),
            relay: Some(handle),
            forwarder: None,
        }
    }
}

/// Moves the event stream of `subscription` onto a task feeding `callback`.
pub fn forward_to<F>(mut subscription: Subscription, mut callback: F) -> Subscription
where
    F: FnMut(OrderChange) + Send + 'static,
{
    if let Some(mut events) = subscription.events.take() {
        subscription.forwarder = Some(tokio::spawn(async move {
            while let Some(change) = events.recv().await {
                match change {
                    Ok(change) => callback(change),
                    Err(RealtimeError::InvalidPayload(reason)) => {
                        warn!(%reason, "Skipping undecodable order change");
                    }
                    Err(e) => warn!(error = %e, "Order feed ended"),
                }
            }
        }));
    }
    subscription
}
