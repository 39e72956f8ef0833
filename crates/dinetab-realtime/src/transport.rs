//! # Channel Relay
//!
//! Drives one joined channel over one WebSocket until it is stopped or the
//! server goes away.
//!
//! ## Relay Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Subscription States                             │
//! │                                                                         │
//! │  ┌────────────┐  phx_reply ok   ┌────────────┐                         │
//! │  │ Connecting │ ──────────────► │   Joined   │ ◄── postgres_changes     │
//! │  └─────┬──────┘                 └─────┬──────┘     relayed as events    │
//! │        │                              │                                 │
//! │        │ join rejected,               │ stop() / handle dropped         │
//! │        │ phx_error, socket error      │ close frame, phx_close          │
//! │        ▼                              ▼                                 │
//! │  ┌────────────┐                 ┌────────────┐                         │
//! │  │  Errored   │                 │   Closed   │                         │
//! │  └────────────┘                 └────────────┘                         │
//! │                                                                         │
//! │  Heartbeat on topic "phoenix" every interval while the socket is up.   │
//! │  No reconnect: both end states end the event stream.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::error::{RealtimeError, RealtimeResult};
use crate::feed::{OrderChange, SubscriptionStatus};
use crate::protocol::{
    heartbeat_message, join_message, leave_message, ChangeBinding, ChangeData, Incoming,
    PhoenixMessage,
};

// =============================================================================
// Relay Configuration
// =============================================================================

/// Channel and keepalive settings for one relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub topic: String,
    pub bindings: Vec<ChangeBinding>,
    pub heartbeat_interval: Duration,
    /// Events buffered before the relay waits on the consumer.
    pub channel_capacity: usize,
}

// =============================================================================
// Connect
// =============================================================================

/// Opens the socket, bounded by `connect_timeout`.
pub(crate) async fn connect(
    url: &Url,
    connect_timeout: Duration,
) -> RealtimeResult<WebSocketStream<MaybeTlsStream<TcpStream>>> {
    match timeout(connect_timeout, connect_async(url.as_str())).await {
        Ok(Ok((ws_stream, response))) => {
            debug!(status = ?response.status(), "WebSocket handshake complete");
            Ok(ws_stream)
        }
        Ok(Err(e)) => Err(RealtimeError::from(e)),
        Err(_) => Err(RealtimeError::Timeout(connect_timeout.as_secs())),
    }
}

// =============================================================================
// Relay
// =============================================================================

/// Why the relay loop ended.
enum Exit {
    Stopped,
    Closed,
    Failed(RealtimeError),
}

type Events = mpsc::Sender<RealtimeResult<OrderChange>>;

pub(crate) struct Relay<S> {
    ws: WebSocketStream<S>,
    config: RelayConfig,
    events: Events,
    status: watch::Sender<SubscriptionStatus>,
    stop: oneshot::Receiver<()>,
    next_ref: u64,
}

impl<S> Relay<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    pub(crate) fn new(
        ws: WebSocketStream<S>,
        config: RelayConfig,
        events: Events,
        status: watch::Sender<SubscriptionStatus>,
        stop: oneshot::Receiver<()>,
    ) -> Self {
        Relay {
            ws,
            config,
            events,
            status,
            stop,
            next_ref: 1,
        }
    }

    /// Joins the channel and relays until stopped or disconnected.
    pub(crate) async fn run(self) {
        let Relay {
            ws,
            config,
            events,
            status,
            mut stop,
            mut next_ref,
        } = self;
        let topic = config.topic.as_str();
        let mut take_ref = || {
            let r = next_ref;
            next_ref += 1;
            r
        };

        let (mut write, mut read) = ws.split();
        let join_ref = take_ref();
        let join = join_message(topic, &config.bindings, join_ref);
        let join_ref = join_ref.to_string();

        let exit = match send(&mut write, &join).await {
            Err(e) => Exit::Failed(e),
            Ok(()) => {
                let period = config.heartbeat_interval;
                let mut heartbeat = interval_at(Instant::now() + period, period);
                heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    tokio::select! {
                        _ = &mut stop => {
                            leave(&mut write, topic, take_ref()).await;
                            break Exit::Stopped;
                        }

                        _ = heartbeat.tick() => {
                            if let Err(e) = send(&mut write, &heartbeat_message(take_ref())).await {
                                break Exit::Failed(e);
                            }
                            debug!("Sent heartbeat");
                        }

                        frame = read.next() => {
                            let text = match frame {
                                None => break Exit::Closed,
                                Some(Err(e)) => break Exit::Failed(RealtimeError::from(e)),
                                Some(Ok(WsMessage::Text(text))) => text,
                                Some(Ok(WsMessage::Ping(data))) => {
                                    if let Err(e) = write.send(WsMessage::Pong(data)).await {
                                        break Exit::Failed(RealtimeError::from(e));
                                    }
                                    continue;
                                }
                                Some(Ok(WsMessage::Close(frame))) => {
                                    info!(?frame, "Received close frame");
                                    break Exit::Closed;
                                }
                                Some(Ok(_)) => continue,
                            };

                            let message = match PhoenixMessage::from_json(text.as_str()) {
                                Ok(m) => m,
                                Err(e) => {
                                    warn!(?e, "Ignoring malformed channel message");
                                    continue;
                                }
                            };

                            match message.classify(topic) {
                                Incoming::Reply { msg_ref, status: reply, response } => {
                                    if msg_ref.as_deref() != Some(join_ref.as_str()) {
                                        continue;
                                    }
                                    if reply != "ok" {
                                        let reason = response
                                            .get("reason")
                                            .and_then(|r| r.as_str())
                                            .map(str::to_string)
                                            .unwrap_or_else(|| response.to_string());
                                        break Exit::Failed(RealtimeError::JoinRejected {
                                            topic: topic.to_string(),
                                            reason,
                                        });
                                    }
                                    set_status(&status, topic, SubscriptionStatus::Joined);
                                }
                                Incoming::Change => {
                                    let change = decode_change(&message.payload);
                                    if let Err(ref e) = change {
                                        warn!(error = %e, "Malformed order change");
                                    }
                                    // A full buffer must not keep stop() waiting.
                                    tokio::select! {
                                        sent = events.send(change) => {
                                            if sent.is_err() {
                                                debug!("Subscriber gone, leaving channel");
                                                leave(&mut write, topic, take_ref()).await;
                                                break Exit::Stopped;
                                            }
                                        }
                                        _ = &mut stop => {
                                            leave(&mut write, topic, take_ref()).await;
                                            break Exit::Stopped;
                                        }
                                    }
                                }
                                Incoming::ChannelError => {
                                    break Exit::Failed(RealtimeError::ChannelError(topic.to_string()));
                                }
                                Incoming::ChannelClose => break Exit::Closed,
                                Incoming::Heartbeat => debug!("Heartbeat acknowledged"),
                                Incoming::Other => {
                                    debug!(event = %message.event, "Ignoring channel event");
                                }
                            }
                        }
                    }
                }
            }
        };

        match exit {
            Exit::Stopped | Exit::Closed => set_status(&status, topic, SubscriptionStatus::Closed),
            Exit::Failed(e) => {
                error!(topic = %topic, error = %e, "Subscription failed");
                set_status(&status, topic, SubscriptionStatus::Errored);
                tokio::select! {
                    _ = events.send(Err(e)) => {}
                    _ = &mut stop => {}
                }
            }
        }
        let _ = write.send(WsMessage::Close(None)).await;
        let _ = write.close().await;
    }
}

fn set_status(tx: &watch::Sender<SubscriptionStatus>, topic: &str, status: SubscriptionStatus) {
    let previous = tx.send_replace(status);
    if previous != status {
        info!(topic = %topic, %status, "Subscription status");
    }
}

async fn leave<S>(write: &mut SplitSink<WebSocketStream<S>, WsMessage>, topic: &str, msg_ref: u64)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if let Err(e) = send(write, &leave_message(topic, msg_ref)).await {
        debug!(?e, "Leave not delivered");
    }
}

async fn send<S>(
    write: &mut SplitSink<WebSocketStream<S>, WsMessage>,
    message: &PhoenixMessage,
) -> RealtimeResult<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let json = message.to_json()?;
    write.send(WsMessage::Text(json.into())).await?;
    Ok(())
}

/// Turns a `postgres_changes` payload into an [`OrderChange`].
pub(crate) fn decode_change(payload: &serde_json::Value) -> RealtimeResult<OrderChange> {
    let data = ChangeData::from_payload(payload)?;

    let new = match (data.kind, data.record) {
        (crate::protocol::ChangeKind::Delete, _) => None,
        (_, Some(record)) if !record.is_empty() => Some(
            serde_json::from_value(serde_json::Value::Object(record))
                .map_err(|e| RealtimeError::InvalidPayload(e.to_string()))?,
        ),
        (kind, _) => {
            return Err(RealtimeError::InvalidPayload(format!(
                "{kind} change without a record"
            )))
        }
    };
    let old = data
        .old_record
        .filter(|r| !r.is_empty())
        .map(serde_json::Value::Object);

    Ok(OrderChange {
        event_type: data.kind,
        new,
        old,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ChangeKind;
    use dinetab_core::OrderStatus;
    use serde_json::json;

    #[test]
    fn test_decode_insert() {
        let change = decode_change(&json!({"data": {
            "type": "INSERT",
            "record": {
                "id": "o-1",
                "table_id": 4,
                "items": [],
                "status": "pending",
                "payment_status": "unpaid",
                "total_amount": 0,
                "created_at": "2026-10-19T12:30:00.123456"
            },
            "old_record": {}
        }}))
        .unwrap();

        assert_eq!(change.event_type, ChangeKind::Insert);
        assert_eq!(change.new.unwrap().status, OrderStatus::Pending);
        assert!(change.old.is_none());
    }

    #[test]
    fn test_decode_delete_keeps_old_record() {
        let change = decode_change(&json!({"data": {
            "type": "DELETE",
            "record": {},
            "old_record": {"id": "o-1"}
        }}))
        .unwrap();
        assert!(change.new.is_none());
        assert_eq!(change.old, Some(json!({"id": "o-1"})));
    }

    #[test]
    fn test_decode_bad_record() {
        let err = decode_change(&json!({"data": {
            "type": "UPDATE",
            "record": {"id": "o-1", "status": "lost"}
        }}))
        .unwrap_err();
        assert!(matches!(err, RealtimeError::InvalidPayload(_)));
    }
}
