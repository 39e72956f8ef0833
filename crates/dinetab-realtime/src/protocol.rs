//! # Realtime Channel Protocol
//!
//! Phoenix channel envelopes as spoken by the backend's Realtime service
//! (serializer `vsn=1.0.0`, one JSON object per text frame).
//!
//! ## Message Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Orders Channel Messages                            │
//! │                                                                         │
//! │  JOIN                                                                  │
//! │  ────                                                                  │
//! │  client ───► { topic: "realtime:orders-channel", event: "phx_join",    │
//! │                payload: { config: { postgres_changes: [               │
//! │                  { event: "*", schema: "public", table: "orders" } ]}},│
//! │                ref: "1" }                                              │
//! │  server ───► { event: "phx_reply", ref: "1",                           │
//! │                payload: { status: "ok" | "error", response: {..} } }   │
//! │                                                                         │
//! │  CHANGES                                                               │
//! │  ───────                                                               │
//! │  server ───► { event: "postgres_changes",                              │
//! │                payload: { data: { type: "INSERT"|"UPDATE"|"DELETE",    │
//! │                                   record, old_record, ... } } }        │
//! │                                                                         │
//! │  KEEPALIVE                                                             │
//! │  ─────────                                                             │
//! │  client ───► { topic: "phoenix", event: "heartbeat", payload: {} }     │
//! │                                                                         │
//! │  LEAVE                                                                 │
//! │  ─────                                                                 │
//! │  client ───► { topic: "realtime:orders-channel", event: "phx_leave" }  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use url::Url;

use crate::error::{RealtimeError, RealtimeResult};

/// Serializer version requested in the socket URL.
pub const PROTOCOL_VSN: &str = "1.0.0";

/// Topic the order feed joins.
pub const ORDERS_TOPIC: &str = "realtime:orders-channel";

/// Topic heartbeats are sent on.
pub const PHOENIX_TOPIC: &str = "phoenix";

// =============================================================================
// Event Names
// =============================================================================

pub mod event {
    pub const JOIN: &str = "phx_join";
    pub const LEAVE: &str = "phx_leave";
    pub const REPLY: &str = "phx_reply";
    pub const ERROR: &str = "phx_error";
    pub const CLOSE: &str = "phx_close";
    pub const HEARTBEAT: &str = "heartbeat";
    pub const POSTGRES_CHANGES: &str = "postgres_changes";
}

// =============================================================================
// Envelope
// =============================================================================

/// One channel message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoenixMessage {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub msg_ref: Option<String>,
}

impl PhoenixMessage {
    pub fn new(topic: &str, event: &str, payload: Value, msg_ref: impl ToString) -> Self {
        PhoenixMessage {
            topic: topic.to_string(),
            event: event.to_string(),
            payload,
            msg_ref: Some(msg_ref.to_string()),
        }
    }

    pub fn to_json(&self) -> RealtimeResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> RealtimeResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Interprets the message as seen from a channel joined on `topic`.
    pub fn classify(&self, topic: &str) -> Incoming {
        if self.topic == PHOENIX_TOPIC {
            return Incoming::Heartbeat;
        }
        if self.topic != topic {
            return Incoming::Other;
        }
        match self.event.as_str() {
            event::REPLY => {
                let status = self
                    .payload
                    .get("status")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Incoming::Reply {
                    msg_ref: self.msg_ref.clone(),
                    status,
                    response: self.payload.get("response").cloned().unwrap_or(Value::Null),
                }
            }
            event::POSTGRES_CHANGES => Incoming::Change,
            event::ERROR => Incoming::ChannelError,
            event::CLOSE => Incoming::ChannelClose,
            _ => Incoming::Other,
        }
    }
}

/// What an incoming message means for the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    /// Reply to a message we sent, e.g. the join.
    Reply {
        msg_ref: Option<String>,
        status: String,
        response: Value,
    },
    /// A row change on the subscribed table.
    Change,
    ChannelError,
    ChannelClose,
    /// Heartbeat acknowledgement.
    Heartbeat,
    /// Presence, system notices, other topics.
    Other,
}

// =============================================================================
// Outgoing Messages
// =============================================================================

/// A `postgres_changes` binding in the join config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeBinding {
    /// `*`, `INSERT`, `UPDATE` or `DELETE`.
    pub event: String,
    pub schema: String,
    pub table: String,
    /// Row filter such as `status=eq.pending`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl ChangeBinding {
    /// Every change on the `orders` table.
    pub fn all_orders() -> Self {
        ChangeBinding {
            event: "*".to_string(),
            schema: "public".to_string(),
            table: "orders".to_string(),
            filter: None,
        }
    }
}

pub fn join_message(topic: &str, bindings: &[ChangeBinding], msg_ref: u64) -> PhoenixMessage {
    PhoenixMessage::new(
        topic,
        event::JOIN,
        json!({ "config": { "postgres_changes": bindings } }),
        msg_ref,
    )
}

pub fn leave_message(topic: &str, msg_ref: u64) -> PhoenixMessage {
    PhoenixMessage::new(topic, event::LEAVE, json!({}), msg_ref)
}

pub fn heartbeat_message(msg_ref: u64) -> PhoenixMessage {
    PhoenixMessage::new(PHOENIX_TOPIC, event::HEARTBEAT, json!({}), msg_ref)
}

// =============================================================================
// Change Payload
// =============================================================================

/// Row change type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            ChangeKind::Insert => "INSERT",
            ChangeKind::Update => "UPDATE",
            ChangeKind::Delete => "DELETE",
        })
    }
}

/// `payload.data` of a `postgres_changes` message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChangeData {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    #[serde(default)]
    pub schema: String,
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub commit_timestamp: Option<String>,
    #[serde(default)]
    pub record: Option<Map<String, Value>>,
    #[serde(default)]
    pub old_record: Option<Map<String, Value>>,
}

impl ChangeData {
    /// Extracts the change from a `postgres_changes` payload.
    pub fn from_payload(payload: &Value) -> RealtimeResult<Self> {
        let data = payload
            .get("data")
            .ok_or_else(|| RealtimeError::InvalidPayload("missing data".to_string()))?;
        ChangeData::deserialize(data).map_err(|e| RealtimeError::InvalidPayload(e.to_string()))
    }
}

// =============================================================================
// Socket URL
// =============================================================================

/// `wss://<host>/realtime/v1/websocket?apikey=<key>&vsn=1.0.0` for a backend
/// reached at `base_url`.
pub fn socket_url(base_url: &str, anon_key: &str) -> RealtimeResult<Url> {
    let mut url = Url::parse(base_url.trim_end_matches('/'))?;
    let scheme = match url.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => {
            return Err(RealtimeError::InvalidUrl(format!(
                "unsupported scheme `{other}`"
            )))
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| RealtimeError::InvalidUrl(base_url.to_string()))?;

    let path = format!("{}/realtime/v1/websocket", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.query_pairs_mut()
        .clear()
        .append_pair("apikey", anon_key)
        .append_pair("vsn", PROTOCOL_VSN);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_message_wire_shape() {
        let msg = join_message(ORDERS_TOPIC, &[ChangeBinding::all_orders()], 1);
        let wire: Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(
            wire,
            json!({
                "topic": "realtime:orders-channel",
                "event": "phx_join",
                "payload": {"config": {"postgres_changes": [
                    {"event": "*", "schema": "public", "table": "orders"}
                ]}},
                "ref": "1"
            })
        );
    }

    #[test]
    fn test_heartbeat_topic() {
        let msg = heartbeat_message(7);
        assert_eq!(msg.topic, "phoenix");
        assert_eq!(msg.event, "heartbeat");
        assert_eq!(msg.msg_ref.as_deref(), Some("7"));
    }

    #[test]
    fn test_classify() {
        let reply = PhoenixMessage::from_json(
            r#"{"topic":"realtime:orders-channel","event":"phx_reply","payload":{"status":"ok","response":{}},"ref":"1"}"#,
        )
        .unwrap();
        assert_eq!(
            reply.classify(ORDERS_TOPIC),
            Incoming::Reply {
                msg_ref: Some("1".into()),
                status: "ok".into(),
                response: json!({}),
            }
        );

        let ack = PhoenixMessage::from_json(
            r#"{"topic":"phoenix","event":"phx_reply","payload":{"status":"ok"},"ref":"2"}"#,
        )
        .unwrap();
        assert_eq!(ack.classify(ORDERS_TOPIC), Incoming::Heartbeat);

        let presence = PhoenixMessage::from_json(
            r#"{"topic":"realtime:orders-channel","event":"presence_state","payload":{},"ref":null}"#,
        )
        .unwrap();
        assert_eq!(presence.classify(ORDERS_TOPIC), Incoming::Other);
    }

    #[test]
    fn test_change_data() {
        let payload = json!({
            "ids": [1],
            "data": {
                "type": "DELETE",
                "schema": "public",
                "table": "orders",
                "commit_timestamp": "2026-10-19T12:00:00Z",
                "old_record": {"id": "o-1"}
            }
        });
        let data = ChangeData::from_payload(&payload).unwrap();
        assert_eq!(data.kind, ChangeKind::Delete);
        assert!(data.record.is_none());
        assert_eq!(data.old_record.unwrap()["id"], "o-1");

        assert!(matches!(
            ChangeData::from_payload(&json!({"ids": []})),
            Err(RealtimeError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_socket_url() {
        let url = socket_url("https://abcd1234.supabase.co/", "anon").unwrap();
        assert_eq!(
            url.as_str(),
            "wss://abcd1234.supabase.co/realtime/v1/websocket?apikey=anon&vsn=1.0.0"
        );

        let local = socket_url("http://localhost:54321", "anon").unwrap();
        assert_eq!(local.scheme(), "ws");
        assert_eq!(local.port(), Some(54321));

        assert!(socket_url("ftp://example.com", "anon").is_err());
    }
}
