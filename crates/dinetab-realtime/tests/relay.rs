//! End-to-end relay tests over an in-memory WebSocket pair.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dinetab_backend::client::BackendClient;
use dinetab_backend::config::RealtimeSettings;
use dinetab_core::OrderStatus;
use dinetab_realtime::{
    forward_to, ChangeKind, OrderFeed, RealtimeError, Subscription, SubscriptionStatus,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::io::DuplexStream;
use tokio_tungstenite::tungstenite::protocol::Role;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

type Server = WebSocketStream<DuplexStream>;

async fn pair(settings: RealtimeSettings) -> (Subscription, Server) {
    let (client_io, server_io) = tokio::io::duplex(64 * 1024);
    let client = WebSocketStream::from_raw_socket(client_io, Role::Client, None).await;
    let server = WebSocketStream::from_raw_socket(server_io, Role::Server, None).await;
    (OrderFeed::new(settings).attach(client), server)
}

async fn recv_json(server: &mut Server) -> Value {
    loop {
        match server.next().await {
            Some(Ok(Message::Text(text))) => return serde_json::from_str(text.as_str()).unwrap(),
            Some(Ok(_)) => continue,
            other => panic!("socket ended: {other:?}"),
        }
    }
}

async fn send_json(server: &mut Server, value: Value) {
    server
        .send(Message::Text(value.to_string().into()))
        .await
        .unwrap();
}

/// Reads the join and accepts it.
async fn accept_join(server: &mut Server) -> Value {
    let join = recv_json(server).await;
    send_json(
        server,
        json!({
            "topic": join["topic"],
            "event": "phx_reply",
            "payload": {"status": "ok", "response": {"postgres_changes": [{"id": 1}]}},
            "ref": join["ref"]
        }),
    )
    .await;
    join
}

fn change(kind: &str, record: Value, old_record: Value) -> Value {
    json!({
        "topic": "realtime:orders-channel",
        "event": "postgres_changes",
        "payload": {
            "ids": [1],
            "data": {
                "type": kind,
                "schema": "public",
                "table": "orders",
                "commit_timestamp": "2026-10-19T12:30:01Z",
                "record": record,
                "old_record": old_record
            }
        },
        "ref": null
    })
}

fn order(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "table_id": 4,
        "items": [{"id": 12, "name": "Tajine", "quantity": 1, "price": 85.5}],
        "status": status,
        "payment_status": "unpaid",
        "total_amount": 85.5,
        "created_at": "2026-10-19T12:30:00.5+00:00"
    })
}

#[tokio::test]
async fn test_join_then_relay_changes() {
    let (mut subscription, mut server) = pair(RealtimeSettings::default()).await;
    assert_eq!(subscription.status(), SubscriptionStatus::Connecting);

    let join = accept_join(&mut server).await;
    assert_eq!(
        join,
        json!({
            "topic": "realtime:orders-channel",
            "event": "phx_join",
            "payload": {"config": {"postgres_changes": [
                {"event": "*", "schema": "public", "table": "orders"}
            ]}},
            "ref": "1"
        })
    );

    let mut status = subscription.status_changes();
    status
        .wait_for(|s| *s == SubscriptionStatus::Joined)
        .await
        .unwrap();

    send_json(&mut server, change("INSERT", order("o-1", "pending"), json!({}))).await;
    send_json(
        &mut server,
        change("UPDATE", order("o-1", "ready"), json!({"id": "o-1"})),
    )
    .await;

    let inserted = subscription.next().await.unwrap().unwrap();
    assert_eq!(inserted.event_type, ChangeKind::Insert);
    assert_eq!(inserted.new.as_ref().unwrap().id.as_str(), "o-1");
    assert!(inserted.old.is_none());

    let updated = subscription.next().await.unwrap().unwrap();
    assert_eq!(updated.event_type, ChangeKind::Update);
    assert_eq!(updated.new.unwrap().status, OrderStatus::Ready);
    assert_eq!(updated.old, Some(json!({"id": "o-1"})));
}

#[tokio::test]
async fn test_undecodable_change_does_not_end_stream() {
    let (mut subscription, mut server) = pair(RealtimeSettings::default()).await;
    accept_join(&mut server).await;

    send_json(&mut server, change("INSERT", json!({"id": "o-2", "status": "lost"}), json!({}))).await;
    send_json(&mut server, change("DELETE", json!({}), json!({"id": "o-3"}))).await;

    let bad = subscription.next().await.unwrap();
    assert!(matches!(bad, Err(RealtimeError::InvalidPayload(_))));

    let deleted = subscription.next().await.unwrap().unwrap();
    assert_eq!(deleted.event_type, ChangeKind::Delete);
    assert!(deleted.new.is_none());
    assert_eq!(deleted.old.unwrap()["id"], "o-3");
}

#[tokio::test]
async fn test_rejected_join() {
    let (mut subscription, mut server) = pair(RealtimeSettings::default()).await;
    let join = recv_json(&mut server).await;
    send_json(
        &mut server,
        json!({
            "topic": "realtime:orders-channel",
            "event": "phx_reply",
            "payload": {"status": "error", "response": {"reason": "Invalid JWT"}},
            "ref": join["ref"]
        }),
    )
    .await;

    match subscription.next().await {
        Some(Err(RealtimeError::JoinRejected { topic, reason })) => {
            assert_eq!(topic, "realtime:orders-channel");
            assert_eq!(reason, "Invalid JWT");
        }
        other => panic!("expected rejected join, got {other:?}"),
    }
    assert!(subscription.next().await.is_none());
    assert_eq!(subscription.status(), SubscriptionStatus::Errored);
}

#[tokio::test]
async fn test_stop_leaves_channel() {
    let (subscription, mut server) = pair(RealtimeSettings::default()).await;
    let join = accept_join(&mut server).await;

    subscription.stop().await;

    let leave = recv_json(&mut server).await;
    assert_eq!(leave["event"], "phx_leave");
    assert_eq!(leave["topic"], join["topic"]);
    assert_ne!(leave["ref"], join["ref"]);

    loop {
        match server.next().await {
            Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
            Some(Ok(_)) => continue,
        }
    }
}

#[tokio::test]
async fn test_stop_with_full_event_buffer() {
    let settings = RealtimeSettings {
        channel_capacity: 1,
        ..Default::default()
    };
    let (subscription, mut server) = pair(settings).await;
    let join = accept_join(&mut server).await;
    let mut status = subscription.status_changes();
    status
        .wait_for(|s| *s == SubscriptionStatus::Joined)
        .await
        .unwrap();

    // Nothing reads: the first change fills the buffer, the relay blocks on the second.
    for id in ["o-1", "o-2", "o-3"] {
        send_json(&mut server, change("INSERT", order(id, "pending"), json!({}))).await;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    tokio::time::timeout(Duration::from_secs(5), subscription.stop())
        .await
        .expect("stop returned while the relay was blocked on a full buffer");

    let leave = recv_json(&mut server).await;
    assert_eq!(leave["event"], "phx_leave");
    assert_eq!(leave["topic"], join["topic"]);
}

#[tokio::test]
async fn test_server_close_ends_stream() {
    let (mut subscription, mut server) = pair(RealtimeSettings::default()).await;
    accept_join(&mut server).await;

    server.close(None).await.unwrap();

    assert!(subscription.next().await.is_none());
    assert_eq!(subscription.status(), SubscriptionStatus::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_on_phoenix_topic() {
    let settings = RealtimeSettings {
        heartbeat_interval_secs: 30,
        ..Default::default()
    };
    let (_subscription, mut server) = pair(settings).await;
    accept_join(&mut server).await;

    let started = tokio::time::Instant::now();
    let beat = recv_json(&mut server).await;
    assert_eq!(beat["topic"], "phoenix");
    assert_eq!(beat["event"], "heartbeat");
    assert!(started.elapsed() >= Duration::from_secs(30));
}

#[tokio::test]
async fn test_callback_adapter() {
    let (subscription, mut server) = pair(RealtimeSettings::default()).await;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut subscription = forward_to(subscription, move |change| {
        sink.lock().unwrap().push(change.event_type);
    });

    accept_join(&mut server).await;
    send_json(&mut server, change("INSERT", order("o-1", "pending"), json!({}))).await;
    send_json(&mut server, change("UPDATE", json!({"id": "o-1"}), json!({}))).await;
    send_json(&mut server, change("DELETE", json!({}), json!({"id": "o-1"}))).await;
    server.close(None).await.unwrap();

    subscription
        .status_changes()
        .wait_for(|s| *s == SubscriptionStatus::Closed)
        .await
        .unwrap();
    assert!(subscription.next().await.is_none());
    subscription.stop().await;
    assert_eq!(
        *seen.lock().unwrap(),
        vec![ChangeKind::Insert, ChangeKind::Delete]
    );
}

#[tokio::test]
async fn test_subscribe_requires_initialized_client() {
    let client = BackendClient::new();
    let err = OrderFeed::subscribe(&client).await.unwrap_err();
    assert!(err.is_not_initialized());
}
