//! Test doubles shared by the unit tests of this crate.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::client::{Backend, BackendClient, Clock};
use crate::config::BackendSettings;
use crate::error::{BackendError, BackendResult};
use crate::query::Query;

pub fn settings() -> BackendSettings {
    BackendSettings::new("https://abcd1234.supabase.co", "test-anon-key").unwrap()
}

/// Records every query and answers from a script, `[]` once it runs dry.
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<Query>>,
    responses: Mutex<VecDeque<BackendResult<Value>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, rows: Value) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(rows));
        self
    }

    pub fn fail(&self, err: BackendError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<Query> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Query {
        self.calls.lock().unwrap().last().cloned().expect("no calls recorded")
    }
}

#[async_trait]
impl Backend for RecordingBackend {
    async fn execute(&self, query: Query) -> BackendResult<Value> {
        self.calls.lock().unwrap().push(query);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Value::Array(Vec::new())))
    }
}

/// Clock that moves forward by `step` every time it is read.
pub struct SteppingClock {
    now: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    pub fn starting_at(y: i32, m: u32, d: u32, h: u32, min: u32, step: Duration) -> Self {
        SteppingClock {
            now: Mutex::new(Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut now = self.now.lock().unwrap();
        let current = *now;
        *now = current + self.step;
        current
    }
}

/// An initialized client wired to a fresh recording backend.
pub fn client() -> (BackendClient, Arc<RecordingBackend>) {
    let backend = Arc::new(RecordingBackend::new());
    let client = BackendClient::new().with_clock(SteppingClock::starting_at(
        2026,
        10,
        19,
        9,
        0,
        Duration::hours(1),
    ));
    client
        .init_with(settings(), Arc::clone(&backend) as Arc<dyn Backend>)
        .unwrap();
    (client, backend)
}

// =============================================================================
// One-shot HTTP server
// =============================================================================

/// Serves one canned HTTP/1.1 response on a local port.
///
/// Returns the base URL and a handle yielding the raw request text.
pub async fn serve_once(status: &str, body: &str) -> (String, tokio::task::JoinHandle<String>) {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            if request_complete(&request) {
                break;
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{addr}"), handle)
}

/// Headers read and `Content-Length` bytes of body received.
fn request_complete(request: &[u8]) -> bool {
    let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
    let body_len = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    request.len() >= end + 4 + body_len
}
