//! # Realtime Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Realtime Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Setup          │  │   Transport     │  │     Channel             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Backend        │  │  Connection     │  │  JoinRejected           │ │
//! │  │  InvalidUrl     │  │  Timeout, Tls   │  │  ChannelError           │ │
//! │  │                 │  │  WebSocket      │  │  Protocol               │ │
//! │  │                 │  │  Closed         │  │  InvalidPayload         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use dinetab_backend::BackendError;
use thiserror::Error;

/// Result type alias for realtime operations.
pub type RealtimeResult<T> = Result<T, RealtimeError>;

#[derive(Debug, Error)]
pub enum RealtimeError {
    // =========================================================================
    // Setup
    // =========================================================================
    /// The backend client could not provide connection settings.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The Realtime endpoint could not be derived from the backend URL.
    #[error("Invalid realtime URL: {0}")]
    InvalidUrl(String),

    // =========================================================================
    // Transport
    // =========================================================================
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection timeout after {0} seconds")]
    Timeout(u64),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// The socket was closed by the server.
    #[error("Realtime connection closed")]
    Closed,

    // =========================================================================
    // Channel
    // =========================================================================
    /// The server refused to join the channel.
    #[error("Join of {topic} rejected: {reason}")]
    JoinRejected { topic: String, reason: String },

    /// The server reported the channel as crashed.
    #[error("Channel {0} errored")]
    ChannelError(String),

    /// A frame was not a valid channel message.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A change arrived whose record does not decode as an order.
    #[error("Invalid change payload: {0}")]
    InvalidPayload(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<tokio_tungstenite::tungstenite::Error> for RealtimeError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        use tokio_tungstenite::tungstenite::Error as WsError;
        match err {
            WsError::ConnectionClosed | WsError::AlreadyClosed => RealtimeError::Closed,
            WsError::Io(io) => RealtimeError::ConnectionFailed(io.to_string()),
            WsError::Tls(tls) => RealtimeError::Tls(tls.to_string()),
            WsError::Url(url) => RealtimeError::InvalidUrl(url.to_string()),
            other => RealtimeError::WebSocket(other.to_string()),
        }
    }
}

impl From<url::ParseError> for RealtimeError {
    fn from(err: url::ParseError) -> Self {
        RealtimeError::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for RealtimeError {
    fn from(err: serde_json::Error) -> Self {
        RealtimeError::Protocol(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl RealtimeError {
    /// True when the client was never initialized; nothing touched the network.
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, RealtimeError::Backend(e) if e.is_not_initialized())
    }

    /// True when the socket itself failed or went away.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            RealtimeError::ConnectionFailed(_)
                | RealtimeError::Timeout(_)
                | RealtimeError::Tls(_)
                | RealtimeError::WebSocket(_)
                | RealtimeError::Closed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_tungstenite::tungstenite::Error as WsError;

    #[test]
    fn test_not_initialized_passes_through() {
        let err = RealtimeError::from(BackendError::NotInitialized);
        assert!(err.is_not_initialized());
        assert!(!err.is_connection_error());
        assert_eq!(err.to_string(), BackendError::NotInitialized.to_string());
    }

    #[test]
    fn test_tungstenite_conversion() {
        assert!(matches!(
            RealtimeError::from(WsError::ConnectionClosed),
            RealtimeError::Closed
        ));
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = RealtimeError::from(WsError::Io(io));
        assert!(err.is_connection_error());
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn test_join_rejected_display() {
        let err = RealtimeError::JoinRejected {
            topic: "realtime:orders-channel".into(),
            reason: "Unauthorized".into(),
        };
        assert_eq!(
            err.to_string(),
            "Join of realtime:orders-channel rejected: Unauthorized"
        );
    }
}
