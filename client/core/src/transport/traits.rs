//! Transport Traits
//!
//! The client-side trait every transport implements, plus the event and
//! error types shared by all implementations.

use async_trait::async_trait;
use thiserror::Error;

use crate::protocol::{ClientMessage, ServerMessage};

/// Lifecycle and payload events surfaced by a transport, in arrival order.
#[derive(Clone, Debug, PartialEq)]
pub enum TransportEvent {
    /// The underlying connection was established (or re-established).
    Connected,
    /// The underlying connection dropped.
    Disconnected,
    /// A decoded server payload arrived.
    Message(ServerMessage),
}

/// Errors that can occur during transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connecting to the peer failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    /// The connection is gone.
    #[error("connection closed")]
    ConnectionClosed,
    /// Sending a message failed.
    #[error("send failed: {0}")]
    SendFailed(String),
    /// Message encoding/decoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
    /// The transport was not in the expected state for the operation.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// IO error from the underlying transport.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Client-side transport to a field server.
///
/// Implementations own the connection mechanics; the synchronization client
/// only sees the [`TransportEvent`] stream.
#[async_trait]
pub trait FieldTransport: Send {
    /// Begin establishing the connection.
    ///
    /// Connection success is reported asynchronously as
    /// [`TransportEvent::Connected`], not by this call returning.
    async fn connect(&mut self) -> Result<(), TransportError>;

    /// Tear the connection down. No event is delivered after this returns.
    async fn disconnect(&mut self) -> Result<(), TransportError>;

    /// Send a message to the server.
    async fn send(&mut self, message: ClientMessage) -> Result<(), TransportError>;

    /// Next lifecycle or payload event, `None` once the transport is
    /// finished for good.
    async fn recv(&mut self) -> Option<TransportEvent>;

    /// Whether the underlying connection is currently up.
    fn is_connected(&self) -> bool;
}
