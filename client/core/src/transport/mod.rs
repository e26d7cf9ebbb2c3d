//! Transport Layer
//!
//! Abstraction over the persistent, bidirectional message channel between
//! the client core and a field server:
//!
//! - [`InProcessTransport`]: direct channel communication for tests and
//!   embedded harnesses
//! - `WebSocketTransport`: remote connection over WebSocket (behind the
//!   `websocket` cargo feature)
//!
//! A transport surfaces its own lifecycle (`connect`/`disconnect`) and
//! decoded payloads as a single stream of [`TransportEvent`]s. Reconnection,
//! if any, is the transport's own behavior; the synchronization client
//! never retries at its layer. Frames that fail to decode are logged and
//! dropped inside the transport, so malformed payloads never reach the
//! store.

pub mod in_process;
pub mod traits;
#[cfg(feature = "websocket")]
pub mod websocket;

pub use in_process::InProcessTransport;
pub use traits::{FieldTransport, TransportError, TransportEvent};
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConfig, WebSocketTransport};
