//! In-Process Transport
//!
//! Direct channel-based transport for tests and embedded harnesses: the
//! "server" half is a pair of tokio channels handed back from
//! [`InProcessTransport::new_pair`]. The harness reads the client's
//! outbound messages from one and injects [`TransportEvent`]s (lifecycle or
//! payload) into the other.
//!
//! `connect()`/`disconnect()` inject their own lifecycle events, so a
//! freshly connected transport delivers [`TransportEvent::Connected`]
//! without harness involvement, the same way a real socket surfaces its
//! connect event.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::protocol::ClientMessage;

use super::traits::{FieldTransport, TransportError, TransportEvent};

const CHANNEL_CAPACITY: usize = 100;

/// In-process transport using tokio channels.
pub struct InProcessTransport {
    /// Outbound client messages, read by the harness.
    outgoing: mpsc::Sender<ClientMessage>,
    /// Inbound events, written by the harness (and by connect/disconnect).
    incoming: mpsc::Receiver<TransportEvent>,
    /// Clone of the inbound sender used to inject lifecycle events.
    lifecycle: mpsc::Sender<TransportEvent>,
    /// Connection state.
    connected: Arc<AtomicBool>,
}

impl InProcessTransport {
    /// Create a transport pair.
    ///
    /// Returns:
    /// - `InProcessTransport`: hand this to the synchronization client
    /// - `mpsc::Receiver<ClientMessage>`: the harness reads outbound
    ///   messages here
    /// - `mpsc::Sender<TransportEvent>`: the harness injects inbound
    ///   events here
    #[must_use]
    pub fn new_pair() -> (
        Self,
        mpsc::Receiver<ClientMessage>,
        mpsc::Sender<TransportEvent>,
    ) {
        let (outgoing, outgoing_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (incoming_tx, incoming) = mpsc::channel(CHANNEL_CAPACITY);

        let transport = Self {
            outgoing,
            incoming,
            lifecycle: incoming_tx.clone(),
            connected: Arc::new(AtomicBool::new(false)),
        };

        (transport, outgoing_rx, incoming_tx)
    }
}

#[async_trait]
impl FieldTransport for InProcessTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        self.connected.store(true, Ordering::SeqCst);
        self.lifecycle
            .send(TransportEvent::Connected)
            .await
            .map_err(|_| TransportError::ConnectionFailed("event channel closed".to_string()))
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        self.connected.store(false, Ordering::SeqCst);
        // Teardown path: the receiving side may already be gone.
        let _ = self.lifecycle.send(TransportEvent::Disconnected).await;
        Ok(())
    }

    async fn send(&mut self, message: ClientMessage) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::InvalidState(
                "transport not connected".to_string(),
            ));
        }
        self.outgoing
            .send(message)
            .await
            .map_err(|_| TransportError::SendFailed("channel closed".to_string()))
    }

    async fn recv(&mut self) -> Option<TransportEvent> {
        let event = self.incoming.recv().await?;
        match event {
            TransportEvent::Connected => self.connected.store(true, Ordering::SeqCst),
            TransportEvent::Disconnected => self.connected.store(false, Ordering::SeqCst),
            TransportEvent::Message(_) => {}
        }
        Some(event)
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
