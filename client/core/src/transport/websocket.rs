//! WebSocket Transport
//!
//! Remote transport speaking JSON text frames over WebSocket. A background
//! driver task owns the socket: it translates the socket lifecycle into
//! [`TransportEvent::Connected`]/[`TransportEvent::Disconnected`], decodes
//! inbound frames, and forwards outbound [`ClientMessage`]s.
//!
//! Reconnection lives here, at the transport level: when the socket drops
//! the driver waits a fixed delay and dials again (unless disabled). The
//! synchronization client above never retries; it only reacts to the
//! lifecycle events this transport emits.
//!
//! Frames that fail to decode are logged and dropped — malformed payloads
//! never surface as events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message;

use crate::protocol::{ClientMessage, ServerMessage};

use super::traits::{FieldTransport, TransportError, TransportEvent};

const CHANNEL_CAPACITY: usize = 100;

/// WebSocket transport configuration.
#[derive(Clone, Debug)]
pub struct WebSocketConfig {
    /// Server URL, e.g. `ws://localhost:8000/socket`.
    pub url: String,
    /// Whether to dial again after the socket drops.
    pub reconnect: bool,
    /// Delay between reconnection attempts.
    pub reconnect_delay: Duration,
}

impl WebSocketConfig {
    /// Create a configuration for `url` with reconnection enabled.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect: true,
            reconnect_delay: Duration::from_secs(2),
        }
    }

    /// Set the reconnection delay.
    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Disable reconnection; the transport finishes when the socket drops.
    #[must_use]
    pub fn without_reconnect(mut self) -> Self {
        self.reconnect = false;
        self
    }
}

/// Why a socket session ended.
enum SessionEnd {
    /// `disconnect()` was called or the transport handle was dropped.
    Shutdown,
    /// The peer closed or the socket failed.
    Dropped,
}

/// Client transport over WebSocket.
pub struct WebSocketTransport {
    config: WebSocketConfig,
    connected: Arc<AtomicBool>,
    events: Option<mpsc::Receiver<TransportEvent>>,
    outgoing: Option<mpsc::Sender<ClientMessage>>,
    shutdown: Option<watch::Sender<bool>>,
    driver: Option<JoinHandle<()>>,
}

impl WebSocketTransport {
    /// Create an unconnected transport.
    #[must_use]
    pub fn new(config: WebSocketConfig) -> Self {
        Self {
            config,
            connected: Arc::new(AtomicBool::new(false)),
            events: None,
            outgoing: None,
            shutdown: None,
            driver: None,
        }
    }
}

#[async_trait]
impl FieldTransport for WebSocketTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        if self.driver.is_some() {
            return Err(TransportError::InvalidState(
                "transport already connecting".to_string(),
            ));
        }

        let (events_tx, events_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (outgoing_tx, outgoing_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        self.events = Some(events_rx);
        self.outgoing = Some(outgoing_tx);
        self.shutdown = Some(shutdown_tx);
        self.driver = Some(tokio::spawn(drive(
            self.config.clone(),
            self.connected.clone(),
            events_tx,
            outgoing_rx,
            shutdown_rx,
        )));
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
        if let Some(driver) = self.driver.take() {
            let _ = driver.await;
        }
        self.events = None;
        self.outgoing = None;
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn send(&mut self, message: ClientMessage) -> Result<(), TransportError> {
        let Some(outgoing) = &self.outgoing else {
            return Err(TransportError::InvalidState(
                "transport not connected".to_string(),
            ));
        };
        outgoing
            .send(message)
            .await
            .map_err(|_| TransportError::SendFailed("driver gone".to_string()))
    }

    async fn recv(&mut self) -> Option<TransportEvent> {
        self.events.as_mut()?.recv().await
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Socket driver: dial, pump frames, reconnect per config.
async fn drive(
    config: WebSocketConfig,
    connected: Arc<AtomicBool>,
    events: mpsc::Sender<TransportEvent>,
    mut outgoing: mpsc::Receiver<ClientMessage>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let stream = tokio::select! {
            _ = shutdown.changed() => return,
            result = connect_async(config.url.as_str()) => match result {
                Ok((stream, _response)) => stream,
                Err(e) => {
                    tracing::warn!(url = %config.url, error = %e, "websocket connect failed");
                    if !config.reconnect {
                        return;
                    }
                    tokio::select! {
                        _ = shutdown.changed() => return,
                        () = sleep(config.reconnect_delay) => continue,
                    }
                }
            },
        };

        connected.store(true, Ordering::SeqCst);
        tracing::info!(url = %config.url, "websocket connected");
        if events.send(TransportEvent::Connected).await.is_err() {
            return;
        }

        let (mut sink, mut source) = stream.split();
        let reason = loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    let _ = sink.send(Message::Close(None)).await;
                    break SessionEnd::Shutdown;
                }
                message = outgoing.recv() => match message {
                    Some(message) => match serde_json::to_string(&message) {
                        Ok(text) => {
                            if sink.send(Message::Text(text)).await.is_err() {
                                break SessionEnd::Dropped;
                            }
                        }
                        Err(e) => tracing::warn!(error = %e, "failed to encode outbound message"),
                    },
                    None => break SessionEnd::Shutdown,
                },
                frame = source.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ServerMessage>(&text) {
                            Ok(message) => {
                                let _ = events.send(TransportEvent::Message(message)).await;
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "dropping malformed server frame");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break SessionEnd::Dropped,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "websocket read failed");
                        break SessionEnd::Dropped;
                    }
                },
            }
        };

        connected.store(false, Ordering::SeqCst);
        tracing::info!(url = %config.url, "websocket disconnected");
        let _ = events.send(TransportEvent::Disconnected).await;

        match reason {
            SessionEnd::Shutdown => return,
            SessionEnd::Dropped => {
                if !config.reconnect {
                    return;
                }
                tokio::select! {
                    _ = shutdown.changed() => return,
                    () = sleep(config.reconnect_delay) => {}
                }
            }
        }
    }
}
