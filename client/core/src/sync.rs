//! Synchronization Client
//!
//! Owns the connection lifecycle and is the sole writer of truth while
//! online: every inbound `state` snapshot wholesale-replaces the tracked
//! state, and each transport-level connect immediately requests a fresh
//! snapshot with a zero-payload `get`.
//!
//! # State machine
//!
//! `Disconnected → Connecting → Connected → Disconnected` (cycle). Between
//! `Connected` and the first snapshot the store may still be empty; readers
//! must tolerate that. A disconnect leaves the store as last known —
//! stale-but-displayed, never cleared.
//!
//! # Teardown
//!
//! [`SyncClient::stop`] signals the task, awaits it, and disconnects the
//! transport; no store write is observable after it returns. Snapshot
//! application itself is atomic (one store lock), so a message being
//! applied when stop is signalled either lands fully before teardown or
//! not at all.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::protocol::{ClientMessage, ServerMessage, StateSnapshot};
use crate::store::FieldStore;
use crate::transport::{FieldTransport, TransportEvent};

/// Connection state of the synchronization client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    /// No connection; either never connected or dropped.
    Disconnected,
    /// Connection initiated, transport-level connect not yet reported.
    Connecting,
    /// Connection up; snapshots are being applied as they arrive.
    Connected,
}

/// Handle over the running synchronization task.
pub struct SyncClient {
    state: Arc<RwLock<SyncState>>,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SyncClient {
    /// Spawn the synchronization task over `transport`, writing into
    /// `store`.
    ///
    /// The local simulators must not be mounted against the same store
    /// while this client runs.
    #[must_use]
    pub fn spawn<T>(store: FieldStore, transport: T) -> Self
    where
        T: FieldTransport + 'static,
    {
        let state = Arc::new(RwLock::new(SyncState::Disconnected));
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = SyncTask {
            store,
            transport,
            state: state.clone(),
            shutdown: shutdown_rx,
        };
        let handle = tokio::spawn(task.run());
        Self {
            state,
            shutdown,
            handle,
        }
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> SyncState {
        *self.state.read()
    }

    /// Whether the client is currently connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state() == SyncState::Connected
    }

    /// Stop the client and tear the transport down. No store write is
    /// observable after this returns.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}

struct SyncTask<T> {
    store: FieldStore,
    transport: T,
    state: Arc<RwLock<SyncState>>,
    shutdown: watch::Receiver<bool>,
}

impl<T: FieldTransport> SyncTask<T> {
    async fn run(mut self) {
        *self.state.write() = SyncState::Connecting;
        if let Err(e) = self.transport.connect().await {
            tracing::warn!(error = %e, "transport connect failed");
            *self.state.write() = SyncState::Disconnected;
            return;
        }

        loop {
            tokio::select! {
                _ = self.shutdown.changed() => break,
                event = self.transport.recv() => match event {
                    Some(TransportEvent::Connected) => self.on_connect().await,
                    Some(TransportEvent::Disconnected) => {
                        *self.state.write() = SyncState::Disconnected;
                        tracing::info!("field server disconnected, keeping last known state");
                    }
                    Some(TransportEvent::Message(ServerMessage::State(snapshot))) => {
                        self.apply(snapshot);
                    }
                    None => {
                        *self.state.write() = SyncState::Disconnected;
                        break;
                    }
                },
            }
        }

        if let Err(e) = self.transport.disconnect().await {
            tracing::debug!(error = %e, "transport disconnect failed during teardown");
        }
        *self.state.write() = SyncState::Disconnected;
    }

    async fn on_connect(&mut self) {
        *self.state.write() = SyncState::Connected;
        tracing::info!("field server connected, requesting full state");
        if let Err(e) = self.transport.send(ClientMessage::Get).await {
            tracing::warn!(error = %e, "failed to request initial state");
        }
    }

    fn apply(&self, snapshot: StateSnapshot) {
        if !snapshot.is_valid() {
            tracing::warn!(size = snapshot.size, "ignoring invalid state snapshot");
            return;
        }
        tracing::debug!(
            size = snapshot.size,
            crabs = snapshot.crabs.len(),
            foods = snapshot.foods.len(),
            paints = snapshot.paints.len(),
            "applying state snapshot"
        );
        self.store.apply_snapshot(snapshot);
    }
}
