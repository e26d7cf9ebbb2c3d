//! Crabfield Core - Headless Client State Core for the Crabfield Game
//!
//! This crate provides the state-synchronization and simulation core for the
//! crabfield game client, completely independent of any rendering framework.
//! It can drive a web view, a TUI, or run headless for testing/automation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Render Projection                        │
//! │        (external: reads field state every frame)             │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ reads
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │                         FieldStore                           │
//! │   field size · crabs · foods · decoration map · paint map    │
//! └───────┬──────────────────────────────────────────┬───────────┘
//!         │ writes (online mode)                     │ writes (offline mode)
//! ┌───────┴───────────┐                  ┌───────────┴───────────┐
//! │    SyncClient     │                  │     SimulatorSet      │
//! │  connect / get /  │                  │  decoration painter   │
//! │  state snapshots  │                  │  food spawner         │
//! └───────┬───────────┘                  │  crab mover           │
//!         │                              └───────────────────────┘
//! ┌───────┴───────────┐
//! │  FieldTransport   │
//! │ (in-process / ws) │
//! └───────────────────┘
//! ```
//!
//! Exactly one mode's writers are mounted at a time: either the
//! [`SyncClient`] applies authoritative snapshots pushed by a field server,
//! or the three [`sim`] tasks produce state of the same shape locally.
//! Neither defers to the other, so mounting both is a wiring error.
//!
//! # Key Types
//!
//! - [`FieldStore`]: Shared field state, single writer per mode, many readers
//! - [`SyncClient`]: Connection lifecycle and snapshot application
//! - [`SimulatorSet`]: The three offline-mode background tasks
//! - [`OverlayCache`]: Capacity-bounded, insertion-ordered cell coloring
//! - [`StateSnapshot`]: The full authoritative `state` payload
//!
//! # Quick Start (offline mode)
//!
//! ```ignore
//! use crabfield_core::{FieldConfig, FieldStore, SimulatorSet};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = FieldConfig::default();
//!     let store = FieldStore::new(&config);
//!     let sims = SimulatorSet::start(store.clone(), config);
//!
//!     // Render loop: read the store each frame
//!     store.read(|state| {
//!         for crab in state.crabs() { /* draw */ }
//!     });
//!
//!     sims.stop().await;
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`coord`]: Grid positions and the canonical cell key encoding
//! - [`overlay`]: Bounded FIFO overlay caches and color formatting
//! - [`entity`]: Crab and food entities and the facing direction
//! - [`store`]: The shared field state container
//! - [`config`]: Configuration (defaults, env, TOML file)
//! - [`protocol`]: Wire messages exchanged with the field server
//! - [`transport`]: Client transport abstraction and implementations
//! - [`sync`]: The synchronization client
//! - [`sim`]: The offline-mode simulators
//!
//! # No Rendering Dependencies
//!
//! This crate has **zero** dependencies on any UI or drawing framework.
//! The render projection is an external collaborator that only reads.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod coord;
pub mod entity;
pub mod overlay;
pub mod protocol;
pub mod sim;
pub mod store;
pub mod sync;
pub mod transport;

pub use config::{ConfigError, FieldConfig};
pub use coord::{ParsePositionError, Position};
pub use entity::{Crab, Direction, Food};
pub use overlay::OverlayCache;
pub use protocol::{ClientMessage, PaintClaim, ServerMessage, StateSnapshot};
pub use sim::{CrabMover, DecorationPainter, FoodSpawner, SimulatorSet};
pub use store::{FieldState, FieldStore};
pub use sync::{SyncClient, SyncState};
pub use transport::{FieldTransport, InProcessTransport, TransportError, TransportEvent};
