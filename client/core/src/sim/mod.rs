//! Offline-Mode Simulators
//!
//! Three independent, identically shaped background tasks that stand in for
//! the field server when no connection is mounted, producing state of the
//! same shape as an authoritative feed:
//!
//! - [`DecorationPainter`]: colors a random cell every tick
//! - [`FoodSpawner`]: places a random food item while under the cap
//! - [`CrabMover`]: advances or turns every crab each tick
//!
//! Each task is a fixed-interval loop (`tokio::time::interval` with
//! [`tokio::time::MissedTickBehavior::Skip`]) doing one bounded unit of work
//! per tick, with no internal state beyond its next random draw. All three
//! share one shutdown channel: [`SimulatorSet::stop`] signals it and awaits
//! every task, so no mutation is observable after it returns.
//!
//! Simulators and the synchronization client must never write concurrently;
//! mounting one mode at a time is the caller's wiring decision.

mod crab;
mod decoration;
mod food;

pub use crab::{step_crab, CrabMover};
pub use decoration::DecorationPainter;
pub use food::FoodSpawner;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::FieldConfig;
use crate::store::FieldStore;

/// Handle over the three running simulator tasks.
pub struct SimulatorSet {
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl SimulatorSet {
    /// Spawn the decoration painter, food spawner, and crab mover against
    /// `store`, ticking at the intervals in `config`.
    #[must_use]
    pub fn start(store: FieldStore, config: &FieldConfig) -> Self {
        let (shutdown, _) = watch::channel(false);
        tracing::info!(
            field_size = config.field_size,
            decoration_tick_ms = config.decoration_tick.as_millis() as u64,
            food_tick_ms = config.food_tick.as_millis() as u64,
            crab_tick_ms = config.crab_tick.as_millis() as u64,
            "starting simulators"
        );

        let handles = vec![
            tokio::spawn(
                DecorationPainter::new(store.clone(), config, shutdown.subscribe()).run(),
            ),
            tokio::spawn(FoodSpawner::new(store.clone(), config, shutdown.subscribe()).run()),
            tokio::spawn(CrabMover::new(store, config, shutdown.subscribe()).run()),
        ];

        Self { shutdown, handles }
    }

    /// Stop all three tasks. After this returns no further mutation from
    /// any simulator is observable.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        for handle in self.handles {
            let _ = handle.await;
        }
        tracing::info!("simulators stopped");
    }
}
