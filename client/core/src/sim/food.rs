//! Food Spawner
//!
//! Places a random food item once a second while the store holds fewer than
//! the configured cap. At the cap the tick is a silent no-op; nothing in
//! this core ever removes food except a wholesale replace from an
//! authoritative snapshot.
//!
//! The spawn range is 1-based (`[1, field_size]` per component), unlike
//! the 0-based decoration grid. Gameplay depends on the exact range; do
//! not normalize it.

use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::config::FieldConfig;
use crate::coord::Position;
use crate::entity::Food;
use crate::store::FieldStore;

/// Periodic task spawning food items up to the store's cap.
pub struct FoodSpawner {
    store: FieldStore,
    tick: Duration,
    food_size_max: u32,
    shutdown: watch::Receiver<bool>,
}

impl FoodSpawner {
    /// Create a spawner ticking at `config.food_tick`.
    #[must_use]
    pub fn new(store: FieldStore, config: &FieldConfig, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            store,
            tick: config.food_tick,
            food_size_max: config.food_size_max,
            shutdown,
        }
    }

    /// Run until the shutdown channel fires.
    pub async fn run(mut self) {
        tracing::debug!(tick_ms = self.tick.as_millis() as u64, "food spawner running");
        let mut interval = tokio::time::interval(self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = self.shutdown.changed() => break,
                _ = interval.tick() => self.spawn_one(),
            }
        }
        tracing::debug!("food spawner stopped");
    }

    fn spawn_one(&self) {
        let field_size = self.store.field_size();
        let mut rng = rand::thread_rng();
        let food = random_food(&mut rng, field_size, self.food_size_max);
        if self.store.try_spawn_food(food) {
            tracing::trace!("food spawned");
        }
    }
}

/// Roll a fresh food item: 1-based position, size in `[1, food_size_max]`,
/// fresh unique id.
pub fn random_food<R: Rng>(rng: &mut R, field_size: u32, food_size_max: u32) -> Food {
    Food {
        id: Uuid::new_v4().to_string(),
        position: Position::new(
            rng.gen_range(1..=field_size),
            rng.gen_range(1..=field_size),
        ),
        size: rng.gen_range(1..=food_size_max),
    }
}
