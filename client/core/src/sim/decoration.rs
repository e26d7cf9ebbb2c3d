//! Decoration Painter
//!
//! Ambient, purely cosmetic cell coloring. Every tick picks a uniformly
//! random cell in `[0, field_size)²` and a random low-opacity color and
//! upserts it into the decoration overlay, whose FIFO capacity keeps the
//! map bounded no matter how long the painter runs.

use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::config::FieldConfig;
use crate::coord::Position;
use crate::overlay::decoration_color;
use crate::store::FieldStore;

/// Periodic task coloring random cells of the decoration overlay.
pub struct DecorationPainter {
    store: FieldStore,
    tick: Duration,
    shutdown: watch::Receiver<bool>,
}

impl DecorationPainter {
    /// Create a painter ticking at `config.decoration_tick`.
    #[must_use]
    pub fn new(store: FieldStore, config: &FieldConfig, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            store,
            tick: config.decoration_tick,
            shutdown,
        }
    }

    /// Run until the shutdown channel fires.
    pub async fn run(mut self) {
        tracing::debug!(tick_ms = self.tick.as_millis() as u64, "decoration painter running");
        let mut interval = tokio::time::interval(self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = self.shutdown.changed() => break,
                _ = interval.tick() => self.paint_one(),
            }
        }
        tracing::debug!("decoration painter stopped");
    }

    fn paint_one(&self) {
        let field_size = self.store.field_size();
        let mut rng = rand::thread_rng();
        let position = Position::new(
            rng.gen_range(0..field_size),
            rng.gen_range(0..field_size),
        );
        self.store.decorate(position, decoration_color(&mut rng));
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn painted_cells_stay_on_the_grid() {
        let mut rng = StdRng::seed_from_u64(11);
        let field_size = 10;
        for _ in 0..500 {
            let position = Position::new(
                rng.gen_range(0..field_size),
                rng.gen_range(0..field_size),
            );
            assert!(position.x < field_size);
            assert!(position.y < field_size);
        }
    }

    #[tokio::test]
    async fn a_thousand_ticks_on_a_30_grid_never_exceed_the_full_grid_bound() {
        let config = FieldConfig::default().with_decoration_ratio(1.0);
        let store = FieldStore::new(&config);
        let (_tx, rx) = watch::channel(false);
        let painter = DecorationPainter::new(store.clone(), &config, rx);

        for _ in 0..1000 {
            painter.paint_one();
        }
        store.read(|state| {
            assert!(state.decoration().len() <= 900);
            assert!(!state.decoration().is_empty());
        });
    }

    #[tokio::test]
    async fn repeated_painting_never_exceeds_the_decoration_capacity() {
        let config = FieldConfig::for_testing();
        let store = FieldStore::new(&config);
        let (_tx, rx) = watch::channel(false);
        let painter = DecorationPainter::new(store.clone(), &config, rx);

        let capacity = config.decoration_capacity();
        for _ in 0..capacity * 10 {
            painter.paint_one();
        }
        store.read(|state| {
            assert!(state.decoration().len() <= capacity);
        });
    }
}
