//! Crab Mover
//!
//! Every tick, each crab independently either advances one cell in its
//! facing direction or turns one clockwise step, never both. A crab that
//! can advance does so with the configured probability; a crab at the
//! boundary blocking its facing always turns. All crabs are stepped from
//! the same pre-tick roster snapshot.
//!
//! The can-advance bounds are deliberately asymmetric: `< field_size` at
//! the upper bound, `> 1` at the lower bound. Gameplay depends on these
//! exact comparisons; do not normalize them.

use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::config::FieldConfig;
use crate::coord::Position;
use crate::entity::{Crab, Direction};
use crate::store::FieldStore;

/// Periodic task stepping every crab in the roster.
pub struct CrabMover {
    store: FieldStore,
    tick: Duration,
    advance_probability: f64,
    shutdown: watch::Receiver<bool>,
}

impl CrabMover {
    /// Create a mover ticking at `config.crab_tick`.
    #[must_use]
    pub fn new(store: FieldStore, config: &FieldConfig, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            store,
            tick: config.crab_tick,
            advance_probability: config.advance_probability,
            shutdown,
        }
    }

    /// Run until the shutdown channel fires.
    pub async fn run(mut self) {
        tracing::debug!(tick_ms = self.tick.as_millis() as u64, "crab mover running");
        let mut interval = tokio::time::interval(self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = self.shutdown.changed() => break,
                _ = interval.tick() => self.step_all(),
            }
        }
        tracing::debug!("crab mover stopped");
    }

    fn step_all(&self) {
        let field_size = self.store.field_size();
        let advance_probability = self.advance_probability;
        let mut rng = rand::thread_rng();
        self.store
            .mutate_crabs(|crab| step_crab(crab, field_size, advance_probability, rng.gen()));
    }
}

/// One simulation step for a single crab, driven by an explicit random
/// draw in `[0, 1)`.
///
/// Advances when the crab can advance and `roll < advance_probability`,
/// otherwise turns one clockwise step. A crab that cannot advance turns
/// regardless of the draw.
#[must_use]
pub fn step_crab(crab: &Crab, field_size: u32, advance_probability: f64, roll: f64) -> Crab {
    if can_advance(crab, field_size) && roll < advance_probability {
        advance(crab)
    } else {
        turn(crab)
    }
}

fn can_advance(crab: &Crab, field_size: u32) -> bool {
    match crab.direction {
        Direction::N => crab.position.x < field_size,
        Direction::E => crab.position.y < field_size,
        Direction::S => crab.position.x > 1,
        Direction::W => crab.position.y > 1,
    }
}

fn advance(crab: &Crab) -> Crab {
    let Position { x, y } = crab.position;
    let position = match crab.direction {
        Direction::N => Position::new(x + 1, y),
        Direction::E => Position::new(x, y + 1),
        Direction::S => Position::new(x - 1, y),
        Direction::W => Position::new(x, y - 1),
    };
    Crab {
        position,
        ..crab.clone()
    }
}

fn turn(crab: &Crab) -> Crab {
    Crab {
        direction: crab.direction.right(),
        ..crab.clone()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const FIELD: u32 = 30;
    const P: f64 = 0.8;

    fn crab(direction: Direction, x: u32, y: u32) -> Crab {
        Crab {
            name: "c".to_string(),
            hue: 0.0,
            point: 0,
            direction,
            position: Position::new(x, y),
        }
    }

    #[test]
    fn advances_on_a_low_roll_when_clear() {
        let stepped = step_crab(&crab(Direction::N, 5, 5), FIELD, P, 0.2);
        assert_eq!(stepped.position, Position::new(6, 5));
        assert_eq!(stepped.direction, Direction::N);
    }

    #[test]
    fn turns_on_a_high_roll_when_clear() {
        let stepped = step_crab(&crab(Direction::N, 5, 5), FIELD, P, 0.9);
        assert_eq!(stepped.position, Position::new(5, 5));
        assert_eq!(stepped.direction, Direction::E);
    }

    #[test]
    fn blocked_crab_always_turns_regardless_of_the_roll() {
        // N is blocked at x == field_size.
        for roll in [0.0, 0.5, 0.79, 0.99] {
            let stepped = step_crab(&crab(Direction::N, FIELD, 5), FIELD, P, roll);
            assert_eq!(stepped.position, Position::new(FIELD, 5));
            assert_eq!(stepped.direction, Direction::E);
        }
    }

    #[test]
    fn boundary_checks_are_asymmetric() {
        // Upper bound: advance allowed strictly below field_size.
        assert_eq!(
            step_crab(&crab(Direction::N, FIELD - 1, 5), FIELD, P, 0.0).position,
            Position::new(FIELD, 5)
        );
        assert_eq!(
            step_crab(&crab(Direction::E, 5, FIELD - 1), FIELD, P, 0.0).position,
            Position::new(5, FIELD)
        );
        // Lower bound: advance allowed strictly above 1.
        assert_eq!(
            step_crab(&crab(Direction::S, 2, 5), FIELD, P, 0.0).position,
            Position::new(1, 5)
        );
        assert_eq!(
            step_crab(&crab(Direction::S, 1, 5), FIELD, P, 0.0).direction,
            Direction::W
        );
        assert_eq!(
            step_crab(&crab(Direction::W, 5, 1), FIELD, P, 0.0).direction,
            Direction::N
        );
    }

    #[test]
    fn a_crab_below_the_lower_bound_turns_without_underflow() {
        let stepped = step_crab(&crab(Direction::S, 0, 5), FIELD, P, 0.0);
        assert_eq!(stepped.position, Position::new(0, 5));
        assert_eq!(stepped.direction, Direction::W);
    }

    #[test]
    fn four_turns_restore_the_direction_with_position_unchanged() {
        let start = crab(Direction::N, FIELD, FIELD);
        let mut current = start.clone();
        // advance_probability 0 forces a turn on every step.
        for _ in 0..4 {
            current = step_crab(&current, FIELD, 0.0, 0.5);
        }
        assert_eq!(current, start);
    }

    #[test]
    fn step_never_changes_identity_hue_or_point() {
        let mut subject = crab(Direction::E, 3, 3);
        subject.hue = 42.0;
        subject.point = 7;
        for roll in [0.0, 0.99] {
            let stepped = step_crab(&subject, FIELD, P, roll);
            assert_eq!(stepped.name, subject.name);
            assert_eq!(stepped.hue, subject.hue);
            assert_eq!(stepped.point, subject.point);
        }
    }
}
