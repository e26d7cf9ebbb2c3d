//! Field Entities
//!
//! The two entity kinds that live on the field: crabs (autonomous movers)
//! and foods (static collectibles). Both are plain wire types; the field
//! server sends them camelCase inside a `state` snapshot, and the offline
//! simulators produce values of the same shape.

use serde::{Deserialize, Serialize};

use crate::coord::Position;

/// Facing direction of a crab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// North.
    N,
    /// East.
    E,
    /// South.
    S,
    /// West.
    W,
}

impl Direction {
    /// One clockwise rotation step, `N → E → S → W → N`.
    #[must_use]
    pub fn right(self) -> Self {
        match self {
            Self::N => Self::E,
            Self::E => Self::S,
            Self::S => Self::W,
            Self::W => Self::N,
        }
    }
}

/// An autonomous moving entity.
///
/// `name` is the stable identity: it survives every update and is the
/// rendering key, so it is never regenerated. Position and direction change
/// every mover tick; `hue` and `point` only change through an authoritative
/// snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crab {
    /// Stable unique identity.
    pub name: String,
    /// Body color hue, degrees.
    pub hue: f32,
    /// Score.
    pub point: i32,
    /// Current facing direction.
    pub direction: Direction,
    /// Current cell.
    pub position: Position,
}

/// A static collectible with a render-scale size.
///
/// Never mutated after creation; removed only by a wholesale roster replace
/// from an authoritative snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    /// Fresh unique id assigned at spawn.
    pub id: String,
    /// Cell the food occupies.
    pub position: Position,
    /// Render scale, `1..=food_size_max`.
    pub size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_turn_cycles_clockwise() {
        assert_eq!(Direction::N.right(), Direction::E);
        assert_eq!(Direction::E.right(), Direction::S);
        assert_eq!(Direction::S.right(), Direction::W);
        assert_eq!(Direction::W.right(), Direction::N);
    }

    #[test]
    fn crab_serializes_camel_case() {
        let crab = Crab {
            name: "crab-01".to_string(),
            hue: 120.0,
            point: 3,
            direction: Direction::N,
            position: Position::new(10, 4),
        };
        let json = serde_json::to_value(&crab).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "crab-01",
                "hue": 120.0,
                "point": 3,
                "direction": "N",
                "position": {"x": 10, "y": 4},
            })
        );
    }

    #[test]
    fn food_round_trips() {
        let food = Food {
            id: "f-1".to_string(),
            position: Position::new(1, 2),
            size: 3,
        };
        let json = serde_json::to_string(&food).unwrap();
        let back: Food = serde_json::from_str(&json).unwrap();
        assert_eq!(back, food);
    }
}
