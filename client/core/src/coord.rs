//! Grid Coordinate Model
//!
//! Cells of the square game field are addressed by [`Position`]. The
//! canonical string form `"x,y"` (via [`std::fmt::Display`]) is the identity
//! of an overlay entry at the render boundary: two positions produce the same
//! key iff they are equal, and the format is stable.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A cell on the game field.
///
/// Equality is component-wise. Grid-addressed producers keep both components
/// in `[0, field_size)`; the food spawner uses a 1-based range instead (see
/// [`crate::sim::FoodSpawner`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column index.
    pub x: u32,
    /// Row index.
    pub y: u32,
}

impl Position {
    /// Create a position from its components.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Canonical cell key, `"x,y"`.
    ///
    /// Injective over all positions; parseable back via [`FromStr`].
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Errors that can occur when parsing a cell key back into a [`Position`].
#[derive(Debug, Error)]
pub enum ParsePositionError {
    /// The key did not contain exactly one `,` separator.
    #[error("expected \"x,y\", got {0:?}")]
    Malformed(String),
    /// A component was not an unsigned integer.
    #[error("invalid coordinate component: {0}")]
    Component(#[from] ParseIntError),
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((x, y)) = s.split_once(',') else {
            return Err(ParsePositionError::Malformed(s.to_string()));
        };
        if y.contains(',') {
            return Err(ParsePositionError::Malformed(s.to_string()));
        }
        Ok(Self {
            x: x.parse()?,
            y: y.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn key_is_injective_over_a_full_grid() {
        let mut keys = HashSet::new();
        for x in 0..30 {
            for y in 0..30 {
                assert!(keys.insert(Position::new(x, y).key()));
            }
        }
        assert_eq!(keys.len(), 900);
    }

    #[test]
    fn key_round_trips_through_parse() {
        for position in [
            Position::new(0, 0),
            Position::new(1, 29),
            Position::new(12, 7),
        ] {
            let parsed: Position = position.key().parse().unwrap();
            assert_eq!(parsed, position);
        }
    }

    #[test]
    fn parse_rejects_malformed_keys() {
        assert!("12".parse::<Position>().is_err());
        assert!("1,2,3".parse::<Position>().is_err());
        assert!("a,2".parse::<Position>().is_err());
        assert!("1,-2".parse::<Position>().is_err());
        assert!(String::new().parse::<Position>().is_err());
    }

    #[test]
    fn equality_is_component_wise() {
        assert_eq!(Position::new(3, 4), Position::new(3, 4));
        assert_ne!(Position::new(3, 4), Position::new(4, 3));
    }
}
