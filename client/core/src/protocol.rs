//! Wire Protocol
//!
//! Named events exchanged with the field server over a persistent,
//! bidirectional message channel. Every message is a JSON envelope
//! `{"event": <name>, "data": <payload>}`:
//!
//! | Event  | Direction       | Payload                |
//! |--------|-----------------|------------------------|
//! | `get`  | client → server | none                   |
//! | `state`| server → client | full [`StateSnapshot`] |
//!
//! Transport-level `connect`/`disconnect` have no payload and are surfaced
//! as [`crate::transport::TransportEvent`] variants rather than wire
//! messages. A `state` payload is a full authoritative replace, never an
//! incremental merge.

use serde::{Deserialize, Serialize};

use crate::coord::Position;
use crate::entity::{Crab, Food};

/// Messages sent from the client to the field server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Request a full state snapshot. Zero payload; sent immediately after
    /// every transport-level connect.
    Get,
}

/// Messages pushed from the field server to the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Full authoritative replace of all tracked state.
    State(StateSnapshot),
}

/// The complete authoritative field state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    /// Grid dimension, cells per side.
    pub size: u32,
    /// Full crab roster.
    pub crabs: Vec<Crab>,
    /// Full food roster.
    pub foods: Vec<Food>,
    /// Painted cell claims. The server always sends the list; an absent
    /// field is treated as empty and still rebuilds the paint overlay.
    #[serde(default)]
    pub paints: Vec<PaintClaim>,
}

impl StateSnapshot {
    /// Whether the snapshot can address any cell at all. Snapshots failing
    /// this are dropped wholesale, keeping prior state.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.size >= 1
    }
}

/// A single painted cell claim inside a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintClaim {
    /// The claimed cell.
    pub position: Position,
    /// Hue the cell was painted with, degrees.
    pub hue: f32,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn get_serializes_as_named_event_without_payload() {
        let json = serde_json::to_value(&ClientMessage::Get).unwrap();
        assert_eq!(json, serde_json::json!({"event": "get"}));
    }

    #[test]
    fn state_parses_a_server_payload() {
        let raw = r#"{
            "event": "state",
            "data": {
                "size": 30,
                "crabs": [
                    {"name": "crab-01", "hue": 120.0, "point": 2,
                     "direction": "E", "position": {"x": 3, "y": 4}}
                ],
                "foods": [
                    {"id": "food-1", "position": {"x": 9, "y": 9}, "size": 2}
                ],
                "paints": [
                    {"position": {"x": 1, "y": 1}, "hue": 120.0}
                ]
            }
        }"#;
        let ServerMessage::State(snapshot) = serde_json::from_str(raw).unwrap();

        assert_eq!(snapshot.size, 30);
        assert_eq!(snapshot.crabs.len(), 1);
        assert_eq!(snapshot.crabs[0].name, "crab-01");
        assert_eq!(snapshot.foods[0].id, "food-1");
        assert_eq!(snapshot.paints[0].position, Position::new(1, 1));
    }

    #[test]
    fn missing_paints_defaults_to_empty() {
        let raw = r#"{"event": "state", "data": {"size": 10, "crabs": [], "foods": []}}"#;
        let ServerMessage::State(snapshot) = serde_json::from_str(raw).unwrap();
        assert!(snapshot.paints.is_empty());
        assert!(snapshot.is_valid());
    }

    #[test]
    fn zero_size_snapshot_is_invalid() {
        let snapshot = StateSnapshot {
            size: 0,
            crabs: vec![],
            foods: vec![],
            paints: vec![],
        };
        assert!(!snapshot.is_valid());
    }

    #[test]
    fn malformed_state_fails_to_parse() {
        let raw = r#"{"event": "state", "data": {"crabs": [], "foods": []}}"#;
        assert!(serde_json::from_str::<ServerMessage>(raw).is_err());
    }
}
