//! Inbound message shapes.
//!
//! Every line from the server is one JSON document: either a bare string
//! signal (`"END_INIT"`, `"END"`) or an object whose `message` field holds
//! the payload for the current phase.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::world::{GameObject, ObjectBatch, ObjectId, TurnDelta};

/// Sent once the init phase has delivered every object.
pub const END_INIT_SIGNAL: &str = "END_INIT";

/// Sent instead of a turn when the game is over.
pub const END_SIGNAL: &str = "END";

/// A decoded line: a control signal or a payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Signal(String),
    Message { message: T },
}

/// First message of the game: which tank is ours.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Handshake {
    #[serde(rename = "your-tank-id")]
    pub your_tank_id: ObjectId,
    #[serde(rename = "enemy-tank-id")]
    pub enemy_tank_id: ObjectId,
}

/// One init-phase batch of objects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InitPayload {
    #[serde(default, deserialize_with = "lenient_batch")]
    pub updated_objects: ObjectBatch,
}

/// One turn's changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TurnPayload {
    #[serde(default)]
    pub deleted_objects: Vec<ObjectId>,
    #[serde(default, deserialize_with = "lenient_batch")]
    pub updated_objects: ObjectBatch,
}

impl From<TurnPayload> for TurnDelta {
    fn from(payload: TurnPayload) -> Self {
        TurnDelta {
            deleted_ids: payload.deleted_objects,
            updated_objects: payload.updated_objects,
        }
    }
}

/// Decodes an object map record by record. A record that does not decode,
/// for instance one with a type code or powerup name we do not know, is
/// logged and left out instead of failing the whole message.
fn lenient_batch<'de, D>(deserializer: D) -> Result<ObjectBatch, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<ObjectId, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(id, value)| match GameObject::deserialize(value) {
            Ok(object) => Some((id, object)),
            Err(e) => {
                log::warn!("skipping object '{}': {}", id, e);
                None
            }
        })
        .collect())
}

/// Parses a single line into an envelope carrying payload type `T`.
pub fn parse_message<T: DeserializeOwned>(line: &str) -> Result<Envelope<T>, serde_json::Error> {
    serde_json::from_str(line.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::ObjectType;

    #[test]
    fn parses_handshake() {
        let env: Envelope<Handshake> =
            parse_message(r#"{"message": {"your-tank-id": "tank-1", "enemy-tank-id": "tank-2"}}"#)
                .unwrap();
        assert_eq!(
            env,
            Envelope::Message {
                message: Handshake {
                    your_tank_id: "tank-1".into(),
                    enemy_tank_id: "tank-2".into()
                }
            }
        );
    }

    #[test]
    fn parses_signals() {
        let env: Envelope<InitPayload> = parse_message("\"END_INIT\"\n").unwrap();
        assert_eq!(env, Envelope::Signal(END_INIT_SIGNAL.to_string()));
        let env: Envelope<TurnPayload> = parse_message("\"END\"").unwrap();
        assert_eq!(env, Envelope::Signal(END_SIGNAL.to_string()));
    }

    #[test]
    fn parses_turn_payload() {
        let line = r#"{"message": {"deleted_objects": ["b1"], "updated_objects": {
            "w1": {"type": 3, "position": [10, 20]},
            "cb": {"type": 6, "position": [[0, 0], [100, 100]], "velocity": [1, 1]}
        }}}"#;
        let env: Envelope<TurnPayload> = parse_message(line).unwrap();
        let Envelope::Message { message } = env else {
            panic!("expected a payload");
        };
        let delta = TurnDelta::from(message);
        assert_eq!(delta.deleted_ids, vec!["b1".to_string()]);
        assert_eq!(delta.updated_objects["w1"].kind(), ObjectType::Wall);
        assert_eq!(delta.updated_objects["cb"].points().len(), 2);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let env: Envelope<TurnPayload> = parse_message(r#"{"message": {}}"#).unwrap();
        let Envelope::Message { message } = env else {
            panic!("expected a payload");
        };
        assert!(message.deleted_objects.is_empty());
        assert!(message.updated_objects.is_empty());
    }

    #[test]
    fn unknown_records_are_skipped() {
        let line = r#"{"message": {"deleted_objects": [], "updated_objects": {
            "laser": {"type": 9, "position": [1, 1]},
            "p1": {"type": 7, "position": [5, 5], "powerup_type": "INVISIBILITY"},
            "w1": {"type": 3, "position": [10, 20]}
        }}}"#;
        let env: Envelope<TurnPayload> = parse_message(line).unwrap();
        let Envelope::Message { message } = env else {
            panic!("expected a payload");
        };
        assert_eq!(message.updated_objects.len(), 1);
        assert_eq!(message.updated_objects["w1"].kind(), ObjectType::Wall);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_message::<TurnPayload>("{not json").is_err());
        assert!(parse_message::<TurnPayload>("42").is_err());
    }
}
