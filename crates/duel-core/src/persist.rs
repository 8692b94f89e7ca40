//! Persisted session state: encoding, versioned decoding, and the store seam.
//!
//! The state is stored as a single JSON document under [`STATE_KEY`].
//! Decoding walks an ordered list of recognizers, newest shape first; each
//! one accepts a single historical shape and produces a current
//! [`SessionState`]. A document no recognizer accepts is treated as absent.

use std::collections::HashMap;
use std::convert::Infallible;

use serde_json::Value;
use thiserror::Error;

use crate::item::Item;
use crate::phase::Phase;
use crate::session::SessionState;

/// Key under which the session state is stored.
pub const STATE_KEY: &str = "elo-ranking-state";

/// Errors that can occur when encoding session state.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to encode session state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Shape a persisted document was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateShape {
    /// `{"items": [...], "phase": "..."}`
    Current,
    /// A bare array of items with no phase and possibly no game counts.
    LegacyArray,
}

type Recognizer = fn(&Value) -> Option<SessionState>;

/// Known shapes, newest first.
const RECOGNIZERS: &[(StateShape, Recognizer)] = &[
    (StateShape::Current, from_current),
    (StateShape::LegacyArray, from_legacy_array),
];

/// Serializes a session snapshot to its persisted JSON form.
pub fn encode_state(state: &SessionState) -> Result<String, PersistError> {
    Ok(serde_json::to_string(state)?)
}

/// Decodes a persisted document, upgrading older shapes.
///
/// Returns `None` for unparseable JSON or an unrecognized shape.
pub fn decode_state(text: &str) -> Option<(SessionState, StateShape)> {
    let value: Value = serde_json::from_str(text).ok()?;
    RECOGNIZERS
        .iter()
        .find_map(|(shape, recognize)| recognize(&value).map(|state| (state, *shape)))
}

fn from_current(value: &Value) -> Option<SessionState> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

fn from_legacy_array(value: &Value) -> Option<SessionState> {
    if !value.is_array() {
        return None;
    }
    let items: Vec<Item> = serde_json::from_value(value.clone()).ok()?;
    Some(SessionState {
        items,
        phase: Phase::Elimination,
    })
}

/// Key-value blob store the session snapshot is written to.
///
/// The core never calls a store itself; the driving layer loads once at
/// start and saves after every state change.
pub trait StateStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the value stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Stores `value` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), Self::Error>;
}

/// In-memory [`StateStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    type Error = Infallible;

    fn load(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> SessionState {
        SessionState {
            items: vec![
                Item {
                    id: 1,
                    url: "/q/1.png".to_string(),
                    rating: 1516.0,
                    games_played: 1,
                },
                Item {
                    id: 2,
                    url: "/q/2.png".to_string(),
                    rating: 1484.0,
                    games_played: 1,
                },
            ],
            phase: Phase::Finals,
        }
    }

    #[test]
    fn test_encode_produces_current_shape() {
        let text = encode_state(&sample_state()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["phase"], "finals");
        assert_eq!(value["items"][0]["gamesPlayed"], 1);
        assert_eq!(value["items"][1]["rating"], 1484.0);
    }

    #[test]
    fn test_decode_current_shape() {
        let text = encode_state(&sample_state()).unwrap();
        let (state, shape) = decode_state(&text).unwrap();

        assert_eq!(shape, StateShape::Current);
        assert_eq!(state, sample_state());
    }

    #[test]
    fn test_decode_current_shape_without_phase() {
        let text = r#"{"items": [{"id": 1, "url": "a", "rating": 1500, "gamesPlayed": 2}]}"#;
        let (state, shape) = decode_state(text).unwrap();

        assert_eq!(shape, StateShape::Current);
        assert_eq!(state.phase, Phase::Elimination);
        assert_eq!(state.items[0].games_played, 2);
    }

    #[test]
    fn test_decode_legacy_bare_array() {
        let text = r#"[
            {"id": 1, "url": "a", "elo": 1516},
            {"id": 2, "url": "b", "elo": 1484}
        ]"#;
        let (state, shape) = decode_state(text).unwrap();

        assert_eq!(shape, StateShape::LegacyArray);
        assert_eq!(state.phase, Phase::Elimination);
        assert!(state.items.iter().all(|i| i.games_played == 0));
        assert_eq!(state.items[0].rating, 1516.0);
    }

    #[test]
    fn test_decode_unrecognized_shape_is_absent() {
        assert!(decode_state(r#"{"images": []}"#).is_none());
        assert!(decode_state(r#"{"items": [], "phase": "semifinals"}"#).is_none());
        assert!(decode_state(r#""just a string""#).is_none());
        assert!(decode_state("not json").is_none());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load(STATE_KEY).unwrap(), None);

        store.save(STATE_KEY, "one").unwrap();
        store.save(STATE_KEY, "two").unwrap();
        assert_eq!(store.load(STATE_KEY).unwrap(), Some("two".to_string()));

        store.remove(STATE_KEY).unwrap();
        store.remove(STATE_KEY).unwrap();
        assert_eq!(store.load(STATE_KEY).unwrap(), None);
    }
}
