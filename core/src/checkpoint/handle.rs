use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CheckpointError;

use super::CheckpointRecord;

/// The view of a stanza's checkpoint handed to business logic: the previous record,
/// read-only, and the opaque state that will be saved when the run ends.
#[derive(Debug, Clone, Default)]
pub struct CheckpointHandle {
    previous: Option<CheckpointRecord>,
    state: serde_json::Value,
}

impl CheckpointHandle {
    pub fn new(previous: Option<CheckpointRecord>) -> Self {
        let state = previous
            .as_ref()
            .map(|r| r.state.clone())
            .unwrap_or(serde_json::Value::Null);
        Self { previous, state }
    }

    pub fn previous(&self) -> Option<&CheckpointRecord> {
        self.previous.as_ref()
    }

    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        self.previous.as_ref().and_then(|r| r.last_run)
    }

    pub fn state(&self) -> &serde_json::Value {
        &self.state
    }

    pub fn set_state(&mut self, state: serde_json::Value) {
        self.state = state;
    }

    /// Reads one key of an object-shaped state.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.state
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Writes one key, turning a non-object state into an object.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), CheckpointError> {
        let value = serde_json::to_value(value).map_err(CheckpointError::Serialize)?;
        if !self.state.is_object() {
            self.state = serde_json::Value::Object(serde_json::Map::new());
        }
        if let Some(map) = self.state.as_object_mut() {
            map.insert(key.to_string(), value);
        }
        Ok(())
    }

    pub(crate) fn into_state(self) -> serde_json::Value {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn starts_from_previous_state() {
        let previous = CheckpointRecord {
            state: json!({"cursor": 42}),
            ..CheckpointRecord::default()
        };
        let mut handle = CheckpointHandle::new(Some(previous));
        assert_eq!(handle.get::<u64>("cursor"), Some(42));

        handle.set("cursor", 43u64).unwrap();
        handle.set("etag", "abc").unwrap();
        assert_eq!(handle.into_state(), json!({"cursor": 43, "etag": "abc"}));
    }

    #[test]
    fn set_replaces_non_object_state() {
        let mut handle = CheckpointHandle::new(None);
        assert!(handle.state().is_null());
        handle.set("k", true).unwrap();
        assert_eq!(handle.get::<bool>("k"), Some(true));
    }
}
