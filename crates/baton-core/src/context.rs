use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key/value state threaded through a run.
///
/// The engine seeds `request.*` and `project.*` keys before the first stage,
/// then each stage sees everything written so far. Within a run the map only
/// grows: writes add or replace entries, nothing is removed, so any key
/// visible to one stage is visible to every later stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageContext {
    #[serde(flatten)]
    entries: BTreeMap<String, Value>,
}

impl StageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Merge every entry of `other` into `self`, replacing on key collision.
    pub fn absorb(&mut self, other: StageContext) {
        self.entries.extend(other.entries);
    }

    /// The whole context as a single JSON object, for handing to subprocesses.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}
