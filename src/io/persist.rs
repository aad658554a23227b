//! Whole-collection persistence over a [`KeyValueStore`].
//!
//! Stored values are JSON arrays. Anything else found under a key is
//! discarded (the key is removed) and treated as an empty collection.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::kv::KeyValueStore;
use crate::model::{Project, Section};

/// Outcome of reading one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded<T> {
    /// Nothing stored under the key
    Absent,
    /// A stored value existed but was not a usable array; it has been removed
    Discarded,
    Items(Vec<T>),
}

impl<T> Loaded<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Loaded::Items(items) => items,
            Loaded::Absent | Loaded::Discarded => Vec::new(),
        }
    }
}

/// Read and decode the collection under `key`, removing corrupt entries.
pub fn read_collection<T, S>(store: &mut S, key: &str) -> Loaded<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key) else {
        return Loaded::Absent;
    };

    let reason = match serde_json::from_str::<Value>(&raw) {
        Ok(value @ Value::Array(_)) => match serde_json::from_value::<Vec<T>>(value) {
            Ok(items) => return Loaded::Items(items),
            Err(e) => format!("malformed record: {}", e),
        },
        Ok(_) => "stored value is not an array".to_string(),
        Err(e) => format!("invalid JSON: {}", e),
    };

    tracing::warn!(key, %reason, "discarding corrupt stored collection");
    store.remove(key);
    Loaded::Discarded
}

/// Load a collection, treating absent and corrupt data as empty.
pub fn load<T, S>(store: &mut S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    read_collection(store, key).into_items()
}

/// Serialize the full collection and write it under `key`.
pub fn save<T, S>(store: &mut S, key: &str, items: &[T])
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    match serde_json::to_string(items) {
        Ok(json) => store.set(key, &json),
        Err(e) => tracing::warn!(key, error = %e, "could not serialize collection"),
    }
}

pub fn load_sections<S: KeyValueStore + ?Sized>(store: &mut S, key: &str) -> Vec<Section> {
    load(store, key)
}

/// Load projects, falling back to `seed` when nothing usable was stored.
/// An explicitly stored empty array stays empty.
pub fn load_projects<S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: &str,
    seed: impl FnOnce() -> Vec<Project>,
) -> Vec<Project> {
    match read_collection(store, key) {
        Loaded::Items(items) => items,
        Loaded::Absent | Loaded::Discarded => seed(),
    }
}
