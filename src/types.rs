//! Core types for the state store.

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;

/// Application state: an insertion-ordered JSON object.
pub type State = Map<String, Value>;

/// A subset of state keys, merged onto the current snapshot.
pub type Partial = Map<String, Value>;

/// Convert an arbitrary JSON value into a partial update.
///
/// `null` spreads to nothing and yields an empty partial. Any other
/// non-object value is rejected.
pub fn into_partial(value: Value) -> Result<Partial> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Partial::new()),
        other => Err(StoreError::InvalidFormat(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// An immutable view of the store's state at one point in time.
///
/// Snapshots are shared: cloning one is an `Arc` clone, and no API hands
/// out mutable access to the state behind it.
#[derive(Clone, PartialEq)]
pub struct Snapshot(Arc<State>);

impl Snapshot {
    /// Freeze a state into a snapshot.
    ///
    /// The state is moved in, so every nested value is reachable only
    /// through the snapshot's shared reference from here on.
    pub fn freeze(state: State) -> Self {
        Snapshot(Arc::new(state))
    }

    /// The state as a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object((*self.0).clone())
    }

    /// Whether two snapshots are the same installed state.
    pub fn ptr_eq(a: &Snapshot, b: &Snapshot) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl Deref for Snapshot {
    type Target = State;

    fn deref(&self) -> &State {
        &self.0
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Snapshot({})", Value::Object((*self.0).clone()))
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl PartialEq<Value> for Snapshot {
    fn eq(&self, other: &Value) -> bool {
        match other {
            Value::Object(map) => *self.0 == *map,
            _ => false,
        }
    }
}

impl PartialEq<State> for Snapshot {
    fn eq(&self, other: &State) -> bool {
        *self.0 == *other
    }
}

/// Which storage area a store persists into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageType {
    /// Durable storage that outlives the process.
    #[default]
    LocalStorage,
    /// Storage scoped to the current session.
    SessionStorage,
}

impl StorageType {
    /// Name used in options and logs (`localStorage` / `sessionStorage`).
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::LocalStorage => "localStorage",
            StorageType::SessionStorage => "sessionStorage",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "localStorage" => Ok(StorageType::LocalStorage),
            "sessionStorage" => Ok(StorageType::SessionStorage),
            other => Err(StoreError::UnknownStorageType(other.to_string())),
        }
    }
}
