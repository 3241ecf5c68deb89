use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::storage::{HostStorage, MemoryStorage};

/// Text written in place of a value that could not be serialized.
pub const SENTINEL: &str = "null";

/// JSON-aware view over a string-only host store.
///
/// Best effort: serialization, parse and host failures never reach the
/// caller. Writes fall back to [`SENTINEL`]; reads fall back to `None`.
#[derive(Debug, Default)]
pub struct StorageAccessor<S> {
    host: S,
}

impl StorageAccessor<MemoryStorage> {
    pub fn in_memory() -> Self { Self::new(MemoryStorage::new()) }
}

impl<S: HostStorage> StorageAccessor<S> {
    pub fn new(host: S) -> Self { Self { host } }

    /// Host-level operations (remove, clear, keys) live on the host itself.
    pub fn host(&self) -> &S { &self.host }

    pub fn into_inner(self) -> S { self.host }

    /// Store `value` as JSON under `key`, overwriting any previous record.
    pub fn set_item<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let text = stringify(key, value);
        if let Err(e) = self.host.write(key, &text) {
            warn!(key, error = %e, "host storage write failed; value dropped");
        }
    }

    /// Read the value under `key`.
    ///
    /// `None` when the record is absent, empty, not JSON, or JSON `null`.
    pub fn get_item(&self, key: &str) -> Option<Value> {
        let raw = self.read_raw(key)?;
        parse(key, &raw).filter(|v| !v.is_null())
    }

    /// Read the value under `key` as `T`; a record of another shape is `None`.
    pub fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_item(key)?;
        serde_json::from_value(value)
            .map_err(|e| debug!(key, error = %e, "stored value does not match requested type"))
            .ok()
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.host.read(key) {
            Ok(raw) => raw.filter(|r| !r.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "host storage read failed");
                None
            }
        }
    }
}

fn stringify<T: Serialize + ?Sized>(key: &str, value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        debug!(key, error = %e, "value not serializable; storing sentinel");
        SENTINEL.to_string()
    })
}

fn parse(key: &str, raw: &str) -> Option<Value> {
    serde_json::from_str(raw)
        .map_err(|e| debug!(key, error = %e, "stored record is not valid JSON"))
        .ok()
}
