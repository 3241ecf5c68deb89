//! Host storage abstractions
//!
//! The host only ever sees strings. JSON encoding belongs to the accessor,
//! so backends stay free of any value model.

pub mod json_file;
pub mod memory;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

use configs::{Backend, StorageConfig};
use tracing::info;

use crate::errors::StorageError;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::WebStorage;

/// String key-value store supplied by the host environment.
/// Mirrors the `localStorage` surface; implementations serialize their own access.
pub trait HostStorage {
    /// Read the raw record under `key`. `None` if absent.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any existing record.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the record under `key`; returns whether one existed.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// Remove every record.
    fn clear(&self) -> Result<(), StorageError>;

    /// All keys currently stored.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

impl<S: HostStorage + ?Sized> HostStorage for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> { (**self).read(key) }
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> { (**self).write(key, value) }
    fn remove(&self, key: &str) -> Result<bool, StorageError> { (**self).remove(key) }
    fn clear(&self) -> Result<(), StorageError> { (**self).clear() }
    fn keys(&self) -> Result<Vec<String>, StorageError> { (**self).keys() }
}

impl<S: HostStorage + ?Sized> HostStorage for &S {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> { (**self).read(key) }
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> { (**self).write(key, value) }
    fn remove(&self, key: &str) -> Result<bool, StorageError> { (**self).remove(key) }
    fn clear(&self) -> Result<(), StorageError> { (**self).clear() }
    fn keys(&self) -> Result<Vec<String>, StorageError> { (**self).keys() }
}

pub type SharedHost = Box<dyn HostStorage + Send + Sync>;

/// Build the native backend selected by `cfg`.
pub fn open_host(cfg: &StorageConfig) -> Result<SharedHost, StorageError> {
    match cfg.backend {
        Backend::Memory => {
            info!(event = "host_open", backend = "memory", "opened in-memory host storage");
            Ok(Box::new(MemoryStorage::new()))
        }
        Backend::File => {
            let store = JsonFileStorage::open(&cfg.path)?;
            info!(event = "host_open", backend = "file", path = %cfg.path, "opened file host storage");
            Ok(Box::new(store))
        }
    }
}
