//! JSON-aware access to a string-only key-value store.
//! - `storage` abstracts the host store (memory, JSON file, browser `localStorage`).
//! - `accessor` converts values to and from their persisted JSON text.
//! - Failures never reach the caller; they degrade to "no value".

pub mod errors;
pub mod storage;
pub mod accessor;

pub use accessor::StorageAccessor;
pub use errors::StorageError;
pub use storage::{open_host, HostStorage, JsonFileStorage, MemoryStorage, SharedHost};
