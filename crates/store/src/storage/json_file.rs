use std::{collections::BTreeMap, fs, io::{self, Write}, path::{Path, PathBuf}, sync::RwLock};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::errors::StorageError;
use super::HostStorage;

/// JSON file-backed host storage.
///
/// Persists a `key -> text` map as one JSON object and rewrites the file on
/// every mutation. Records survive across processes, the way browser
/// `localStorage` survives across sessions.
///
/// The file is replaced atomically, and the in-memory map only changes once
/// the new file is in place, so a failed write is invisible to later reads.
#[derive(Debug)]
pub struct JsonFileStorage {
    inner: RwLock<BTreeMap<String, String>>,
    file_path: PathBuf,
}

impl JsonFileStorage {
    /// Open the store at `path`. Creates the file with an empty map if missing;
    /// a file that is not a JSON string map is treated as empty.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StorageError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let map: BTreeMap<String, String> = match fs::read(&file_path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %file_path.display(), error = %e, "storage file is not a string map; starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let empty = BTreeMap::new();
                write_map(&file_path, &empty)?;
                debug!(path = %file_path.display(), "created empty storage file");
                empty
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self { inner: RwLock::new(map), file_path })
    }

    pub fn path(&self) -> &Path { &self.file_path }

    /// Apply a mutation to a copy of the map, persist it, then swap it in.
    fn update<R>(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> (R, bool)) -> Result<R, StorageError> {
        let mut map = self.inner.write().map_err(|_| StorageError::Poisoned)?;
        let mut next = map.clone();
        let (out, dirty) = f(&mut next);
        if dirty {
            write_map(&self.file_path, &next)?;
            *map = next;
        }
        Ok(out)
    }
}

/// Write to a sibling temp file and rename it over `path`; the temp file is
/// deleted if anything fails before the rename.
fn write_map(path: &Path, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
    let data = serde_json::to_vec(map)?;
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl HostStorage for JsonFileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.inner.read().map_err(|_| StorageError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|m| {
            m.insert(key.to_string(), value.to_string());
            ((), true)
        })
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        self.update(|m| {
            let existed = m.remove(key).is_some();
            (existed, existed)
        })
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.update(|m| {
            m.clear();
            ((), true)
        })
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let map = self.inner.read().map_err(|_| StorageError::Poisoned)?;
        Ok(map.keys().cloned().collect())
    }
}
