//! Browser `localStorage` host.

use std::fmt::Debug;
use web_sys::Storage;

use crate::errors::StorageError;
use super::HostStorage;

pub struct WebStorage {
    storage: Storage,
}

impl WebStorage {
    /// Bind to `window.localStorage`. Fails outside a window context or when
    /// the browser has storage disabled.
    pub fn local() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .ok_or_else(|| StorageError::unavailable("no global window"))?
            .local_storage()
            .map_err(js_err)?
            .ok_or_else(|| StorageError::unavailable("localStorage is disabled"))?;
        Ok(Self { storage })
    }
}

fn js_err<E: Debug>(e: E) -> StorageError {
    StorageError::Unavailable(format!("{e:?}"))
}

impl HostStorage for WebStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(js_err)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // quota errors surface here
        self.storage.set_item(key, value).map_err(js_err)
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        // removeItem does not report whether the key existed
        let existed = self.read(key)?.is_some();
        self.storage.remove_item(key).map_err(js_err)?;
        Ok(existed)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.storage.clear().map_err(js_err)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let len = self.storage.length().map_err(js_err)?;
        let mut keys = Vec::with_capacity(len as usize);
        for i in 0..len {
            if let Some(key) = self.storage.key(i).map_err(js_err)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageAccessor;
    use serde_json::json;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn local_storage_crud() {
        let host = WebStorage::local().expect("localStorage available");
        host.clear().expect("clear");

        host.write("b", "2").expect("write");
        host.write("a", "1").expect("write");
        assert_eq!(host.read("a").expect("read").as_deref(), Some("1"));
        let mut keys = host.keys().expect("keys");
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

        assert!(host.remove("a").expect("remove"));
        assert!(!host.remove("a").expect("remove"));
        host.clear().expect("clear");
        assert!(host.keys().expect("keys").is_empty());
    }

    #[wasm_bindgen_test]
    fn accessor_over_local_storage() {
        let store = StorageAccessor::new(WebStorage::local().expect("localStorage available"));
        store.set_item("profile", &json!({"name": "Ana", "age": 30}));
        assert_eq!(
            store.host().read("profile").expect("read").as_deref(),
            Some(r#"{"name":"Ana","age":30}"#)
        );

        store.host().write("profile", "{broken").expect("write");
        assert_eq!(store.get_item("profile"), None);
        store.host().clear().expect("clear");
    }
}
