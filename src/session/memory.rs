use super::{PaginationToken, TokenStore};
use crate::error::{MindbreezeError, Result};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Process-local token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<String, PaginationToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently holding a token
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, PaginationToken>>> {
        self.tokens
            .lock()
            .map_err(|_| MindbreezeError::TokenStore("Token store lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<PaginationToken>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, token: PaginationToken) -> Result<()> {
        self.lock()?.insert(key.to_string(), token);
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_set_get_clear() {
        let store = MemoryTokenStore::new();
        assert!(store.get("session").unwrap().is_none());

        store
            .set("session", PaginationToken::new("q", json!([1, 2])))
            .unwrap();
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get("session").unwrap().unwrap().vars, json!([1, 2]));

        store.clear("session").unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_set_replaces() {
        let store = MemoryTokenStore::new();
        store.set("s", PaginationToken::new("q1", json!(1))).unwrap();
        store.set("s", PaginationToken::new("q2", json!(2))).unwrap();

        let token = store.get("s").unwrap().unwrap();
        assert_eq!(token.query, "q2");
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_clear_missing_key_is_ok() {
        let store = MemoryTokenStore::new();
        assert!(store.clear("nothing").is_ok());
    }

    #[test]
    fn test_poisoned_lock_is_a_store_error() {
        let store = Arc::new(MemoryTokenStore::new());
        let holder = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = holder.tokens.lock().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        for err in [
            store.get("s").unwrap_err(),
            store.set("s", PaginationToken::new("q", json!(1))).unwrap_err(),
            store.clear("s").unwrap_err(),
            store.len().unwrap_err(),
        ] {
            assert!(matches!(err, MindbreezeError::TokenStore(_)));
        }
    }
}
