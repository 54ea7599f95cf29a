use std::{collections::BTreeMap, fmt::Debug, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Abstract key-value engine backing the store.
///
/// Implementations may be a remote cache service, an embedded file or an
/// in-memory map; the store only requires point operations on opaque string
/// keys. One handle is typically shared by every [`AuthStore`] in the
/// process — the engine performs no isolation between clients, namespacing
/// happens in the storage keys.
///
/// [`AuthStore`]: crate::store::AuthStore
#[async_trait]
pub trait BackingStore: Debug {
    /// Fetch the bytes stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, overwriting any existing value.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove the value stored under `key`. Removing an absent key is not an
    /// error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check that the engine is reachable.
    async fn ping(&self) -> Result<()>;
}

/// A local in-memory store. Not for production use!
///
/// # Warning
/// This in-memory store should only be used for test purposes, it will not work for a distributed
/// deployment.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    store: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

#[async_trait]
impl BackingStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.store.try_lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.store.try_lock()?.insert(key.to_owned(), value);

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store.try_lock()?.remove(key);

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn point_operations_behave_like_a_map() {
        let store = MemoryStore::default();
        assert!(store.ping().await.is_ok());
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", b"v1".to_vec()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v1".to_vec()));

        store.set("k", b"v2".to_vec()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v2".to_vec()));

        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);

        // Deleting an absent key is not an error.
        store.delete("k").await.unwrap();
    }
}
