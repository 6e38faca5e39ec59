use std::sync::Arc;
use tokio::sync::OnceCell;

use super::Store;
use crate::error::StoreResult;
use crate::storage::Storage;

/// Lazily opened, single-instance store
///
/// Concurrent first calls to [`StoreCell::get`] race on one initialization;
/// exactly one [`Store`] is opened and every caller receives the same `Arc`.
/// The cell is owned by the application and handed to consumers explicitly.
pub struct StoreCell {
    storage: Storage,
    store: OnceCell<Arc<Store>>,
}

impl StoreCell {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            store: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> StoreResult<Arc<Store>> {
        let store = self
            .store
            .get_or_try_init(|| async {
                tracing::debug!(journaled = self.storage.is_journaled(), "opening task store");
                Store::open(self.storage.clone()).await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(store))
    }

    pub fn is_open(&self) -> bool {
        self.store.initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_concurrent_first_access_opens_once() {
        let cell = Arc::new(StoreCell::new(Storage::memory()));
        assert!(!cell.is_open());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cell = Arc::clone(&cell);
                tokio::spawn(async move { cell.get().await.unwrap() })
            })
            .collect();

        let mut stores = Vec::new();
        for handle in handles {
            stores.push(handle.await.unwrap());
        }
        assert!(cell.is_open());
        assert!(stores.iter().all(|s| Arc::ptr_eq(s, &stores[0])));
    }
}
