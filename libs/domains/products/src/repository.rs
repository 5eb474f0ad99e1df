use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::ProductRecord;

/// Persistence contract for products.
///
/// The store alone assigns ids. `save` inserts when the record has no id or
/// an id it doesn't hold, and replaces the stored record otherwise.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> ProductResult<Option<ProductRecord>>;

    /// Every stored record, ordered by id
    async fn find_all(&self) -> ProductResult<Vec<ProductRecord>>;

    async fn save(&self, record: ProductRecord) -> ProductResult<ProductRecord>;

    /// Deleting an absent id is not an error
    async fn delete_by_id(&self, id: i64) -> ProductResult<()>;

    /// Readiness probe
    async fn health_check(&self) -> ProductResult<()>;
}

#[derive(Debug, Default)]
struct Store {
    records: BTreeMap<i64, ProductRecord>,
    last_id: i64,
}

/// In-memory implementation of ProductRepository (for development/testing)
///
/// Enforces the `(name, price)` uniqueness the PostgreSQL schema enforces
/// with its unique index, so both stores reject the same writes.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: i64) -> ProductResult<Option<ProductRecord>> {
        let store = self.store.read().await;
        Ok(store.records.get(&id).cloned())
    }

    async fn find_all(&self) -> ProductResult<Vec<ProductRecord>> {
        let store = self.store.read().await;
        Ok(store.records.values().cloned().collect())
    }

    async fn save(&self, record: ProductRecord) -> ProductResult<ProductRecord> {
        let mut store = self.store.write().await;

        let id = match record.id {
            Some(id) if store.records.contains_key(&id) => id,
            _ => store.last_id + 1,
        };

        let duplicate = store
            .records
            .values()
            .any(|r| r.id != Some(id) && r.name == record.name && r.price == record.price);
        if duplicate {
            return Err(ProductError::Conflict {
                name: record.name,
                price: record.price,
            });
        }

        store.last_id = store.last_id.max(id);
        let saved = ProductRecord {
            id: Some(id),
            ..record
        };
        store.records.insert(id, saved.clone());

        tracing::debug!(product_id = id, "Stored product");
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> ProductResult<()> {
        let mut store = self.store.write().await;
        if store.records.remove(&id).is_some() {
            tracing::debug!(product_id = id, "Removed product");
        }
        Ok(())
    }

    async fn health_check(&self) -> ProductResult<()> {
        Ok(())
    }
}
