use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductRecord};
use crate::repository::ProductRepository;

/// Service layer for Product business logic
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    /// Serialises the uniqueness scan with the write that follows it
    save_lock: Arc<Mutex<()>>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Look up a product; absence is `Ok(None)`, not an error.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let product = self.repository.find_by_id(id).await?.map(Product::from);

        match &product {
            Some(_) => tracing::info!(product_id = id, "Product found"),
            None => tracing::info!(product_id = id, "Product not found"),
        }

        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> ProductResult<Vec<Product>> {
        let products: Vec<Product> = self
            .repository
            .find_all()
            .await?
            .into_iter()
            .map(Product::from)
            .collect();

        tracing::info!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Create (no id) or replace (id) a product.
    ///
    /// Fails with [`ProductError::Conflict`] when another product already has
    /// the same name and price.
    #[instrument(skip(self), fields(product_id = ?product.id))]
    pub async fn save(&self, product: Product) -> ProductResult<Product> {
        let _guard = self.save_lock.lock().await;

        if !self.has_no_match(&product).await? {
            tracing::warn!(
                name = %product.name,
                price = product.price,
                "Product with the same name and price already exists"
            );
            return Err(ProductError::Conflict {
                name: product.name,
                price: product.price,
            });
        }

        let saved = self
            .repository
            .save(ProductRecord::from(product))
            .await
            .map(Product::from)?;

        tracing::info!(product_id = ?saved.id, "Product saved");
        Ok(saved)
    }

    /// Remove a product; deleting an absent id succeeds.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ProductResult<()> {
        self.repository.delete_by_id(id).await?;
        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// True when no stored product with a different id shares both name and price.
    ///
    /// A product without an id differs from every stored one, so any
    /// name+price match rejects a create.
    pub async fn has_no_match(&self, product: &Product) -> ProductResult<bool> {
        let records = self.repository.find_all().await?;

        Ok(!records.iter().any(|r| {
            r.id != product.id && r.name == product.name && r.price == product.price
        }))
    }

    pub async fn health_check(&self) -> ProductResult<()> {
        self.repository.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;
    use mockall::predicate::eq;

    fn record(id: i64, name: &str, price: f64) -> ProductRecord {
        ProductRecord {
            id: Some(id),
            name: name.to_string(),
            price,
        }
    }

    fn product(id: Option<i64>, name: &str, price: f64) -> Product {
        Product {
            id,
            name: name.to_string(),
            price,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_maps_record() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_find_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(record(1, "Box", 100.0))));

        let service = ProductService::new(mock_repo);
        let found = service.find_by_id(1).await.unwrap();

        assert_eq!(found, Some(product(Some(1), "Box", 100.0)));
    }

    #[tokio::test]
    async fn test_find_by_id_missing_is_none() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_find_by_id().returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);
        assert_eq!(service.find_by_id(9).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_all_empty_store() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_find_all().returning(|| Ok(vec![]));

        let service = ProductService::new(mock_repo);
        assert!(service.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_new_product_colliding_is_conflict() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_find_all()
            .returning(|| Ok(vec![record(1, "Box", 100.0)]));
        mock_repo.expect_save().never();

        let service = ProductService::new(mock_repo);
        let result = service.save(product(None, "Box", 100.0)).await;

        assert!(matches!(result, Err(ProductError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_save_same_product_again_succeeds() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_find_all()
            .returning(|| Ok(vec![record(1, "Box", 100.0)]));
        mock_repo
            .expect_save()
            .with(eq(record(1, "Box", 100.0)))
            .times(1)
            .returning(Ok);

        let service = ProductService::new(mock_repo);
        let saved = service.save(product(Some(1), "Box", 100.0)).await.unwrap();

        assert_eq!(saved.id, Some(1));
    }

    #[tokio::test]
    async fn test_update_colliding_with_other_product_is_conflict() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_find_all()
            .returning(|| Ok(vec![record(1, "Box", 100.0), record(2, "Crate", 20.0)]));
        mock_repo.expect_save().never();

        let service = ProductService::new(mock_repo);
        let result = service.save(product(Some(2), "Box", 100.0)).await;

        assert!(matches!(result, Err(ProductError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_save_new_product_gets_store_id() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_find_all()
            .returning(|| Ok(vec![record(1, "Box", 100.0)]));
        mock_repo.expect_save().times(1).returning(|r| {
            Ok(ProductRecord {
                id: Some(2),
                ..r
            })
        });

        let service = ProductService::new(mock_repo);
        let saved = service.save(product(None, "Box", 90.0)).await.unwrap();

        assert_eq!(saved, product(Some(2), "Box", 90.0));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_delete_by_id()
            .with(eq(5))
            .times(2)
            .returning(|_| Ok(()));

        let service = ProductService::new(mock_repo);
        assert!(service.delete(5).await.is_ok());
        assert!(service.delete(5).await.is_ok());
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_find_all()
            .returning(|| Err(ProductError::Database("connection refused".to_string())));

        let service = ProductService::new(mock_repo);
        let result = service.save(product(None, "Box", 1.0)).await;

        assert!(matches!(result, Err(ProductError::Database(_))));
    }

    /// Store without its own uniqueness rule whose `save` yields before
    /// committing, so a second scan can interleave with an unfinished write.
    #[derive(Default)]
    struct SlowCommitRepository {
        records: std::sync::Mutex<Vec<ProductRecord>>,
    }

    #[async_trait::async_trait]
    impl ProductRepository for SlowCommitRepository {
        async fn find_by_id(&self, id: i64) -> ProductResult<Option<ProductRecord>> {
            let records = self.records.lock().unwrap();
            Ok(records.iter().find(|r| r.id == Some(id)).cloned())
        }

        async fn find_all(&self) -> ProductResult<Vec<ProductRecord>> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn save(&self, record: ProductRecord) -> ProductResult<ProductRecord> {
            tokio::task::yield_now().await;

            let mut records = self.records.lock().unwrap();
            let saved = ProductRecord {
                id: Some(records.len() as i64 + 1),
                ..record
            };
            records.push(saved.clone());
            Ok(saved)
        }

        async fn delete_by_id(&self, id: i64) -> ProductResult<()> {
            self.records.lock().unwrap().retain(|r| r.id != Some(id));
            Ok(())
        }

        async fn health_check(&self) -> ProductResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_concurrent_identical_saves_are_serialised() {
        let service = ProductService::new(SlowCommitRepository::default());

        let (first, second) = tokio::join!(
            service.save(product(None, "Box", 100.0)),
            service.save(product(None, "Box", 100.0)),
        );

        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(ProductError::Conflict { .. })))
                .count(),
            1
        );
        assert_eq!(service.find_all().await.unwrap().len(), 1);
    }
}
