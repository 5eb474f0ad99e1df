use async_trait::async_trait;
use database::postgres::check_health;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::ProductRecord,
    repository::ProductRepository,
};

/// PostgreSQL implementation of ProductRepository
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_id(&self, id: i64) -> ProductResult<Option<ProductRecord>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn find_all(&self) -> ProductResult<Vec<ProductRecord>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn save(&self, record: ProductRecord) -> ProductResult<ProductRecord> {
        let existing = match record.id {
            Some(id) => entity::Entity::find_by_id(id).one(&self.db).await?,
            None => None,
        };

        let ProductRecord { name, price, .. } = record;

        let result = match existing {
            Some(model) => {
                entity::ActiveModel {
                    id: Unchanged(model.id),
                    name: Set(name.clone()),
                    price: Set(price),
                }
                .update(&self.db)
                .await
            }
            None => {
                entity::ActiveModel {
                    id: NotSet,
                    name: Set(name.clone()),
                    price: Set(price),
                }
                .insert(&self.db)
                .await
            }
        };

        let model = result.map_err(|e| ProductError::from_save_err(e, &name, price))?;
        Ok(model.into())
    }

    async fn delete_by_id(&self, id: i64) -> ProductResult<()> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;
        tracing::debug!(product_id = id, rows_affected = result.rows_affected, "Delete executed");
        Ok(())
    }

    async fn health_check(&self) -> ProductResult<()> {
        check_health(&self.db)
            .await
            .map_err(|e| ProductError::Database(e.to_string()))
    }
}
