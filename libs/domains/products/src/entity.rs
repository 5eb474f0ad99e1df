use sea_orm::entity::prelude::*;

use crate::models::ProductRecord;

/// Sea-ORM entity for the `products` table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub price: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductRecord {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            name: model.name,
            price: model.price,
        }
    }
}
