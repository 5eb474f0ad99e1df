//! Field-for-field conversion between [`Product`] and [`ProductRecord`].

use crate::models::{Product, ProductRecord};

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
        }
    }
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            price: record.price,
        }
    }
}
