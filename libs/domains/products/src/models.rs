use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::ProductError;

/// API-facing product.
///
/// `id` is `null` until the store assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[schema(example = 1)]
    pub id: Option<i64>,
    #[schema(example = "Box")]
    pub name: String,
    #[schema(example = 100.0)]
    pub price: f64,
}

/// Persisted shape of a product.
///
/// Mirrors [`Product`] field for field; kept separate so storage changes
/// don't leak into the JSON contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub id: Option<i64>,
    pub name: String,
    pub price: f64,
}

/// Request body for create and update.
///
/// Every field is optional at the JSON level so a missing field is reported
/// by validation (400) rather than by deserialization.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ProductPayload {
    /// Ignored on create. On update it must be absent or equal the path id.
    #[serde(default)]
    pub id: Option<i64>,

    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    #[schema(example = "Box")]
    pub name: Option<String>,

    #[validate(
        required(message = "price is required"),
        range(min = 0.0, message = "price must not be negative")
    )]
    #[schema(example = 100.0)]
    pub price: Option<f64>,
}

impl TryFrom<ProductPayload> for Product {
    type Error = ProductError;

    fn try_from(payload: ProductPayload) -> Result<Self, Self::Error> {
        let name = payload
            .name
            .ok_or_else(|| ProductError::Validation("name is required".to_string()))?;
        let price = payload
            .price
            .ok_or_else(|| ProductError::Validation("price is required".to_string()))?;

        Ok(Self {
            id: payload.id,
            name,
            price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_validation() {
        let valid = ProductPayload {
            id: None,
            name: Some("Box".to_string()),
            price: Some(100.0),
        };
        assert!(valid.validate().is_ok());

        let empty_name = ProductPayload {
            name: Some(String::new()),
            ..valid.clone()
        };
        let errors = empty_name.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let missing_price = ProductPayload {
            price: None,
            ..valid.clone()
        };
        let errors = missing_price.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));

        let negative = ProductPayload {
            price: Some(-1.0),
            ..valid
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_payload_deserializes_with_missing_fields() {
        let payload: ProductPayload = serde_json::from_str(r#"{"name":"Box"}"#).unwrap();
        assert_eq!(payload.name.as_deref(), Some("Box"));
        assert!(payload.price.is_none());
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_try_from_payload() {
        let product = Product::try_from(ProductPayload {
            id: Some(5),
            name: Some("Crate".to_string()),
            price: Some(20.0),
        })
        .unwrap();

        assert_eq!(
            product,
            Product {
                id: Some(5),
                name: "Crate".to_string(),
                price: 20.0
            }
        );

        let missing = Product::try_from(ProductPayload::default());
        assert!(matches!(missing, Err(ProductError::Validation(_))));
    }

    #[test]
    fn test_product_serializes_null_id() {
        let product = Product {
            id: None,
            name: "Box".to_string(),
            price: 100.0,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert!(json["id"].is_null());
        assert_eq!(json["name"], "Box");
    }
}
