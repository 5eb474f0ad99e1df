use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product '{name}' with price {price} already exists")]
    Conflict { name: String, price: f64 },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Product with id {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    /// Map a database error raised while saving `name`/`price`.
    ///
    /// A unique-index violation on `(name, price)` is the same rule the
    /// service checks, so it becomes [`ProductError::Conflict`].
    pub fn from_save_err(err: DbErr, name: &str, price: f64) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Conflict {
                name: name.to_string(),
                price,
            },
            _ => Self::from(err),
        }
    }
}

impl From<DbErr> for ProductError {
    fn from(err: DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Conflict { .. } => AppError::Conflict(err.to_string()),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::NotFound(_) => AppError::NotFound(err.to_string()),
            ProductError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let conflict = ProductError::Conflict {
            name: "Box".to_string(),
            price: 100.0,
        };
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);
        assert_eq!(
            ProductError::NotFound(5).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ProductError::Validation("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProductError::Database("down".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_non_unique_db_error_is_database() {
        let err = ProductError::from_save_err(DbErr::Custom("boom".into()), "Box", 1.0);
        assert!(matches!(err, ProductError::Database(_)));
    }

    #[tokio::test]
    async fn test_validation_error_body_reports_validation_code() {
        use http_body_util::BodyExt;

        let response = ProductError::Validation("price is required".into()).into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["error"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "price is required");
    }
}
