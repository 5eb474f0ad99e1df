use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{Product, ProductPayload};
use crate::repository::ProductRepository;
use crate::service::ProductService;

const TAG: &str = "Products";

/// OpenAPI documentation for the product routes
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        get_product,
        create_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(Product, ProductPayload),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

/// Product routes relative to their mount point (the app mounts them at `/product`)
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List all products
///
/// An empty catalogue is reported as 404.
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All stored products", body = Vec<Product>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = service.find_all().await?;

    if products.is_empty() {
        tracing::warn!("No products stored");
        return Err(AppError::NotFound("No products found".to_string()));
    }

    Ok(Json(products))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
) -> Result<Json<Product>, AppError> {
    service
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Product with id {id} not found")))
}

/// Create a product
///
/// The store assigns the id; an id in the body is ignored.
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(payload): ValidatedJson<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = Product {
        id: None,
        ..Product::try_from(payload)?
    };

    let created = service.save(product).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a product
///
/// Responds 202 echoing the submitted product with `id` set to the path id.
/// A body that fails validation, or whose `id` names a different product,
/// is reported as 404.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = ProductPayload,
    responses(
        (status = 202, description = "Product accepted", body = Product),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
    payload: Result<ValidatedJson<ProductPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let ValidatedJson(payload) = payload.map_err(|e| {
        AppError::NotFound(format!("Product {id} not updated, invalid body: {e}"))
    })?;

    if let Some(body_id) = payload.id.filter(|body_id| *body_id != id) {
        return Err(AppError::NotFound(format!(
            "Body id {body_id} does not match path id {id}"
        )));
    }

    let product = Product {
        id: Some(id),
        ..Product::try_from(payload)?
    };

    service.save(product.clone()).await?;
    Ok((StatusCode::ACCEPTED, Json(product)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
) -> Result<StatusCode, AppError> {
    if service.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Product with id {id} not found")));
    }

    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
