//! API routes module

pub mod health;

use axum::Router;
use axum_helpers::health_router;
use domain_products::{ProductRepository, handlers};

use crate::state::AppState;

/// Product routes under `/product` plus `/health` and `/ready`
pub fn routes<R: ProductRepository + Clone + 'static>(state: &AppState<R>) -> Router {
    Router::new()
        .nest("/product", handlers::router(state.service.clone()))
        .merge(health_router(state.config.app))
        .merge(health::router(state.clone()))
}
