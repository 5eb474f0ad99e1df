//! Router assembly shared by every store backend

use axum::Router;
use domain_products::{ProductRepository, ProductService};

use crate::api;
use crate::config::Config;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Full application router for `repository`: product routes, health
/// endpoints, API docs and the shared middleware stack.
pub fn build_router<R>(config: Config, repository: R) -> std::io::Result<Router>
where
    R: ProductRepository + Clone + 'static,
{
    let state = AppState {
        config,
        service: ProductService::new(repository),
    };

    axum_helpers::create_router::<ApiDoc>(api::routes(&state))
}
