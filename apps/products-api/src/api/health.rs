//! Readiness endpoint

use axum::{Router, extract::State, response::Response, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use domain_products::ProductRepository;

use crate::state::AppState;

async fn ready<R: ProductRepository + Clone>(State(state): State<AppState<R>>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "store",
        Box::pin(async {
            state
                .service
                .health_check()
                .await
                .map_err(|e| e.to_string())
        }),
    )];

    run_health_checks(checks).await
}

pub fn router<R: ProductRepository + Clone + 'static>(state: AppState<R>) -> Router {
    Router::new()
        .route("/ready", get(ready::<R>))
        .with_state(state)
}
