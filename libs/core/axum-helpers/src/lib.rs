//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! - **[`server`]**: router assembly with OpenAPI UIs, health endpoints, graceful shutdown
//! - **[`http`]**: CORS and security header middleware
//! - **[`errors`]**: [`AppError`] and the JSON [`ErrorResponse`] body with numeric codes
//! - **[`extractors`]**: [`ValidatedJson`] and [`IdPath`], both rejecting with a 400

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{IdPath, ValidatedJson};
pub use http::{cors_layer_from_env, create_cors_layer, security_headers};
pub use server::{
    HealthCheckFuture, HealthResponse, OPENAPI_JSON_PATH, ShutdownCoordinator,
    create_production_app, create_router, health_router, run_health_checks, shutdown_signal,
};
