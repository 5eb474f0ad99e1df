//! Products API - REST server

use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{check_health, connect_from_config_with_retry, run_migrations};
use domain_products::{InMemoryProductRepository, PgProductRepository};
use migration::Migrator;
use tracing::{error, info, warn};

mod api;
mod app;
mod config;
mod openapi;
mod state;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let server_config = config.server.clone();
    let shutdown_timeout = server_config.shutdown_timeout;

    let result = match config.database.clone() {
        Some(pg_config) => {
            info!("Connecting to PostgreSQL");
            let db = connect_from_config_with_retry(pg_config, None).await?;
            check_health(&db).await?;

            if config.run_migrations {
                run_migrations::<Migrator>(&db, config.app.name).await?;
            }

            let router = app::build_router(config, PgProductRepository::new(db.clone()))?;

            info!("Starting Products API with PostgreSQL store on port {}", server_config.port);
            create_production_app(router, &server_config, shutdown_timeout, async move {
                info!("Shutting down: closing PostgreSQL pool");
                match db.close().await {
                    Ok(()) => info!("PostgreSQL pool closed"),
                    Err(e) => error!(error = %e, "Failed to close PostgreSQL pool"),
                }
            })
            .await
        }
        None => {
            warn!("DATABASE_URL is not set, products are kept in memory and lost on restart");
            let router = app::build_router(config, InMemoryProductRepository::new())?;

            info!("Starting Products API with in-memory store on port {}", server_config.port);
            create_production_app(router, &server_config, shutdown_timeout, async {}).await
        }
    };

    result.map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
