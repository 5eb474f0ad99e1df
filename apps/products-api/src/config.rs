//! Configuration for Products API

use core_config::{AppInfo, FromEnv, app_info, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    /// `None` when `DATABASE_URL` is unset: products live in memory
    pub database: Option<PostgresConfig>,
    pub server: ServerConfig,
    pub environment: Environment,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;

        let database = match std::env::var("DATABASE_URL") {
            Ok(_) => Some(PostgresConfig::from_env()?),
            Err(_) => None,
        };

        let run_migrations = env_parse("RUN_MIGRATIONS", "true")?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            run_migrations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_in_memory_store() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", None::<&str>),
                ("RUN_MIGRATIONS", None),
                ("PORT", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert!(config.database.is_none());
                assert!(config.run_migrations);
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.app.name, "products_api");
            },
        );
    }

    #[test]
    fn test_database_url_selects_postgres() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/products")),
                ("RUN_MIGRATIONS", Some("false")),
            ],
            || {
                let config = Config::from_env().unwrap();
                let database = config.database.unwrap();
                assert_eq!(database.url(), "postgresql://localhost/products");
                assert!(!config.run_migrations);
            },
        );
    }

    #[test]
    fn test_invalid_flag_is_error() {
        temp_env::with_vars(
            [("DATABASE_URL", None), ("RUN_MIGRATIONS", Some("sometimes"))],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }
}
