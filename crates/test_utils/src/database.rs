//! Database Test Utilities
//!
//! Starts PostgreSQL in a testcontainer and applies the schema. Tests using
//! these helpers need a container runtime and are marked `#[ignore]`.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};

const IMAGE: (&str, &str) = ("postgres", "16-alpine");
const USER: &str = "cep";
const PASSWORD: &str = "cep";
const DATABASE: &str = "cep_registry_test";

const SCHEMA: &str = include_str!("../../../migrations/20240101_000001_initial_schema.sql");

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Builds a PostgreSQL URL for the test credentials
pub fn test_database_url(host: &str, port: u16) -> String {
    format!("postgres://{}:{}@{}:{}/{}", USER, PASSWORD, host, port, DATABASE)
}

/// A running PostgreSQL container with the schema applied
///
/// The container stops when this value is dropped.
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    pub url: String,
    pool: PgPool,
}

impl TestDatabase {
    pub async fn start() -> Result<Self, BoxError> {
        let container = GenericImage::new(IMAGE.0, IMAGE.1)
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stderr("database system is ready to accept connections"))
            .with_env_var("POSTGRES_USER", USER)
            .with_env_var("POSTGRES_PASSWORD", PASSWORD)
            .with_env_var("POSTGRES_DB", DATABASE)
            .start()
            .await?;

        let host = container.get_host().await?.to_string();
        let port = container.get_host_port_ipv4(5432).await?;
        let url = test_database_url(&host, port);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&url)
            .await?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;

        Ok(Self { _container: container, url, pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Starts a database owned by a single test
pub async fn create_isolated_test_database() -> Result<TestDatabase, BoxError> {
    TestDatabase::start().await
}
