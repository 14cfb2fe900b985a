//! CEP Registry - API Server Binary
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin cep-registry
//!
//! # Run with environment variables
//! API_PORT=8080 DATABASE_URL=postgres://... cargo run --bin cep-registry
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATABASE_URL` - PostgreSQL connection string (falls back to `DATABASE_URL`)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_LOOKUP_BASE_URL` - Postal lookup service (default: https://viacep.com.br)
//! * `API_LOOKUP_TIMEOUT_SECS` - Postal lookup timeout (default: HTTP client default)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use domain_address::{ViaCepAdapter, ViaCepConfig};
use infra_db::adapters::{PostgresAddressAdapter, PostgresPersonAdapter};
use infra_db::{create_pool, run_migrations, DatabaseConfig};
use interface_api::{config::ApiConfig, create_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes logging, connects and migrates the database, then serves
/// until Ctrl+C or SIGTERM.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        lookup_base_url = %config.lookup_base_url,
        "Starting CEP Registry API Server"
    );

    let pool = create_pool(DatabaseConfig::new(config.database_url.clone())).await?;
    run_migrations(&pool).await?;

    let mut lookup_config = ViaCepConfig::new(config.lookup_base_url.clone());
    if let Some(secs) = config.lookup_timeout_secs {
        lookup_config = lookup_config.timeout(Duration::from_secs(secs));
    }
    let lookup = ViaCepAdapter::new(lookup_config)?;

    let state = AppState::new(
        Arc::new(PostgresAddressAdapter::new(pool.clone())),
        Arc::new(PostgresPersonAdapter::new(pool)),
        Arc::new(lookup),
    );
    let app = create_router(state);

    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
