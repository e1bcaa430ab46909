//! Storefront API server entry point.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use storefront_api::config::Config;
use storefront_api::error::AppError;
use storefront_api::state::AppState;
use storefront_api::telemetry::Telemetry;
use storefront_core::clock::SystemClock;
use storefront_store::migrate::run_migrations;
use storefront_store::pg_store::PgStore;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let telemetry = Telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting storefront API server");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    let app_state = AppState::new(Arc::new(PgStore::new(pool)), Arc::new(SystemClock))
        .with_identity_header(config.identity_header.clone())
        .with_zero_quantity_policy(config.zero_quantity_policy);

    let app = storefront_api::build_router(app_state);

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    telemetry.shutdown();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
