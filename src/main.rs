use sqlx::postgres::PgPoolOptions;
use staffdesk::{build_router, AppConfig, AppState, TokenService};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "staffdesk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting staffdesk server");

    let config = AppConfig::from_env()?;

    // One signing key for the life of the process, handed to the interceptors via state
    let token_service = Arc::new(TokenService::new(&config.jwt_secret));

    let app_state = match &config.database {
        Some(database) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(database.connect_options()?)
                .await?;
            info!("Connected to Postgres successfully");
            AppState::postgres(token_service, pool)
        }
        None => {
            warn!("No database configured, using the in-memory store");
            AppState::in_memory(token_service)
        }
    };

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
