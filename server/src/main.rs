//! comanda-server: food ordering REST backend
//!
//! Long-running service that:
//! - Manages user accounts (argon2-hashed credentials, JWT sessions)
//! - Serves the read-only product catalog
//! - Owns the order ledger and its one-active-order-per-user invariant

mod api;
mod auth;
mod config;
mod db;
mod error;
mod state;
mod util;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comanda_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting comanda-server (env: {})", config.environment);

    // Initialize application state (connects the pool, runs migrations)
    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("comanda-server HTTP listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
