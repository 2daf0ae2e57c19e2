//! # tasktrack API server
//!
//! HTTP API for the tasktrack service: registration, login, user
//! management, and task assignment. The overdue review runs separately
//! in the `tasktrack-reviewer` binary.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p tasktrack-api
//! ```

use tasktrack_api::{
    app::{build_router, AppState},
    config::Config,
};
use tasktrack_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasktrack_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "tasktrack API server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received, exiting...");
        })
        .await?;

    Ok(())
}
