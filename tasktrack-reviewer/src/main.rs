//! # tasktrack reviewer
//!
//! One-shot overdue task review. An external scheduler (cron, systemd
//! timer) invokes this binary; each invocation is exactly one review run
//! with one fixed reference time. The scheduler is also expected to keep
//! runs from overlapping, though the only mutation here (clearing the
//! active flag) is idempotent.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p tasktrack-reviewer
//! ```

use std::sync::Arc;
use tasktrack_reviewer::{
    config::ReviewerConfig,
    notify::GatewayNotifier,
    review::OverdueReviewer,
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
                .unwrap_or_else(|_| "tasktrack_reviewer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "tasktrack reviewer v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = ReviewerConfig::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database_url.clone(),
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let notifier = Arc::new(GatewayNotifier::new(
        config.gateway_url.clone(),
        config.sender.clone(),
        config.recipient.clone(),
    ));

    let reviewer = OverdueReviewer::with_threshold(pool.clone(), notifier, config.threshold);

    let report = reviewer.run().await?;

    if report.has_failures() {
        tracing::warn!(
            failures = report.failures.len(),
            "Review run completed with per-user failures"
        );
        for failure in &report.failures {
            tracing::warn!(
                user_id = %failure.user_id,
                username = %failure.username,
                stage = failure.stage.as_str(),
                error = %failure.error,
                "User-scoped failure"
            );
        }
    }

    tasktrack_shared::db::pool::close_pool(pool).await;

    Ok(())
}
