//! Trust level worker binary.
//!
//! Runs the trust sweep over all active caregivers on a fixed interval
//! until SIGINT. Each sweep recomputes scores and levels from behavioral
//! signals; per-user failures are logged and never abort the sweep.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carelink_db::models::trust::reason_codes;
use carelink_lifecycle::trust_worker::run_trust_level_worker;

/// Default interval between sweeps: 1 hour.
const DEFAULT_INTERVAL_SECS: u64 = 3600;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carelink_worker=debug,carelink_lifecycle=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = carelink_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    carelink_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database connection established");

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received SIGINT (Ctrl-C), stopping worker");
            cancel_on_signal.cancel();
        }
    });

    run(pool, cancel).await;
    tracing::info!("Trust worker stopped");
}

/// Run the sweep loop until `cancel` is triggered.
///
/// The first tick fires immediately, so a freshly started worker does a
/// sweep right away instead of waiting a full interval.
async fn run(pool: PgPool, cancel: CancellationToken) {
    let interval_secs: u64 = std::env::var("TRUST_WORKER_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    tracing::info!(interval_secs, "Trust worker started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                break;
            }
            _ = interval.tick() => {
                match run_trust_level_worker(&pool, reason_codes::BATCH_RECALCULATION).await {
                    Ok(summary) => {
                        tracing::info!(
                            total = summary.total,
                            updated = summary.updated,
                            unchanged = summary.unchanged,
                            errors = summary.errors,
                            "Trust sweep complete",
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Trust sweep failed");
                    }
                }
            }
        }
    }
}
