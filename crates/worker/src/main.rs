//! Worker binary hosting the notification batch jobs: the nudge evaluator
//! and the daily digest scheduler.

use chrono_tz::Tz;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lumen_nudge::context::DEFAULT_TIMEZONE;
use lumen_nudge::{DigestScheduler, NudgeEngine, NudgeScheduler};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lumen_worker=debug,lumen_nudge=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Timezone ---
    let tz: Tz = match std::env::var("NUDGE_TIMEZONE") {
        Ok(name) => name
            .parse()
            .unwrap_or_else(|_| panic!("NUDGE_TIMEZONE is not a valid IANA timezone: {name}")),
        Err(_) => DEFAULT_TIMEZONE,
    };
    tracing::info!(timezone = %tz, "Evaluator timezone configured");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = lumen_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    lumen_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    lumen_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    // --- Background jobs ---
    let cancel = CancellationToken::new();

    let nudge_scheduler = NudgeScheduler::new(NudgeEngine::new(pool.clone(), tz));
    let nudge_cancel = cancel.clone();
    let nudge_handle = tokio::spawn(async move {
        nudge_scheduler.run(nudge_cancel).await;
    });

    let digest_scheduler = DigestScheduler::new(pool.clone(), tz);
    let digest_cancel = cancel.clone();
    let digest_handle = tokio::spawn(async move {
        digest_scheduler.run(digest_cancel).await;
    });

    tracing::info!("Worker started (nudge scheduler, digest scheduler)");

    // --- Shutdown ---
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install ctrl_c handler");
    tracing::info!("Shutdown signal received, stopping schedulers");

    cancel.cancel();
    let _ = nudge_handle.await;
    let _ = digest_handle.await;

    tracing::info!("Worker stopped");
}
