//! Periodic driver for the nudge engine.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::engine::NudgeEngine;

/// How often the evaluator runs when `NUDGE_CHECK_INTERVAL_SECS` is unset.
const DEFAULT_CHECK_INTERVAL_SECS: u64 = 900;

/// Per-run deadline when `NUDGE_RUN_DEADLINE_SECS` is unset. A wedged query
/// must not stall the loop forever.
const DEFAULT_RUN_DEADLINE_SECS: u64 = 300;

/// Background service that runs the nudge evaluator on a fixed interval.
pub struct NudgeScheduler {
    engine: NudgeEngine,
}

impl NudgeScheduler {
    pub fn new(engine: NudgeEngine) -> Self {
        Self { engine }
    }

    /// Run the scheduler loop until `cancel` is triggered.
    ///
    /// Each pass is wrapped in a deadline; a pass that exceeds it is
    /// abandoned and the next tick starts fresh (the evaluator is stateless
    /// across runs, so nothing needs cleanup).
    pub async fn run(&self, cancel: CancellationToken) {
        let check_interval = Duration::from_secs(env_secs(
            "NUDGE_CHECK_INTERVAL_SECS",
            DEFAULT_CHECK_INTERVAL_SECS,
        ));
        let run_deadline = Duration::from_secs(env_secs(
            "NUDGE_RUN_DEADLINE_SECS",
            DEFAULT_RUN_DEADLINE_SECS,
        ));

        tracing::info!(
            interval_secs = check_interval.as_secs(),
            deadline_secs = run_deadline.as_secs(),
            "Nudge scheduler started"
        );

        let mut interval = tokio::time::interval(check_interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Nudge scheduler stopping");
                    break;
                }
                _ = interval.tick() => {
                    match tokio::time::timeout(run_deadline, self.engine.run(Utc::now())).await {
                        Ok(Ok(summary)) => {
                            tracing::info!(
                                users = summary.users_evaluated,
                                written = summary.written,
                                rule_failures = summary.rule_failures,
                                "Nudge run complete"
                            );
                        }
                        Ok(Err(e)) => {
                            tracing::error!(error = %e, "Nudge run failed");
                        }
                        Err(_) => {
                            tracing::error!(
                                deadline_secs = run_deadline.as_secs(),
                                "Nudge run exceeded deadline, abandoned"
                            );
                        }
                    }
                }
            }
        }
    }
}

/// Read a positive seconds value from the environment, with a default.
fn env_secs(var: &str, default: u64) -> u64 {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}
