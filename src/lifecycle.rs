// ABOUTME: Periodic cohort status sweeper deriving UPCOMING/ONGOING/COMPLETED from dates
// ABOUTME: Runs on its own tokio task; cancelled cohorts are never touched
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use goya_core::errors::AppResult;
use goya_core::models::CohortStatus;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::database::Database;

/// Default pause between sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Status a cohort should have at `now`.
///
/// CANCELLED is terminal. Otherwise the result depends only on the dates, so
/// recomputing after any number of missed sweeps lands on the same value.
#[must_use]
pub fn compute_status(
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    now: DateTime<Utc>,
    current: CohortStatus,
) -> CohortStatus {
    if current.is_cancelled() {
        return CohortStatus::Cancelled;
    }
    CohortStatus::for_schedule(start_date, end_date, now)
}

/// Recomputes cohort status from the calendar
#[derive(Clone)]
pub struct CohortSweeper {
    database: Database,
    running: Arc<Mutex<()>>,
}

impl CohortSweeper {
    /// Create a sweeper over the given database
    #[must_use]
    pub fn new(database: Database) -> Self {
        Self {
            database,
            running: Arc::new(Mutex::new(())),
        }
    }

    /// Bring every non-cancelled cohort's status in line with `now`.
    ///
    /// Returns how many cohorts changed. All changes of one sweep are written in
    /// a single transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn sweep(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let _guard = self.running.lock().await;

        let cohorts = self.database.cohorts().list_sweepable().await?;
        let transitions: Vec<_> = cohorts
            .iter()
            .filter_map(|cohort| {
                let next = compute_status(cohort.start_date, cohort.end_date, now, cohort.status);
                (next != cohort.status).then_some((cohort.id, next))
            })
            .collect();

        if transitions.is_empty() {
            debug!(checked = cohorts.len(), "cohort sweep found nothing to update");
            return Ok(0);
        }

        let changed = self
            .database
            .cohorts()
            .apply_status_transitions(&transitions)
            .await?;
        info!(checked = cohorts.len(), changed, "cohort statuses updated");
        Ok(changed)
    }

    /// One scheduled run; failures are logged and retried on the next tick
    pub async fn tick(&self) {
        if let Err(e) = self.sweep(Utc::now()).await {
            error!(error = %e, "cohort status sweep failed");
        }
    }

    /// Spawn the periodic sweep task.
    ///
    /// The first sweep runs immediately. Ticks missed while a sweep is slow are
    /// skipped rather than replayed.
    #[must_use]
    pub fn start_scheduler(self, every: Duration) -> JoinHandle<()> {
        info!(interval_secs = every.as_secs(), "starting cohort status sweeper");
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                self.tick().await;
            }
        })
    }
}
