// ABOUTME: Database operations for cohorts with capacity and status tracking
// ABOUTME: Handles admin CRUD, eligible-cohort selection, availability, and status writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use chrono::{DateTime, Utc};
use goya_core::errors::{AppError, AppResult};
use goya_core::models::{Cohort, CohortAvailability, CohortStatus};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Executor, Row, Sqlite, SqliteConnection, SqlitePool};
use tracing::warn;
use uuid::Uuid;

use super::enrollments::EnrollmentsManager;
use super::{
    format_timestamp, is_unique_violation, parse_timestamp, parse_uuid, ImmediateTransaction,
};
use crate::capacity::CapacityLimit;

/// Columns selected for a cohort row
const COHORT_COLUMNS: &str =
    "id, name, career_id, start_date, end_date, capacity, status, created_at";

/// Request to create a cohort
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCohortRequest {
    /// Display name
    pub name: String,
    /// Owning career
    #[serde(alias = "careerId")]
    pub career_id: Uuid,
    /// First day
    #[serde(alias = "startDate")]
    pub start_date: DateTime<Utc>,
    /// Last day
    #[serde(alias = "endDate")]
    pub end_date: DateTime<Utc>,
    /// Seat limit
    pub capacity: i64,
    /// Explicit status; derived from the dates when absent
    pub status: Option<String>,
}

/// Partial cohort update; absent fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCohortRequest {
    /// New display name
    pub name: Option<String>,
    /// New owning career
    #[serde(alias = "careerId")]
    pub career_id: Option<Uuid>,
    /// New first day
    #[serde(alias = "startDate")]
    pub start_date: Option<DateTime<Utc>>,
    /// New last day
    #[serde(alias = "endDate")]
    pub end_date: Option<DateTime<Utc>>,
    /// New seat limit
    pub capacity: Option<i64>,
    /// New status
    pub status: Option<String>,
}

/// Validate a seat limit coming from a request
fn validate_capacity(capacity: i64) -> AppResult<u32> {
    u32::try_from(capacity)
        .ok()
        .filter(|c| *c > 0)
        .ok_or_else(|| AppError::invalid_input("Capacity must be a positive number"))
}

/// Validate the date range of a cohort
fn validate_dates(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> AppResult<()> {
    if start_date >= end_date {
        return Err(AppError::invalid_input("startDate must be before endDate"));
    }
    Ok(())
}

/// Cohort database operations manager
pub struct CohortsManager {
    pool: SqlitePool,
}

impl CohortsManager {
    /// Create a new cohorts manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a cohort
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the career does not exist, or the
    /// name is already used
    pub async fn create(&self, request: &CreateCohortRequest) -> AppResult<Cohort> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::missing_field("name"));
        }
        let capacity = validate_capacity(request.capacity)?;
        validate_dates(request.start_date, request.end_date)?;
        let status = match request.status.as_deref() {
            Some(status) => status.parse::<CohortStatus>()?,
            None => CohortStatus::for_schedule(request.start_date, request.end_date, Utc::now()),
        };
        ensure_career_exists(&self.pool, request.career_id).await?;

        let cohort = Cohort {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            career_id: request.career_id,
            start_date: request.start_date,
            end_date: request.end_date,
            capacity,
            status,
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO cohorts (id, name, career_id, start_date, end_date, capacity, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(cohort.id.to_string())
        .bind(&cohort.name)
        .bind(cohort.career_id.to_string())
        .bind(format_timestamp(cohort.start_date))
        .bind(format_timestamp(cohort.end_date))
        .bind(i64::from(cohort.capacity))
        .bind(cohort.status.as_str())
        .bind(format_timestamp(cohort.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("Cohort with the same name already exists")
            } else {
                AppError::database(format!("Failed to create cohort: {e}"))
            }
        })?;

        Ok(cohort)
    }

    /// Get a cohort by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, cohort_id: Uuid) -> AppResult<Option<Cohort>> {
        let row = sqlx::query(&format!("SELECT {COHORT_COLUMNS} FROM cohorts WHERE id = $1"))
            .bind(cohort_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get cohort: {e}")))?;

        row.map(|r| row_to_cohort(&r, "")).transpose()
    }

    /// List every cohort with its derived seat availability
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_with_availability(&self) -> AppResult<Vec<CohortAvailability>> {
        let rows = sqlx::query(
            r"
            SELECT c.id, c.name, c.career_id, c.start_date, c.end_date, c.capacity, c.status,
                   c.created_at,
                   (SELECT COUNT(*) FROM enrollments e
                    WHERE e.cohort_id = c.id AND e.status != 'CANCELLED') AS live_enrollments
            FROM cohorts c
            ORDER BY c.start_date ASC, c.id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list cohorts: {e}")))?;

        rows.iter()
            .map(|row| {
                let cohort = row_to_cohort(row, "")?;
                let live: i64 = row.try_get("live_enrollments")?;
                let live_enrollments = u32::try_from(live).unwrap_or(u32::MAX);
                let available_slots =
                    CapacityLimit::cohort(cohort.capacity).available(live_enrollments);
                Ok(CohortAvailability {
                    cohort,
                    live_enrollments,
                    available_slots,
                })
            })
            .collect()
    }

    /// Select the cohort a new enrollment for `career_id` goes into.
    ///
    /// Only UPCOMING cohorts starting strictly after `now` qualify. The earliest
    /// start wins; ties are broken by cohort id.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn find_eligible(
        &self,
        career_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Cohort>> {
        let row = sqlx::query(&format!(
            r"
            SELECT {COHORT_COLUMNS}
            FROM cohorts
            WHERE career_id = $1 AND status = 'UPCOMING' AND start_date > $2
            ORDER BY start_date ASC, id ASC
            LIMIT 1
            "
        ))
        .bind(career_id.to_string())
        .bind(format_timestamp(now))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find eligible cohort: {e}")))?;

        row.map(|r| row_to_cohort(&r, "")).transpose()
    }

    /// Update a cohort with partial data
    ///
    /// Runs under the database write lock so a capacity change is checked
    /// against the live enrollment count no concurrent enrollment can move.
    /// Returns `None` if the cohort does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the new career does not exist, or
    /// the new capacity is below the live enrollment count
    pub async fn update(
        &self,
        cohort_id: Uuid,
        request: &UpdateCohortRequest,
    ) -> AppResult<Option<Cohort>> {
        let mut tx = ImmediateTransaction::begin(&self.pool).await?;
        match Self::update_in(tx.executor(), cohort_id, request).await {
            Ok(updated) => {
                tx.commit().await?;
                Ok(updated)
            }
            Err(e) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(error = %rollback_error, "rollback after failed cohort update failed");
                }
                Err(e)
            }
        }
    }

    async fn update_in(
        conn: &mut SqliteConnection,
        cohort_id: Uuid,
        request: &UpdateCohortRequest,
    ) -> AppResult<Option<Cohort>> {
        let row = sqlx::query(&format!("SELECT {COHORT_COLUMNS} FROM cohorts WHERE id = $1"))
            .bind(cohort_id.to_string())
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to get cohort: {e}")))?;
        let Some(existing) = row.map(|r| row_to_cohort(&r, "")).transpose()? else {
            return Ok(None);
        };

        let name = match request.name.as_deref().map(str::trim) {
            Some("") => return Err(AppError::missing_field("name")),
            Some(name) => name.to_owned(),
            None => existing.name.clone(),
        };
        let capacity = request
            .capacity
            .map(validate_capacity)
            .transpose()?
            .unwrap_or(existing.capacity);
        let start_date = request.start_date.unwrap_or(existing.start_date);
        let end_date = request.end_date.unwrap_or(existing.end_date);
        validate_dates(start_date, end_date)?;
        let status = request
            .status
            .as_deref()
            .map(str::parse::<CohortStatus>)
            .transpose()?
            .unwrap_or(existing.status);
        let career_id = match request.career_id {
            Some(career_id) => {
                ensure_career_exists(&mut *conn, career_id).await?;
                career_id
            }
            None => existing.career_id,
        };

        if capacity < existing.capacity {
            let live = EnrollmentsManager::count_live_in(conn, cohort_id).await?;
            if capacity < live {
                return Err(AppError::conflict(format!(
                    "Capacity {capacity} is below the {live} live enrollments of cohort '{}'",
                    existing.name
                )));
            }
        }

        let updated = Cohort {
            id: existing.id,
            name,
            career_id,
            start_date,
            end_date,
            capacity,
            status,
            created_at: existing.created_at,
        };

        sqlx::query(
            r"
            UPDATE cohorts SET
                name = $1, career_id = $2, start_date = $3, end_date = $4,
                capacity = $5, status = $6
            WHERE id = $7
            ",
        )
        .bind(&updated.name)
        .bind(updated.career_id.to_string())
        .bind(format_timestamp(updated.start_date))
        .bind(format_timestamp(updated.end_date))
        .bind(i64::from(updated.capacity))
        .bind(updated.status.as_str())
        .bind(updated.id.to_string())
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("Cohort with the same name already exists")
            } else {
                AppError::database(format!("Failed to update cohort: {e}"))
            }
        })?;

        Ok(Some(updated))
    }

    /// Delete a cohort and its enrollments.
    ///
    /// Students whose current-enrollment pointer referenced a removed enrollment
    /// are repointed at their most recent remaining live enrollment.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, cohort_id: Uuid) -> AppResult<bool> {
        let mut tx = ImmediateTransaction::begin(&self.pool).await?;
        match Self::delete_in(tx.executor(), cohort_id).await {
            Ok(deleted) => {
                tx.commit().await?;
                Ok(deleted)
            }
            Err(e) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(error = %rollback_error, "rollback after failed cohort delete failed");
                }
                Err(e)
            }
        }
    }

    async fn delete_in(conn: &mut SqliteConnection, cohort_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM cohorts WHERE id = $1")
            .bind(cohort_id.to_string())
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete cohort: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            r"
            UPDATE students SET current_enrollment_id = (
                SELECT e.id FROM enrollments e
                WHERE e.student_id = students.id AND e.status != 'CANCELLED'
                ORDER BY e.created_at DESC, e.id DESC
                LIMIT 1
            )
            WHERE current_enrollment_id IS NOT NULL
              AND current_enrollment_id NOT IN (SELECT id FROM enrollments)
            ",
        )
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to repoint current enrollments: {e}")))?;

        Ok(true)
    }

    /// Cohorts the lifecycle sweeper is allowed to touch (everything not cancelled)
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_sweepable(&self) -> AppResult<Vec<Cohort>> {
        let rows = sqlx::query(&format!(
            "SELECT {COHORT_COLUMNS} FROM cohorts WHERE status != 'CANCELLED' ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list cohorts for sweep: {e}")))?;

        rows.iter().map(|r| row_to_cohort(r, "")).collect()
    }

    /// Apply status transitions in one transaction.
    ///
    /// Cohorts cancelled since they were read are left untouched. Returns the
    /// number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails; no transition is applied then
    pub async fn apply_status_transitions(
        &self,
        transitions: &[(Uuid, CohortStatus)],
    ) -> AppResult<u64> {
        if transitions.is_empty() {
            return Ok(0);
        }

        let mut tx = ImmediateTransaction::begin(&self.pool).await?;
        match Self::apply_in(tx.executor(), transitions).await {
            Ok(changed) => {
                tx.commit().await?;
                Ok(changed)
            }
            Err(e) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(error = %rollback_error, "rollback after failed status sweep failed");
                }
                Err(e)
            }
        }
    }

    async fn apply_in(
        conn: &mut SqliteConnection,
        transitions: &[(Uuid, CohortStatus)],
    ) -> AppResult<u64> {
        let mut changed = 0;
        for (cohort_id, status) in transitions {
            let result = sqlx::query(
                r"
                UPDATE cohorts SET status = $1
                WHERE id = $2 AND status != 'CANCELLED' AND status != $1
                ",
            )
            .bind(status.as_str())
            .bind(cohort_id.to_string())
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to update cohort status: {e}")))?;
            changed += result.rows_affected();
        }
        Ok(changed)
    }
}

/// Reject a career id that has no career row
async fn ensure_career_exists<'e, E>(executor: E, career_id: Uuid) -> AppResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let exists = sqlx::query("SELECT 1 FROM careers WHERE id = $1")
        .bind(career_id.to_string())
        .fetch_optional(executor)
        .await
        .map_err(|e| AppError::database(format!("Failed to look up career: {e}")))?
        .is_some();

    if exists {
        Ok(())
    } else {
        Err(AppError::not_found(
            "Career with provided careerId does not exist",
        ))
    }
}

/// Convert a row to a cohort; `prefix` selects aliased columns in joined queries
pub(crate) fn row_to_cohort(row: &SqliteRow, prefix: &str) -> AppResult<Cohort> {
    let column = |name: &str| format!("{prefix}{name}");

    let id: String = row.try_get(column("id").as_str())?;
    let career_id: String = row.try_get(column("career_id").as_str())?;
    let start_date: String = row.try_get(column("start_date").as_str())?;
    let end_date: String = row.try_get(column("end_date").as_str())?;
    let capacity: i64 = row.try_get(column("capacity").as_str())?;
    let status: String = row.try_get(column("status").as_str())?;
    let created_at: String = row.try_get(column("created_at").as_str())?;

    Ok(Cohort {
        id: parse_uuid(&id, "cohort id")?,
        name: row.try_get(column("name").as_str())?,
        career_id: parse_uuid(&career_id, "cohort career_id")?,
        start_date: parse_timestamp(&start_date, "cohort start_date")?,
        end_date: parse_timestamp(&end_date, "cohort end_date")?,
        capacity: u32::try_from(capacity)
            .map_err(|_| AppError::database(format!("Invalid cohort capacity {capacity}")))?,
        status: status.parse()?,
        created_at: parse_timestamp(&created_at, "cohort created_at")?,
    })
}
