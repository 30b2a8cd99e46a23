// ABOUTME: Database operations for enrollments, including the capacity-guarded insert
// ABOUTME: Keeps the student current-enrollment pointer in step with enroll and cancel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use chrono::{DateTime, Utc};
use goya_core::errors::{AppError, AppResult};
use goya_core::models::{Enrollment, EnrollmentDetails, EnrollmentStatus};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use tracing::warn;
use uuid::Uuid;

use super::careers::row_to_career;
use super::cohorts::row_to_cohort;
use super::{
    format_timestamp, is_unique_violation, parse_timestamp, parse_uuid, ImmediateTransaction,
};

/// Enrollment joined with cohort (`co_`) and career (`ca_`) columns
const DETAILS_SELECT: &str = r"
    SELECT e.id, e.student_id, e.cohort_id, e.status, e.created_at,
           co.id AS co_id, co.name AS co_name, co.career_id AS co_career_id,
           co.start_date AS co_start_date, co.end_date AS co_end_date,
           co.capacity AS co_capacity, co.status AS co_status,
           co.created_at AS co_created_at,
           ca.id AS ca_id, ca.title AS ca_title, ca.description AS ca_description,
           ca.created_at AS ca_created_at
    FROM enrollments e
    JOIN cohorts co ON co.id = e.cohort_id
    JOIN careers ca ON ca.id = co.career_id
";

/// Resets a student's pointer to their most recent live enrollment
const RECOMPUTE_CURRENT_ENROLLMENT: &str = r"
    UPDATE students SET current_enrollment_id = (
        SELECT e.id FROM enrollments e
        WHERE e.student_id = students.id AND e.status != 'CANCELLED'
        ORDER BY e.created_at DESC, e.id DESC
        LIMIT 1
    )
    WHERE id = $1
";

/// Outcome of a capacity-guarded enrollment insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentInsert {
    /// The enrollment was created and the student pointer updated
    Inserted(Enrollment),
    /// The student already has an enrollment in the cohort
    AlreadyEnrolled,
    /// The cohort had no free seat
    Full {
        /// Live enrollments observed under the write lock
        live: u32,
        /// Cohort capacity
        capacity: u32,
    },
}

/// Enrollment database operations manager
pub struct EnrollmentsManager {
    pool: SqlitePool,
}

impl EnrollmentsManager {
    /// Create a new enrollments manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a PENDING enrollment if the cohort still has a free seat.
    ///
    /// The seat check and the insert are one statement executed under the
    /// database write lock, so concurrent callers can never push the live count
    /// past the capacity. The student's current-enrollment pointer is updated
    /// in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the cohort disappeared or a database operation fails
    pub async fn insert_within_capacity(
        &self,
        student_id: Uuid,
        cohort_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<EnrollmentInsert> {
        let mut tx = ImmediateTransaction::begin(&self.pool).await?;
        match Self::insert_in(tx.executor(), student_id, cohort_id, now).await {
            Ok(outcome) => {
                tx.commit().await?;
                Ok(outcome)
            }
            Err(e) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(error = %rollback_error, "rollback after failed enrollment failed");
                }
                Err(e)
            }
        }
    }

    async fn insert_in(
        conn: &mut SqliteConnection,
        student_id: Uuid,
        cohort_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<EnrollmentInsert> {
        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            student_id,
            cohort_id,
            status: EnrollmentStatus::Pending,
            created_at: now,
        };

        let inserted = sqlx::query(
            r"
            INSERT INTO enrollments (id, student_id, cohort_id, status, created_at)
            SELECT $1, $2, $3, $4, $5
            WHERE (SELECT COUNT(*) FROM enrollments
                   WHERE cohort_id = $3 AND status != 'CANCELLED')
                < (SELECT capacity FROM cohorts WHERE id = $3)
            ",
        )
        .bind(enrollment.id.to_string())
        .bind(student_id.to_string())
        .bind(cohort_id.to_string())
        .bind(enrollment.status.as_str())
        .bind(format_timestamp(enrollment.created_at))
        .execute(&mut *conn)
        .await;

        let rows = match inserted {
            Ok(result) => result.rows_affected(),
            Err(e) if is_unique_violation(&e) => return Ok(EnrollmentInsert::AlreadyEnrolled),
            Err(e) => return Err(AppError::database(format!("Failed to create enrollment: {e}"))),
        };

        if rows == 0 {
            return Self::classify_rejection(conn, student_id, cohort_id).await;
        }

        sqlx::query("UPDATE students SET current_enrollment_id = $1 WHERE id = $2")
            .bind(enrollment.id.to_string())
            .bind(student_id.to_string())
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to update current enrollment: {e}"))
            })?;

        Ok(EnrollmentInsert::Inserted(enrollment))
    }

    /// Explain why the conditional insert wrote nothing
    async fn classify_rejection(
        conn: &mut SqliteConnection,
        student_id: Uuid,
        cohort_id: Uuid,
    ) -> AppResult<EnrollmentInsert> {
        let duplicate = sqlx::query(
            "SELECT 1 FROM enrollments WHERE student_id = $1 AND cohort_id = $2",
        )
        .bind(student_id.to_string())
        .bind(cohort_id.to_string())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to look up enrollment: {e}")))?;
        if duplicate.is_some() {
            return Ok(EnrollmentInsert::AlreadyEnrolled);
        }

        let row = sqlx::query(
            r"
            SELECT c.capacity,
                   (SELECT COUNT(*) FROM enrollments e
                    WHERE e.cohort_id = c.id AND e.status != 'CANCELLED') AS live
            FROM cohorts c
            WHERE c.id = $1
            ",
        )
        .bind(cohort_id.to_string())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to read cohort capacity: {e}")))?
        .ok_or_else(|| AppError::not_found(format!("Cohort {cohort_id} no longer exists")))?;

        let capacity: i64 = row.try_get("capacity")?;
        let live: i64 = row.try_get("live")?;
        Ok(EnrollmentInsert::Full {
            live: u32::try_from(live).unwrap_or(u32::MAX),
            capacity: u32::try_from(capacity).unwrap_or(0),
        })
    }

    /// Count live (non-cancelled) enrollments of a cohort
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn count_live(&self, cohort_id: Uuid) -> AppResult<u32> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        Self::count_live_in(&mut conn, cohort_id).await
    }

    /// [`Self::count_live`] on a caller-held connection, typically inside a transaction
    pub(crate) async fn count_live_in(
        conn: &mut SqliteConnection,
        cohort_id: Uuid,
    ) -> AppResult<u32> {
        let row = sqlx::query(
            r"
            SELECT COUNT(*) AS live FROM enrollments
            WHERE cohort_id = $1 AND status != 'CANCELLED'
            ",
        )
        .bind(cohort_id.to_string())
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to count enrollments: {e}")))?;

        let live: i64 = row.try_get("live")?;
        Ok(u32::try_from(live).unwrap_or(u32::MAX))
    }

    /// List a student's enrollments, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_for_student(&self, student_id: Uuid) -> AppResult<Vec<EnrollmentDetails>> {
        let rows = sqlx::query(&format!(
            "{DETAILS_SELECT} WHERE e.student_id = $1 ORDER BY e.created_at ASC, e.id ASC"
        ))
        .bind(student_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list enrollments: {e}")))?;

        rows.iter().map(row_to_details).collect()
    }

    /// List the enrollments of a cohort, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_for_cohort(&self, cohort_id: Uuid) -> AppResult<Vec<Enrollment>> {
        let rows = sqlx::query(
            r"
            SELECT id, student_id, cohort_id, status, created_at
            FROM enrollments
            WHERE cohort_id = $1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(cohort_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list cohort enrollments: {e}")))?;

        rows.iter().map(|r| row_to_enrollment(r, "")).collect()
    }

    /// Mark an enrollment CANCELLED, freeing its seat.
    ///
    /// When the student's current-enrollment pointer referenced it, the pointer
    /// moves to their most recent remaining live enrollment. Returns `None` if the
    /// enrollment does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn cancel(&self, enrollment_id: Uuid) -> AppResult<Option<Enrollment>> {
        let mut tx = ImmediateTransaction::begin(&self.pool).await?;
        match Self::cancel_in(tx.executor(), enrollment_id).await {
            Ok(cancelled) => {
                tx.commit().await?;
                Ok(cancelled)
            }
            Err(e) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(error = %rollback_error, "rollback after failed cancellation failed");
                }
                Err(e)
            }
        }
    }

    async fn cancel_in(
        conn: &mut SqliteConnection,
        enrollment_id: Uuid,
    ) -> AppResult<Option<Enrollment>> {
        let result = sqlx::query("UPDATE enrollments SET status = 'CANCELLED' WHERE id = $1")
            .bind(enrollment_id.to_string())
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to cancel enrollment: {e}")))?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let row = sqlx::query(
            "SELECT id, student_id, cohort_id, status, created_at FROM enrollments WHERE id = $1",
        )
        .bind(enrollment_id.to_string())
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to reload enrollment: {e}")))?;
        let enrollment = row_to_enrollment(&row, "")?;

        sqlx::query(&format!(
            "{RECOMPUTE_CURRENT_ENROLLMENT} AND current_enrollment_id = $2"
        ))
        .bind(enrollment.student_id.to_string())
        .bind(enrollment.id.to_string())
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to repoint current enrollment: {e}")))?;

        Ok(Some(enrollment))
    }
}

/// Convert a row to an enrollment; `prefix` selects aliased columns in joined queries
pub(crate) fn row_to_enrollment(row: &SqliteRow, prefix: &str) -> AppResult<Enrollment> {
    let column = |name: &str| format!("{prefix}{name}");

    let id: String = row.try_get(column("id").as_str())?;
    let student_id: String = row.try_get(column("student_id").as_str())?;
    let cohort_id: String = row.try_get(column("cohort_id").as_str())?;
    let status: String = row.try_get(column("status").as_str())?;
    let created_at: String = row.try_get(column("created_at").as_str())?;

    Ok(Enrollment {
        id: parse_uuid(&id, "enrollment id")?,
        student_id: parse_uuid(&student_id, "enrollment student_id")?,
        cohort_id: parse_uuid(&cohort_id, "enrollment cohort_id")?,
        status: status.parse()?,
        created_at: parse_timestamp(&created_at, "enrollment created_at")?,
    })
}

fn row_to_details(row: &SqliteRow) -> AppResult<EnrollmentDetails> {
    Ok(EnrollmentDetails {
        enrollment: row_to_enrollment(row, "")?,
        cohort: row_to_cohort(row, "co_")?,
        career: row_to_career(row, "ca_")?,
    })
}
