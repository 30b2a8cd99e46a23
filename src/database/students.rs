// ABOUTME: Database operations for student records and their mentor links
// ABOUTME: Includes the capacity-guarded mentor link used by mentor assignment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use chrono::Utc;
use goya_core::errors::{AppError, AppResult};
use goya_core::models::{Student, StudentProfile, StudentStatus, UserRole};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::coaches::row_to_coach;
use super::enrollments::row_to_enrollment;
use super::users::row_to_user;
use super::{
    format_timestamp, is_unique_violation, parse_optional_uuid, parse_timestamp, parse_uuid,
};

/// Student joined with user (`u_`), coach (`ch_`) and current enrollment (`ce_`)
const PROFILE_SELECT: &str = r"
    SELECT s.id, s.user_id, s.coach_id, s.current_enrollment_id, s.status, s.created_at,
           u.id AS u_id, u.email AS u_email, u.first_name AS u_first_name,
           u.last_name AS u_last_name, u.role AS u_role, u.approved AS u_approved,
           u.created_at AS u_created_at,
           ch.id AS ch_id, ch.user_id AS ch_user_id, ch.career_id AS ch_career_id,
           ch.bio AS ch_bio, ch.created_at AS ch_created_at,
           ce.id AS ce_id, ce.student_id AS ce_student_id, ce.cohort_id AS ce_cohort_id,
           ce.status AS ce_status, ce.created_at AS ce_created_at
    FROM students s
    JOIN users u ON u.id = s.user_id
    LEFT JOIN coaches ch ON ch.id = s.coach_id
    LEFT JOIN enrollments ce ON ce.id = s.current_enrollment_id
";

/// Request to register a student record for an existing user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    /// User account with the student role
    #[serde(alias = "userId")]
    pub user_id: Uuid,
}

/// Student database operations manager
pub struct StudentsManager {
    pool: SqlitePool,
}

impl StudentsManager {
    /// Create a new students manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a student record
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist, is not a student, or already
    /// has a student record
    pub async fn create(&self, request: &CreateStudentRequest) -> AppResult<Student> {
        let role = self.user_role(request.user_id).await?;
        if role != UserRole::Student {
            return Err(AppError::invalid_input(format!(
                "User {} has role '{role}', expected 'student'",
                request.user_id
            )));
        }

        let student = Student {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            coach_id: None,
            current_enrollment_id: None,
            status: StudentStatus::Waitlist,
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO students (id, user_id, coach_id, current_enrollment_id, status, created_at)
            VALUES ($1, $2, NULL, NULL, $3, $4)
            ",
        )
        .bind(student.id.to_string())
        .bind(student.user_id.to_string())
        .bind(student.status.as_str())
        .bind(format_timestamp(student.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("User already has a student record")
            } else {
                AppError::database(format!("Failed to create student: {e}"))
            }
        })?;

        Ok(student)
    }

    /// Get a student by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, student_id: Uuid) -> AppResult<Option<Student>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, coach_id, current_enrollment_id, status, created_at
            FROM students
            WHERE id = $1
            ",
        )
        .bind(student_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get student: {e}")))?;

        row.map(|r| row_to_student(&r, "")).transpose()
    }

    /// Get a student with user, mentor and current enrollment
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_profile(&self, student_id: Uuid) -> AppResult<Option<StudentProfile>> {
        let row = sqlx::query(&format!("{PROFILE_SELECT} WHERE s.id = $1"))
            .bind(student_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get student profile: {e}")))?;

        row.map(|r| row_to_profile(&r)).transpose()
    }

    /// List all students, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self) -> AppResult<Vec<StudentProfile>> {
        let rows = sqlx::query(&format!(
            "{PROFILE_SELECT} ORDER BY s.created_at ASC, s.id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list students: {e}")))?;

        rows.iter().map(row_to_profile).collect()
    }

    /// Students still awaiting an admission decision, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_waitlist(&self) -> AppResult<Vec<StudentProfile>> {
        let rows = sqlx::query(&format!(
            "{PROFILE_SELECT} WHERE s.status = $1 ORDER BY s.created_at ASC, s.id ASC"
        ))
        .bind(StudentStatus::Waitlist.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list waitlist: {e}")))?;

        rows.iter().map(row_to_profile).collect()
    }

    /// Record the admission decision for a waitlisted student.
    ///
    /// Only students still on the waitlist can be decided; the status check and
    /// the write are one statement.
    ///
    /// # Errors
    ///
    /// - `INVALID_INPUT` if `decision` is not APPROVED or REJECTED
    /// - `RESOURCE_NOT_FOUND` for an unknown student
    /// - `RESOURCE_CONFLICT` when the student was already decided
    pub async fn resolve_waitlist(
        &self,
        student_id: Uuid,
        decision: StudentStatus,
    ) -> AppResult<Student> {
        if decision == StudentStatus::Waitlist {
            return Err(AppError::invalid_input(
                "A waitlist decision must approve or reject",
            ));
        }

        let result = sqlx::query("UPDATE students SET status = $1 WHERE id = $2 AND status = $3")
            .bind(decision.as_str())
            .bind(student_id.to_string())
            .bind(StudentStatus::Waitlist.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update student status: {e}")))?;

        let student = self
            .get(student_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Student {student_id} not found")))?;
        if result.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "Student {student_id} is not on the waitlist (status {})",
                student.status
            )));
        }
        Ok(student)
    }

    /// Delete a student and, through the schema, their enrollments
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, student_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(student_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete student: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Link a student to a coach only while the coach has fewer than `limit`
    /// linked students.
    ///
    /// The count and the write are one statement, so concurrent assignments
    /// cannot exceed the limit. Returns `false` when the coach is full.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn assign_coach_within_capacity(
        &self,
        student_id: Uuid,
        coach_id: Uuid,
        limit: u32,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE students SET coach_id = $1
            WHERE id = $2
              AND (SELECT COUNT(*) FROM students WHERE coach_id = $1) < $3
            ",
        )
        .bind(coach_id.to_string())
        .bind(student_id.to_string())
        .bind(i64::from(limit))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to assign mentor: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a student's mentor link
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn clear_coach(&self, student_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("UPDATE students SET coach_id = NULL WHERE id = $1")
            .bind(student_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to unassign mentor: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of students linked to a coach
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn count_for_coach(&self, coach_id: Uuid) -> AppResult<u32> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM students WHERE coach_id = $1")
            .bind(coach_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count mentees: {e}")))?;

        let total: i64 = row.try_get("total")?;
        Ok(u32::try_from(total).unwrap_or(u32::MAX))
    }

    async fn user_role(&self, user_id: Uuid) -> AppResult<UserRole> {
        let row = sqlx::query("SELECT role FROM users WHERE id = $1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up user: {e}")))?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;

        let role: String = row.try_get("role")?;
        role.parse()
    }
}

/// Convert a row to a student; `prefix` selects aliased columns in joined queries
pub(crate) fn row_to_student(row: &SqliteRow, prefix: &str) -> AppResult<Student> {
    let column = |name: &str| format!("{prefix}{name}");

    let id: String = row.try_get(column("id").as_str())?;
    let user_id: String = row.try_get(column("user_id").as_str())?;
    let coach_id: Option<String> = row.try_get(column("coach_id").as_str())?;
    let current_enrollment_id: Option<String> =
        row.try_get(column("current_enrollment_id").as_str())?;
    let status: String = row.try_get(column("status").as_str())?;
    let created_at: String = row.try_get(column("created_at").as_str())?;

    Ok(Student {
        id: parse_uuid(&id, "student id")?,
        user_id: parse_uuid(&user_id, "student user_id")?,
        coach_id: parse_optional_uuid(coach_id.as_deref(), "student coach_id")?,
        current_enrollment_id: parse_optional_uuid(
            current_enrollment_id.as_deref(),
            "student current_enrollment_id",
        )?,
        status: status.parse()?,
        created_at: parse_timestamp(&created_at, "student created_at")?,
    })
}

fn row_to_profile(row: &SqliteRow) -> AppResult<StudentProfile> {
    let coach_id: Option<String> = row.try_get("ch_id")?;
    let current_id: Option<String> = row.try_get("ce_id")?;

    Ok(StudentProfile {
        student: row_to_student(row, "")?,
        user: row_to_user(row, "u_")?,
        coach: coach_id.map(|_| row_to_coach(row, "ch_")).transpose()?,
        current_enrollment: current_id.map(|_| row_to_enrollment(row, "ce_")).transpose()?,
    })
}
