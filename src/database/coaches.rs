// ABOUTME: Database operations for coaches (mentors) attached to user accounts
// ABOUTME: Lists coaches with their user, career, and current mentee count
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use chrono::Utc;
use goya_core::errors::{AppError, AppResult};
use goya_core::models::{Coach, CoachProfile, UserRole};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::careers::row_to_career;
use super::users::row_to_user;
use super::{
    format_timestamp, is_unique_violation, parse_optional_uuid, parse_timestamp, parse_uuid,
};

/// Coach joined with user (`u_`), career (`ca_`) and mentee count
const PROFILE_SELECT: &str = r"
    SELECT ch.id, ch.user_id, ch.career_id, ch.bio, ch.created_at,
           u.id AS u_id, u.email AS u_email, u.first_name AS u_first_name,
           u.last_name AS u_last_name, u.role AS u_role, u.approved AS u_approved,
           u.created_at AS u_created_at,
           ca.id AS ca_id, ca.title AS ca_title, ca.description AS ca_description,
           ca.created_at AS ca_created_at,
           (SELECT COUNT(*) FROM students s WHERE s.coach_id = ch.id) AS student_count
    FROM coaches ch
    JOIN users u ON u.id = ch.user_id
    LEFT JOIN careers ca ON ca.id = ch.career_id
";

/// Request to register a coach record for an existing user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCoachRequest {
    /// User account with the coach role
    #[serde(alias = "userId")]
    pub user_id: Uuid,
    /// Career the coach mentors for
    #[serde(default, alias = "careerId")]
    pub career_id: Option<Uuid>,
    /// Short biography
    #[serde(default)]
    pub bio: Option<String>,
}

/// Coach database operations manager
pub struct CoachesManager {
    pool: SqlitePool,
}

impl CoachesManager {
    /// Create a new coaches manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a coach record
    ///
    /// # Errors
    ///
    /// Returns an error if the user or career does not exist, the user is not a
    /// coach, or the user already has a coach record
    pub async fn create(&self, request: &CreateCoachRequest) -> AppResult<Coach> {
        let row = sqlx::query("SELECT role FROM users WHERE id = $1")
            .bind(request.user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up user: {e}")))?
            .ok_or_else(|| AppError::not_found(format!("User {} not found", request.user_id)))?;
        let role: UserRole = row.try_get::<String, _>("role")?.parse()?;
        if role != UserRole::Coach {
            return Err(AppError::invalid_input(format!(
                "User {} has role '{role}', expected 'coach'",
                request.user_id
            )));
        }

        if let Some(career_id) = request.career_id {
            let career = sqlx::query("SELECT 1 FROM careers WHERE id = $1")
                .bind(career_id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to look up career: {e}")))?;
            if career.is_none() {
                return Err(AppError::not_found(format!("Career {career_id} not found")));
            }
        }

        let coach = Coach {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            career_id: request.career_id,
            bio: request
                .bio
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_owned),
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO coaches (id, user_id, career_id, bio, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(coach.id.to_string())
        .bind(coach.user_id.to_string())
        .bind(coach.career_id.map(|id| id.to_string()))
        .bind(&coach.bio)
        .bind(format_timestamp(coach.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("User already has a coach record")
            } else {
                AppError::database(format!("Failed to create coach: {e}"))
            }
        })?;

        Ok(coach)
    }

    /// Get a coach by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, coach_id: Uuid) -> AppResult<Option<Coach>> {
        let row = sqlx::query(
            "SELECT id, user_id, career_id, bio, created_at FROM coaches WHERE id = $1",
        )
        .bind(coach_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get coach: {e}")))?;

        row.map(|r| row_to_coach(&r, "")).transpose()
    }

    /// Get a coach with user, career and mentee count
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_profile(&self, coach_id: Uuid) -> AppResult<Option<CoachProfile>> {
        let row = sqlx::query(&format!("{PROFILE_SELECT} WHERE ch.id = $1"))
            .bind(coach_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get coach profile: {e}")))?;

        row.map(|r| row_to_profile(&r)).transpose()
    }

    /// List all coaches
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self) -> AppResult<Vec<CoachProfile>> {
        let rows = sqlx::query(&format!(
            "{PROFILE_SELECT} ORDER BY u.last_name ASC, u.first_name ASC, ch.id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list coaches: {e}")))?;

        rows.iter().map(row_to_profile).collect()
    }

    /// List the coaches mentoring for a career
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_for_career(&self, career_id: Uuid) -> AppResult<Vec<CoachProfile>> {
        let rows = sqlx::query(&format!(
            "{PROFILE_SELECT} WHERE ch.career_id = $1 ORDER BY u.last_name ASC, u.first_name ASC, ch.id ASC"
        ))
        .bind(career_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list coaches for career: {e}")))?;

        rows.iter().map(row_to_profile).collect()
    }
}

/// Convert a row to a coach; `prefix` selects aliased columns in joined queries
pub(crate) fn row_to_coach(row: &SqliteRow, prefix: &str) -> AppResult<Coach> {
    let column = |name: &str| format!("{prefix}{name}");

    let id: String = row.try_get(column("id").as_str())?;
    let user_id: String = row.try_get(column("user_id").as_str())?;
    let career_id: Option<String> = row.try_get(column("career_id").as_str())?;
    let created_at: String = row.try_get(column("created_at").as_str())?;

    Ok(Coach {
        id: parse_uuid(&id, "coach id")?,
        user_id: parse_uuid(&user_id, "coach user_id")?,
        career_id: parse_optional_uuid(career_id.as_deref(), "coach career_id")?,
        bio: row.try_get(column("bio").as_str())?,
        created_at: parse_timestamp(&created_at, "coach created_at")?,
    })
}

fn row_to_profile(row: &SqliteRow) -> AppResult<CoachProfile> {
    let career_id: Option<String> = row.try_get("ca_id")?;
    let student_count: i64 = row.try_get("student_count")?;

    Ok(CoachProfile {
        coach: row_to_coach(row, "")?,
        user: row_to_user(row, "u_")?,
        career: career_id.map(|_| row_to_career(row, "ca_")).transpose()?,
        student_count: u32::try_from(student_count).unwrap_or(u32::MAX),
    })
}
