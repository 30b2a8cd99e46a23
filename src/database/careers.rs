// ABOUTME: Database operations for careers (program tracks)
// ABOUTME: Careers cannot be deleted while cohorts still reference them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use chrono::Utc;
use goya_core::errors::{AppError, AppResult};
use goya_core::models::Career;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{format_timestamp, is_unique_violation, parse_timestamp, parse_uuid};

/// Request to create a career
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCareerRequest {
    /// Display title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
}

/// Career database operations manager
pub struct CareersManager {
    pool: SqlitePool,
}

impl CareersManager {
    /// Create a new careers manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a career
    ///
    /// # Errors
    ///
    /// Returns an error if the title is empty or already used
    pub async fn create(&self, request: &CreateCareerRequest) -> AppResult<Career> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(AppError::missing_field("title"));
        }

        let career = Career {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            description: request
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_owned),
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO careers (id, title, description, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(career.id.to_string())
        .bind(&career.title)
        .bind(&career.description)
        .bind(format_timestamp(career.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("Career '{}' already exists", career.title))
            } else {
                AppError::database(format!("Failed to create career: {e}"))
            }
        })?;

        Ok(career)
    }

    /// Get a career by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, career_id: Uuid) -> AppResult<Option<Career>> {
        let row = sqlx::query(
            "SELECT id, title, description, created_at FROM careers WHERE id = $1",
        )
        .bind(career_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get career: {e}")))?;

        row.map(|r| row_to_career(&r, "")).transpose()
    }

    /// List all careers ordered by title
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self) -> AppResult<Vec<Career>> {
        let rows = sqlx::query(
            "SELECT id, title, description, created_at FROM careers ORDER BY title ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list careers: {e}")))?;

        rows.iter().map(|r| row_to_career(r, "")).collect()
    }

    /// Delete a career that has no cohorts
    ///
    /// Returns `false` if the career does not exist.
    ///
    /// # Errors
    ///
    /// Returns a conflict if cohorts still belong to the career
    pub async fn delete(&self, career_id: Uuid) -> AppResult<bool> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM cohorts WHERE career_id = $1")
            .bind(career_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count cohorts: {e}")))?;
        let cohorts: i64 = row.try_get("total")?;
        if cohorts > 0 {
            return Err(AppError::conflict(format!(
                "Career still has {cohorts} cohort(s); delete them first"
            )));
        }

        let result = sqlx::query("DELETE FROM careers WHERE id = $1")
            .bind(career_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if super::is_foreign_key_violation(&e) {
                    AppError::conflict("Career is still referenced by cohorts")
                } else {
                    AppError::database(format!("Failed to delete career: {e}"))
                }
            })?;

        Ok(result.rows_affected() > 0)
    }
}

/// Convert a row to a career; `prefix` selects aliased columns in joined queries
pub(crate) fn row_to_career(row: &SqliteRow, prefix: &str) -> AppResult<Career> {
    let column = |name: &str| format!("{prefix}{name}");

    let id: String = row.try_get(column("id").as_str())?;
    let created_at: String = row.try_get(column("created_at").as_str())?;

    Ok(Career {
        id: parse_uuid(&id, "career id")?,
        title: row.try_get(column("title").as_str())?,
        description: row.try_get(column("description").as_str())?,
        created_at: parse_timestamp(&created_at, "career created_at")?,
    })
}
