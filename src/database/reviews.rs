// ABOUTME: Database operations for student reviews of coaches
// ABOUTME: Stores one scored review per (coach, student) pair and aggregates the average
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use chrono::Utc;
use goya_core::errors::{AppError, AppResult};
use goya_core::models::review::{MAX_RATING, MIN_RATING};
use goya_core::models::{CoachRating, Review, ReviewWithStudent};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{format_timestamp, is_unique_violation, parse_timestamp, parse_uuid, Page};

/// Body of a review submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReviewRequest {
    /// Reviewing student
    #[serde(alias = "studentId")]
    pub student_id: Uuid,
    /// Score from 1 to 5
    pub rating: i64,
    /// Free-form feedback
    #[serde(default)]
    pub comment: Option<String>,
}

/// Review database operations manager
pub struct ReviewsManager {
    pool: SqlitePool,
}

impl ReviewsManager {
    /// Create a new reviews manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a student's review of a coach
    ///
    /// # Errors
    ///
    /// - `INVALID_INPUT` when the rating is outside 1..=5
    /// - `RESOURCE_NOT_FOUND` for an unknown coach or student
    /// - `RESOURCE_CONFLICT` when the student already reviewed the coach
    pub async fn submit(
        &self,
        coach_id: Uuid,
        request: &SubmitReviewRequest,
    ) -> AppResult<Review> {
        let rating = u8::try_from(request.rating)
            .ok()
            .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
            .ok_or_else(|| {
                AppError::invalid_input(format!(
                    "Rating must be between {MIN_RATING} and {MAX_RATING}"
                ))
            })?;
        self.ensure_exists("coaches", coach_id, "Coach").await?;
        self.ensure_exists("students", request.student_id, "Student")
            .await?;

        let review = Review {
            id: Uuid::new_v4(),
            coach_id,
            student_id: request.student_id,
            rating,
            comment: request
                .comment
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_owned),
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO reviews (id, coach_id, student_id, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(review.id.to_string())
        .bind(review.coach_id.to_string())
        .bind(review.student_id.to_string())
        .bind(i64::from(review.rating))
        .bind(review.comment.as_deref())
        .bind(format_timestamp(review.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("Student has already reviewed this coach")
            } else {
                AppError::database(format!("Failed to create review: {e}"))
            }
        })?;

        Ok(review)
    }

    /// Reviews of a coach with reviewer names, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_for_coach(
        &self,
        coach_id: Uuid,
        page: Page,
    ) -> AppResult<Vec<ReviewWithStudent>> {
        let rows = sqlx::query(
            r"
            SELECT r.id, r.coach_id, r.student_id, r.rating, r.comment, r.created_at,
                   u.first_name, u.last_name
            FROM reviews r
            JOIN students s ON s.id = r.student_id
            JOIN users u ON u.id = s.user_id
            WHERE r.coach_id = $1
            ORDER BY r.created_at DESC, r.id ASC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(coach_id.to_string())
        .bind(i64::from(page.limit()))
        .bind(i64::from(page.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list reviews: {e}")))?;

        rows.iter()
            .map(|row| {
                let first_name: String = row.try_get("first_name")?;
                let last_name: String = row.try_get("last_name")?;
                Ok(ReviewWithStudent {
                    review: row_to_review(row)?,
                    student_name: format!("{first_name} {last_name}"),
                })
            })
            .collect()
    }

    /// Average score and review count of a coach
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn rating_for_coach(&self, coach_id: Uuid) -> AppResult<CoachRating> {
        let row = sqlx::query(
            r"
            SELECT AVG(rating) AS average_rating, COUNT(*) AS review_count
            FROM reviews
            WHERE coach_id = $1
            ",
        )
        .bind(coach_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to aggregate ratings: {e}")))?;

        let average_rating: Option<f64> = row.try_get("average_rating")?;
        let review_count: i64 = row.try_get("review_count")?;
        Ok(CoachRating {
            coach_id,
            average_rating,
            review_count: u32::try_from(review_count).unwrap_or(u32::MAX),
        })
    }

    async fn ensure_exists(&self, table: &'static str, id: Uuid, what: &str) -> AppResult<()> {
        let found = sqlx::query(&format!("SELECT 1 FROM {table} WHERE id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up {what}: {e}")))?
            .is_some();

        if found {
            Ok(())
        } else {
            Err(AppError::not_found(format!("{what} {id} not found")))
        }
    }
}

fn row_to_review(row: &SqliteRow) -> AppResult<Review> {
    let id: String = row.try_get("id")?;
    let coach_id: String = row.try_get("coach_id")?;
    let student_id: String = row.try_get("student_id")?;
    let rating: i64 = row.try_get("rating")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Review {
        id: parse_uuid(&id, "review id")?,
        coach_id: parse_uuid(&coach_id, "review coach_id")?,
        student_id: parse_uuid(&student_id, "review student_id")?,
        rating: u8::try_from(rating)
            .map_err(|_| AppError::database(format!("Invalid review rating {rating}")))?,
        comment: row.try_get("comment")?,
        created_at: parse_timestamp(&created_at, "review created_at")?,
    })
}
