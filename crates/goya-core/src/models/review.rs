// ABOUTME: Student reviews of coaches and the derived average rating
// ABOUTME: A student reviews a given coach at most once, with a 1-5 score
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest accepted score
pub const MIN_RATING: u8 = 1;
/// Highest accepted score
pub const MAX_RATING: u8 = 5;

/// A student's rating of a coach
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Unique identifier
    pub id: Uuid,
    /// Reviewed coach
    pub coach_id: Uuid,
    /// Reviewing student
    pub student_id: Uuid,
    /// Score between [`MIN_RATING`] and [`MAX_RATING`]
    pub rating: u8,
    /// Free-form feedback
    pub comment: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Review with the reviewer's display name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewWithStudent {
    /// The review
    #[serde(flatten)]
    pub review: Review,
    /// Reviewer's full name
    pub student_name: String,
}

/// Aggregate score of a coach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachRating {
    /// Rated coach
    pub coach_id: Uuid,
    /// Mean score; `None` until the first review
    pub average_rating: Option<f64>,
    /// Number of reviews
    pub review_count: u32,
}
