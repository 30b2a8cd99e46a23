// ABOUTME: Enrollment join entity between students and cohorts
// ABOUTME: Includes the joined view returned by enrollment endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Career, Cohort};
use crate::errors::{AppError, ErrorCode};

/// Status of an enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    /// Created, awaiting confirmation
    #[default]
    Pending,
    /// Confirmed by the platform
    Confirmed,
    /// Cancelled; no longer counts against cohort capacity
    Cancelled,
}

impl EnrollmentStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(AppError::new(
                ErrorCode::InvalidFormat,
                format!("Invalid enrollment status '{other}'"),
            )),
        }
    }
}

/// A student's participation in a specific cohort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Unique identifier
    pub id: Uuid,
    /// Enrolled student
    pub student_id: Uuid,
    /// Target cohort
    pub cohort_id: Uuid,
    /// Current status
    pub status: EnrollmentStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Enrollment joined with its cohort and career for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentDetails {
    /// The enrollment record
    #[serde(flatten)]
    pub enrollment: Enrollment,
    /// Cohort the student is enrolled in
    pub cohort: Cohort,
    /// Career the cohort belongs to
    pub career: Career,
}
