// ABOUTME: Cohort model with calendar-derived lifecycle status
// ABOUTME: Provides the pure status function used by the lifecycle sweeper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, ErrorCode};

/// Lifecycle status of a cohort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CohortStatus {
    /// Start date is in the future
    #[default]
    Upcoming,
    /// Between start and end date (inclusive)
    Ongoing,
    /// End date has passed
    Completed,
    /// Cancelled by an admin; never changed automatically
    Cancelled,
}

impl CohortStatus {
    /// All statuses, in lifecycle order
    pub const ALL: [Self; 4] = [
        Self::Upcoming,
        Self::Ongoing,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "UPCOMING",
            Self::Ongoing => "ONGOING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Status implied by the calendar alone.
    ///
    /// Never returns [`CohortStatus::Cancelled`]; cancellation is an admin decision.
    #[must_use]
    pub fn for_schedule(
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        if end_date < now {
            Self::Completed
        } else if start_date <= now {
            Self::Ongoing
        } else {
            Self::Upcoming
        }
    }

    /// Whether the status is terminal for automatic transitions
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for CohortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CohortStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "UPCOMING" => Ok(Self::Upcoming),
            "ONGOING" => Ok(Self::Ongoing),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(AppError::new(
                ErrorCode::InvalidFormat,
                format!(
                    "Invalid status '{other}'. Must be one of: UPCOMING, ONGOING, COMPLETED, CANCELLED"
                ),
            )),
        }
    }
}

/// A scheduled, capacity-bounded offering of a career's program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cohort {
    /// Unique identifier
    pub id: Uuid,
    /// Display name, unique across cohorts
    pub name: String,
    /// Owning career
    pub career_id: Uuid,
    /// First day of the cohort
    pub start_date: DateTime<Utc>,
    /// Last day of the cohort
    pub end_date: DateTime<Utc>,
    /// Maximum number of live enrollments
    pub capacity: u32,
    /// Current lifecycle status
    pub status: CohortStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Cohort {
    /// Whether a student can currently be enrolled into this cohort
    #[must_use]
    pub fn accepts_enrollments(&self, now: DateTime<Utc>) -> bool {
        self.status == CohortStatus::Upcoming && self.start_date > now
    }
}

/// Cohort with derived seat availability (never persisted)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortAvailability {
    /// The cohort
    #[serde(flatten)]
    pub cohort: Cohort,
    /// Enrollments that are not cancelled
    pub live_enrollments: u32,
    /// `capacity - live_enrollments`, floored at zero
    pub available_slots: u32,
}
