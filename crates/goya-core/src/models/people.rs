// ABOUTME: User, student, and coach models
// ABOUTME: Role records hang off a user account; students also carry a waitlist state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Career, Enrollment};
use crate::errors::{AppError, ErrorCode};

/// Platform role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Learner enrolling into cohorts
    #[default]
    Student,
    /// Mentor supervising students
    Coach,
    /// Platform administrator
    Admin,
}

impl UserRole {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Coach => "coach",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "coach" | "mentor" => Ok(Self::Coach),
            "admin" => Ok(Self::Admin),
            other => Err(AppError::new(
                ErrorCode::InvalidFormat,
                format!("Invalid role '{other}'"),
            )),
        }
    }
}

/// Admission state of a student on the waitlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentStatus {
    /// Signed up, awaiting an admission decision
    #[default]
    Waitlist,
    /// Admitted by an admin
    Approved,
    /// Turned down by an admin
    Rejected,
}

impl StudentStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Waitlist => "WAITLIST",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "WAITLIST" => Ok(Self::Waitlist),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(AppError::new(
                ErrorCode::InvalidFormat,
                format!("Invalid student status '{other}'"),
            )),
        }
    }
}

/// A user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Contact address, unique across users
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Platform role
    pub role: UserRole,
    /// Whether an admin approved the account
    pub approved: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Full display name
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Student role record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user account
    pub user_id: Uuid,
    /// Assigned mentor, if any
    pub coach_id: Option<Uuid>,
    /// Most recent live enrollment (denormalized lookup pointer)
    pub current_enrollment_id: Option<Uuid>,
    /// Waitlist admission state
    pub status: StudentStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Student with its user account, mentor, and current enrollment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Student record
    #[serde(flatten)]
    pub student: Student,
    /// Owning user
    pub user: User,
    /// Assigned mentor
    pub coach: Option<Coach>,
    /// Enrollment referenced by `current_enrollment_id`
    pub current_enrollment: Option<Enrollment>,
}

/// Coach (mentor) role record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coach {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user account
    pub user_id: Uuid,
    /// Career the coach mentors for
    pub career_id: Option<Uuid>,
    /// Short biography
    pub bio: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Coach with user account, career, and current load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachProfile {
    /// Coach record
    #[serde(flatten)]
    pub coach: Coach,
    /// Owning user
    pub user: User,
    /// Career the coach mentors for
    pub career: Option<Career>,
    /// Number of students currently linked to the coach
    pub student_count: u32,
}
