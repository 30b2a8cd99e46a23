// ABOUTME: Mentoring sessions with their participants and chat messages
// ABOUTME: Messages belong to a session and are ordered by send time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, ErrorCode};

/// State of a mentoring session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Planned
    #[default]
    Scheduled,
    /// Took place
    Completed,
    /// Called off
    Cancelled,
}

impl SessionStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SCHEDULED" => Ok(Self::Scheduled),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(AppError::new(
                ErrorCode::InvalidFormat,
                format!("Invalid session status '{other}'"),
            )),
        }
    }
}

/// A scheduled mentoring session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: Uuid,
    /// Optional topic
    pub title: Option<String>,
    /// Planned start
    pub start_time: DateTime<Utc>,
    /// Planned end
    pub end_time: DateTime<Utc>,
    /// Current state
    pub status: SessionStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Session with the users taking part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDetails {
    /// The session
    #[serde(flatten)]
    pub session: Session,
    /// Participating user accounts, sorted
    pub participant_ids: Vec<Uuid>,
}

/// A chat message posted in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier
    pub id: Uuid,
    /// Session the message belongs to
    pub session_id: Uuid,
    /// Sending user account
    pub sender_id: Uuid,
    /// Message text
    pub content: String,
    /// Send time
    pub created_at: DateTime<Utc>,
    /// Last edit, if any
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_storage_text() {
        for status in [
            SessionStatus::Scheduled,
            SessionStatus::Completed,
            SessionStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<SessionStatus>().unwrap(), status);
        }
        assert_eq!(
            "cancelled".parse::<SessionStatus>().unwrap(),
            SessionStatus::Cancelled
        );
        let err = "POSTPONED".parse::<SessionStatus>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }
}
