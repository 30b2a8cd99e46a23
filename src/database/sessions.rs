// ABOUTME: Database operations for mentoring sessions and their participant lists
// ABOUTME: A session and its participants are written together in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use goya_core::errors::{AppError, AppResult};
use goya_core::models::{Session, SessionDetails, SessionStatus};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use tracing::warn;
use uuid::Uuid;

use super::{
    format_timestamp, is_foreign_key_violation, parse_timestamp, parse_uuid, ImmediateTransaction,
};

const SESSION_COLUMNS: &str = "id, title, start_time, end_time, status, created_at";

/// Request to schedule a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Optional topic
    #[serde(default)]
    pub title: Option<String>,
    /// Planned start
    #[serde(alias = "startTime")]
    pub start_time: DateTime<Utc>,
    /// Planned end
    #[serde(alias = "endTime")]
    pub end_time: DateTime<Utc>,
    /// User accounts taking part
    #[serde(default, alias = "participantIds")]
    pub participant_ids: Vec<Uuid>,
}

/// Partial session update; absent fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSessionRequest {
    /// New topic
    pub title: Option<String>,
    /// New start
    #[serde(alias = "startTime")]
    pub start_time: Option<DateTime<Utc>>,
    /// New end
    #[serde(alias = "endTime")]
    pub end_time: Option<DateTime<Utc>>,
    /// New state
    pub status: Option<String>,
}

fn validate_times(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> AppResult<()> {
    if start_time >= end_time {
        return Err(AppError::invalid_input("startTime must be before endTime"));
    }
    Ok(())
}

fn normalize_title(title: Option<&str>) -> Option<String> {
    title.map(str::trim).filter(|t| !t.is_empty()).map(str::to_owned)
}

/// Session database operations manager
pub struct SessionsManager {
    pool: SqlitePool,
}

impl SessionsManager {
    /// Create a new sessions manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Schedule a session with its participants
    ///
    /// # Errors
    ///
    /// Returns an error if the times are inverted or a participant is not a user
    pub async fn create(&self, request: &CreateSessionRequest) -> AppResult<SessionDetails> {
        validate_times(request.start_time, request.end_time)?;

        let session = Session {
            id: Uuid::new_v4(),
            title: normalize_title(request.title.as_deref()),
            start_time: request.start_time,
            end_time: request.end_time,
            status: SessionStatus::Scheduled,
            created_at: Utc::now(),
        };
        let participants: BTreeSet<Uuid> = request.participant_ids.iter().copied().collect();

        let mut tx = ImmediateTransaction::begin(&self.pool).await?;
        match Self::create_in(tx.executor(), &session, &participants).await {
            Ok(()) => tx.commit().await?,
            Err(e) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(error = %rollback_error, "rollback after failed session create failed");
                }
                return Err(e);
            }
        }

        Ok(SessionDetails {
            session,
            participant_ids: participants.into_iter().collect(),
        })
    }

    async fn create_in(
        conn: &mut SqliteConnection,
        session: &Session,
        participants: &BTreeSet<Uuid>,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO sessions (id, title, start_time, end_time, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(session.id.to_string())
        .bind(session.title.as_deref())
        .bind(format_timestamp(session.start_time))
        .bind(format_timestamp(session.end_time))
        .bind(session.status.as_str())
        .bind(format_timestamp(session.created_at))
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to create session: {e}")))?;

        for user_id in participants {
            sqlx::query("INSERT INTO session_participants (session_id, user_id) VALUES ($1, $2)")
                .bind(session.id.to_string())
                .bind(user_id.to_string())
                .execute(&mut *conn)
                .await
                .map_err(|e| {
                    if is_foreign_key_violation(&e) {
                        AppError::not_found(format!("Participant {user_id} not found"))
                    } else {
                        AppError::database(format!("Failed to add session participant: {e}"))
                    }
                })?;
        }
        Ok(())
    }

    /// Get a session with its participants
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, session_id: Uuid) -> AppResult<Option<SessionDetails>> {
        let row = sqlx::query(&format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1"))
            .bind(session_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get session: {e}")))?;
        let Some(row) = row else {
            return Ok(None);
        };
        let session = row_to_session(&row)?;

        let rows = sqlx::query(
            "SELECT user_id FROM session_participants WHERE session_id = $1 ORDER BY user_id",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list session participants: {e}")))?;

        let participant_ids = rows
            .iter()
            .map(|r| {
                let user_id: String = r.try_get("user_id")?;
                parse_uuid(&user_id, "participant user_id")
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Some(SessionDetails {
            session,
            participant_ids,
        }))
    }

    /// Every session with its participants, earliest start first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self) -> AppResult<Vec<SessionDetails>> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions ORDER BY start_time ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list sessions: {e}")))?;
        let sessions = rows.iter().map(row_to_session).collect::<AppResult<Vec<_>>>()?;

        let rows = sqlx::query(
            "SELECT session_id, user_id FROM session_participants ORDER BY session_id, user_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list session participants: {e}")))?;

        let mut participants: BTreeMap<Uuid, Vec<Uuid>> = BTreeMap::new();
        for row in &rows {
            let session_id: String = row.try_get("session_id")?;
            let user_id: String = row.try_get("user_id")?;
            participants
                .entry(parse_uuid(&session_id, "participant session_id")?)
                .or_default()
                .push(parse_uuid(&user_id, "participant user_id")?);
        }

        Ok(sessions
            .into_iter()
            .map(|session| SessionDetails {
                participant_ids: participants.remove(&session.id).unwrap_or_default(),
                session,
            })
            .collect())
    }

    /// Update a session with partial data
    ///
    /// Returns `None` if the session does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the times are inverted or the status is unknown
    pub async fn update(
        &self,
        session_id: Uuid,
        request: &UpdateSessionRequest,
    ) -> AppResult<Option<SessionDetails>> {
        let Some(existing) = self.get(session_id).await? else {
            return Ok(None);
        };

        let title = match request.title.as_deref() {
            Some(title) => normalize_title(Some(title)),
            None => existing.session.title,
        };
        let start_time = request.start_time.unwrap_or(existing.session.start_time);
        let end_time = request.end_time.unwrap_or(existing.session.end_time);
        validate_times(start_time, end_time)?;
        let status = request
            .status
            .as_deref()
            .map(str::parse::<SessionStatus>)
            .transpose()?
            .unwrap_or(existing.session.status);

        let result = sqlx::query(
            r"
            UPDATE sessions SET title = $1, start_time = $2, end_time = $3, status = $4
            WHERE id = $5
            ",
        )
        .bind(title.as_deref())
        .bind(format_timestamp(start_time))
        .bind(format_timestamp(end_time))
        .bind(status.as_str())
        .bind(session_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update session: {e}")))?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(SessionDetails {
            session: Session {
                title,
                start_time,
                end_time,
                status,
                ..existing.session
            },
            participant_ids: existing.participant_ids,
        }))
    }

    /// Delete a session together with its participants and messages
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, session_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete session: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_session(row: &SqliteRow) -> AppResult<Session> {
    let id: String = row.try_get("id")?;
    let start_time: String = row.try_get("start_time")?;
    let end_time: String = row.try_get("end_time")?;
    let status: String = row.try_get("status")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Session {
        id: parse_uuid(&id, "session id")?,
        title: row.try_get("title")?,
        start_time: parse_timestamp(&start_time, "session start_time")?,
        end_time: parse_timestamp(&end_time, "session end_time")?,
        status: status.parse()?,
        created_at: parse_timestamp(&created_at, "session created_at")?,
    })
}
