// ABOUTME: Database operations for chat messages posted inside mentoring sessions
// ABOUTME: Only participants of a session may post to it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use chrono::Utc;
use goya_core::errors::{AppError, AppResult};
use goya_core::models::Message;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};

const MESSAGE_COLUMNS: &str = "id, session_id, sender_id, content, created_at, updated_at";

/// Request to post a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    /// Posting user account
    #[serde(alias = "senderId")]
    pub sender_id: Uuid,
    /// Message text
    pub content: String,
}

/// Request to edit a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMessageRequest {
    /// Replacement text
    pub content: String,
}

fn required_content(content: &str) -> AppResult<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::missing_field("content"));
    }
    Ok(content.to_owned())
}

/// Message database operations manager
pub struct MessagesManager {
    pool: SqlitePool,
}

impl MessagesManager {
    /// Create a new messages manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Post a message to a session
    ///
    /// # Errors
    ///
    /// - `MISSING_REQUIRED_FIELD` for blank content
    /// - `RESOURCE_NOT_FOUND` for an unknown session or sender
    /// - `INVALID_INPUT` when the sender does not take part in the session
    pub async fn create(
        &self,
        session_id: Uuid,
        request: &CreateMessageRequest,
    ) -> AppResult<Message> {
        let content = required_content(&request.content)?;

        let row = sqlx::query(
            r"
            SELECT
                EXISTS (SELECT 1 FROM sessions WHERE id = $1) AS session_found,
                EXISTS (SELECT 1 FROM users WHERE id = $2) AS sender_found,
                EXISTS (
                    SELECT 1 FROM session_participants WHERE session_id = $1 AND user_id = $2
                ) AS participating
            ",
        )
        .bind(session_id.to_string())
        .bind(request.sender_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check message sender: {e}")))?;

        if !row.try_get::<bool, _>("session_found")? {
            return Err(AppError::not_found(format!("Session {session_id} not found")));
        }
        if !row.try_get::<bool, _>("sender_found")? {
            return Err(AppError::not_found(format!(
                "User {} not found",
                request.sender_id
            )));
        }
        if !row.try_get::<bool, _>("participating")? {
            return Err(AppError::invalid_input(format!(
                "User {} is not a participant of session {session_id}",
                request.sender_id
            )));
        }

        let message = Message {
            id: Uuid::new_v4(),
            session_id,
            sender_id: request.sender_id,
            content,
            created_at: Utc::now(),
            updated_at: None,
        };

        sqlx::query(
            r"
            INSERT INTO messages (id, session_id, sender_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(message.id.to_string())
        .bind(message.session_id.to_string())
        .bind(message.sender_id.to_string())
        .bind(&message.content)
        .bind(format_timestamp(message.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create message: {e}")))?;

        Ok(message)
    }

    /// Messages of a session in send order
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_for_session(&self, session_id: Uuid) -> AppResult<Vec<Message>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {MESSAGE_COLUMNS} FROM messages
            WHERE session_id = $1
            ORDER BY created_at ASC, id ASC
            "
        ))
        .bind(session_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list messages: {e}")))?;

        rows.iter().map(row_to_message).collect()
    }

    /// Replace the text of a message
    ///
    /// Returns `None` if the message does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error for blank content or if database operation fails
    pub async fn update(
        &self,
        message_id: Uuid,
        request: &UpdateMessageRequest,
    ) -> AppResult<Option<Message>> {
        let content = required_content(&request.content)?;

        let row = sqlx::query(&format!(
            r"
            UPDATE messages SET content = $1, updated_at = $2
            WHERE id = $3
            RETURNING {MESSAGE_COLUMNS}
            "
        ))
        .bind(&content)
        .bind(format_timestamp(Utc::now()))
        .bind(message_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update message: {e}")))?;

        row.as_ref().map(row_to_message).transpose()
    }

    /// Delete a message
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, message_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(message_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete message: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_message(row: &SqliteRow) -> AppResult<Message> {
    let id: String = row.try_get("id")?;
    let session_id: String = row.try_get("session_id")?;
    let sender_id: String = row.try_get("sender_id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: Option<String> = row.try_get("updated_at")?;

    Ok(Message {
        id: parse_uuid(&id, "message id")?,
        session_id: parse_uuid(&session_id, "message session_id")?,
        sender_id: parse_uuid(&sender_id, "message sender_id")?,
        content: row.try_get("content")?,
        created_at: parse_timestamp(&created_at, "message created_at")?,
        updated_at: updated_at
            .as_deref()
            .map(|t| parse_timestamp(t, "message updated_at"))
            .transpose()?,
    })
}
