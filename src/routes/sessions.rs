// ABOUTME: Route handlers for mentoring sessions and the chat messages inside them
// ABOUTME: Messages are addressed through their session for posting and by ID for edits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use goya_core::errors::AppError;
use serde_json::json;
use tracing::info;

use super::{parse_id, ApiJson};
use crate::context::ServerResources;
use crate::database::{
    CreateMessageRequest, CreateSessionRequest, UpdateMessageRequest, UpdateSessionRequest,
};

/// Session and message routes
pub struct SessionRoutes;

impl SessionRoutes {
    /// Create all session routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/sessions",
                post(Self::handle_create).get(Self::handle_list),
            )
            .route(
                "/api/sessions/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route(
                "/api/sessions/:id/messages",
                post(Self::handle_post_message).get(Self::handle_list_messages),
            )
            .route(
                "/api/messages/:id",
                put(Self::handle_update_message).delete(Self::handle_delete_message),
            )
            .with_state(resources)
    }

    /// Handle POST /api/sessions
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(body): ApiJson<CreateSessionRequest>,
    ) -> Result<Response, AppError> {
        let session = resources.database.sessions().create(&body).await?;
        info!(
            session_id = %session.session.id,
            participants = session.participant_ids.len(),
            "session scheduled"
        );
        Ok((StatusCode::CREATED, Json(session)).into_response())
    }

    /// Handle GET /api/sessions
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let sessions = resources.database.sessions().list().await?;
        Ok((StatusCode::OK, Json(sessions)).into_response())
    }

    /// Handle GET /api/sessions/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let session_id = parse_id(&id, "session")?;
        let session = resources
            .database
            .sessions()
            .get(session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {session_id} not found")))?;
        Ok((StatusCode::OK, Json(session)).into_response())
    }

    /// Handle PUT /api/sessions/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        ApiJson(body): ApiJson<UpdateSessionRequest>,
    ) -> Result<Response, AppError> {
        let session_id = parse_id(&id, "session")?;
        let session = resources
            .database
            .sessions()
            .update(session_id, &body)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {session_id} not found")))?;
        Ok((StatusCode::OK, Json(session)).into_response())
    }

    /// Handle DELETE /api/sessions/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let session_id = parse_id(&id, "session")?;
        if !resources.database.sessions().delete(session_id).await? {
            return Err(AppError::not_found(format!("Session {session_id} not found")));
        }
        Ok((StatusCode::OK, Json(json!({ "deleted": true, "id": session_id }))).into_response())
    }

    /// Handle POST /api/sessions/:id/messages
    async fn handle_post_message(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        ApiJson(body): ApiJson<CreateMessageRequest>,
    ) -> Result<Response, AppError> {
        let session_id = parse_id(&id, "session")?;
        let message = resources
            .database
            .messages()
            .create(session_id, &body)
            .await?;
        Ok((StatusCode::CREATED, Json(message)).into_response())
    }

    /// Handle GET /api/sessions/:id/messages
    async fn handle_list_messages(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let session_id = parse_id(&id, "session")?;
        if resources.database.sessions().get(session_id).await?.is_none() {
            return Err(AppError::not_found(format!("Session {session_id} not found")));
        }
        let messages = resources
            .database
            .messages()
            .list_for_session(session_id)
            .await?;
        Ok((StatusCode::OK, Json(messages)).into_response())
    }

    /// Handle PUT /api/messages/:id
    async fn handle_update_message(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        ApiJson(body): ApiJson<UpdateMessageRequest>,
    ) -> Result<Response, AppError> {
        let message_id = parse_id(&id, "message")?;
        let message = resources
            .database
            .messages()
            .update(message_id, &body)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Message {message_id} not found")))?;
        Ok((StatusCode::OK, Json(message)).into_response())
    }

    /// Handle DELETE /api/messages/:id
    async fn handle_delete_message(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let message_id = parse_id(&id, "message")?;
        if !resources.database.messages().delete(message_id).await? {
            return Err(AppError::not_found(format!("Message {message_id} not found")));
        }
        Ok((StatusCode::OK, Json(json!({ "deleted": true, "id": message_id }))).into_response())
    }
}
