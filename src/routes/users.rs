// ABOUTME: Route handlers for user account creation and lookup
// ABOUTME: Duplicate emails are rejected with 409
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use goya_core::errors::AppError;

use super::{parse_id, ApiJson};
use crate::context::ServerResources;
use crate::database::CreateUserRequest;

/// User account routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users", post(Self::handle_create))
            .route("/api/users/:id", get(Self::handle_get))
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(body): ApiJson<CreateUserRequest>,
    ) -> Result<Response, AppError> {
        let user = resources.database.users().create(&body).await?;
        Ok((StatusCode::CREATED, Json(user)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user_id = parse_id(&id, "user")?;
        let user = resources
            .database
            .users()
            .get(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        Ok((StatusCode::OK, Json(user)).into_response())
    }
}
