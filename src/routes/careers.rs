// ABOUTME: Route handlers for career reference data and the mentors of a career
// ABOUTME: Deleting a career that still has cohorts is rejected with 409
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use goya_core::errors::AppError;
use serde_json::json;

use super::{parse_id, ApiJson};
use crate::context::ServerResources;
use crate::database::CreateCareerRequest;

/// Career routes
pub struct CareerRoutes;

impl CareerRoutes {
    /// Create all career routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/careers", post(Self::handle_create))
            .route("/api/careers", get(Self::handle_list))
            .route("/api/careers/:id", get(Self::handle_get))
            .route("/api/careers/:id", delete(Self::handle_delete))
            .route("/api/careers/:id/mentors", get(Self::handle_list_mentors))
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(body): ApiJson<CreateCareerRequest>,
    ) -> Result<Response, AppError> {
        let career = resources.database.careers().create(&body).await?;
        Ok((StatusCode::CREATED, Json(career)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let careers = resources.database.careers().list().await?;
        Ok((StatusCode::OK, Json(careers)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let career_id = parse_id(&id, "career")?;
        let career = resources
            .database
            .careers()
            .get(career_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Career {career_id} not found")))?;
        Ok((StatusCode::OK, Json(career)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let career_id = parse_id(&id, "career")?;
        if !resources.database.careers().delete(career_id).await? {
            return Err(AppError::not_found(format!("Career {career_id} not found")));
        }
        Ok((StatusCode::OK, Json(json!({ "deleted": true, "id": career_id }))).into_response())
    }

    /// Handle GET /api/careers/:id/mentors
    async fn handle_list_mentors(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let career_id = parse_id(&id, "career")?;
        if resources.database.careers().get(career_id).await?.is_none() {
            return Err(AppError::not_found(format!("Career {career_id} not found")));
        }
        let coaches = resources.database.coaches().list_for_career(career_id).await?;
        Ok((StatusCode::OK, Json(coaches)).into_response())
    }
}
