// ABOUTME: Admin route handlers for cohort create, read, edit, and delete
// ABOUTME: Validation failures map to 400, duplicate names to 409
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

//! Cohort administration routes
//!
//! The public, availability-annotated cohort list lives with the enrollment
//! routes; these endpoints manage the cohort records themselves.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use goya_core::errors::AppError;
use goya_core::models::{Cohort, Enrollment};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{parse_id, ApiJson};
use crate::capacity::CapacityLimit;
use crate::context::ServerResources;
use crate::database::{CreateCohortRequest, UpdateCohortRequest};

/// A cohort with its enrollments
#[derive(Debug, Serialize, Deserialize)]
pub struct CohortDetailResponse {
    /// Cohort record
    #[serde(flatten)]
    pub cohort: Cohort,
    /// Live enrollments
    pub live_enrollments: u32,
    /// Free seats
    pub available_slots: u32,
    /// All enrollments, oldest first
    pub enrollments: Vec<Enrollment>,
}

/// Cohort admin routes
pub struct CohortAdminRoutes;

impl CohortAdminRoutes {
    /// Create all cohort admin routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/admin/cohorts", post(Self::handle_create))
            .route("/api/admin/cohorts", get(Self::handle_list))
            .route("/api/admin/cohorts/:id", get(Self::handle_get))
            .route("/api/admin/cohorts/:id", put(Self::handle_update))
            .route("/api/admin/cohorts/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Handle POST /api/admin/cohorts
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        ApiJson(body): ApiJson<CreateCohortRequest>,
    ) -> Result<Response, AppError> {
        let cohort = resources.database.cohorts().create(&body).await?;
        Ok((StatusCode::CREATED, Json(cohort)).into_response())
    }

    /// Handle GET /api/admin/cohorts
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let cohorts = resources.database.cohorts().list_with_availability().await?;
        Ok((StatusCode::OK, Json(cohorts)).into_response())
    }

    /// Handle GET /api/admin/cohorts/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let cohort_id = parse_id(&id, "cohort")?;
        let cohort = resources
            .database
            .cohorts()
            .get(cohort_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Cohort {cohort_id} not found")))?;

        let enrollments = resources
            .database
            .enrollments()
            .list_for_cohort(cohort_id)
            .await?;
        let live_enrollments = resources
            .database
            .enrollments()
            .count_live(cohort_id)
            .await?;
        let available_slots = CapacityLimit::cohort(cohort.capacity).available(live_enrollments);

        let response = CohortDetailResponse {
            cohort,
            live_enrollments,
            available_slots,
            enrollments,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PUT /api/admin/cohorts/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        ApiJson(body): ApiJson<UpdateCohortRequest>,
    ) -> Result<Response, AppError> {
        let cohort_id = parse_id(&id, "cohort")?;
        let cohort = resources
            .database
            .cohorts()
            .update(cohort_id, &body)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Cohort {cohort_id} not found")))?;
        Ok((StatusCode::OK, Json(cohort)).into_response())
    }

    /// Handle DELETE /api/admin/cohorts/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let cohort_id = parse_id(&id, "cohort")?;
        if !resources.database.cohorts().delete(cohort_id).await? {
            return Err(AppError::not_found(format!("Cohort {cohort_id} not found")));
        }
        Ok((StatusCode::OK, Json(json!({ "deleted": true, "id": cohort_id }))).into_response())
    }
}
